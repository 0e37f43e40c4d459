//! The markup emitter: head and body element trees to HTML.

use simpleui_ast::{Attrs, CssProperty, Document, Element, Expression, NavLink, OnClick};

use crate::error::GenError;
use crate::escape::{escape_attr, escape_text};
use crate::eval::evaluate;
use crate::run::{GenerationRun, PageOptions};
use crate::scope::{bind_arguments, ArgStack};
use crate::value::{format_number, Value};
use crate::writer::Writer;

/// Deepest supported nesting of component instantiations.
pub const MAX_COMPONENT_DEPTH: usize = 64;

/// Class added to every topbar `<header>`.
pub const TOPBAR_CLASS: &str = "topbar";
/// Class of the topbar's home link.
pub const TOPBAR_HOME_CLASS: &str = "topbar-home";
/// Class added to every `<footer>`.
pub const FOOTER_CLASS: &str = "footer";

/// A named section, linkable from an auto-populated topbar.
#[derive(Clone, Copy)]
struct SectionEntry<'d> {
    name: &'d str,
    title: Option<&'d Expression>,
}

pub(crate) struct MarkupEmitter<'a, 's> {
    doc: &'a Document,
    run: &'a mut GenerationRun<'s>,
    sections: Vec<SectionEntry<'a>>,
}

impl<'a, 's> MarkupEmitter<'a, 's> {
    pub(crate) fn new(doc: &'a Document, run: &'a mut GenerationRun<'s>) -> Self {
        let mut sections = Vec::new();
        collect_sections(&doc.body, &mut sections);
        Self { doc, run, sections }
    }

    // ── Entry points ──────────────────────────────────────────────────────

    pub(crate) fn head(&mut self) -> Result<String, GenError> {
        let doc = self.doc;
        let mut w = Writer::new();
        self.emit_elements(&doc.head, &mut ArgStack::new(), &mut w)?;
        Ok(w.finish())
    }

    pub(crate) fn body(&mut self) -> Result<String, GenError> {
        let doc = self.doc;
        let mut w = Writer::new();
        self.emit_elements(&doc.body, &mut ArgStack::new(), &mut w)?;
        Ok(w.finish())
    }

    pub(crate) fn page(&mut self, opts: &PageOptions) -> Result<String, GenError> {
        let doc = self.doc;
        let mut w = Writer::new();
        w.line("<!DOCTYPE html>");
        w.block::<GenError>("<html>", "</html>", |w| {
            w.block::<GenError>("<head>", "</head>", |w| {
                w.line("<meta charset=\"utf-8\">");
                self.emit_elements(&doc.head, &mut ArgStack::new(), w)?;
                w.line(&format!(
                    "<link rel=\"stylesheet\" href=\"{}\">",
                    escape_attr(&opts.stylesheet_href)
                ));
                w.line(&format!("<script src=\"{}\"></script>", escape_attr(&opts.script_src)));
                Ok(())
            })?;
            w.block("<body>", "</body>", |w| {
                self.emit_elements(&doc.body, &mut ArgStack::new(), w)
            })
        })?;
        Ok(w.finish())
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    fn emit_elements(
        &mut self,
        elements: &'a [Element],
        scope: &mut ArgStack,
        w: &mut Writer,
    ) -> Result<(), GenError> {
        for el in elements {
            self.emit_element(el, scope, w)?;
        }
        Ok(())
    }

    fn emit_element(
        &mut self,
        el: &'a Element,
        scope: &mut ArgStack,
        w: &mut Writer,
    ) -> Result<(), GenError> {
        match el {
            Element::Title { text } => {
                let text = self.text(text, scope)?;
                w.line(&format!("<title>{text}</title>"));
            }
            Element::Icon { path } => {
                let href = self.attr(path, scope)?;
                w.line(&format!("<link rel=\"icon\" href=\"{href}\">"));
            }
            Element::Div { attrs, content } => {
                let attrs = self.attributes(attrs, &[], scope)?;
                self.container(&format!("<div{attrs}>"), "</div>", content, scope, w)?;
            }
            Element::Section { attrs, title, content } => {
                let attrs = self.attributes(attrs, &[], scope)?;
                let open = format!("<section{attrs}>");
                match title {
                    Some(title) => {
                        let title = self.text(title, scope)?;
                        w.block(&open, "</section>", |w| {
                            w.line(&format!("<h2>{title}</h2>"));
                            self.emit_elements(content, scope, w)
                        })?;
                    }
                    None => self.container(&open, "</section>", content, scope, w)?,
                }
            }
            Element::Paragraph { attrs, text } => {
                let attrs = self.attributes(attrs, &[], scope)?;
                let text = self.text(text, scope)?;
                w.line(&format!("<p{attrs}>{text}</p>"));
            }
            Element::Heading { attrs, level, text } => {
                let attrs = self.attributes(attrs, &[], scope)?;
                let text = self.text(text, scope)?;
                w.line(&format!("<h{level}{attrs}>{text}</h{level}>"));
            }
            Element::Link { attrs, url, text } => {
                let attrs = self.attributes(attrs, &[], scope)?;
                let href = self.attr(url, scope)?;
                let text = self.text(text.as_ref().unwrap_or(url), scope)?;
                w.line(&format!("<a{attrs} href=\"{href}\">{text}</a>"));
            }
            Element::Image { attrs, path, alt } => {
                let attrs = self.attributes(attrs, &[], scope)?;
                let src = self.attr(path, scope)?;
                let alt = match alt {
                    Some(alt) => format!(" alt=\"{}\"", self.attr(alt, scope)?),
                    None => String::new(),
                };
                w.line(&format!("<img{attrs} src=\"{src}\"{alt}>"));
            }
            Element::Button { attrs, text, onclick } => {
                let attrs = self.attributes(attrs, &[], scope)?;
                let onclick = match onclick {
                    Some(click) => format!(" onclick=\"{}\"", self.onclick(click, scope)?),
                    None => String::new(),
                };
                let text = self.text(text, scope)?;
                w.line(&format!("<button{attrs}{onclick}>{text}</button>"));
            }
            Element::Textbox { attrs, label, placeholder, label_after } => {
                self.textbox(attrs, label.as_ref(), placeholder.as_ref(), *label_after, scope, w)?;
            }
            Element::Linebreak => w.line("<br>"),
            Element::Topbar { attrs, title, home, links, auto_nav_links } => {
                self.run.decorations.topbar = true;
                let attrs = self.attributes(attrs, &[TOPBAR_CLASS], scope)?;
                let title = self.text(title, scope)?;
                let home = match home {
                    Some(home) => self.attr(home, scope)?,
                    None => "#".to_string(),
                };
                let entries = if *auto_nav_links {
                    self.section_links()?
                } else {
                    self.explicit_links(links, scope)?
                };
                w.block::<GenError>(&format!("<header{attrs}>"), "</header>", |w| {
                    w.line(&format!("<a class=\"{TOPBAR_HOME_CLASS}\" href=\"{home}\">{title}</a>"));
                    if !entries.is_empty() {
                        w.block::<GenError>("<nav>", "</nav>", |w| {
                            w.block("<ul>", "</ul>", |w| {
                                for (target, text) in &entries {
                                    w.line(&format!("<li><a href=\"#{target}\">{text}</a></li>"));
                                }
                                Ok(())
                            })
                        })?;
                    }
                    Ok(())
                })?;
            }
            Element::Footer { attrs, text } => {
                self.run.decorations.footer = true;
                let attrs = self.attributes(attrs, &[FOOTER_CLASS], scope)?;
                let text = self.text(text, scope)?;
                w.block::<GenError>(&format!("<footer{attrs}>"), "</footer>", |w| {
                    w.line(&format!("<p>{text}</p>"));
                    Ok(())
                })?;
            }
            Element::UseComponent { component, args } => {
                let doc = self.doc;
                let def = doc
                    .component(component)
                    .ok_or_else(|| GenError::UnknownComponent(component.clone()))?;
                if scope.depth() >= MAX_COMPONENT_DEPTH {
                    return Err(GenError::RecursionLimit {
                        component: component.clone(),
                        limit: MAX_COMPONENT_DEPTH,
                    });
                }
                let frame = bind_arguments(def, args, scope, &mut self.run.warnings)?;
                let mut inner = scope.enter(frame);
                self.emit_elements(&def.body, &mut inner, w)?;
            }
        }
        Ok(())
    }

    // ── Variant helpers ───────────────────────────────────────────────────

    /// Children wrapped in `open` / `close`, collapsed onto one line when
    /// there are none.
    fn container(
        &mut self,
        open: &str,
        close: &str,
        content: &'a [Element],
        scope: &mut ArgStack,
        w: &mut Writer,
    ) -> Result<(), GenError> {
        if content.is_empty() {
            w.line(&format!("{open}{close}"));
            return Ok(());
        }
        w.block(open, close, |w| self.emit_elements(content, scope, w))
    }

    fn textbox(
        &mut self,
        attrs: &Attrs,
        label: Option<&Expression>,
        placeholder: Option<&Expression>,
        label_after: bool,
        scope: &mut ArgStack,
        w: &mut Writer,
    ) -> Result<(), GenError> {
        let label = match label {
            Some(label) => {
                let target = attrs
                    .name
                    .as_deref()
                    .map(|n| format!(" for=\"{}\"", escape_attr(n)))
                    .unwrap_or_default();
                Some(format!("<label{target}>{}</label>", self.text(label, scope)?))
            }
            None => None,
        };
        let common = self.attributes(attrs, &[], scope)?;
        let placeholder = match placeholder {
            Some(p) => format!(" placeholder=\"{}\"", self.attr(p, scope)?),
            None => String::new(),
        };
        let input = format!("<input{common} type=\"text\"{placeholder}>");

        match (label, label_after) {
            (Some(label), false) => {
                w.line(&label);
                w.line(&input);
            }
            (Some(label), true) => {
                w.line(&input);
                w.line(&label);
            }
            (None, _) => w.line(&input),
        }
        Ok(())
    }

    /// `fn(arg, ...)` with arguments rendered as script literals, escaped
    /// for use inside a double-quoted attribute.
    fn onclick(&mut self, click: &OnClick, scope: &ArgStack) -> Result<String, GenError> {
        let mut args = Vec::with_capacity(click.args.len());
        for arg in &click.args {
            args.push(self.eval(arg, scope)?.to_js_literal());
        }
        Ok(escape_attr(&format!("{}({})", click.function, args.join(", "))))
    }

    fn section_links(&mut self) -> Result<Vec<(String, String)>, GenError> {
        let top_level = ArgStack::new();
        let mut out = Vec::with_capacity(self.sections.len());
        for i in 0..self.sections.len() {
            let SectionEntry { name, title } = self.sections[i];
            let text = match title {
                Some(title) => self.text(title, &top_level)?,
                None => escape_text(name),
            };
            out.push((escape_attr(name), text));
        }
        Ok(out)
    }

    fn explicit_links(
        &mut self,
        links: &[NavLink],
        scope: &ArgStack,
    ) -> Result<Vec<(String, String)>, GenError> {
        let mut out = Vec::with_capacity(links.len());
        for link in links {
            let text = match &link.text {
                Some(text) => self.text(text, scope)?,
                None => escape_text(&link.target),
            };
            out.push((escape_attr(&link.target), text));
        }
        Ok(out)
    }

    // ── Attributes ────────────────────────────────────────────────────────

    /// ` id="…" class="…" style="…"`, each present only when it has
    /// content. User classes are resolved against the base stylesheet;
    /// `derived` classes are framework markers and are not.
    fn attributes(
        &mut self,
        attrs: &Attrs,
        derived: &[&str],
        scope: &ArgStack,
    ) -> Result<String, GenError> {
        let mut out = String::new();
        if let Some(name) = &attrs.name {
            out.push_str(&format!(" id=\"{}\"", escape_attr(name)));
        }

        let mut classes: Vec<&str> = derived.to_vec();
        for class in &attrs.classes {
            self.run.classes.resolve(class);
            classes.push(class);
        }
        if !classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_attr(&classes.join(" "))));
        }

        let style = self.inline_style(&attrs.css, scope)?;
        if !style.is_empty() {
            out.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
        }
        Ok(out)
    }

    fn inline_style(&mut self, css: &[CssProperty], scope: &ArgStack) -> Result<String, GenError> {
        let mut out = String::new();
        for prop in css {
            let value = self.eval(&prop.value, scope)?;
            out.push_str(prop.property.css_name());
            out.push(':');
            out.push_str(&css_value(prop, &value));
            out.push(';');
        }
        Ok(out)
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn eval(&mut self, expr: &Expression, scope: &ArgStack) -> Result<Value, GenError> {
        evaluate(expr, scope, &mut self.run.warnings)
    }

    /// Evaluated and escaped as element text.
    fn text(&mut self, expr: &Expression, scope: &ArgStack) -> Result<String, GenError> {
        Ok(escape_text(&self.eval(expr, scope)?.to_string()))
    }

    /// Evaluated and escaped as an attribute value.
    fn attr(&mut self, expr: &Expression, scope: &ArgStack) -> Result<String, GenError> {
        Ok(escape_attr(&self.eval(expr, scope)?.to_string()))
    }
}

/// Render a property value, adding `px` to bare numeric lengths.
pub(crate) fn css_value(prop: &CssProperty, value: &Value) -> String {
    match value {
        Value::Number(n) if prop.property.takes_pixels() => format!("{}px", format_number(*n)),
        other => other.to_string(),
    }
}

/// Named sections in document order, looking through nested containers.
/// Component bodies are not searched.
fn collect_sections<'d>(elements: &'d [Element], out: &mut Vec<SectionEntry<'d>>) {
    for el in elements {
        if let Element::Section { attrs, title, .. } = el {
            if let Some(name) = attrs.name.as_deref() {
                out.push(SectionEntry { name, title: title.as_ref() });
            }
        }
        collect_sections(el.children(), out);
    }
}
