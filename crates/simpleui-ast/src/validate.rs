//! Semantic checks run before generation.
//!
//! Generation assumes a document that passed these checks; anything
//! reported as [`Severity::Error`](crate::Severity::Error) would either
//! abort generation or produce broken output.

use std::collections::{HashMap, HashSet};

use crate::ast::{
    Attrs, BinaryOp, Component, Document, Element, Expression, ParamType, Parameter, Statement,
};
use crate::diagnostic::Diagnostic;

pub const MIN_HEADING_LEVEL: u8 = 1;
pub const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Class names defined by the base stylesheet. `None` skips the
    /// class-existence check.
    pub known_classes: Option<HashSet<String>>,
}

impl ValidationOptions {
    pub fn with_known_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { known_classes: Some(classes.into_iter().map(Into::into).collect()) }
    }
}

/// Run every check over `doc`, returning diagnostics in document order.
pub fn validate(doc: &Document, opts: &ValidationOptions) -> Vec<Diagnostic> {
    let mut v = Validator::new(doc, opts);
    v.check_definitions();
    v.check_component_cycles();

    for (i, el) in doc.head.iter().enumerate() {
        let path = format!("head[{i}]");
        if el.is_head_element() {
            v.check_head_element(el, &path);
        } else {
            v.error(&path, format!("{} is not allowed in the head", el.kind()));
        }
    }
    for (i, el) in doc.body.iter().enumerate() {
        v.check_element(el, &format!("body[{i}]"), None);
    }
    for (ci, component) in doc.components.iter().enumerate() {
        for (i, el) in component.body.iter().enumerate() {
            v.check_element(el, &format!("components[{ci}].body[{i}]"), Some(component));
        }
    }
    v.check_script();
    for (i, rule) in doc.styles.iter().enumerate() {
        let path = format!("styles[{i}]");
        if rule.properties.is_empty() {
            v.error(&path, "CSS properties should not be empty");
        }
        for (pi, prop) in rule.properties.iter().enumerate() {
            v.check_markup_expr(&prop.value, &format!("{path}.properties[{pi}]"), &[]);
        }
    }

    v.diags
}

// ── Validator ─────────────────────────────────────────────────────────────

struct Validator<'d> {
    doc: &'d Document,
    opts: &'d ValidationOptions,
    diags: Vec<Diagnostic>,
    /// Element id → path of its first use (body only).
    ids: HashMap<&'d str, String>,
    textboxes: HashSet<&'d str>,
}

impl<'d> Validator<'d> {
    fn new(doc: &'d Document, opts: &'d ValidationOptions) -> Self {
        let mut textboxes = HashSet::new();
        let roots = doc.body.iter().chain(doc.components.iter().flat_map(|c| c.body.iter()));
        for el in roots {
            collect_textboxes(el, &mut textboxes);
        }
        Self { doc, opts, diags: Vec::new(), ids: HashMap::new(), textboxes }
    }

    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.diags.push(Diagnostic::error(path, message));
    }

    fn warning(&mut self, path: &str, message: impl Into<String>) {
        self.diags.push(Diagnostic::warning(path, message));
    }

    // ── Definitions ───────────────────────────────────────────────────────

    fn check_definitions(&mut self) {
        let doc = self.doc;
        let mut seen = HashSet::new();
        for (i, c) in doc.components.iter().enumerate() {
            if !seen.insert(c.name.as_str()) {
                self.error(&format!("components[{i}]"), format!("duplicate component `{}`", c.name));
            }
            let mut params = HashSet::new();
            for p in &c.params {
                if !params.insert(p.name.as_str()) {
                    self.error(
                        &format!("components[{i}]"),
                        format!("duplicate parameter `{}` in component `{}`", p.name, c.name),
                    );
                }
            }
        }
        let mut seen = HashSet::new();
        for (i, f) in doc.functions.iter().enumerate() {
            if !seen.insert(f.name.as_str()) {
                self.error(&format!("functions[{i}]"), format!("duplicate function `{}`", f.name));
            }
        }
    }

    /// Components that (transitively) instantiate themselves never finish
    /// rendering.
    fn check_component_cycles(&mut self) {
        let doc = self.doc;
        for (i, c) in doc.components.iter().enumerate() {
            let mut stack = vec![c.name.as_str()];
            if self.reaches(c, &c.name, &mut stack) {
                self.error(
                    &format!("components[{i}]"),
                    format!("component `{}` instantiates itself ({})", c.name, stack.join(" -> ")),
                );
            }
        }
    }

    fn reaches(&self, from: &'d Component, target: &str, stack: &mut Vec<&'d str>) -> bool {
        let mut uses = Vec::new();
        for el in &from.body {
            collect_component_uses(el, &mut uses);
        }
        for name in uses {
            if name == target {
                stack.push(name);
                return true;
            }
            if stack.contains(&name) {
                continue;
            }
            if let Some(next) = self.doc.component(name) {
                stack.push(name);
                if self.reaches(next, target, stack) {
                    return true;
                }
                stack.pop();
            }
        }
        false
    }

    // ── Elements ──────────────────────────────────────────────────────────

    fn check_head_element(&mut self, el: &'d Element, path: &str) {
        match el {
            Element::Title { text } => self.check_markup_expr(text, path, &[]),
            Element::Icon { path: href } => self.check_markup_expr(href, path, &[]),
            _ => {}
        }
    }

    fn check_element(&mut self, el: &'d Element, path: &str, component: Option<&'d Component>) {
        let doc = self.doc;
        let params: &[Parameter] = component.map(|c| c.params.as_slice()).unwrap_or(&[]);

        if el.is_head_element() {
            self.error(path, format!("{} belongs in the head", el.kind()));
            return;
        }
        if let Some(attrs) = el.attrs() {
            self.check_attrs(attrs, path, params, component.is_none());
        }

        match el {
            Element::Div { content, .. } => self.check_children(content, path, component),
            Element::Section { title, content, .. } => {
                if let Some(title) = title {
                    self.check_markup_expr(title, &format!("{path}.title"), params);
                }
                self.check_children(content, path, component);
            }
            Element::Paragraph { text, .. } | Element::Footer { text, .. } => {
                self.check_markup_expr(text, path, params);
            }
            Element::Heading { level, text, .. } => {
                if !(MIN_HEADING_LEVEL..=MAX_HEADING_LEVEL).contains(level) {
                    self.error(
                        path,
                        format!(
                            "heading level {level} is out of range \
                             ({MIN_HEADING_LEVEL}-{MAX_HEADING_LEVEL})"
                        ),
                    );
                }
                self.check_markup_expr(text, path, params);
            }
            Element::Link { url, text, .. } => {
                self.check_markup_expr(url, path, params);
                if let Some(text) = text {
                    self.check_markup_expr(text, path, params);
                }
            }
            Element::Image { path: src, alt, .. } => {
                self.check_markup_expr(src, path, params);
                if let Some(alt) = alt {
                    self.check_markup_expr(alt, path, params);
                }
            }
            Element::Button { text, onclick, .. } => {
                self.check_markup_expr(text, path, params);
                if let Some(click) = onclick {
                    match doc.function(&click.function) {
                        None => self.error(
                            path,
                            format!("onclick refers to unknown function `{}`", click.function),
                        ),
                        Some(f) if f.params.len() != click.args.len() => self.error(
                            path,
                            format!(
                                "function `{}` expects {} argument(s), onclick passes {}",
                                f.name,
                                f.params.len(),
                                click.args.len()
                            ),
                        ),
                        Some(_) => {}
                    }
                    for arg in &click.args {
                        self.check_markup_expr(arg, path, params);
                    }
                }
            }
            Element::Textbox { attrs, label, placeholder, .. } => {
                if label.is_some() && attrs.name.is_none() {
                    self.warning(path, "textbox label has no input name to point at");
                }
                for expr in label.iter().chain(placeholder.iter()) {
                    self.check_markup_expr(expr, path, params);
                }
            }
            Element::Linebreak => {}
            Element::Topbar { title, home, links, auto_nav_links, .. } => {
                self.check_markup_expr(title, path, params);
                if let Some(home) = home {
                    self.check_markup_expr(home, path, params);
                }
                if *auto_nav_links && !links.is_empty() {
                    self.warning(path, "explicit links are ignored when auto_nav_links is set");
                }
                for link in links {
                    if let Some(text) = &link.text {
                        self.check_markup_expr(text, path, params);
                    }
                }
            }
            Element::UseComponent { component: name, args } => {
                for arg in args {
                    self.check_markup_expr(arg, path, params);
                }
                self.check_component_call(name, args, path, params);
            }
            Element::Title { .. } | Element::Icon { .. } => {}
        }
    }

    fn check_children(&mut self, content: &'d [Element], path: &str, component: Option<&'d Component>) {
        for (i, child) in content.iter().enumerate() {
            self.check_element(child, &format!("{path}.content[{i}]"), component);
        }
    }

    fn check_attrs(&mut self, attrs: &'d Attrs, path: &str, params: &[Parameter], track_id: bool) {
        if track_id {
            if let Some(name) = attrs.name.as_deref() {
                if let Some(first) = self.ids.get(name) {
                    let msg = format!("element name `{name}` is already used at {first}");
                    self.warning(path, msg);
                } else {
                    self.ids.insert(name, path.to_string());
                }
            }
        }
        if let Some(known) = &self.opts.known_classes {
            let unknown: Vec<&str> = attrs
                .classes
                .iter()
                .filter(|c| !known.contains(c.as_str()))
                .map(String::as_str)
                .collect();
            for class in unknown {
                self.error(path, format!("unknown CSS class `{class}`"));
            }
        }
        for (i, prop) in attrs.css.iter().enumerate() {
            self.check_markup_expr(&prop.value, &format!("{path}.css[{i}]"), params);
        }
    }

    fn check_component_call(
        &mut self,
        name: &str,
        args: &[Expression],
        path: &str,
        params: &[Parameter],
    ) {
        let doc = self.doc;
        let Some(component) = doc.component(name) else {
            self.error(path, format!("unknown component `{name}`"));
            return;
        };
        if component.params.len() != args.len() {
            self.error(
                path,
                format!(
                    "component `{name}` expects {} argument(s), got {}",
                    component.params.len(),
                    args.len()
                ),
            );
            return;
        }
        for (param, arg) in component.params.iter().zip(args) {
            if let Some(found) = arg.static_type(params) {
                if found != param.ty {
                    self.error(
                        path,
                        format!(
                            "argument `{}` of component `{name}` must be a {}, got a {}",
                            param.name,
                            param.ty.name(),
                            found.name()
                        ),
                    );
                }
            }
        }
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn check_markup_expr(&mut self, expr: &Expression, path: &str, params: &[Parameter]) {
        let mut found = Vec::new();
        expr.walk(&mut |e| match e {
            Expression::SymbolReference { symbol } if !params.iter().any(|p| &p.name == symbol) => {
                found.push(Diagnostic::warning(
                    path,
                    format!(
                        "`{symbol}` is not a parameter of the enclosing component \
                         and renders as an empty string"
                    ),
                ));
            }
            Expression::TextboxValue { textbox } => {
                found.push(Diagnostic::error(
                    path,
                    format!("textbox value `{textbox}` can only be read from a script"),
                ));
            }
            _ => {}
        });
        self.diags.extend(found);
        self.check_operand_types(expr, path, params);
    }

    fn check_operand_types(&mut self, expr: &Expression, path: &str, params: &[Parameter]) {
        let mut found = Vec::new();
        expr.walk(&mut |e| {
            if let Expression::BinaryOperation { left, op, right } = e {
                if *op == BinaryOp::Add {
                    return;
                }
                let stringy = [left, right]
                    .iter()
                    .any(|side| side.static_type(params) == Some(ParamType::String));
                if stringy {
                    found.push(Diagnostic::error(
                        path,
                        format!("operator `{}` cannot be applied to a string", op.symbol()),
                    ));
                }
            }
        });
        self.diags.extend(found);
    }

    // ── Script ────────────────────────────────────────────────────────────

    fn check_script(&mut self) {
        let doc = self.doc;
        let mut globals: Vec<&str> = Vec::new();
        for (i, stmt) in doc.statements.iter().enumerate() {
            let path = format!("statements[{i}]");
            self.check_statement(stmt, &path, &globals);
            if let Statement::Const { name, .. } = stmt {
                globals.push(name);
            }
        }
        for (fi, function) in doc.functions.iter().enumerate() {
            let mut known: Vec<&str> = globals.clone();
            known.extend(function.params.iter().map(String::as_str));
            for (i, stmt) in function.body.iter().enumerate() {
                let path = format!("functions[{fi}].body[{i}]");
                self.check_statement(stmt, &path, &known);
                if let Statement::Const { name, .. } = stmt {
                    known.push(name);
                }
            }
        }
    }

    fn check_statement(&mut self, stmt: &Statement, path: &str, known: &[&str]) {
        let value = match stmt {
            Statement::Alert { value } | Statement::Const { value, .. } => value,
        };
        let mut found = Vec::new();
        value.walk(&mut |e| match e {
            Expression::SymbolReference { symbol } if !known.contains(&symbol.as_str()) => {
                found.push(Diagnostic::warning(path, format!("`{symbol}` is not defined")));
            }
            Expression::TextboxValue { textbox } if !self.textboxes.contains(textbox.as_str()) => {
                found.push(Diagnostic::warning(
                    path,
                    format!("no textbox named `{textbox}` in the document"),
                ));
            }
            _ => {}
        });
        self.diags.extend(found);
        self.check_operand_types(value, path, &[]);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

fn collect_textboxes<'d>(el: &'d Element, out: &mut HashSet<&'d str>) {
    if let Element::Textbox { attrs, .. } = el {
        if let Some(name) = attrs.name.as_deref() {
            out.insert(name);
        }
    }
    for child in el.children() {
        collect_textboxes(child, out);
    }
}

fn collect_component_uses<'d>(el: &'d Element, out: &mut Vec<&'d str>) {
    if let Element::UseComponent { component, .. } = el {
        out.push(component);
    }
    for child in el.children() {
        collect_component_uses(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CssPropertyKind, Function, OnClick, StyleRule, StyleTarget};
    use crate::diagnostic::{has_errors, Severity};

    fn heading(level: u8) -> Element {
        Element::Heading { attrs: Attrs::default(), level, text: Expression::string("T") }
    }

    fn doc_with_body(body: Vec<Element>) -> Document {
        Document { body, ..Document::default() }
    }

    fn messages(diags: &[Diagnostic]) -> Vec<&str> {
        diags.iter().map(|d| d.message.as_str()).collect()
    }

    fn card() -> Component {
        Component {
            name: "Card".into(),
            params: vec![Parameter::new("title", ParamType::String)],
            body: vec![Element::paragraph(Expression::symbol("title"))],
        }
    }

    #[test]
    fn heading_level_bounds() {
        for level in [1, 6] {
            let diags = validate(&doc_with_body(vec![heading(level)]), &ValidationOptions::default());
            assert!(diags.is_empty(), "level {level}: {diags:?}");
        }
        for level in [0, 7] {
            let diags = validate(&doc_with_body(vec![heading(level)]), &ValidationOptions::default());
            assert!(has_errors(&diags), "level {level} should be rejected");
            assert!(diags[0].message.contains("out of range"));
        }
    }

    #[test]
    fn unknown_class_is_an_error() {
        let attrs = Attrs::default().with_class("card").with_class("nope");
        let doc = doc_with_body(vec![Element::div(attrs, vec![])]);
        let diags = validate(&doc, &ValidationOptions::with_known_classes(["card"]));
        assert_eq!(messages(&diags), vec!["unknown CSS class `nope`"]);
        assert_eq!(diags[0].path, "body[0]");
    }

    #[test]
    fn class_check_skipped_without_known_set() {
        let doc = doc_with_body(vec![Element::div(Attrs::default().with_class("x"), vec![])]);
        assert!(validate(&doc, &ValidationOptions::default()).is_empty());
    }

    #[test]
    fn component_argument_count_and_type() {
        let doc = Document {
            components: vec![card()],
            body: vec![
                Element::use_component("Card", vec![Expression::string("ok")]),
                Element::use_component("Card", vec![]),
                Element::use_component("Card", vec![Expression::number(1.0)]),
                Element::use_component("Missing", vec![]),
            ],
            ..Document::default()
        };
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(
            messages(&diags),
            vec![
                "component `Card` expects 1 argument(s), got 0",
                "argument `title` of component `Card` must be a string, got a number",
                "unknown component `Missing`",
            ]
        );
        assert_eq!(diags[1].path, "body[2]");
    }

    #[test]
    fn forwarded_parameter_type_is_checked() {
        let outer = Component {
            name: "Outer".into(),
            params: vec![Parameter::new("n", ParamType::Number)],
            body: vec![Element::use_component("Card", vec![Expression::symbol("n")])],
        };
        let doc = Document { components: vec![card(), outer], ..Document::default() };
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path, "components[1].body[0]");
    }

    #[test]
    fn stray_symbol_in_body_is_a_warning() {
        let doc = doc_with_body(vec![Element::paragraph(Expression::symbol("who"))]);
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn string_operand_of_subtraction() {
        let expr = Expression::binary(Expression::string("a"), BinaryOp::Sub, Expression::number(1.0));
        let doc = doc_with_body(vec![Element::paragraph(expr)]);
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(messages(&diags), vec!["operator `-` cannot be applied to a string"]);
    }

    #[test]
    fn textbox_value_outside_script() {
        let doc = doc_with_body(vec![Element::paragraph(Expression::textbox("age"))]);
        assert!(has_errors(&validate(&doc, &ValidationOptions::default())));
    }

    #[test]
    fn head_and_body_placement() {
        let doc = Document {
            head: vec![Element::paragraph(Expression::string("x"))],
            body: vec![Element::Title { text: Expression::string("t") }],
            ..Document::default()
        };
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(
            messages(&diags),
            vec!["Paragraph is not allowed in the head", "Title belongs in the head"]
        );
    }

    #[test]
    fn onclick_function_checks() {
        let button = |function: &str, args: Vec<Expression>| Element::Button {
            attrs: Attrs::default(),
            text: Expression::string("Go"),
            onclick: Some(OnClick { function: function.into(), args }),
        };
        let doc = Document {
            functions: vec![Function { name: "sayHi".into(), params: vec!["who".into()], body: vec![] }],
            body: vec![
                button("sayHi", vec![Expression::string("World")]),
                button("sayHi", vec![]),
                button("nothing", vec![]),
            ],
            ..Document::default()
        };
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(
            messages(&diags),
            vec![
                "function `sayHi` expects 1 argument(s), onclick passes 0",
                "onclick refers to unknown function `nothing`",
            ]
        );
    }

    #[test]
    fn duplicate_definitions_and_ids() {
        let doc = Document {
            components: vec![card(), card()],
            body: vec![
                Element::div(Attrs::named("main"), vec![]),
                Element::div(Attrs::named("main"), vec![]),
            ],
            ..Document::default()
        };
        let diags = validate(&doc, &ValidationOptions::default());
        assert!(diags.iter().any(|d| d.message == "duplicate component `Card`"));
        let dup = diags.iter().find(|d| d.message.contains("already used")).unwrap();
        assert_eq!(dup.severity, Severity::Warning);
        assert_eq!(dup.path, "body[1]");
    }

    #[test]
    fn self_instantiating_component() {
        let looped = Component {
            name: "A".into(),
            params: vec![],
            body: vec![Element::div(Attrs::default(), vec![Element::use_component("B", vec![])])],
        };
        let other = Component {
            name: "B".into(),
            params: vec![],
            body: vec![Element::use_component("A", vec![])],
        };
        let doc = Document { components: vec![looped, other], ..Document::default() };
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(diags[0].message, "component `A` instantiates itself (A -> B -> A)");
    }

    #[test]
    fn empty_style_rule() {
        let doc = Document {
            styles: vec![
                StyleRule { target: StyleTarget::Text, properties: vec![] },
                StyleRule {
                    target: StyleTarget::Objects,
                    properties: vec![crate::ast::CssProperty::new(
                        CssPropertyKind::Width,
                        Expression::number(10.0),
                    )],
                },
            ],
            ..Document::default()
        };
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(messages(&diags), vec!["CSS properties should not be empty"]);
        assert_eq!(diags[0].path, "styles[0]");
    }

    #[test]
    fn script_symbols_and_textboxes() {
        let doc = Document {
            body: vec![Element::Textbox {
                attrs: Attrs::named("age"),
                label: None,
                placeholder: None,
                label_after: false,
            }],
            functions: vec![Function {
                name: "show".into(),
                params: vec!["who".into()],
                body: vec![
                    Statement::Const { name: "n".into(), value: Expression::textbox("age") },
                    Statement::Alert {
                        value: Expression::binary(
                            Expression::symbol("who"),
                            BinaryOp::Add,
                            Expression::symbol("n"),
                        ),
                    },
                    Statement::Alert { value: Expression::symbol("ghost") },
                    Statement::Alert { value: Expression::textbox("height") },
                ],
            }],
            ..Document::default()
        };
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(
            messages(&diags),
            vec!["`ghost` is not defined", "no textbox named `height` in the document"]
        );
    }

    #[test]
    fn label_without_name() {
        let doc = doc_with_body(vec![Element::Textbox {
            attrs: Attrs::default(),
            label: Some(Expression::string("Age")),
            placeholder: None,
            label_after: false,
        }]);
        let diags = validate(&doc, &ValidationOptions::default());
        assert_eq!(diags[0].severity, Severity::Warning);
    }
}
