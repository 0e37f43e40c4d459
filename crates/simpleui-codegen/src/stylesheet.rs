//! The stylesheet emitter.
//!
//! Output order: the base reset, document style rules, class rules
//! collected during the markup pass, then topbar / footer rules when those
//! elements were rendered.

use simpleui_ast::{Document, StyleRule};

use crate::error::GenError;
use crate::eval::evaluate;
use crate::markup::{css_value, FOOTER_CLASS, TOPBAR_CLASS, TOPBAR_HOME_CLASS};
use crate::run::GenerationRun;
use crate::scope::ArgStack;
use crate::writer::Writer;

const BASE_RULES: &str = "\
body {
    margin: 0;
    font-family: Arial, Helvetica, sans-serif;
}";

const TOPBAR_HEIGHT_PX: u32 = 56;

pub(crate) fn emit(doc: &Document, run: &mut GenerationRun<'_>) -> Result<String, GenError> {
    let mut w = Writer::new();
    w.line(BASE_RULES);

    for rule in &doc.styles {
        if rule.properties.is_empty() {
            continue;
        }
        w.blank();
        style_rule(rule, run, &mut w)?;
    }

    for rule in run.classes.rules() {
        w.blank();
        w.line(rule);
    }

    let decorations = run.decorations;
    if decorations.topbar {
        w.blank();
        topbar_rules(&mut w);
    }
    if decorations.footer {
        w.blank();
        footer_rules(&mut w);
    }
    Ok(w.finish())
}

fn style_rule(rule: &StyleRule, run: &mut GenerationRun<'_>, w: &mut Writer) -> Result<(), GenError> {
    let top_level = ArgStack::new();
    let mut decls = Vec::with_capacity(rule.properties.len());
    for prop in &rule.properties {
        let value = evaluate(&prop.value, &top_level, &mut run.warnings)?;
        decls.push(format!("{}: {};", prop.property.css_name(), css_value(prop, &value)));
    }
    w.block(&format!("{} {{", rule.target.selector()), "}", |w| {
        for decl in &decls {
            w.line(decl);
        }
        Ok(())
    })
}

fn topbar_rules(w: &mut Writer) {
    w.line(&format!(
        "\
body {{
    padding-top: {TOPBAR_HEIGHT_PX}px;
}}

.{TOPBAR_CLASS} {{
    position: fixed;
    top: 0;
    left: 0;
    right: 0;
    height: {TOPBAR_HEIGHT_PX}px;
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 0 16px;
    background-color: #333333;
    color: #ffffff;
    z-index: 100;
}}

.{TOPBAR_CLASS} a {{
    color: inherit;
    text-decoration: none;
}}

.{TOPBAR_HOME_CLASS} {{
    font-weight: bold;
    font-size: 20px;
}}

.{TOPBAR_CLASS} nav ul {{
    display: flex;
    gap: 16px;
    list-style: none;
    margin: 0;
    padding: 0;
}}"
    ));
}

fn footer_rules(w: &mut Writer) {
    w.line(&format!(
        "\
.{FOOTER_CLASS} {{
    position: fixed;
    bottom: 0;
    left: 0;
    right: 0;
    padding: 8px 16px;
    text-align: center;
    background-color: #333333;
    color: #ffffff;
}}"
    ));
}

#[cfg(test)]
mod tests {
    use simpleui_ast::{Attrs, CssProperty, CssPropertyKind, Element, Expression, StyleTarget};

    use crate::css::BaseStylesheet;
    use crate::run::GenerationRun;

    use super::*;

    fn sheet() -> BaseStylesheet {
        BaseStylesheet::parse(".card { padding: 8px; }\n.muted { color: gray; }\n").unwrap()
    }

    fn stylesheet_for(doc: &Document) -> String {
        let base = sheet();
        let mut run = GenerationRun::new(&base);
        run.emit_stylesheet(doc).unwrap()
    }

    #[test]
    fn empty_document_has_only_base_rules() {
        assert_eq!(stylesheet_for(&Document::default()), format!("{BASE_RULES}\n"));
    }

    #[test]
    fn document_style_rules_follow_base() {
        let doc = Document {
            styles: vec![StyleRule {
                target: StyleTarget::Text,
                properties: vec![
                    CssProperty::new(CssPropertyKind::TextColor, Expression::string("navy")),
                    CssProperty::new(CssPropertyKind::FontSize, Expression::number(14.0)),
                ],
            }],
            ..Document::default()
        };
        let css = stylesheet_for(&doc);
        assert!(css.contains(
            "p, h1, h2, h3, h4, h5, h6, a, label {\n    color: navy;\n    font-size: 14px;\n}"
        ));
    }

    #[test]
    fn collected_classes_appear_once_in_first_seen_order() {
        let doc = Document {
            body: vec![
                Element::div(Attrs::default().with_class("muted"), vec![]),
                Element::div(Attrs::default().with_class("card"), vec![]),
                Element::div(Attrs::default().with_class("muted").with_class("card"), vec![]),
            ],
            ..Document::default()
        };
        let css = stylesheet_for(&doc);
        assert_eq!(css.matches(".card {").count(), 1);
        assert_eq!(css.matches(".muted {").count(), 1);
        assert!(css.find(".muted").unwrap() < css.find(".card").unwrap());
    }

    #[test]
    fn unknown_classes_contribute_nothing() {
        let doc = Document {
            body: vec![Element::div(Attrs::default().with_class("mine"), vec![])],
            ..Document::default()
        };
        assert_eq!(stylesheet_for(&doc), format!("{BASE_RULES}\n"));
    }

    #[test]
    fn decoration_rules_only_when_present() {
        let doc = Document {
            body: vec![Element::Footer { attrs: Attrs::default(), text: Expression::string("(c)") }],
            ..Document::default()
        };
        let css = stylesheet_for(&doc);
        assert!(css.contains(".footer {"));
        assert!(!css.contains(".topbar {"));
    }
}
