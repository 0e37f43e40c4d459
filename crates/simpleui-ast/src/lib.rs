//! Abstract syntax tree for the **SimpleUi** page language.
//!
//! Parsing SimpleUi source is done elsewhere; the parser hands over its
//! result as JSON, which this crate loads into typed Rust values and checks
//! before any code is generated.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Document`, `Element`, `Expression`, `Component`, `Function` |
//! | [`error`] | `LoadError` |
//! | [`validate`] | `validate` and `ValidationOptions` |
//! | [`diagnostic`] | `Diagnostic`, `Severity` |
//!
//! # Quick start
//!
//! ```rust
//! use simpleui_ast::{validate, Document, ValidationOptions};
//!
//! let doc = Document::from_json_str(r#"{
//!     "body": [ { "type": "Paragraph", "text": { "type": "StringLiteral", "value": "Hi" } } ]
//! }"#).unwrap();
//!
//! assert!(validate(&doc, &ValidationOptions::default()).is_empty());
//! ```

use std::io::Read;

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod validate;

pub use ast::{
    Attrs, BinaryOp, Component, CssProperty, CssPropertyKind, Document, Element, Expression,
    Function, NavLink, OnClick, ParamType, Parameter, Statement, StyleRule, StyleTarget,
};
pub use diagnostic::{has_errors, Diagnostic, Severity};
pub use error::LoadError;
pub use validate::{validate, ValidationOptions};

impl Document {
    /// Load a document from its JSON serialization.
    pub fn from_json_str(src: &str) -> Result<Document, LoadError> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Document, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod load_tests {
    use super::*;

    fn ok(src: &str) -> Document { Document::from_json_str(src).unwrap() }
    fn err(src: &str) { Document::from_json_str(src).unwrap_err(); }

    #[test] fn empty_object() { assert_eq!(ok("{}"), Document::default()); }
    #[test] fn linebreak_unit_variant() {
        let doc = ok(r#"{ "body": [ { "type": "Linebreak" } ] }"#);
        assert_eq!(doc.body, vec![Element::Linebreak]);
    }
    #[test] fn paragraph_with_attrs() {
        let doc = ok(r#"{ "body": [ {
            "type": "Paragraph",
            "attrs": { "name": "intro", "classes": ["card"],
                       "css": [ { "property": "font-size", "value": { "type": "NumberLiteral", "value": 12 } } ] },
            "text": { "type": "StringLiteral", "value": "Hi" } } ] }"#);
        let attrs = doc.body[0].attrs().unwrap();
        assert_eq!(attrs.name.as_deref(), Some("intro"));
        assert_eq!(attrs.classes, vec!["card".to_string()]);
        assert_eq!(attrs.css[0].property, CssPropertyKind::FontSize);
    }
    #[test] fn binary_operator_symbols() {
        let doc = ok(r#"{ "body": [ { "type": "Paragraph", "text": {
            "type": "BinaryOperation", "op": "*",
            "left":  { "type": "NumberLiteral", "value": 2 },
            "right": { "type": "NumberLiteral", "value": 3 } } } ] }"#);
        assert_eq!(
            doc.body[0],
            Element::paragraph(Expression::binary(
                Expression::number(2.0), BinaryOp::Mul, Expression::number(3.0)
            ))
        );
    }
    #[test] fn component_params() {
        let doc = ok(r#"{ "components": [ { "name": "Card",
            "params": [ { "name": "title", "type": "string" }, { "name": "n", "type": "number" } ],
            "body": [] } ] }"#);
        let card = doc.component("Card").unwrap();
        assert_eq!(card.params[1], Parameter::new("n", ParamType::Number));
    }
    #[test] fn script_statements() {
        let doc = ok(r#"{ "functions": [ { "name": "hi", "params": ["who"], "body": [
            { "type": "Alert", "value": { "type": "SymbolReference", "symbol": "who" } },
            { "type": "Const", "name": "x", "value": { "type": "NumberLiteral", "value": 1 } } ] } ] }"#);
        assert_eq!(doc.function("hi").unwrap().body.len(), 2);
    }
    #[test] fn legacy_css_names() {
        let doc = ok(r#"{ "styles": [ { "target": "text", "properties": [
            { "property": "size", "value": { "type": "NumberLiteral", "value": 3 } } ] } ] }"#);
        assert_eq!(doc.styles[0].properties[0].property.css_name(), "font-size");
    }
    #[test] fn reader_input() {
        let doc = Document::from_json_reader(r#"{ "body": [] }"#.as_bytes()).unwrap();
        assert!(doc.body.is_empty());
    }
    #[test] fn err_unknown_element() { err(r#"{ "body": [ { "type": "Marquee" } ] }"#); }
    #[test] fn err_unknown_expression() {
        err(r#"{ "body": [ { "type": "Paragraph", "text": { "type": "Regex", "value": "x" } } ] }"#);
    }
    #[test] fn err_unknown_statement() {
        err(r#"{ "statements": [ { "type": "Confirm", "value": { "type": "NumberLiteral", "value": 1 } } ] }"#);
    }
    #[test] fn err_missing_text() { err(r#"{ "body": [ { "type": "Paragraph" } ] }"#); }
    #[test] fn err_bad_operator() {
        err(r#"{ "body": [ { "type": "Paragraph", "text": { "type": "BinaryOperation", "op": "%",
            "left": { "type": "NumberLiteral", "value": 1 }, "right": { "type": "NumberLiteral", "value": 1 } } } ] }"#);
    }
}
