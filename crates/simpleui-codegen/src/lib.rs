//! HTML, CSS and JavaScript generation for **SimpleUi** documents.
//!
//! Generation takes a loaded (and normally validated) [`Document`] and
//! produces three text artifacts. Nothing here touches the file system.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`eval`] | markup folding and script rendering of expressions |
//! | [`scope`] | component argument frames and binding |
//! | [`css`] | base stylesheet scanning, per-run class collection |
//! | [`run`] | `GenerationRun`: markup and stylesheet passes sharing state |
//! | [`script`] | `emit_script` |
//! | [`completion`] | class name completion items |
//!
//! # Quick start
//!
//! ```rust
//! use simpleui_ast::Document;
//! use simpleui_codegen::{generate, BaseStylesheet, PageOptions};
//!
//! let doc = Document::from_json_str(r#"{
//!     "body": [ { "type": "Paragraph", "text": { "type": "StringLiteral", "value": "Hi" } } ]
//! }"#).unwrap();
//!
//! let base = BaseStylesheet::bundled().unwrap();
//! let out = generate(&doc, &base, &PageOptions::default()).unwrap();
//! assert!(out.html.contains("<p>Hi</p>"));
//! ```

pub mod completion;
pub mod css;
pub mod error;
pub mod escape;
pub mod eval;
mod markup;
pub mod run;
pub mod scope;
pub mod script;
mod stylesheet;
pub mod value;
mod writer;

use simpleui_ast::Document;

pub use completion::{class_completions, Completion};
pub use css::{BaseStylesheet, ClassCollector, ClassSource, DEFAULT_BASE_CSS};
pub use error::{CssParseError, GenError, Warning};
pub use markup::MAX_COMPONENT_DEPTH;
pub use run::{GenerationRun, PageOptions};
pub use script::emit_script;
pub use value::Value;

/// The three artifacts of one successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub html: String,
    pub css: String,
    pub js: String,
    pub warnings: Vec<Warning>,
}

/// Generate page, stylesheet and script for `doc` in one run.
///
/// Either all three artifacts are returned or none are.
pub fn generate(
    doc: &Document,
    classes: &dyn ClassSource,
    options: &PageOptions,
) -> Result<Artifacts, GenError> {
    let mut run = GenerationRun::new(classes);
    let html = run.emit_page(doc, options)?;
    let css = run.emit_stylesheet(doc)?;
    let js = emit_script(doc)?;
    let warnings = run.into_warnings();
    log::debug!("generation finished with {} warning(s)", warnings.len());
    Ok(Artifacts { html, css, js, warnings })
}
