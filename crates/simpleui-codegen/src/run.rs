use simpleui_ast::Document;

use crate::css::{ClassCollector, ClassSource};
use crate::error::{GenError, Warning};
use crate::markup::MarkupEmitter;
use crate::stylesheet;

/// File names the page shell links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub stylesheet_href: String,
    pub script_src: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            stylesheet_href: "stylesheet.css".to_string(),
            script_src: "script.js".to_string(),
        }
    }
}

/// Framework elements seen during the markup pass whose auxiliary rules the
/// stylesheet must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Decorations {
    pub(crate) topbar: bool,
    pub(crate) footer: bool,
}

// ── GenerationRun ─────────────────────────────────────────────────────────

/// State shared by the markup and stylesheet passes of one generation.
///
/// Class rules are discovered while emitting markup, so a run owns the
/// collector and the stylesheet is emitted from the same run afterwards.
/// A fresh run starts with nothing collected.
pub struct GenerationRun<'s> {
    pub(crate) classes: ClassCollector<'s>,
    pub(crate) warnings: Vec<Warning>,
    pub(crate) decorations: Decorations,
    markup_done: bool,
}

impl<'s> GenerationRun<'s> {
    pub fn new(source: &'s dyn ClassSource) -> Self {
        Self {
            classes: ClassCollector::new(source),
            warnings: Vec::new(),
            decorations: Decorations::default(),
            markup_done: false,
        }
    }

    /// Head elements only, without the page shell.
    pub fn emit_head(&mut self, doc: &Document) -> Result<String, GenError> {
        MarkupEmitter::new(doc, self).head()
    }

    /// Body elements only, without the page shell.
    pub fn emit_body(&mut self, doc: &Document) -> Result<String, GenError> {
        let out = MarkupEmitter::new(doc, self).body()?;
        self.markup_done = true;
        Ok(out)
    }

    /// The complete HTML document.
    pub fn emit_page(&mut self, doc: &Document, opts: &PageOptions) -> Result<String, GenError> {
        log::debug!("markup pass: {} head, {} body elements", doc.head.len(), doc.body.len());
        let out = MarkupEmitter::new(doc, self).page(opts)?;
        self.markup_done = true;
        Ok(out)
    }

    /// The stylesheet. Runs the markup pass first if this run has not
    /// emitted markup yet, since that is where class usage is discovered.
    pub fn emit_stylesheet(&mut self, doc: &Document) -> Result<String, GenError> {
        if !self.markup_done {
            self.emit_body(doc)?;
        }
        log::debug!("stylesheet pass: {} collected class rule(s)", self.classes.rules().len());
        stylesheet::emit(doc, self)
    }

    /// Class rules collected so far, in first-seen order.
    pub fn collected_rules(&self) -> &[String] {
        self.classes.rules()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
