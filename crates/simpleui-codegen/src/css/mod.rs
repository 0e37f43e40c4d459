//! The CSS resource resolver: a scanned base stylesheet and the per-run
//! collector that copies referenced class rules out of it.

mod collector;
mod scanner;

pub use collector::{ClassCollector, ClassSource};
pub use scanner::{CssRule, Scanner};

use crate::error::CssParseError;

/// The stylesheet library shipped with the generator.
pub const DEFAULT_BASE_CSS: &str = include_str!("../../assets/base.css");

/// A parsed base stylesheet: the canonical class rules documents may
/// reference by name.
#[derive(Debug, Clone, Default)]
pub struct BaseStylesheet {
    rules: Vec<CssRule>,
}

impl BaseStylesheet {
    pub fn parse(src: &str) -> Result<Self, CssParseError> {
        Ok(Self { rules: Scanner::new(src).rules()? })
    }

    /// The stylesheet bundled with this crate.
    pub fn bundled() -> Result<Self, CssParseError> {
        Self::parse(DEFAULT_BASE_CSS)
    }

    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// Every class name leading a selector, in source order, without
    /// duplicates. Drives completion and the class-existence check.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.rules.iter().flat_map(|r| r.leading_classes()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.rules.iter().any(|r| r.defines_class(class))
    }
}
