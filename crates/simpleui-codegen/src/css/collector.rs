use std::collections::HashSet;

use crate::css::BaseStylesheet;

/// Where class rule blocks come from.
pub trait ClassSource {
    /// Rule blocks defining `class`, in stylesheet order. Empty when the
    /// class is unknown.
    fn rules_for(&self, class: &str) -> Vec<&str>;
}

impl ClassSource for BaseStylesheet {
    fn rules_for(&self, class: &str) -> Vec<&str> {
        self.rules()
            .iter()
            .filter(|r| r.defines_class(class))
            .map(|r| r.text.as_str())
            .collect()
    }
}

// ── ClassCollector ────────────────────────────────────────────────────────

/// Gathers the rule blocks of every class a generation run references.
///
/// Each distinct class name is looked up once; rule blocks are kept in
/// first-seen order and deduplicated by exact text. A collector lives for
/// exactly one run.
pub struct ClassCollector<'s> {
    source: &'s dyn ClassSource,
    looked_up: HashSet<String>,
    seen_rules: HashSet<String>,
    rules: Vec<String>,
}

impl<'s> ClassCollector<'s> {
    pub fn new(source: &'s dyn ClassSource) -> Self {
        Self {
            source,
            looked_up: HashSet::new(),
            seen_rules: HashSet::new(),
            rules: Vec::new(),
        }
    }

    /// Record a use of `class`, returning the rule text it contributed.
    ///
    /// Returns an empty string when the class is unknown (assumed to be
    /// styled elsewhere) or was already collected in this run.
    pub fn resolve(&mut self, class: &str) -> String {
        if !self.looked_up.insert(class.to_string()) {
            return String::new();
        }
        let source = self.source;
        let mut added = Vec::new();
        for rule in source.rules_for(class) {
            if self.seen_rules.insert(rule.to_string()) {
                self.rules.push(rule.to_string());
                added.push(rule);
            }
        }
        if added.is_empty() {
            log::debug!("class `{class}` not found in base stylesheet");
        }
        added.join("\n")
    }

    /// Collected rule blocks in first-seen order.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
