use crate::css::BaseStylesheet;

/// Detail text attached to every class completion.
pub const CLASS_DETAIL: &str = "CSS Class";

/// One completion item offered to an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub label: String,
    pub detail: &'static str,
}

/// Completion items for every class the base stylesheet defines, in
/// stylesheet order.
pub fn class_completions(sheet: &BaseStylesheet) -> Vec<Completion> {
    sheet
        .class_names()
        .into_iter()
        .map(|name| Completion { label: name.to_string(), detail: CLASS_DETAIL })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_item_per_class() {
        let sheet = BaseStylesheet::parse(".btn { } .btn:hover { } .card { } @media print { .x { } }")
            .unwrap();
        let labels: Vec<_> = class_completions(&sheet).into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["btn", "card"]);
    }

    #[test]
    fn detail_marks_css_classes() {
        let sheet = BaseStylesheet::parse(".a { }").unwrap();
        assert_eq!(class_completions(&sheet)[0].detail, "CSS Class");
    }
}
