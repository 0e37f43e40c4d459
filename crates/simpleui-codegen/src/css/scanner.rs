use crate::error::CssParseError;

// ── CssRule ───────────────────────────────────────────────────────────────

/// One top-level rule of a stylesheet, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    /// Selector list (or at-rule prelude) before the `{`.
    pub selector: String,
    /// The whole rule, selector through closing `}`.
    pub text: String,
}

impl CssRule {
    pub fn is_at_rule(&self) -> bool {
        self.selector.starts_with('@')
    }

    /// Whether any selector in the list starts with `.class`.
    ///
    /// `.card`, `.card:hover` and `.card > p` all define `card`; `.cards`
    /// and `div.card` do not.
    pub fn defines_class(&self, class: &str) -> bool {
        if self.is_at_rule() || class.is_empty() {
            return false;
        }
        self.selector.split(',').any(|part| {
            part.trim()
                .strip_prefix('.')
                .and_then(|rest| rest.strip_prefix(class))
                .is_some_and(|tail| !tail.starts_with(is_ident_char))
        })
    }

    /// Class names that lead a selector in this rule, in order.
    pub fn leading_classes(&self) -> impl Iterator<Item = &str> {
        let at_rule = self.is_at_rule();
        self.selector
            .split(',')
            .filter(move |_| !at_rule)
            .filter_map(|part| {
                let rest = part.trim().strip_prefix('.')?;
                let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
                (end > 0).then(|| &rest[..end])
            })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

// ── Scanner ───────────────────────────────────────────────────────────────

/// Splits stylesheet text into top-level rules without interpreting
/// declarations. Nested blocks (`@media { ... }`) stay inside their parent
/// rule.
pub struct Scanner<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Scanner<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn rules(mut self) -> Result<Vec<CssRule>, CssParseError> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            if self.peek().is_none() {
                break;
            }
            rules.push(self.next_rule()?);
        }
        Ok(rules)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn err_at(&self, pos: usize, msg: impl Into<String>) -> CssParseError {
        let before = &self.src[..pos];
        let line = before.matches('\n').count() + 1;
        let col = before.rfind('\n').map(|i| before[i + 1..].chars().count()).unwrap_or(before.chars().count()) + 1;
        CssParseError::new(msg, line, col)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            if self.src[self.pos..].starts_with("/*") {
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        self.advance(); self.advance(); // consume `/*`
        loop {
            if self.src[self.pos..].starts_with("*/") {
                self.advance(); self.advance(); // consume `*/`
                break;
            }
            if self.advance().is_none() {
                break; // unterminated comment runs to EOF
            }
        }
    }

    fn skip_string(&mut self) -> Result<(), CssParseError> {
        let start = self.pos;
        let Some(quote) = self.advance() else { return Ok(()) };
        loop {
            match self.advance() {
                None | Some('\n') => return Err(self.err_at(start, "unterminated string")),
                Some('\\') => { self.advance(); }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn next_rule(&mut self) -> Result<CssRule, CssParseError> {
        let start = self.pos;

        // Prelude: everything up to the opening brace.
        loop {
            match self.peek() {
                None => return Err(self.err_at(start, "expected '{' after selector")),
                Some('{') => break,
                Some('}') => return Err(self.err_at(self.pos, "unexpected '}'")),
                Some(';') if self.src[start..].starts_with('@') => {
                    // Statement at-rule such as `@import url(x.css);`
                    self.advance();
                    let text = self.src[start..self.pos].trim().to_string();
                    let selector = text.trim_end_matches(';').trim().to_string();
                    return Ok(CssRule { selector, text });
                }
                Some('"') | Some('\'') => self.skip_string()?,
                Some('/') if self.src[self.pos..].starts_with("/*") => self.skip_comment(),
                Some(_) => { self.advance(); }
            }
        }
        let selector = self.src[start..self.pos].trim().to_string();
        if selector.is_empty() {
            return Err(self.err_at(self.pos, "missing selector before '{'"));
        }

        // Block, tracking nesting.
        let open = self.pos;
        self.advance(); // consume `{`
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek() {
                None => return Err(self.err_at(open, "unclosed '{' block")),
                Some('{') => { self.advance(); depth += 1; }
                Some('}') => { self.advance(); depth -= 1; }
                Some('"') | Some('\'') => self.skip_string()?,
                Some('/') if self.src[self.pos..].starts_with("/*") => self.skip_comment(),
                Some(_) => { self.advance(); }
            }
        }

        let text = self.src[start..self.pos].trim().to_string();
        Ok(CssRule { selector, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(src: &str) -> Vec<CssRule> { Scanner::new(src).rules().unwrap() }
    fn err(src: &str) -> CssParseError { Scanner::new(src).rules().unwrap_err() }

    #[test] fn empty_sheet() { assert!(ok("  /* nothing */ ").is_empty()); }
    #[test] fn single_rule_kept_verbatim() {
        let rules = ok(".card {\n  padding: 8px;\n}\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selector, ".card");
        assert_eq!(rules[0].text, ".card {\n  padding: 8px;\n}");
    }
    #[test] fn nested_media_block_is_one_rule() {
        let rules = ok("@media (max-width: 600px) { .card { padding: 0; } } .x{}");
        assert_eq!(rules.len(), 2);
        assert!(rules[0].is_at_rule());
        assert_eq!(rules[1].text, ".x{}");
    }
    #[test] fn statement_at_rule() {
        let rules = ok("@import url(\"a.css\");\n.a { }");
        assert_eq!(rules[0].selector, "@import url(\"a.css\")");
        assert_eq!(rules[1].selector, ".a");
    }
    #[test] fn braces_inside_strings_and_comments() {
        let rules = ok(".q::before { content: \"}\"; /* } */ }");
        assert_eq!(rules.len(), 1);
    }
    #[test] fn defines_class_matching() {
        let rule = &ok(".btn:hover, .card > p, .cards { color: red; }")[0];
        assert!(rule.defines_class("btn"));
        assert!(rule.defines_class("card"));
        assert!(rule.defines_class("cards"));
        assert!(!rule.defines_class("car"));
        assert!(!ok("div.card { }")[0].defines_class("card"));
    }
    #[test] fn leading_classes() {
        let rule = &ok(".a:hover, .b-c > p, div, .d_e { }")[0];
        assert_eq!(rule.leading_classes().collect::<Vec<_>>(), vec!["a", "b-c", "d_e"]);
    }
    #[test] fn err_unclosed_block_points_at_brace() {
        let e = err(".a { color: red;\n.b {");
        assert_eq!(e.message, "unclosed '{' block");
        assert_eq!((e.line, e.col), (1, 4));
    }
    #[test] fn err_stray_close() {
        let e = err(".a { }\n}");
        assert_eq!((e.line, e.col), (2, 1));
    }
    #[test] fn err_missing_brace() { err(".a color: red;"); }
    #[test] fn err_unterminated_string() { err(".a { content: \"oops }"); }
}
