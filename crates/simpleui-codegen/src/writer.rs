/// Line-oriented text builder with indentation, shared by the emitters.
#[derive(Debug, Default)]
pub struct Writer {
    out: String,
    indent: usize,
}

pub const INDENT: &str = "    ";

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation. Embedded newlines are
    /// indented too.
    pub fn line(&mut self, text: &str) {
        for l in text.lines() {
            if l.is_empty() {
                self.out.push('\n');
                continue;
            }
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.out.push_str(l);
            self.out.push('\n');
        }
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Write `open`, run `body` one level deeper, then write `close`.
    pub fn block<E>(
        &mut self,
        open: &str,
        close: &str,
        body: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<(), E> {
        self.line(open);
        self.indent += 1;
        let result = body(self);
        self.indent -= 1;
        self.line(close);
        result
    }

    pub fn finish(self) -> String {
        self.out
    }
}
