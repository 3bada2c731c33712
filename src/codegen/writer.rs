//! Indentation-aware line buffer

/// Accumulates lines of generated source at the current indent level
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buf: String,
    level: usize,
    unit: String,
}

impl CodeWriter {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { buf: String::new(), level: 0, unit: unit.into() }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Write one line at the current level
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buf.push_str(&self.unit);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    /// Write possibly multi-line text, indenting each line
    pub fn lines(&mut self, text: impl AsRef<str>) -> &mut Self {
        for line in text.as_ref().lines() {
            self.line(line);
        }
        self
    }

    /// Append `suffix` to the last written line
    pub fn terminate(&mut self, suffix: &str) -> &mut Self {
        if self.buf.ends_with('\n') {
            self.buf.pop();
        }
        self.buf.push_str(suffix);
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Write `open`, run `body` one level deeper, then write `close`
    pub fn block(&mut self, open: impl AsRef<str>, close: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close)
    }

    /// Write `open` and run `body` one level deeper, for indentation-scoped languages
    pub fn scope(&mut self, open: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(open);
        self.indent();
        body(self);
        self.dedent()
    }

    /// Finished source with exactly one trailing newline
    pub fn finish(self) -> String {
        let mut out = self.buf.trim_end().to_string();
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indents_body() {
        let mut w = CodeWriter::new("  ");
        w.block("fn x() {", "}", |w| {
            w.line("a();");
            w.lines("b(\n  1)");
        });
        assert_eq!(w.finish(), "fn x() {\n  a();\n  b(\n    1)\n}\n");
    }

    #[test]
    fn test_blank_lines_collapse() {
        let mut w = CodeWriter::new("\t");
        w.blank();
        w.line("a");
        w.blank();
        w.blank();
        w.line("b");
        assert_eq!(w.finish(), "a\n\nb\n");
    }
}
