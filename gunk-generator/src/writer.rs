use std::fmt;

use parser::Comment;

/// Accumulates one Gunk block, indenting with tabs.
#[derive(Debug, Default)]
pub(crate) struct GunkWriter {
    buf: String,
}

impl GunkWriter {
    /// Write a leading comment, one `//` line per comment line.
    pub(crate) fn comment(&mut self, indent: usize, comment: Option<&Comment>) -> &mut Self {
        if let Some(comment) = comment {
            for line in &comment.lines {
                self.indent(indent);
                self.buf.push_str("//");
                self.buf.push_str(line);
                self.buf.push('\n');
            }
        }
        self
    }

    pub(crate) fn line(&mut self, indent: usize, text: impl fmt::Display) -> &mut Self {
        self.indent(indent);
        self.buf.push_str(&text.to_string());
        self.buf.push('\n');
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Append `closing` (e.g. `}`) without a trailing newline and return the
    /// block.
    pub(crate) fn finish(mut self, closing: &str) -> String {
        self.buf.push_str(closing);
        self.buf
    }

    fn indent(&mut self, indent: usize) {
        for _ in 0..indent {
            self.buf.push('\t');
        }
    }
}

/// Double-quoted, escaped string literal.
pub(crate) fn quote(s: &str) -> String {
    format!("{s:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::Position;

    #[test]
    fn writes_comment_then_line_at_indent() {
        let comment = Comment {
            lines: vec![" first".to_string(), " second".to_string()],
            position: Position::new(1, 1),
        };
        let mut w = GunkWriter::default();
        w.comment(1, Some(&comment)).line(1, "Name string");
        assert_eq!(w.finish("}"), "\t// first\n\t// second\n\tName string\n}");
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote("/v1/{name}"), "\"/v1/{name}\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
    }
}
