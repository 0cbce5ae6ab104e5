use pest::iterators::Pair;

use crate::{Comment, Position, Rule};

/// Attaches comments to the declaration that follows them inside one
/// container (file, message body, enum body, service body).
///
/// - Comments on consecutive lines merge into one block.
/// - A block ending on the line right above a declaration (or on the same
///   line) becomes that declaration's leading comment.
/// - A comment starting on the line where the previous declaration ended is
///   an inline comment and is dropped.
/// - Anything else is a standalone comment.
pub(crate) struct CommentTracker {
    pending: Option<(Comment, usize)>,
    last_end_line: Option<usize>,
}

impl CommentTracker {
    /// `opening_line` is the line of the container's opening brace, if any.
    pub(crate) fn new(opening_line: Option<usize>) -> Self {
        Self {
            pending: None,
            last_end_line: opening_line,
        }
    }

    /// Feed a `COMMENT` pair. Returns a standalone comment that got flushed.
    pub(crate) fn observe(&mut self, pair: &Pair<Rule>) -> Option<Comment> {
        let (line, column) = pair.line_col();
        let end_line = pair.as_span().end_pos().line_col().0;

        if self.pending.is_none() && self.last_end_line == Some(line) {
            return None;
        }

        let lines = comment_lines(pair.as_str());
        match self.pending.take() {
            Some((mut comment, pending_end)) if pending_end + 1 >= line => {
                comment.lines.extend(lines);
                self.pending = Some((comment, end_line));
                None
            }
            flushed => {
                let comment = Comment {
                    lines,
                    position: Position::new(line, column),
                };
                self.pending = Some((comment, end_line));
                flushed.map(|(c, _)| c)
            }
        }
    }

    /// Called for every declaration pair in the container. Returns
    /// `(standalone, leading)`.
    pub(crate) fn attach(&mut self, pair: &Pair<Rule>) -> (Option<Comment>, Option<Comment>) {
        let start_line = pair.line_col().0;
        self.last_end_line = Some(pair.as_span().end_pos().line_col().0);

        match self.pending.take() {
            Some((comment, end_line)) if end_line + 1 >= start_line => (None, Some(comment)),
            other => (other.map(|(c, _)| c), None),
        }
    }

    pub(crate) fn finish(self) -> Option<Comment> {
        self.pending.map(|(c, _)| c)
    }
}

fn comment_lines(raw: &str) -> Vec<String> {
    if let Some(line) = raw.strip_prefix("//") {
        return vec![line.trim_end_matches('\r').to_string()];
    }
    let inner = raw
        .strip_prefix("/*")
        .and_then(|s| s.strip_suffix("*/"))
        .unwrap_or(raw);
    // `/** ... */` opener.
    let inner = inner.strip_prefix('*').unwrap_or(inner);

    let mut lines: Vec<String> = inner
        .split('\n')
        .map(|l| {
            let l = l.trim_end();
            // ` * text` gutter of a multi-line block.
            match l.trim_start().strip_prefix('*') {
                Some(rest) => rest.to_string(),
                None => l.to_string(),
            }
        })
        .collect();
    while lines.first().is_some_and(|l| l.trim().is_empty()) && lines.len() > 1 {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) && lines.len() > 1 {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment_keeps_text_after_slashes() {
        assert_eq!(comment_lines("// hello"), vec![" hello".to_string()]);
        assert_eq!(comment_lines("//x\r"), vec!["x".to_string()]);
    }

    #[test]
    fn block_comment_splits_inner_lines() {
        assert_eq!(
            comment_lines("/* one\n two */"),
            vec![" one".to_string(), " two".to_string()]
        );
    }

    #[test]
    fn doc_block_comment_drops_star_gutter() {
        assert_eq!(
            comment_lines("/**\n * Block doc.\n * Second line.\n */"),
            vec![" Block doc.".to_string(), " Second line.".to_string()]
        );
        assert_eq!(comment_lines("/** One liner. */"), vec![" One liner.".to_string()]);
    }
}
