use crate::builder::Builder;
use crate::writer::{GunkWriter, quote};

impl Builder<'_> {
    /// The import block, or `None` when nothing needs importing. Proto
    /// imports are kept as comments since their types aren't resolved.
    pub(crate) fn handle_imports(&self) -> Option<String> {
        if self.imports_used.is_empty() && self.imports.is_empty() {
            return None;
        }

        let mut w = GunkWriter::default();
        w.line(0, "import (");
        for import in &self.imports_used {
            w.line(1, quote(import));
        }
        for import in &self.imports {
            w.line(1, format_args!("// {}", quote(&import.filename)));
        }
        Some(w.finish(")"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::{Import, Position};

    #[test]
    fn no_block_without_imports() {
        let b = Builder::new("a.proto");
        assert_eq!(b.handle_imports(), None);
    }

    #[test]
    fn used_imports_then_proto_imports_as_comments() {
        let import = Import {
            filename: "google/api/annotations.proto".to_string(),
            kind: None,
            comment: None,
            position: Position::new(3, 1),
        };
        let mut b = Builder::new("a.proto");
        b.imports.push(&import);
        b.imports_used.insert("github.com/gunk/opt/http");
        assert_eq!(
            b.handle_imports().as_deref(),
            Some(
                "import (\n\
                 \t\"github.com/gunk/opt/http\"\n\
                 \t// \"google/api/annotations.proto\"\n\
                 )"
            )
        );
    }
}
