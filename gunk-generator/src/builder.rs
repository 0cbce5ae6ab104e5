use std::collections::BTreeSet;

use parser::{Comment, Declaration, Import, Package, Position, ProtoOption};
use tracing::{debug, warn};

use crate::Conversion;
use crate::diagnostics::{Diagnostic, DiagnosticKind, OptionScope};
use crate::error::{Location, TranslateError, TranslateErrorKind};

/// Conversion state for one proto document.
pub(crate) struct Builder<'a> {
    /// File name used as the prefix of diagnostics and errors.
    pub(crate) filename: &'a str,

    /// Comments ahead of the package statement, such as a licence header.
    /// They stay above the package block.
    pub(crate) header_comments: Vec<String>,

    /// Translated messages, enums, services and standalone comments, in the
    /// order they were found.
    pub(crate) translated_declarations: Vec<String>,

    // Package, file options and imports are only translated once every
    // other declaration has been seen, since `go_package` ends up on the
    // package line.
    pub(crate) package: Option<&'a Package>,
    pub(crate) package_options: Vec<&'a ProtoOption>,
    pub(crate) imports: Vec<&'a Import>,

    /// Gunk imports the output needs, mostly annotation packages.
    pub(crate) imports_used: BTreeSet<&'static str>,

    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(filename: &'a str) -> Self {
        Self {
            filename,
            header_comments: Vec::new(),
            translated_declarations: Vec::new(),
            package: None,
            package_options: Vec::new(),
            imports: Vec::new(),
            imports_used: BTreeSet::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn location(&self, position: Position) -> Location {
        Location {
            filename: self.filename.to_string(),
            position,
        }
    }

    pub(crate) fn error(&self, position: Position, kind: TranslateErrorKind) -> TranslateError {
        TranslateError {
            location: self.location(position),
            kind,
        }
    }

    pub(crate) fn diagnose(&mut self, position: Position, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            location: self.location(position),
            kind,
        };
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn unhandled_option(&mut self, scope: OptionScope, option: &ProtoOption) {
        self.diagnose(
            option.position,
            DiagnosticKind::UnhandledOption {
                scope,
                name: option.name.clone(),
            },
        );
    }

    pub(crate) fn handle_declaration(
        &mut self,
        decl: &'a Declaration,
    ) -> Result<(), TranslateError> {
        let position = decl.position();
        debug!(file = self.filename, line = position.line, "translating declaration");

        match decl {
            Declaration::Syntax(s) => {
                if let Some(c) = &s.comment {
                    self.header_comments.push(comment_block(c));
                }
            }
            Declaration::Package(p) => self.package = Some(p),
            Declaration::Import(i) => self.imports.push(i),
            Declaration::Option(o) => self.package_options.push(o),
            Declaration::Message(m) => self.handle_message(m)?,
            Declaration::Enum(e) => self.handle_enum(e)?,
            Declaration::Service(s) => self.handle_service(s)?,
            Declaration::Comment(c) if self.package.is_none() => {
                self.header_comments.push(comment_block(c));
            }
            Declaration::Comment(c) => self.translated_declarations.push(comment_block(c)),
            Declaration::Extend(_) => {
                let kind = TranslateErrorKind::UnhandledDeclaration("extend");
                return Err(self.error(position, kind));
            }
        }
        Ok(())
    }

    /// Header comments, the package line, the import block, then every
    /// translated declaration; one blank line between each.
    pub(crate) fn assemble(mut self) -> Result<Conversion, TranslateError> {
        let package = self.handle_package()?;
        let imports = self.handle_imports();

        let mut text = String::new();
        for header in &self.header_comments {
            text.push_str(header);
            text.push_str("\n\n");
        }
        text.push_str(&package);
        text.push('\n');
        if let Some(imports) = imports {
            text.push('\n');
            text.push_str(&imports);
            text.push('\n');
        }
        for declaration in &self.translated_declarations {
            text.push('\n');
            text.push_str(declaration);
            text.push('\n');
        }

        Ok(Conversion {
            text,
            diagnostics: self.diagnostics,
        })
    }
}

fn comment_block(c: &Comment) -> String {
    c.lines
        .iter()
        .map(|l| format!("//{l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
