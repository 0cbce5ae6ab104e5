use std::fmt;
use std::path::PathBuf;

use parser::Position;
use thiserror::Error;

/// `file:line:col` of a declaration in the document being converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub filename: String,
    pub position: Position,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename, self.position.line, self.position.column
        )
    }
}

/// A failure that aborts the conversion of one document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct TranslateError {
    pub location: Location,
    pub kind: TranslateErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateErrorKind {
    #[error("\"{0}\" is an unhandled proto file option")]
    UnhandledFileOption(String),
    #[error("option \"{0}\" should have a scalar value")]
    NonScalarFileOption(String),
    #[error("expected option to be a map")]
    HttpRuleNotMap,
    #[error("option for body should be a string")]
    HttpBodyNotString,
    #[error("option for \"{0}\" should be a string (url)")]
    HttpPathNotString(String),
    #[error("unexpected {found} in {container}, expected {expected}")]
    UnexpectedElement {
        found: &'static str,
        container: &'static str,
        expected: &'static str,
    },
    #[error("unhandled proto declaration {0}")]
    UnhandledDeclaration(&'static str),
    #[error("missing package declaration")]
    MissingPackage,
}

/// Errors from converting files on disk.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse proto file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: parser::ParseError,
    },
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error("{} is a directory, should be a proto file", .0.display())]
    ProtoDirectory(PathBuf),
    #[error("convert requires a .proto file, got {}", .0.display())]
    NotProtoFile(PathBuf),
    #[error("path already exists {}, use --overwrite", .0.display())]
    AlreadyExists(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_error_is_prefixed_with_location() {
        let err = TranslateError {
            location: Location {
                filename: "util.proto".to_string(),
                position: Position::new(7, 1),
            },
            kind: TranslateErrorKind::UnhandledFileOption("totally_custom_option".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "util.proto:7:1: \"totally_custom_option\" is an unhandled proto file option"
        );
    }
}
