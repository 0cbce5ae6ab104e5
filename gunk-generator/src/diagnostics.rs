use std::fmt;

use crate::error::Location;

/// Where an untranslated option was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
    Field,
    Message,
    Enum,
    EnumValue,
    Service,
    Method,
}

impl OptionScope {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionScope::Field => "field",
            OptionScope::Message => "message",
            OptionScope::Enum => "enum",
            OptionScope::EnumValue => "enumvalue",
            OptionScope::Service => "service",
            OptionScope::Method => "method",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    UnhandledOption { scope: OptionScope, name: String },
    /// More than one verb key in one `(google.api.http)` option; the last
    /// one is used.
    MultipleHttpRules { ignored: String, used: String },
}

/// A warning about something that was skipped. The output is still produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnhandledOption { scope, name } => write!(
                f,
                "{}: unhandled {} option \"{}\"",
                self.location,
                scope.as_str(),
                name
            ),
            DiagnosticKind::MultipleHttpRules { ignored, used } => write!(
                f,
                "{}: multiple http rules, ignoring \"{}\" in favour of \"{}\"",
                self.location, ignored, used
            ),
        }
    }
}
