//! Translates a parsed proto document into Gunk source.
//!
//! [`convert_proto`] works on an in-memory [`parser::Proto`]; [`run`] and
//! [`convert_file`] read `.proto` files and write `.gunk` files beside them.

mod builder;
mod convert;
mod diagnostics;
mod enums;
mod error;
mod imports;
mod message;
mod naming;
mod package;
mod service;
mod types;
mod writer;

use parser::Proto;
use tracing::debug;

pub use convert::{ConvertOptions, ConvertedFile, convert_file, run};
pub use diagnostics::{Diagnostic, DiagnosticKind, OptionScope};
pub use error::{Error, Location, TranslateError, TranslateErrorKind};
pub use types::gunk_type;

use builder::Builder;

/// The Gunk text for one document plus everything that was skipped on the
/// way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert a proto document. `filename` only prefixes errors and
/// diagnostics.
pub fn convert_proto(filename: &str, proto: &Proto) -> Result<Conversion, TranslateError> {
    debug!(file = filename, declarations = proto.elements.len(), "converting proto");
    let mut builder = Builder::new(filename);
    for decl in &proto.elements {
        builder.handle_declaration(decl)?;
    }
    builder.assemble()
}
