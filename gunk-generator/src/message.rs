use parser::{Comment, MapField, Message, MessageElement, NormalField, ProtoOption};

use crate::builder::Builder;
use crate::diagnostics::OptionScope;
use crate::error::{TranslateError, TranslateErrorKind};
use crate::naming::{camel_identifier, snake_name};
use crate::types::gunk_type;
use crate::writer::GunkWriter;

/// The parts of a plain or map field that end up on a struct member line.
struct FieldLine<'f> {
    name: &'f str,
    typ: String,
    sequence: i32,
    comment: Option<&'f Comment>,
    options: &'f [ProtoOption],
}

impl<'f> From<&'f NormalField> for FieldLine<'f> {
    fn from(f: &'f NormalField) -> Self {
        Self {
            name: &f.name,
            typ: field_type(f),
            sequence: f.sequence,
            comment: f.comment.as_ref(),
            options: &f.options,
        }
    }
}

impl<'f> From<&'f MapField> for FieldLine<'f> {
    fn from(f: &'f MapField) -> Self {
        Self {
            name: &f.name,
            typ: map_type(f),
            sequence: f.sequence,
            comment: f.comment.as_ref(),
            options: &f.options,
        }
    }
}

pub(crate) fn field_type(field: &NormalField) -> String {
    let typ = gunk_type(&field.type_name);
    if field.repeated() {
        format!("[]{typ}")
    } else {
        typ.to_string()
    }
}

// Maps can't be repeated, so the label is never looked at.
pub(crate) fn map_type(field: &MapField) -> String {
    format!(
        "map[{}]{}",
        gunk_type(&field.key_type),
        gunk_type(&field.value_type)
    )
}

impl<'a> Builder<'a> {
    /// Convert a proto message to a Gunk struct.
    pub(crate) fn handle_message(&mut self, m: &'a Message) -> Result<(), TranslateError> {
        let mut w = GunkWriter::default();
        w.comment(0, m.comment.as_ref());
        w.line(0, format_args!("type {} struct {{", m.name));

        for e in &m.elements {
            match e {
                MessageElement::Field(f) => self.handle_message_field(&mut w, f.into()),
                MessageElement::MapField(f) => self.handle_message_field(&mut w, f.into()),
                // Gunk has no nested types; the enum becomes a top-level
                // declaration ahead of this message.
                MessageElement::Enum(nested) => self.handle_enum(nested)?,
                MessageElement::Comment(c) => {
                    w.comment(1, Some(c));
                }
                MessageElement::Option(o) => self.unhandled_option(OptionScope::Message, o),
                MessageElement::Message(nested) => {
                    return Err(self.unexpected_in_message("message", nested.position));
                }
                MessageElement::Oneof(o) => {
                    return Err(self.unexpected_in_message("oneof", o.position));
                }
                MessageElement::Reserved(r) => {
                    return Err(self.unexpected_in_message("reserved", r.position));
                }
                MessageElement::Extensions(x) => {
                    return Err(self.unexpected_in_message("extensions", x.position));
                }
                MessageElement::Extend(x) => {
                    return Err(self.unexpected_in_message("extend", x.position));
                }
            }
        }

        self.translated_declarations.push(w.finish("}"));
        Ok(())
    }

    fn handle_message_field(&mut self, w: &mut GunkWriter, field: FieldLine<'_>) {
        for o in field.options {
            self.unhandled_option(OptionScope::Field, o);
        }

        w.comment(1, field.comment);
        w.line(
            1,
            format_args!(
                "{} {} `pb:\"{}\" json:\"{}\"`",
                camel_identifier(field.name),
                field.typ,
                field.sequence,
                snake_name(field.name)
            ),
        );
    }

    fn unexpected_in_message(
        &self,
        found: &'static str,
        position: parser::Position,
    ) -> TranslateError {
        self.error(
            position,
            TranslateErrorKind::UnexpectedElement {
                found,
                container: "message",
                expected: "field",
            },
        )
    }
}
