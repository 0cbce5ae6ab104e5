use parser::{Enum, EnumElement, EnumValue};

use crate::builder::Builder;
use crate::diagnostics::OptionScope;
use crate::error::{TranslateError, TranslateErrorKind};
use crate::writer::GunkWriter;

/// How the values of a Go const block are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumEncoding {
    /// First value is `= iota`, the rest are bare names.
    Iota,
    /// Every value carries its number.
    Explicit,
}

impl EnumEncoding {
    /// `Iota` only when the values are exactly `0, 1, 2, ...` in declaration
    /// order.
    pub(crate) fn for_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let sequential = values
            .into_iter()
            .enumerate()
            .all(|(i, v)| i64::try_from(i).is_ok_and(|i| i == i64::from(v)));
        if sequential {
            EnumEncoding::Iota
        } else {
            EnumEncoding::Explicit
        }
    }
}

impl<'a> Builder<'a> {
    /// Output a proto enum as a Go named int type plus a const block.
    pub(crate) fn handle_enum(&mut self, e: &'a Enum) -> Result<(), TranslateError> {
        let mut w = GunkWriter::default();
        w.comment(0, e.comment.as_ref());
        w.line(0, format_args!("type {} int", e.name));
        w.blank();
        w.line(0, "const (");

        let encoding = EnumEncoding::for_values(e.elements.iter().filter_map(|el| match el {
            EnumElement::Value(v) => Some(v.integer),
            _ => None,
        }));

        let mut index = 0;
        for el in &e.elements {
            match el {
                EnumElement::Value(v) => {
                    self.handle_enum_value(&mut w, &e.name, v, encoding, index);
                    index += 1;
                }
                EnumElement::Option(o) => self.unhandled_option(OptionScope::Enum, o),
                EnumElement::Comment(c) => {
                    w.comment(1, Some(c));
                }
                EnumElement::Reserved(r) => {
                    return Err(self.error(
                        r.position,
                        TranslateErrorKind::UnexpectedElement {
                            found: "reserved",
                            container: "enum",
                            expected: "enum field",
                        },
                    ));
                }
            }
        }

        self.translated_declarations.push(w.finish(")"));
        Ok(())
    }

    fn handle_enum_value(
        &mut self,
        w: &mut GunkWriter,
        enum_name: &str,
        v: &EnumValue,
        encoding: EnumEncoding,
        index: usize,
    ) {
        for o in &v.options {
            self.unhandled_option(OptionScope::EnumValue, o);
        }

        w.comment(1, v.comment.as_ref());
        match encoding {
            EnumEncoding::Explicit => {
                w.line(1, format_args!("{} {} = {}", v.name, enum_name, v.integer))
            }
            EnumEncoding::Iota if index == 0 => {
                w.line(1, format_args!("{} {} = iota", v.name, enum_name))
            }
            EnumEncoding::Iota => w.line(1, &v.name),
        };
    }
}
