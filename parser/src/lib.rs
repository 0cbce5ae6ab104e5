mod comments;
mod model;

use pest::Parser as _;
use pest::iterators::Pair;
use pest_derive::Parser;
use std::fs;
use std::path::Path;
use thiserror::Error;

use comments::CommentTracker;
pub use model::*;

#[derive(Parser)]
#[grammar = "resources/proto.pest"] // Path relative to the crate root
pub struct ProtoParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Pest(Box<pest::error::Error<Rule>>),
    #[error("{line}:{column}: {message}")]
    Invalid {
        line: usize,
        column: usize,
        message: String,
    },
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        Self::Pest(Box::new(e))
    }
}

fn invalid(pair: &Pair<Rule>, message: impl Into<String>) -> ParseError {
    let (line, column) = pair.line_col();
    ParseError::Invalid {
        line,
        column,
        message: message.into(),
    }
}

fn position(pair: &Pair<Rule>) -> Position {
    let (line, column) = pair.line_col();
    Position::new(line, column)
}

// Public API: parse a .proto file into the declaration tree
pub fn parse_proto_file<P: AsRef<Path>>(path: P) -> Result<Proto, ParseError> {
    let content = fs::read_to_string(path)?;
    parse_proto_str(&content)
}

pub fn parse_proto_str(content: &str) -> Result<Proto, ParseError> {
    let mut pairs = ProtoParser::parse(Rule::proto, content)?;
    let proto_pair = pairs.next().ok_or(ParseError::Invalid {
        line: 1,
        column: 1,
        message: "expected proto root".to_string(),
    })?;
    parse_proto(proto_pair)
}

fn parse_proto(pair: Pair<Rule>) -> Result<Proto, ParseError> {
    let mut proto = Proto::default();
    let mut comments = CommentTracker::new(None);

    for inner in pair.into_inner() {
        let rule = inner.as_rule();
        if rule == Rule::COMMENT {
            if let Some(c) = comments.observe(&inner) {
                proto.elements.push(Declaration::Comment(c));
            }
            continue;
        }
        if matches!(rule, Rule::EOI | Rule::empty_stmt) {
            continue;
        }

        let (standalone, comment) = comments.attach(&inner);
        proto.elements.extend(standalone.map(Declaration::Comment));

        let decl = match rule {
            Rule::syntax_stmt => Declaration::Syntax(parse_syntax(inner, comment)?),
            Rule::package_stmt => Declaration::Package(parse_package(inner, comment)),
            Rule::import_stmt => Declaration::Import(parse_import(inner, comment)?),
            Rule::option_stmt => Declaration::Option(parse_option(inner, comment)?),
            Rule::message => Declaration::Message(parse_message(inner, comment)?),
            Rule::enum_def => Declaration::Enum(parse_enum(inner, comment)?),
            Rule::service => Declaration::Service(parse_service(inner, comment)?),
            Rule::extend => Declaration::Extend(parse_extend(inner, comment)?),
            _ => return Err(invalid(&inner, format!("unexpected {rule:?} at top level"))),
        };
        proto.elements.push(decl);
    }

    proto.elements.extend(comments.finish().map(Declaration::Comment));
    Ok(proto)
}

fn parse_syntax(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Syntax, ParseError> {
    let position = position(&pair);
    let mut value = String::new();
    for p in pair.into_inner() {
        if p.as_rule() == Rule::string_value {
            value = parse_string_value(p)?;
        }
    }
    Ok(Syntax {
        value,
        comment,
        position,
    })
}

fn parse_package(pair: Pair<Rule>, comment: Option<Comment>) -> Package {
    // package_stmt = { package_kw ~ full_ident ~ ";" }
    let position = position(&pair);
    let name = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::full_ident)
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    Package {
        name,
        comment,
        position,
    }
}

fn parse_import(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Import, ParseError> {
    let position = position(&pair);
    let mut import = Import {
        comment,
        position,
        ..Default::default()
    };
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::import_modifier => {
                import.kind = match p.as_str() {
                    "weak" => Some(ImportKind::Weak),
                    _ => Some(ImportKind::Public),
                }
            }
            Rule::string_value => import.filename = parse_string_value(p)?,
            _ => {}
        }
    }
    Ok(import)
}

fn parse_option(pair: Pair<Rule>, comment: Option<Comment>) -> Result<ProtoOption, ParseError> {
    // option_stmt = { option_kw ~ option_name ~ "=" ~ constant ~ ";" }
    // field_option = { option_name ~ "=" ~ constant }
    let position = position(&pair);
    let mut name: Option<String> = None;
    let mut constant: Option<Literal> = None;

    for p in pair.clone().into_inner() {
        match p.as_rule() {
            Rule::option_name => name = Some(p.as_str().to_string()),
            Rule::option_kw | Rule::COMMENT => {}
            _ => constant = Some(parse_literal(p)?),
        }
    }

    match (name, constant) {
        (Some(name), Some(constant)) => Ok(ProtoOption {
            name,
            constant,
            comment,
            position,
        }),
        _ => Err(invalid(&pair, "incomplete option")),
    }
}

fn parse_field_options(pair: Pair<Rule>) -> Result<Vec<ProtoOption>, ParseError> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::field_option)
        .map(|p| parse_option(p, None))
        .collect()
}

fn parse_literal(pair: Pair<Rule>) -> Result<Literal, ParseError> {
    match pair.as_rule() {
        Rule::string_value => Ok(Literal::String(parse_string_value(pair)?)),
        Rule::int_lit | Rule::float_lit => Ok(Literal::Number(pair.as_str().to_string())),
        Rule::full_ident => Ok(Literal::Ident(pair.as_str().to_string())),
        Rule::aggregate => {
            let mut fields = Vec::new();
            for f in pair.into_inner() {
                if f.as_rule() != Rule::aggregate_field {
                    continue;
                }
                let mut name = String::new();
                let mut value: Option<Literal> = None;
                for p in f.clone().into_inner() {
                    match p.as_rule() {
                        Rule::aggregate_key => name = p.as_str().to_string(),
                        Rule::COMMENT => {}
                        _ => value = Some(parse_literal(p)?),
                    }
                }
                let value = value.ok_or_else(|| invalid(&f, "aggregate field without value"))?;
                fields.push(LiteralField { name, value });
            }
            Ok(Literal::Map(fields))
        }
        Rule::list_value => pair
            .into_inner()
            .filter(|p| p.as_rule() != Rule::COMMENT)
            .map(parse_literal)
            .collect::<Result<Vec<_>, _>>()
            .map(Literal::List),
        rule => Err(invalid(&pair, format!("unexpected {rule:?} in constant"))),
    }
}

fn parse_string_value(pair: Pair<Rule>) -> Result<String, ParseError> {
    // string_value = { string_literal+ }, adjacent literals concatenate
    let mut out = String::new();
    for lit in pair.into_inner() {
        if lit.as_rule() != Rule::string_literal {
            continue;
        }
        for chars in lit.into_inner() {
            out.push_str(&unescape(&chars)?);
        }
    }
    Ok(out)
}

fn unescape(pair: &Pair<Rule>) -> Result<String, ParseError> {
    let raw = pair.as_str();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            return Err(invalid(pair, "dangling escape in string"));
        };
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{7}'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            'x' | 'X' => {
                let mut digits = String::new();
                while digits.len() < 2 && chars.peek().is_some_and(|d| d.is_ascii_hexdigit()) {
                    digits.extend(chars.next());
                }
                let code = u32::from_str_radix(&digits, 16)
                    .map_err(|_| invalid(pair, "invalid hex escape in string"))?;
                out.extend(char::from_u32(code));
            }
            '0'..='7' => {
                let mut digits = esc.to_string();
                while digits.len() < 3 && chars.peek().is_some_and(|d| ('0'..='7').contains(d)) {
                    digits.extend(chars.next());
                }
                let code = u32::from_str_radix(&digits, 8)
                    .map_err(|_| invalid(pair, "invalid octal escape in string"))?;
                out.extend(char::from_u32(code));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn parse_message(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Message, ParseError> {
    // message = { message_kw ~ ident ~ message_body }
    let mut message = Message {
        comment,
        position: position(&pair),
        ..Default::default()
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => message.name = p.as_str().to_string(),
            Rule::message_body => message.elements = parse_message_body(p)?,
            _ => {}
        }
    }
    Ok(message)
}

fn parse_message_body(body: Pair<Rule>) -> Result<Vec<MessageElement>, ParseError> {
    let mut elements = Vec::new();
    let mut comments = CommentTracker::new(Some(body.line_col().0));

    for p in body.into_inner() {
        let rule = p.as_rule();
        if rule == Rule::COMMENT {
            if let Some(c) = comments.observe(&p) {
                elements.push(MessageElement::Comment(c));
            }
            continue;
        }
        if rule == Rule::empty_stmt {
            continue;
        }

        let (standalone, comment) = comments.attach(&p);
        elements.extend(standalone.map(MessageElement::Comment));

        let element = match rule {
            Rule::field => MessageElement::Field(parse_field(p, comment)?),
            Rule::map_field => MessageElement::MapField(parse_map_field(p, comment)?),
            Rule::enum_def => MessageElement::Enum(parse_enum(p, comment)?),
            Rule::message => MessageElement::Message(parse_message(p, comment)?),
            Rule::oneof => MessageElement::Oneof(parse_oneof(p, comment)?),
            Rule::option_stmt => MessageElement::Option(parse_option(p, comment)?),
            Rule::reserved => MessageElement::Reserved(Reserved {
                source: p.as_str().to_string(),
                comment,
                position: position(&p),
            }),
            Rule::extensions => MessageElement::Extensions(Extensions {
                source: p.as_str().to_string(),
                comment,
                position: position(&p),
            }),
            Rule::extend => MessageElement::Extend(parse_extend(p, comment)?),
            _ => return Err(invalid(&p, format!("unexpected {rule:?} in message"))),
        };
        elements.push(element);
    }

    elements.extend(comments.finish().map(MessageElement::Comment));
    Ok(elements)
}

fn parse_field(pair: Pair<Rule>, comment: Option<Comment>) -> Result<NormalField, ParseError> {
    // field = { field_label? ~ type_name ~ ident ~ "=" ~ int_lit ~ field_options? ~ ";" }
    let mut field = NormalField {
        comment,
        position: position(&pair),
        ..Default::default()
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::field_label => {
                field.label = match p.as_str() {
                    "repeated" => Some(FieldLabel::Repeated),
                    "optional" => Some(FieldLabel::Optional),
                    _ => Some(FieldLabel::Required),
                }
            }
            Rule::type_name => field.type_name = p.as_str().to_string(),
            Rule::ident => field.name = p.as_str().to_string(),
            Rule::int_lit => field.sequence = parse_tag(&p)?,
            Rule::field_options => field.options = parse_field_options(p)?,
            _ => {}
        }
    }
    Ok(field)
}

fn parse_map_field(pair: Pair<Rule>, comment: Option<Comment>) -> Result<MapField, ParseError> {
    // map_field = { map_kw ~ "<" ~ type_name ~ "," ~ type_name ~ ">" ~ ident ~ "=" ~ ... }
    let mut field = MapField {
        comment,
        position: position(&pair),
        ..Default::default()
    };
    let mut types = Vec::with_capacity(2);

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::type_name => types.push(p.as_str().to_string()),
            Rule::ident => field.name = p.as_str().to_string(),
            Rule::int_lit => field.sequence = parse_tag(&p)?,
            Rule::field_options => field.options = parse_field_options(p)?,
            _ => {}
        }
    }

    let mut types = types.into_iter();
    field.key_type = types.next().unwrap_or_default();
    field.value_type = types.next().unwrap_or_default();
    Ok(field)
}

fn parse_oneof(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Oneof, ParseError> {
    let mut oneof = Oneof {
        comment,
        position: position(&pair),
        ..Default::default()
    };
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => oneof.name = p.as_str().to_string(),
            Rule::field => oneof.fields.push(parse_field(p, None)?),
            Rule::option_stmt => oneof.options.push(parse_option(p, None)?),
            _ => {}
        }
    }
    Ok(oneof)
}

fn parse_extend(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Extend, ParseError> {
    let mut extend = Extend {
        comment,
        position: position(&pair),
        ..Default::default()
    };
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::type_name => extend.type_name = p.as_str().to_string(),
            Rule::field => extend.fields.push(parse_field(p, None)?),
            _ => {}
        }
    }
    Ok(extend)
}

fn parse_enum(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Enum, ParseError> {
    // enum_def = { enum_kw ~ ident ~ enum_body }
    let mut en = Enum {
        comment,
        position: position(&pair),
        ..Default::default()
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => en.name = p.as_str().to_string(),
            Rule::enum_body => en.elements = parse_enum_body(p)?,
            _ => {}
        }
    }
    Ok(en)
}

fn parse_enum_body(body: Pair<Rule>) -> Result<Vec<EnumElement>, ParseError> {
    let mut elements = Vec::new();
    let mut comments = CommentTracker::new(Some(body.line_col().0));

    for p in body.into_inner() {
        let rule = p.as_rule();
        if rule == Rule::COMMENT {
            if let Some(c) = comments.observe(&p) {
                elements.push(EnumElement::Comment(c));
            }
            continue;
        }
        if rule == Rule::empty_stmt {
            continue;
        }

        let (standalone, comment) = comments.attach(&p);
        elements.extend(standalone.map(EnumElement::Comment));

        let element = match rule {
            Rule::enum_value => EnumElement::Value(parse_enum_value(p, comment)?),
            Rule::option_stmt => EnumElement::Option(parse_option(p, comment)?),
            Rule::reserved => EnumElement::Reserved(Reserved {
                source: p.as_str().to_string(),
                comment,
                position: position(&p),
            }),
            _ => return Err(invalid(&p, format!("unexpected {rule:?} in enum"))),
        };
        elements.push(element);
    }

    elements.extend(comments.finish().map(EnumElement::Comment));
    Ok(elements)
}

fn parse_enum_value(pair: Pair<Rule>, comment: Option<Comment>) -> Result<EnumValue, ParseError> {
    // enum_value = { ident ~ "=" ~ int_lit ~ field_options? ~ ";" }
    let mut value = EnumValue {
        comment,
        position: position(&pair),
        ..Default::default()
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => value.name = p.as_str().to_string(),
            Rule::int_lit => {
                let n = parse_integer_value(&p)?;
                value.integer =
                    i32::try_from(n).map_err(|_| invalid(&p, "enum value out of int32 range"))?;
            }
            Rule::field_options => value.options = parse_field_options(p)?,
            _ => {}
        }
    }
    Ok(value)
}

fn parse_service(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Service, ParseError> {
    // service = { service_kw ~ ident ~ service_body }
    let mut service = Service {
        comment,
        position: position(&pair),
        ..Default::default()
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => service.name = p.as_str().to_string(),
            Rule::service_body => service.elements = parse_service_body(p)?,
            _ => {}
        }
    }
    Ok(service)
}

fn parse_service_body(body: Pair<Rule>) -> Result<Vec<ServiceElement>, ParseError> {
    let mut elements = Vec::new();
    let mut comments = CommentTracker::new(Some(body.line_col().0));

    for p in body.into_inner() {
        let rule = p.as_rule();
        if rule == Rule::COMMENT {
            if let Some(c) = comments.observe(&p) {
                elements.push(ServiceElement::Comment(c));
            }
            continue;
        }
        if rule == Rule::empty_stmt {
            continue;
        }

        let (standalone, comment) = comments.attach(&p);
        elements.extend(standalone.map(ServiceElement::Comment));

        let element = match rule {
            Rule::rpc => ServiceElement::Rpc(parse_rpc(p, comment)?),
            Rule::option_stmt => ServiceElement::Option(parse_option(p, comment)?),
            _ => return Err(invalid(&p, format!("unexpected {rule:?} in service"))),
        };
        elements.push(element);
    }

    elements.extend(comments.finish().map(ServiceElement::Comment));
    Ok(elements)
}

fn parse_rpc(pair: Pair<Rule>, comment: Option<Comment>) -> Result<Rpc, ParseError> {
    // rpc = { rpc_kw ~ ident ~ "(" ~ rpc_request ~ ")" ~ returns_kw ~ "(" ~ rpc_response ~ ")"
    //         ~ rpc_body }
    let mut rpc = Rpc {
        comment,
        position: position(&pair),
        ..Default::default()
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::ident => rpc.name = p.as_str().to_string(),
            Rule::rpc_request => {
                (rpc.request_type, rpc.streams_request) = parse_rpc_type(p);
            }
            Rule::rpc_response => {
                (rpc.returns_type, rpc.streams_returns) = parse_rpc_type(p);
            }
            Rule::rpc_body => {
                for o in p.into_inner() {
                    if o.as_rule() == Rule::option_stmt {
                        rpc.options.push(parse_option(o, None)?);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(rpc)
}

fn parse_rpc_type(pair: Pair<Rule>) -> (String, bool) {
    let mut name = String::new();
    let mut stream = false;
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::stream_kw => stream = true,
            Rule::type_name => name = p.as_str().to_string(),
            _ => {}
        }
    }
    (name, stream)
}

fn parse_tag(pair: &Pair<Rule>) -> Result<i32, ParseError> {
    let n = parse_integer_value(pair)?;
    match i32::try_from(n) {
        Ok(tag) if tag > 0 => Ok(tag),
        _ => Err(invalid(pair, format!("invalid field number {n}"))),
    }
}

fn parse_integer_value(pair: &Pair<Rule>) -> Result<i64, ParseError> {
    // int_lit = dec|hex|oct with optional sign
    let s = pair.as_str();
    let (neg, rest) = if let Some(stripped) = s.strip_prefix('-') {
        (true, stripped)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };
    let parsed = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if rest.starts_with('0') && rest.len() > 1 {
        // Octal per grammar
        i64::from_str_radix(&rest[1..], 8)
    } else {
        rest.parse::<i64>()
    };
    let val = parsed.map_err(|_| invalid(pair, format!("integer {s} out of range")))?;
    Ok(if neg { -val } else { val })
}
