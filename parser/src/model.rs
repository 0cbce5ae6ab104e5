// Declaration tree for .proto files.
// - Top-level is an ordered list of declarations, exactly as written.
// - Every declaration keeps its leading comment and source position.
// - Options keep their source spelling; constants keep enough shape to
//   tell strings from scalars from aggregates.

/// 1-based line/column of the first character of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A comment block. For `//` comments each entry is the text after the
/// slashes; for `/* */` comments each entry is one inner line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub lines: Vec<String>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Proto {
    pub elements: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Syntax(Syntax),
    Package(Package),
    Import(Import),
    Option(ProtoOption),
    Message(Message),
    Enum(Enum),
    Service(Service),
    Extend(Extend),
    /// A comment that is not directly followed by a declaration.
    Comment(Comment),
}

impl Declaration {
    pub fn position(&self) -> Position {
        match self {
            Declaration::Syntax(s) => s.position,
            Declaration::Package(p) => p.position,
            Declaration::Import(i) => i.position,
            Declaration::Option(o) => o.position,
            Declaration::Message(m) => m.position,
            Declaration::Enum(e) => e.position,
            Declaration::Service(s) => s.position,
            Declaration::Extend(e) => e.position,
            Declaration::Comment(c) => c.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Syntax {
    pub value: String,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    pub name: String,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Weak,
    Public,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Import {
    pub filename: String,
    pub kind: Option<ImportKind>,
    pub comment: Option<Comment>,
    pub position: Position,
}

// ---------------- Options & constants ----------------

#[derive(Debug, Clone, PartialEq)]
pub struct ProtoOption {
    /// Name as written, e.g. `deprecated` or `(google.api.http)`.
    pub name: String,
    pub constant: Literal,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Unescaped string contents (adjacent literals already joined).
    String(String),
    Number(String),
    /// `true`, `false`, enum constants and other bare identifiers.
    Ident(String),
    /// Text-format aggregate; entries keep their source order.
    Map(Vec<LiteralField>),
    List(Vec<Literal>),
}

impl Literal {
    /// The literal's value without quotes, for scalar literals only.
    pub fn scalar_source(&self) -> Option<&str> {
        match self {
            Literal::String(s) | Literal::Number(s) | Literal::Ident(s) => Some(s),
            Literal::Map(_) | Literal::List(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralField {
    pub name: String,
    pub value: Literal,
}

// ---------------- Message & Fields ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub name: String,
    pub elements: Vec<MessageElement>,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageElement {
    Field(NormalField),
    MapField(MapField),
    Enum(Enum),
    Message(Message),
    Oneof(Oneof),
    Option(ProtoOption),
    Reserved(Reserved),
    Extensions(Extensions),
    Extend(Extend),
    Comment(Comment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    Repeated,
    Optional,
    Required,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalField {
    pub name: String,
    pub type_name: String,
    pub sequence: i32, // tag number
    pub label: Option<FieldLabel>,
    pub options: Vec<ProtoOption>,
    pub comment: Option<Comment>,
    pub position: Position,
}

impl NormalField {
    pub fn repeated(&self) -> bool {
        self.label == Some(FieldLabel::Repeated)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapField {
    pub name: String,
    pub key_type: String,
    pub value_type: String,
    pub sequence: i32,
    pub options: Vec<ProtoOption>,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Oneof {
    pub name: String,
    pub fields: Vec<NormalField>,
    pub options: Vec<ProtoOption>,
    pub comment: Option<Comment>,
    pub position: Position,
}

/// `reserved` statement, kept as written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reserved {
    pub source: String,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extensions {
    pub source: String,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extend {
    pub type_name: String,
    pub fields: Vec<NormalField>,
    pub comment: Option<Comment>,
    pub position: Position,
}

// ---------------- Enum ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enum {
    pub name: String,
    pub elements: Vec<EnumElement>,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumElement {
    Value(EnumValue),
    Option(ProtoOption),
    Reserved(Reserved),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumValue {
    pub name: String,
    pub integer: i32,
    pub options: Vec<ProtoOption>,
    pub comment: Option<Comment>,
    pub position: Position,
}

// ---------------- Service ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Service {
    pub name: String,
    pub elements: Vec<ServiceElement>,
    pub comment: Option<Comment>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceElement {
    Rpc(Rpc),
    Option(ProtoOption),
    Comment(Comment),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rpc {
    pub name: String,
    pub request_type: String,
    pub streams_request: bool,
    pub returns_type: String,
    pub streams_returns: bool,
    pub options: Vec<ProtoOption>,
    pub comment: Option<Comment>,
    pub position: Position,
}
