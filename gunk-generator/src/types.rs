/// Map a proto scalar type to the Go type Gunk uses for it. Anything that
/// isn't a scalar is a message or enum reference and is returned unchanged.
pub fn gunk_type(proto_type: &str) -> &str {
    // https://developers.google.com/protocol-buffers/docs/proto3#scalar
    match proto_type {
        "bool" => "bool",
        "string" => "string",
        "bytes" => "[]byte",
        "double" => "float64",
        "float" => "float32",
        "int32" => "int",
        "sint32" | "sfixed32" => "int32",
        "int64" | "sint64" | "sfixed64" => "int64",
        "uint32" | "fixed32" => "uint32",
        "uint64" | "fixed64" => "uint64",
        other => other,
    }
}
