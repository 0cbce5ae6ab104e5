use parser::{Literal, ProtoOption, Rpc, Service, ServiceElement};

use crate::builder::Builder;
use crate::diagnostics::{DiagnosticKind, OptionScope};
use crate::error::{TranslateError, TranslateErrorKind};
use crate::writer::{GunkWriter, quote};

const HTTP_RULE_OPTION: &str = "(google.api.http)";
const HTTP_IMPORT: &str = "github.com/gunk/opt/http";
const EMPTY_MESSAGE: &str = "google.protobuf.Empty";

/// A `google.api.http` rule reduced to what `http.Match` carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpRule {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) body: String,
}

/// Request or response type as written in a Gunk method signature.
/// The well-known empty message disappears.
pub(crate) fn method_type(name: &str, stream: bool) -> String {
    if name.strip_prefix('.').unwrap_or(name) == EMPTY_MESSAGE {
        return String::new();
    }
    if stream {
        format!("chan {name}")
    } else {
        name.to_string()
    }
}

impl<'a> Builder<'a> {
    /// Convert a proto service to a Gunk interface.
    pub(crate) fn handle_service(&mut self, s: &'a Service) -> Result<(), TranslateError> {
        let mut w = GunkWriter::default();
        w.comment(0, s.comment.as_ref());
        w.line(0, format_args!("type {} interface {{", s.name));

        let mut first = true;
        for e in &s.elements {
            match e {
                ServiceElement::Rpc(r) => {
                    // Methods without comments or annotations are packed
                    // together.
                    if !first && (r.comment.is_some() || !r.options.is_empty()) {
                        w.blank();
                    }
                    self.handle_rpc(&mut w, r)?;
                    first = false;
                }
                ServiceElement::Option(o) => self.unhandled_option(OptionScope::Service, o),
                ServiceElement::Comment(c) => {
                    w.comment(1, Some(c));
                }
            }
        }

        self.translated_declarations.push(w.finish("}"));
        Ok(())
    }

    fn handle_rpc(&mut self, w: &mut GunkWriter, r: &'a Rpc) -> Result<(), TranslateError> {
        // Written above the annotation when there is one, otherwise above
        // the method.
        let mut comment = r.comment.as_ref();

        for opt in &r.options {
            if opt.name != HTTP_RULE_OPTION {
                self.unhandled_option(OptionScope::Method, opt);
                continue;
            }
            let Some(rule) = self.http_rule(opt)? else {
                continue;
            };
            if let Some(c) = comment.take() {
                w.comment(1, Some(c));
                w.line(1, "//");
            }
            w.line(1, "// +gunk http.Match{");
            w.line(1, format_args!("//     Method: {},", quote(&rule.method.to_uppercase())));
            w.line(1, format_args!("//     Path: {},", quote(&rule.path)));
            if !rule.body.is_empty() {
                w.line(1, format_args!("//     Body: {},", quote(&rule.body)));
            }
            w.line(1, "// }");
            self.imports_used.insert(HTTP_IMPORT);
        }

        w.comment(1, comment);
        w.line(
            1,
            format_args!(
                "{}({}) {}",
                r.name,
                method_type(&r.request_type, r.streams_request),
                method_type(&r.returns_type, r.streams_returns)
            ),
        );
        Ok(())
    }

    /// Read the verb, path and body out of a `(google.api.http)` option.
    /// Returns `None` when no verb with a non-empty path was given.
    pub(crate) fn http_rule(
        &mut self,
        opt: &ProtoOption,
    ) -> Result<Option<HttpRule>, TranslateError> {
        let fields = match &opt.constant {
            Literal::Map(fields) if !fields.is_empty() => fields,
            _ => return Err(self.error(opt.position, TranslateErrorKind::HttpRuleNotMap)),
        };

        let mut method: Option<&str> = None;
        let mut path = String::new();
        let mut body = String::new();
        for field in fields {
            match (field.name.as_str(), &field.value) {
                ("body", Literal::String(b)) => body = b.clone(),
                ("body", _) => {
                    return Err(self.error(opt.position, TranslateErrorKind::HttpBodyNotString));
                }
                (verb, Literal::String(p)) => {
                    if let Some(previous) = method.replace(verb) {
                        self.diagnose(
                            opt.position,
                            DiagnosticKind::MultipleHttpRules {
                                ignored: previous.to_string(),
                                used: verb.to_string(),
                            },
                        );
                    }
                    path = p.clone();
                }
                (verb, _) => {
                    return Err(self.error(
                        opt.position,
                        TranslateErrorKind::HttpPathNotString(verb.to_string()),
                    ));
                }
            }
        }

        Ok(match method {
            Some(method) if !path.is_empty() => Some(HttpRule {
                method: method.to_string(),
                path,
                body,
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::{Comment, LiteralField, Position};
    use pretty_assertions::assert_eq;

    fn http_option(entries: &[(&str, &str)]) -> ProtoOption {
        ProtoOption {
            name: HTTP_RULE_OPTION.to_string(),
            constant: Literal::Map(
                entries
                    .iter()
                    .map(|(k, v)| LiteralField {
                        name: k.to_string(),
                        value: Literal::String(v.to_string()),
                    })
                    .collect(),
            ),
            comment: None,
            position: Position::new(5, 9),
        }
    }

    fn rpc(name: &str, req: &str, resp: &str) -> Rpc {
        Rpc {
            name: name.to_string(),
            request_type: req.to_string(),
            returns_type: resp.to_string(),
            ..Default::default()
        }
    }

    fn service(rpcs: Vec<Rpc>) -> Service {
        Service {
            name: "Util".to_string(),
            elements: rpcs.into_iter().map(ServiceElement::Rpc).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_marker_becomes_absent_type() {
        assert_eq!(method_type("google.protobuf.Empty", false), "");
        assert_eq!(method_type(".google.protobuf.Empty", false), "");
        assert_eq!(method_type("Message", false), "Message");
        assert_eq!(method_type("Event", true), "chan Event");
    }

    #[test]
    fn get_rule_without_body() {
        let s = service(vec![Rpc {
            options: vec![http_option(&[("get", "/v1/echo")])],
            ..rpc("Echo", "Message", "google.protobuf.Empty")
        }]);
        let mut b = Builder::new("u.proto");
        b.handle_service(&s).expect("service should translate");
        assert_eq!(
            b.translated_declarations[0],
            "type Util interface {\n\
             \t// +gunk http.Match{\n\
             \t//     Method: \"GET\",\n\
             \t//     Path: \"/v1/echo\",\n\
             \t// }\n\
             \tEcho(Message) \n\
             }"
        );
        assert!(b.imports_used.contains(HTTP_IMPORT));
    }

    #[test]
    fn body_line_and_comment_separator() {
        let s = service(vec![Rpc {
            comment: Some(Comment {
                lines: vec![" Echo echoes.".to_string()],
                position: Position::new(4, 5),
            }),
            options: vec![http_option(&[("post", "/v1/echo"), ("body", "*")])],
            ..rpc("Echo", "Message", "Message")
        }]);
        let mut b = Builder::new("u.proto");
        b.handle_service(&s).expect("service should translate");
        assert_eq!(
            b.translated_declarations[0],
            "type Util interface {\n\
             \t// Echo echoes.\n\
             \t//\n\
             \t// +gunk http.Match{\n\
             \t//     Method: \"POST\",\n\
             \t//     Path: \"/v1/echo\",\n\
             \t//     Body: \"*\",\n\
             \t// }\n\
             \tEcho(Message) Message\n\
             }"
        );
        assert!(b.imports_used.contains(HTTP_IMPORT));
    }

    #[test]
    fn last_verb_wins_and_is_reported() {
        let opt = http_option(&[("get", "/a"), ("put", "/b"), ("body", "item")]);
        let mut b = Builder::new("u.proto");
        let rule = b.http_rule(&opt).expect("valid rule");
        assert_eq!(
            rule,
            Some(HttpRule {
                method: "put".to_string(),
                path: "/b".to_string(),
                body: "item".to_string(),
            })
        );
        assert_eq!(
            b.diagnostics[0].kind,
            DiagnosticKind::MultipleHttpRules {
                ignored: "get".to_string(),
                used: "put".to_string()
            }
        );
    }

    #[test]
    fn rule_without_path_emits_nothing() {
        let s = service(vec![Rpc {
            options: vec![http_option(&[("get", "")])],
            ..rpc("Echo", "Message", "Message")
        }]);
        let mut b = Builder::new("u.proto");
        b.handle_service(&s).expect("service should translate");
        assert_eq!(
            b.translated_declarations[0],
            "type Util interface {\n\tEcho(Message) Message\n}"
        );
        assert!(b.imports_used.is_empty());
    }

    #[test]
    fn malformed_rules_are_fatal() {
        let mut b = Builder::new("u.proto");

        let mut not_map = http_option(&[]);
        not_map.constant = Literal::String("/v1".to_string());
        let err = b.http_rule(&not_map).expect_err("must be a map");
        assert_eq!(err.kind, TranslateErrorKind::HttpRuleNotMap);
        assert_eq!(err.to_string(), "u.proto:5:9: expected option to be a map");

        let mut numeric = http_option(&[]);
        numeric.constant = Literal::Map(vec![LiteralField {
            name: "get".to_string(),
            value: Literal::Number("1".to_string()),
        }]);
        let err = b.http_rule(&numeric).expect_err("path must be a string");
        assert_eq!(err.kind, TranslateErrorKind::HttpPathNotString("get".to_string()));
    }

    #[test]
    fn service_options_are_reported() {
        let s = Service {
            elements: vec![
                ServiceElement::Option(ProtoOption {
                    name: "deprecated".to_string(),
                    constant: Literal::Ident("true".to_string()),
                    comment: None,
                    position: Position::new(4, 3),
                }),
                ServiceElement::Rpc(rpc("Echo", "Message", "Message")),
            ],
            ..service(Vec::new())
        };
        let mut b = Builder::new("x.proto");
        b.handle_service(&s).expect("service options are not fatal");
        assert_eq!(
            b.translated_declarations[0],
            "type Util interface {\n\tEcho(Message) Message\n}"
        );
        assert_eq!(
            b.diagnostics[0].to_string(),
            "x.proto:4:3: unhandled service option \"deprecated\""
        );
    }

    #[test]
    fn non_string_body_is_fatal() {
        let mut opt = http_option(&[("post", "/a")]);
        if let Literal::Map(fields) = &mut opt.constant {
            fields.push(LiteralField {
                name: "body".to_string(),
                value: Literal::Number("1".to_string()),
            });
        }
        let mut b = Builder::new("u.proto");
        let err = b.http_rule(&opt).expect_err("body must be a string");
        assert_eq!(err.kind, TranslateErrorKind::HttpBodyNotString);
        assert_eq!(err.location.position, Position::new(5, 9));
    }

    #[test]
    fn blank_line_only_before_commented_or_annotated_methods() {
        let s = service(vec![
            rpc("A", "Req", "Resp"),
            rpc("B", "Req", "Resp"),
            Rpc {
                comment: Some(Comment {
                    lines: vec![" C does things.".to_string()],
                    position: Position::new(6, 5),
                }),
                ..rpc("C", "Req", "Resp")
            },
            Rpc {
                options: vec![ProtoOption {
                    name: "deprecated".to_string(),
                    constant: Literal::Ident("true".to_string()),
                    comment: None,
                    position: Position::new(9, 9),
                }],
                ..rpc("D", "Req", "Resp")
            },
        ]);
        let mut b = Builder::new("u.proto");
        b.handle_service(&s).expect("service should translate");
        assert_eq!(
            b.translated_declarations[0],
            "type Util interface {\n\
             \tA(Req) Resp\n\
             \tB(Req) Resp\n\
             \n\
             \t// C does things.\n\
             \tC(Req) Resp\n\
             \n\
             \tD(Req) Resp\n\
             }"
        );
        assert_eq!(
            b.diagnostics[0].to_string(),
            "u.proto:9:9: unhandled method option \"deprecated\""
        );
    }
}
