use parser::{Literal, Position, ProtoOption};

use crate::builder::Builder;
use crate::error::{TranslateError, TranslateErrorKind};
use crate::writer::{GunkWriter, quote};

const GO_PACKAGE: &str = "go_package";

/// How a recognised file option is written as a Gunk annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FileOptionAnnotation {
    pub(crate) import: &'static str,
    pub(crate) name: &'static str,
    /// String-valued options are quoted; bools and enums are written bare.
    pub(crate) quoted: bool,
}

impl FileOptionAnnotation {
    const fn new(import: &'static str, name: &'static str, quoted: bool) -> Self {
        Self {
            import,
            name,
            quoted,
        }
    }

    pub(crate) fn lookup(option: &str) -> Option<Self> {
        const FILE: &str = "github.com/gunk/opt/file";
        const JAVA: &str = "github.com/gunk/opt/file/java";

        let annotation = match option {
            "deprecated" => Self::new(FILE, "Deprecated", false),
            "optimize_for" => Self::new(FILE, "OptimizeFor", false),
            "java_package" => Self::new(JAVA, "Package", true),
            "java_outer_classname" => Self::new(JAVA, "OuterClassname", true),
            "java_multiple_files" => Self::new(JAVA, "MultipleFiles", false),
            "java_string_check_utf8" => Self::new(JAVA, "StringCheckUtf8", false),
            "java_generic_services" => Self::new(JAVA, "GenericServices", false),
            "swift_prefix" => Self::new("github.com/gunk/opt/file/swift", "Prefix", true),
            "csharp_namespace" => Self::new("github.com/gunk/opt/file/csharp", "Namespace", true),
            "objc_class_prefix" => Self::new("github.com/gunk/opt/file/objc", "ClassPrefix", true),
            "php_generic_services" => {
                Self::new("github.com/gunk/opt/file/php", "GenericServices", false)
            }
            "cc_generic_services" => {
                Self::new("github.com/gunk/opt/file/cc", "GenericServices", false)
            }
            "cc_enable_arenas" => Self::new("github.com/gunk/opt/file/cc", "EnableArenas", false),
            _ => return None,
        };
        Some(annotation)
    }

    /// `java.Package("com.example")`, named after the last import segment.
    pub(crate) fn render(&self, value: &str) -> String {
        let package = self.import.rsplit('/').next().unwrap_or(self.import);
        if self.quoted {
            format!("{package}.{}({})", self.name, quote(value))
        } else {
            format!("{package}.{}({value})", self.name)
        }
    }
}

impl<'a> Builder<'a> {
    /// File-level annotations, the package comment and the package line.
    pub(crate) fn handle_package(&mut self) -> Result<String, TranslateError> {
        let mut go_package: Option<&'a ProtoOption> = None;
        let mut annotations = Vec::with_capacity(self.package_options.len());

        for o in self.package_options.clone() {
            if o.name == GO_PACKAGE {
                go_package = Some(o);
                continue;
            }
            let Some(annotation) = FileOptionAnnotation::lookup(&o.name) else {
                return Err(self.error(
                    o.position,
                    TranslateErrorKind::UnhandledFileOption(o.name.clone()),
                ));
            };
            let Some(value) = o.constant.scalar_source() else {
                return Err(self.error(
                    o.position,
                    TranslateErrorKind::NonScalarFileOption(o.name.clone()),
                ));
            };
            self.imports_used.insert(annotation.import);
            annotations.push(annotation.render(value));
        }

        let Some(package) = self.package else {
            return Err(self.error(Position::new(1, 1), TranslateErrorKind::MissingPackage));
        };

        let mut w = GunkWriter::default();
        // Annotations go above the package comment, first thing in the file.
        for annotation in &annotations {
            w.line(0, format_args!("// +gunk {annotation}"));
        }
        w.comment(0, package.comment.as_ref());
        if let Some(opt) = go_package {
            w.comment(0, opt.comment.as_ref());
        }

        let mut line = format!("package {}", package.name);
        if let Some(opt) = go_package {
            match &opt.constant {
                Literal::String(path) if !path.is_empty() => {
                    line.push_str(&format!(" // proto {}", quote(path)));
                }
                other => {
                    if let Some(source) = other.scalar_source().filter(|s| !s.is_empty()) {
                        line.push_str(&format!(" // proto {source}"));
                    }
                }
            }
        }
        Ok(w.finish(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::{Comment, LiteralField, Package};
    use pretty_assertions::assert_eq;

    fn option(name: &str, constant: Literal, line: usize) -> ProtoOption {
        ProtoOption {
            name: name.to_string(),
            constant,
            comment: None,
            position: Position::new(line, 1),
        }
    }

    fn package(name: &str) -> Package {
        Package {
            name: name.to_string(),
            comment: None,
            position: Position::new(2, 1),
        }
    }

    #[test]
    fn renders_bare_and_quoted_annotations() {
        let java = FileOptionAnnotation::lookup("java_package").expect("recognised");
        assert_eq!(java.render("com.example"), "java.Package(\"com.example\")");
        let arenas = FileOptionAnnotation::lookup("cc_enable_arenas").expect("recognised");
        assert_eq!(arenas.render("true"), "cc.EnableArenas(true)");
        let swift = FileOptionAnnotation::lookup("swift_prefix").expect("recognised");
        assert_eq!(swift.render("EX"), "swift.Prefix(\"EX\")");
        assert!(FileOptionAnnotation::lookup("go_package").is_none());
        assert!(FileOptionAnnotation::lookup("totally_custom_option").is_none());
    }

    #[test]
    fn options_become_annotations_above_package() {
        let pkg = Package {
            comment: Some(Comment {
                lines: vec![" Package util.".to_string()],
                position: Position::new(1, 1),
            }),
            ..package("util")
        };
        let go_package = option(
            "go_package",
            Literal::String("testdata.tld/util".to_string()),
            4,
        );
        let java = option("java_package", Literal::String("com.util".to_string()), 5);
        let deprecated = option("deprecated", Literal::Ident("true".to_string()), 6);

        let mut b = Builder::new("util.proto");
        b.package = Some(&pkg);
        b.package_options = vec![&go_package, &java, &deprecated];
        let out = b.handle_package().expect("package should translate");
        assert_eq!(
            out,
            "// +gunk java.Package(\"com.util\")\n\
             // +gunk file.Deprecated(true)\n\
             // Package util.\n\
             package util // proto \"testdata.tld/util\""
        );
        assert_eq!(
            b.imports_used.iter().copied().collect::<Vec<_>>(),
            vec!["github.com/gunk/opt/file", "github.com/gunk/opt/file/java"]
        );
    }

    #[test]
    fn unknown_file_option_is_fatal() {
        let pkg = package("util");
        let custom = option("totally_custom_option", Literal::Ident("true".to_string()), 3);
        let mut b = Builder::new("util.proto");
        b.package = Some(&pkg);
        b.package_options = vec![&custom];
        let err = b.handle_package().expect_err("unknown option");
        assert_eq!(
            err.to_string(),
            "util.proto:3:1: \"totally_custom_option\" is an unhandled proto file option"
        );
    }

    #[test]
    fn aggregate_value_for_file_option_is_fatal() {
        let pkg = package("util");
        let java = option(
            "java_package",
            Literal::Map(vec![LiteralField {
                name: "a".to_string(),
                value: Literal::String("b".to_string()),
            }]),
            5,
        );
        let mut b = Builder::new("util.proto");
        b.package = Some(&pkg);
        b.package_options = vec![&java];
        let err = b.handle_package().expect_err("aggregate value");
        assert_eq!(
            err.kind,
            TranslateErrorKind::NonScalarFileOption("java_package".to_string())
        );
        assert_eq!(err.location.position, Position::new(5, 1));
        assert!(b.imports_used.is_empty());
    }

    #[test]
    fn missing_package_is_fatal() {
        let mut b = Builder::new("util.proto");
        let err = b.handle_package().expect_err("no package");
        assert_eq!(err.kind, TranslateErrorKind::MissingPackage);
    }
}
