//! Go source generation for merged enumerations.
//!
//! Uses the `std::fmt::Write` trait over a pre-allocated buffer. Each
//! enumeration gets:
//! - an unexported slice of its members
//! - `<Enum>Values()`, returning a copy of that slice
//! - `IsValid()` and `Validate()` methods, the latter wrapping a sentinel error
//! - `Base()` converting to the underlying type, when that is a predeclared
//!   basic type

use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;
use std::str::FromStr;

use crate::enums::{EnumDefinition, MergedEnum, PackageGroup};
use crate::error::{EnumgenError, EnumgenResult};
use crate::symbols::is_basic_type;
use crate::syntax::lexer::Keyword;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by enumgen. DO NOT EDIT.";

/// How enumerations are spread over generated files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One file per enumeration
    #[default]
    Enum,
    /// One file per package
    Package,
}

impl FromStr for Granularity {
    type Err = EnumgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enum" => Ok(Self::Enum),
            "package" => Ok(Self::Package),
            other => Err(EnumgenError::invalid_argument(format!(
                "unknown granularity {:?} (expected \"enum\" or \"package\")",
                other
            ))),
        }
    }
}

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

/// Whether `name` is a valid Go identifier.
pub fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && Keyword::from_ident(name).is_none()
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

fn file_suffix(package: &str, is_test: bool) -> &'static str {
    match (package.ends_with("_test"), is_test) {
        (true, _) => "_x_test",
        (false, true) => "_test",
        (false, false) => "",
    }
}

/// `enumgen_<Enum>[_x][_test].go`; `_x` marks an external test package.
pub fn enum_file_name(definition: &EnumDefinition) -> String {
    format!(
        "enumgen_{}{}.go",
        definition.name,
        file_suffix(&definition.package, definition.is_test)
    )
}

/// `enumgen[_x][_test].go`.
pub fn package_file_name(package: &str, is_test: bool) -> String {
    format!("enumgen{}.go", file_suffix(package, is_test))
}

fn check_package(package: &str) -> EnumgenResult<()> {
    if is_go_identifier(package) && package != "_" {
        Ok(())
    } else {
        Err(EnumgenError::render(
            package,
            "package name is not a valid Go identifier",
        ))
    }
}

fn check_enum(merged: &MergedEnum) -> EnumgenResult<()> {
    let def = &merged.definition;
    if def.name.is_empty() {
        return Err(EnumgenError::render(
            format!("{}.<empty>", def.package),
            "empty enumeration name",
        ));
    }
    if !is_go_identifier(&def.name) {
        return Err(EnumgenError::render(&def.name, "not a valid Go identifier"));
    }
    if let Some(bad) = merged.members.iter().find(|m| !is_go_identifier(m)) {
        return Err(EnumgenError::render(
            &def.name,
            format!("member {:?} is not a valid Go identifier", bad),
        ));
    }
    Ok(())
}

/// Renders one file for one enumeration.
pub fn render_enum(merged: &MergedEnum) -> EnumgenResult<GeneratedFile> {
    let def = &merged.definition;
    check_package(&def.package)?;
    check_enum(merged)?;

    let mut out = String::with_capacity(1024 + merged.members.len() * 32);
    write_file(&mut out, &def.package, std::slice::from_ref(&merged))
        .map_err(|e| EnumgenError::render(&def.name, e.to_string()))?;

    Ok(GeneratedFile {
        path: def.dir.join(enum_file_name(def)),
        content: out,
    })
}

/// Renders one file holding every enumeration of a package.
pub fn render_package(group: &PackageGroup<'_>) -> EnumgenResult<GeneratedFile> {
    check_package(&group.package)?;
    for merged in &group.enums {
        check_enum(merged)?;
    }

    let members: usize = group.enums.iter().map(|e| e.members.len()).sum();
    let mut out = String::with_capacity(1024 * group.enums.len() + members * 32);
    write_file(&mut out, &group.package, &group.enums)
        .map_err(|e| EnumgenError::render(&group.package, e.to_string()))?;

    Ok(GeneratedFile {
        path: group
            .dir
            .join(package_file_name(&group.package, group.is_test)),
        content: out,
    })
}

fn write_file(out: &mut String, package: &str, enums: &[&MergedEnum]) -> std::fmt::Result {
    writeln!(out, "{}", GENERATED_HEADER)?;
    writeln!(out)?;
    writeln!(out, "package {}", package)?;
    writeln!(out)?;
    writeln!(out, "import (")?;
    writeln!(out, "\t\"errors\"")?;
    writeln!(out, "\t\"fmt\"")?;
    writeln!(out, ")")?;

    for merged in enums {
        writeln!(out)?;
        write_enum(out, merged)?;
    }
    Ok(())
}

fn write_enum(out: &mut String, merged: &MergedEnum) -> std::fmt::Result {
    let name = &merged.definition.name;
    let base = &merged.definition.base_type;
    let exported = is_exported(name);
    let values_var = format!("_{}_values", name);
    let sentinel = if exported {
        format!("ErrInvalid{}", name)
    } else {
        format!("errInvalid{}", name)
    };

    writeln!(
        out,
        "// {} is wrapped by {}.Validate for values outside the enumeration.",
        sentinel, name
    )?;
    writeln!(
        out,
        "var {} = errors.New(\"invalid {} value\")",
        sentinel, name
    )?;
    writeln!(out)?;

    if merged.members.is_empty() {
        writeln!(out, "var {} = []{}{{}}", values_var, name)?;
    } else {
        writeln!(out, "var {} = []{}{{", values_var, name)?;
        for member in &merged.members {
            writeln!(out, "\t{},", member)?;
        }
        writeln!(out, "}}")?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "// {}Values returns the declared {} values in name order.",
        name, name
    )?;
    writeln!(out, "func {}Values() []{} {{", name, name)?;
    writeln!(out, "\treturn append([]{}(nil), {}...)", name, values_var)?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "// IsValid reports whether e is a declared {} value.",
        name
    )?;
    writeln!(out, "func (e {}) IsValid() bool {{", name)?;
    writeln!(out, "\tfor _, v := range {} {{", values_var)?;
    writeln!(out, "\t\tif v == e {{")?;
    writeln!(out, "\t\t\treturn true")?;
    writeln!(out, "\t\t}}")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\treturn false")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "// Validate returns an error wrapping {} if e is not a declared value.",
        sentinel
    )?;
    writeln!(out, "func (e {}) Validate() error {{", name)?;
    writeln!(out, "\tif e.IsValid() {{")?;
    writeln!(out, "\t\treturn nil")?;
    writeln!(out, "\t}}")?;
    writeln!(
        out,
        "\treturn fmt.Errorf(\"%w: %v\", {}, {}(e))",
        sentinel,
        base_or_self(name, base)
    )?;
    writeln!(out, "}}")?;

    if is_basic_type(base) {
        writeln!(out)?;
        writeln!(out, "// Base returns e as its underlying {}.", base)?;
        writeln!(out, "func (e {}) Base() {} {{", name, base)?;
        writeln!(out, "\treturn {}(e)", base)?;
        writeln!(out, "}}")?;
    }
    Ok(())
}

/// Type an invalid value is converted to before formatting.
fn base_or_self<'a>(name: &'a str, base: &'a str) -> &'a str {
    if is_basic_type(base) {
        base
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::merge;
    use std::path::Path;

    fn merged(name: &str, base: &str, package: &str, is_test: bool, members: &[&str]) -> MergedEnum {
        MergedEnum {
            definition: EnumDefinition {
                name: name.to_string(),
                base_type: base.to_string(),
                package: package.to_string(),
                dir: PathBuf::from("/src/pkg"),
                is_test,
            },
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_file_names() {
        let e = merged("StatusEnum", "string", "pkg", false, &[]);
        assert_eq!(enum_file_name(&e.definition), "enumgen_StatusEnum.go");
        let e = merged("StatusEnum", "string", "pkg", true, &[]);
        assert_eq!(enum_file_name(&e.definition), "enumgen_StatusEnum_test.go");
        let e = merged("StatusEnum", "string", "pkg_test", true, &[]);
        assert_eq!(enum_file_name(&e.definition), "enumgen_StatusEnum_x_test.go");
        assert_eq!(package_file_name("pkg", false), "enumgen.go");
        assert_eq!(package_file_name("pkg_test", true), "enumgen_x_test.go");
    }

    #[test]
    fn test_render_enum_content() {
        let e = merged(
            "StatusEnum",
            "string",
            "pkg",
            false,
            &["Active", "Inactive", "Suspended"],
        );
        let file = render_enum(&e).unwrap();
        assert_eq!(file.path, Path::new("/src/pkg/enumgen_StatusEnum.go"));

        let content = &file.content;
        assert!(content.starts_with(GENERATED_HEADER));
        assert!(content.contains("\npackage pkg\n"));
        assert!(content.contains("var _StatusEnum_values = []StatusEnum{\n\tActive,\n\tInactive,\n\tSuspended,\n}\n"));
        assert!(content.contains("func StatusEnumValues() []StatusEnum {"));
        assert!(content.contains("func (e StatusEnum) IsValid() bool {"));
        assert!(content.contains("func (e StatusEnum) Validate() error {"));
        assert!(content.contains("var ErrInvalidStatusEnum = errors.New(\"invalid StatusEnum value\")"));
        assert!(content.contains("func (e StatusEnum) Base() string {"));
        assert!(content.contains("fmt.Errorf(\"%w: %v\", ErrInvalidStatusEnum, string(e))"));
    }

    #[test]
    fn test_unexported_and_non_basic() {
        let e = merged("timeoutEnum", "time.Duration", "pkg", false, &["short"]);
        let content = render_enum(&e).unwrap().content;
        assert!(content.contains("var errInvalidtimeoutEnum = "));
        assert!(content.contains("func timeoutEnumValues() []timeoutEnum {"));
        assert!(!content.contains("Base()"));
        assert!(content.contains("errInvalidtimeoutEnum, timeoutEnum(e))"));
    }

    #[test]
    fn test_render_errors() {
        let e = merged("", "int", "pkg", false, &["A"]);
        assert!(matches!(render_enum(&e), Err(EnumgenError::Render { .. })));

        let e = merged("ColorEnum", "int", "my-pkg", false, &["Red"]);
        assert!(matches!(render_enum(&e), Err(EnumgenError::Render { .. })));

        let e = merged("ColorEnum", "int", "func", false, &["Red"]);
        assert!(render_enum(&e).is_err());
    }

    #[test]
    fn test_render_package() {
        let mapping = merge(vec![
            (merged("BEnum", "int", "pkg", false, &[]).definition, "B1".to_string()),
            (merged("AEnum", "uint8", "pkg", false, &[]).definition, "A1".to_string()),
        ]);
        let groups = mapping.packages();
        assert_eq!(groups.len(), 1);

        let file = render_package(&groups[0]).unwrap();
        assert_eq!(file.path, Path::new("/src/pkg/enumgen.go"));
        assert_eq!(file.content.matches("import (").count(), 1);
        let a = file.content.find("func AEnumValues").unwrap();
        let b = file.content.find("func BEnumValues").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("enum".parse::<Granularity>().unwrap(), Granularity::Enum);
        assert_eq!("package".parse::<Granularity>().unwrap(), Granularity::Package);
        assert!("file".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_is_go_identifier() {
        assert!(is_go_identifier("pkg1"));
        assert!(is_go_identifier("_x"));
        assert!(!is_go_identifier("1pkg"));
        assert!(!is_go_identifier("type"));
        assert!(!is_go_identifier(""));
    }
}
