//! # Source Mutations
//!
//! Edits applied to a document's text. A mutation is validated against the
//! current syntax tree, turned into a [`TextEdit`], and spliced into the
//! source; the document then re-parses. Nodes are never patched in place.
//!
//! ### InsertMember
//! - Goes after the last constructor, else after the last field, else at
//!   the start of the class body (after enum constants for enums)
//! - Re-indented to the indentation of the class's members
//!
//! ### AddImport
//! - No-op when already imported, in the same package, or in `java.lang`
//! - Fails when the simple name is already bound to another class

use jsoncreator_parser::ast::{ClassKind, CompilationUnit, Member};
use jsoncreator_parser::{parse_member, reindent, Dialect};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Insert member declaration text into a class (`Outer.Inner` or simple name)
    InsertMember { class: String, text: String },

    /// Add a single-type import
    AddImport { path: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Invalid member text: {0}")]
    InvalidMember(String),

    #[error("Invalid import path: {0}")]
    InvalidImport(String),

    #[error("Import of {path} conflicts with {existing}")]
    ImportConflict { path: String, existing: String },
}

/// Replacement of a byte range of the source
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            text: text.into(),
        }
    }

    pub fn apply_to(&self, source: &mut String) {
        source.replace_range(self.range.clone(), &self.text);
    }
}

impl Mutation {
    /// Check the mutation can be applied to `unit`
    pub fn validate(&self, unit: &CompilationUnit, dialect: Dialect) -> Result<(), MutationError> {
        match self {
            Mutation::InsertMember { class, text } => {
                let id = unit
                    .find_class(class)
                    .ok_or_else(|| MutationError::ClassNotFound(class.clone()))?;
                let name = &unit.class(id).name;
                parse_member(text, name, dialect)
                    .map_err(|e| MutationError::InvalidMember(e.to_string()))?;
                Ok(())
            }
            Mutation::AddImport { path } => {
                let valid = path.split('.').count() >= 2
                    && path.split('.').all(|segment| {
                        let mut chars = segment.chars();
                        chars
                            .next()
                            .map(|c| c.is_alphabetic() || c == '_' || c == '$')
                            .unwrap_or(false)
                            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
                    });
                if !valid {
                    return Err(MutationError::InvalidImport(path.clone()));
                }
                Ok(())
            }
        }
    }

    /// Validate and compute the text edit. `None` means nothing to change.
    pub fn edit(
        &self,
        source: &str,
        unit: &CompilationUnit,
        dialect: Dialect,
    ) -> Result<Option<TextEdit>, MutationError> {
        self.validate(unit, dialect)?;

        match self {
            Mutation::InsertMember { class, text } => {
                insert_member_edit(source, unit, class, text).map(Some)
            }
            Mutation::AddImport { path } => add_import_edit(unit, path, dialect),
        }
    }
}

fn insert_member_edit(
    source: &str,
    unit: &CompilationUnit,
    class: &str,
    text: &str,
) -> Result<TextEdit, MutationError> {
    let id = unit
        .find_class(class)
        .ok_or_else(|| MutationError::ClassNotFound(class.to_string()))?;
    let decl = unit.class(id);

    let open = decl.body_span.start;
    let close = decl.body_span.end.saturating_sub(1);
    let class_indent = line_indent(source, decl.span.start).to_string();
    let member_indent = decl
        .members
        .first()
        .map(|m| m.span().start)
        .filter(|start| line_start(source, *start) > open)
        .map(|start| line_indent(source, start).to_string())
        .unwrap_or_else(|| format!("{}{}", class_indent, INDENT));
    let body = reindent(text.trim_end(), &member_indent);

    let anchor = decl
        .members
        .iter()
        .filter(|m| matches!(m, Member::Constructor(_)))
        .last()
        .or_else(|| {
            decl.members
                .iter()
                .filter(|m| matches!(m, Member::Field(_)))
                .last()
        })
        .map(|m| m.span().end);

    let (anchor, separator) = match anchor {
        Some(end) => (Some(end), ""),
        None if decl.kind == ClassKind::Enum => {
            match decl
                .members
                .iter()
                .filter(|m| matches!(m, Member::EnumConstant(_)))
                .last()
            {
                Some(constant) => {
                    let after = skip_constant_tail(source, constant.span().end, close);
                    if source[after..].starts_with(';') {
                        (Some(after + 1), "")
                    } else {
                        (Some(after), ";")
                    }
                }
                None => (None, ";"),
            }
        }
        None => (None, ""),
    };

    match anchor {
        Some(end) => {
            let rest_of_line = &source[end..close];
            if !rest_of_line.contains('\n') && rest_of_line.trim().is_empty() {
                // Closing brace shares the line: move it below the new member
                Ok(TextEdit {
                    range: end..close,
                    text: format!("{}\n\n{}\n{}", separator, body, class_indent),
                })
            } else {
                // Keep a blank line between the new member and the next one
                let trailer = if !rest_of_line.trim().is_empty() && !next_line_is_blank(source, end) {
                    "\n"
                } else {
                    ""
                };
                Ok(TextEdit::insert(end, format!("{}\n\n{}{}", separator, body, trailer)))
            }
        }
        None => {
            let inner = &source[open + 1..close];
            if inner.trim().is_empty() {
                Ok(TextEdit {
                    range: open + 1..close,
                    text: format!("\n{}{}\n{}", indent_separator(separator, &member_indent), body, class_indent),
                })
            } else {
                Ok(TextEdit::insert(
                    open + 1,
                    format!("\n{}{}\n", indent_separator(separator, &member_indent), body),
                ))
            }
        }
    }
}

fn next_line_is_blank(source: &str, offset: usize) -> bool {
    source[offset..]
        .split('\n')
        .nth(1)
        .map(|line| line.trim().is_empty())
        .unwrap_or(true)
}

/// An enum body without constants needs a lone `;` before members
fn indent_separator(separator: &str, indent: &str) -> String {
    if separator.is_empty() {
        String::new()
    } else {
        format!("{}{}\n", indent, separator)
    }
}

/// Position after an enum constant's trailing comma and whitespace
fn skip_constant_tail(source: &str, from: usize, limit: usize) -> usize {
    let mut pos = from;
    for (offset, c) in source[from..limit].char_indices() {
        if c.is_whitespace() || c == ',' {
            pos = from + offset + c.len_utf8();
        } else {
            break;
        }
    }
    // Keep the edit on the constant's line
    let trimmed = source[from..pos].trim_end_matches(char::is_whitespace);
    if source[pos..].starts_with(';') {
        pos
    } else {
        from + trimmed.len()
    }
}

fn add_import_edit(
    unit: &CompilationUnit,
    path: &str,
    dialect: Dialect,
) -> Result<Option<TextEdit>, MutationError> {
    let (package, simple) = path.rsplit_once('.').unwrap_or(("", path));

    if unit.has_import(path)
        || unit.package.as_deref() == Some(package)
        || package == "java.lang"
    {
        return Ok(None);
    }

    if let Some(existing) = unit
        .imports
        .iter()
        .find(|i| !i.is_static && !i.on_demand && i.path.rsplit('.').next() == Some(simple))
    {
        return Err(MutationError::ImportConflict {
            path: path.to_string(),
            existing: existing.path.clone(),
        });
    }
    if unit.top_level.iter().any(|id| unit.class(*id).name == simple) {
        return Err(MutationError::ImportConflict {
            path: path.to_string(),
            existing: unit.qualify(simple),
        });
    }

    let terminator = match dialect {
        Dialect::Java => ";",
        Dialect::Groovy => "",
    };
    let statement = format!("import {}{}", path, terminator);

    let edit = match unit.imports.last() {
        Some(last) => TextEdit::insert(last.span.end, format!("\n{}", statement)),
        None if unit.package.is_some() => {
            TextEdit::insert(unit.header_end, format!("\n\n{}", statement))
        }
        None => TextEdit::insert(0, format!("{}\n\n", statement)),
    };
    Ok(Some(edit))
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Leading whitespace of the line containing `offset`
fn line_indent(source: &str, offset: usize) -> &str {
    let start = line_start(source, offset);
    let line = &source[start..offset];
    let end = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsoncreator_parser::parse;

    fn apply(source: &str, mutation: Mutation) -> String {
        let unit = parse(source).unwrap();
        let mut out = source.to_string();
        if let Some(edit) = mutation.edit(source, &unit, Dialect::Java).unwrap() {
            edit.apply_to(&mut out);
        }
        out
    }

    fn insert(class: &str, text: &str) -> Mutation {
        Mutation::InsertMember {
            class: class.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_insert_after_last_field() {
        let source = "class Point {\n    int x;\n    int y;\n\n    int sum() { return x + y; }\n}\n";
        let out = apply(source, insert("Point", "Point() {\n}"));
        assert_eq!(
            out,
            "class Point {\n    int x;\n    int y;\n\n    Point() {\n    }\n\n    int sum() { return x + y; }\n}\n"
        );
    }

    #[test]
    fn test_insert_after_last_constructor() {
        let source = "class Point {\n  int x;\n  Point() {}\n  void m() {}\n}";
        let out = apply(source, insert("Point", "Point(int x) {\n    this.x = x;\n}"));
        assert_eq!(
            out,
            "class Point {\n  int x;\n  Point() {}\n\n  Point(int x) {\n      this.x = x;\n  }\n\n  void m() {}\n}"
        );
    }

    #[test]
    fn test_insert_before_following_member_keeps_blank_line() {
        let source = "abstract class C {\n    int x;\n    abstract void f();\n}\n";
        let out = apply(source, insert("C", "C() {\n}"));
        assert_eq!(
            out,
            "abstract class C {\n    int x;\n\n    C() {\n    }\n\n    abstract void f();\n}\n"
        );
    }

    #[test]
    fn test_insert_into_empty_body() {
        let out = apply("class Empty { }", insert("Empty", "Empty() {\n}"));
        assert_eq!(out, "class Empty {\n    Empty() {\n    }\n}");
    }

    #[test]
    fn test_insert_when_brace_shares_line() {
        let out = apply("class A { int x; }", insert("A", "A() {\n}"));
        assert_eq!(out, "class A { int x;\n\n    A() {\n    }\n}");
        assert!(parse(&out).is_ok());
    }

    #[test]
    fn test_insert_into_nested_class() {
        let source = "class Outer {\n    static class Inner {\n        int x;\n    }\n}";
        let out = apply(source, insert("Outer.Inner", "Inner() {\n}"));
        assert!(out.contains("        int x;\n\n        Inner() {\n        }\n    }"));
    }

    #[test]
    fn test_insert_into_enum_without_fields() {
        let out = apply(
            "enum Color {\n    RED, GREEN\n}",
            insert("Color", "Color() {\n}"),
        );
        assert_eq!(out, "enum Color {\n    RED, GREEN;\n\n    Color() {\n    }\n}");
        assert!(parse(&out).is_ok());
    }

    #[test]
    fn test_insert_validates_text_and_class() {
        let unit = parse("class A {}").unwrap();
        let err = insert("A", "not a member(")
            .validate(&unit, Dialect::Java)
            .unwrap_err();
        assert!(matches!(err, MutationError::InvalidMember(_)));

        let err = insert("B", "B() {}").validate(&unit, Dialect::Java).unwrap_err();
        assert_eq!(err, MutationError::ClassNotFound("B".to_string()));
    }

    #[test]
    fn test_add_import_after_existing() {
        let source = "package a;\n\nimport java.util.List;\n\nclass A {}";
        let out = apply(
            source,
            Mutation::AddImport {
                path: "com.fasterxml.jackson.annotation.JsonCreator".to_string(),
            },
        );
        assert_eq!(
            out,
            "package a;\n\nimport java.util.List;\nimport com.fasterxml.jackson.annotation.JsonCreator;\n\nclass A {}"
        );
    }

    #[test]
    fn test_add_import_after_package_or_at_top() {
        let out = apply(
            "package a;\n\nclass A {}",
            Mutation::AddImport { path: "b.B".to_string() },
        );
        assert_eq!(out, "package a;\n\nimport b.B;\n\nclass A {}");

        let out = apply("class A {}", Mutation::AddImport { path: "b.B".to_string() });
        assert_eq!(out, "import b.B;\n\nclass A {}");
    }

    #[test]
    fn test_add_import_noops() {
        let source = "package a;\nimport b.*;\nclass A {}";
        for path in ["b.B", "a.Other", "java.lang.String"] {
            assert_eq!(
                apply(source, Mutation::AddImport { path: path.to_string() }),
                source
            );
        }
    }

    #[test]
    fn test_add_import_conflict() {
        let unit = parse("import x.JsonCreator;\nclass A {}").unwrap();
        let err = Mutation::AddImport {
            path: "y.JsonCreator".to_string(),
        }
        .edit("", &unit, Dialect::Java)
        .unwrap_err();
        assert!(matches!(err, MutationError::ImportConflict { .. }));

        let err = Mutation::AddImport { path: "Nope".to_string() }
            .validate(&unit, Dialect::Java)
            .unwrap_err();
        assert!(matches!(err, MutationError::InvalidImport(_)));
    }
}
