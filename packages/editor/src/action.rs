//! The "generate JSON creator" action: pick members of a class, synthesize
//! `@JsonCreator` constructors and insert them with their imports.

use crate::document::Document;
use crate::mutations::Mutation;
use crate::EditorError;
use jsoncreator_generator::{
    ClassDescriptor, ClassIndex, ConstructorPrototype, ConstructorSynthesizer, GeneratorOptions,
    MemberDescriptor, TargetSyntax,
};
use jsoncreator_parser::ast::{
    ClassDecl, ClassKind, CompilationUnit, MethodDecl, TypeArg, TypeRef, WildcardBound,
};
use jsoncreator_parser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ActionOutcome {
    Inserted {
        class: String,
        constructors: Vec<String>,
        imports: Vec<String>,
    },
    /// Every generated constructor already exists
    NothingToGenerate,
}

pub struct JsonCreatorAction {
    options: GeneratorOptions,
}

impl JsonCreatorAction {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Classes and enums only; interfaces, annotation types and records have
    /// no constructor to generate. Anonymous classes never reach the syntax
    /// tree as declarations.
    pub fn is_valid_for_class(class: &ClassDecl) -> bool {
        matches!(class.kind, ClassKind::Class | ClassKind::Enum)
    }

    /// Descriptor of a class in `document`, superclass resolved through `index`
    pub fn describe(
        &self,
        document: &Document,
        index: &ClassIndex,
        class: &str,
    ) -> Result<ClassDescriptor, EditorError> {
        let unit = document.unit();
        let id = unit
            .find_class(class)
            .ok_or_else(|| EditorError::ClassNotFound(class.to_string()))?;
        let decl = unit.class(id);
        if !Self::is_valid_for_class(decl) {
            return Err(EditorError::InvalidTarget(format!(
                "{:?} {}",
                decl.kind, decl.name
            )));
        }
        Ok(index.describe(unit, id)?)
    }

    /// Members offered for selection: accessible superclass constructors
    /// (unless the superclass is `java.lang.Object`), then instance fields
    /// that are not both final and initialized
    pub fn candidates(
        &self,
        document: &Document,
        index: &ClassIndex,
        class: &str,
    ) -> Result<Vec<MemberDescriptor>, EditorError> {
        Ok(self.describe(document, index, class)?.members)
    }

    /// Generate constructors for `selection` and insert them into `document`.
    /// Either every constructor and import is inserted or the document is
    /// left untouched.
    #[instrument(skip(self, document, index, selection), fields(path = %document.path.display(), class = class))]
    pub fn perform(
        &self,
        document: &mut Document,
        index: &ClassIndex,
        class: &str,
        selection: &[MemberDescriptor],
    ) -> Result<ActionOutcome, EditorError> {
        let descriptor = self.describe(document, index, class)?;

        let options = GeneratorOptions {
            target: TargetSyntax::from(document.dialect),
            ..self.options.clone()
        };
        let prototypes = ConstructorSynthesizer::new(options).generate(&descriptor, selection)?;
        if prototypes.is_empty() {
            info!("nothing to generate");
            return Ok(ActionOutcome::NothingToGenerate);
        }

        let mut imports: Vec<String> = Vec::new();
        let mut texts = Vec::with_capacity(prototypes.len());
        let mut signatures = Vec::with_capacity(prototypes.len());
        for prototype in &prototypes {
            let (declaration, needed) = shorten_references(document.unit(), prototype);
            for import in needed {
                if !imports.contains(&import) {
                    imports.push(import);
                }
            }
            texts.push(Serializer::new(document.dialect).serialize_method(&declaration));
            signatures.push(signature_label(&declaration));
        }

        let mut mutations: Vec<Mutation> = imports
            .iter()
            .map(|path| Mutation::AddImport { path: path.clone() })
            .collect();
        mutations.extend(texts.into_iter().map(|text| Mutation::InsertMember {
            class: class.to_string(),
            text,
        }));
        document.apply_all(mutations)?;

        info!(constructors = signatures.len(), imports = imports.len(), "inserted JSON creators");
        Ok(ActionOutcome::Inserted {
            class: descriptor.name,
            constructors: signatures,
            imports,
        })
    }
}

impl Default for JsonCreatorAction {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

/// Replace package-qualified annotation and type names with their short form
/// where that name is free in `unit`, returning the imports that makes
/// necessary
fn shorten_references(unit: &CompilationUnit, prototype: &ConstructorPrototype) -> (MethodDecl, Vec<String>) {
    let mut declaration = prototype.declaration.clone();
    let mut imports: Vec<String> = Vec::new();

    let mut shorten = |name: &mut String| {
        if let Some((short, import)) = short_name(unit, name) {
            if let Some(import) = import {
                if !imports.contains(&import) {
                    imports.push(import);
                }
            }
            *name = short;
        }
    };

    for annotation in &mut declaration.modifiers.annotations {
        shorten(&mut annotation.name);
    }
    for type_param in &mut declaration.type_params {
        for bound in &mut type_param.bounds {
            shorten_type(bound, &mut shorten);
        }
    }
    for param in &mut declaration.params {
        for annotation in &mut param.modifiers.annotations {
            shorten(&mut annotation.name);
        }
        shorten_type(&mut param.ty, &mut shorten);
    }
    for thrown in &mut declaration.throws {
        shorten_type(thrown, &mut shorten);
    }

    (declaration, imports)
}

fn shorten_type(ty: &mut TypeRef, shorten: &mut impl FnMut(&mut String)) {
    shorten(&mut ty.name);
    for arg in &mut ty.args {
        match arg {
            TypeArg::Type(t)
            | TypeArg::Wildcard(Some(WildcardBound::Extends(t)))
            | TypeArg::Wildcard(Some(WildcardBound::Super(t))) => shorten_type(t, shorten),
            TypeArg::Wildcard(None) => {}
        }
    }
}

/// Short form of a package-qualified name as seen from `unit`, with the
/// import it needs. `None` keeps the name as written.
fn short_name(unit: &CompilationUnit, name: &str) -> Option<(String, Option<String>)> {
    let segments: Vec<&str> = name.split('.').collect();
    let top = segments
        .iter()
        .position(|segment| segment.starts_with(|c: char| c.is_uppercase()))?;
    if top == 0 {
        return None;
    }

    let package = segments[..top].join(".");
    let top_level = segments[top];
    let import = format!("{}.{}", package, top_level);

    let bound_elsewhere = unit.imports.iter().any(|i| {
        !i.is_static && !i.on_demand && i.path != import && i.path.rsplit('.').next() == Some(top_level)
    }) || unit
        .class_paths()
        .iter()
        .any(|(id, path)| unit.class(*id).name == top_level && unit.qualify(path) != import);
    if bound_elsewhere {
        return None;
    }

    let needs_import = unit.package.as_deref() != Some(package.as_str())
        && package != "java.lang"
        && !unit.has_import(&import);
    Some((segments[top..].join("."), needs_import.then_some(import)))
}

fn signature_label(declaration: &MethodDecl) -> String {
    let params: Vec<String> = declaration
        .params
        .iter()
        .map(|p| {
            if p.varargs {
                format!("{}... {}", p.ty, p.name)
            } else {
                format!("{} {}", p.ty, p.name)
            }
        })
        .collect();
    format!("{}({})", declaration.name, params.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsoncreator_parser::parse;

    #[test]
    fn test_validity_by_kind() {
        let unit = parse(
            "class A {} enum B { X } interface C {} @interface D {} record E(int x) {}",
        )
        .unwrap();
        let valid: Vec<bool> = unit
            .top_level
            .iter()
            .map(|id| JsonCreatorAction::is_valid_for_class(unit.class(*id)))
            .collect();
        assert_eq!(valid, vec![true, true, false, false, false]);
    }

    #[test]
    fn test_shorten_keeps_conflicting_names_qualified() {
        let unit = parse("import org.example.JsonProperty;\nclass A { int x; }").unwrap();
        let class = ClassIndex::new().describe(&unit, unit.top_level[0]).unwrap();
        let prototypes = jsoncreator_generator::generate(&class, &class.members).unwrap();

        let (declaration, imports) = shorten_references(&unit, &prototypes[0]);
        assert_eq!(declaration.modifiers.annotations[0].name, "JsonCreator");
        assert_eq!(
            declaration.params[0].modifiers.annotations[0].name,
            "com.fasterxml.jackson.annotation.JsonProperty"
        );
        assert_eq!(imports, vec!["com.fasterxml.jackson.annotation.JsonCreator"]);
    }

    #[test]
    fn test_short_name_of_types() {
        let unit = parse(
            "package com.example;\nimport java.util.*;\nimport org.other.Address;\nclass Child {}",
        )
        .unwrap();

        assert_eq!(
            short_name(&unit, "java.util.Map.Entry"),
            Some(("Map.Entry".to_string(), None))
        );
        assert_eq!(
            short_name(&unit, "java.io.IOException"),
            Some(("IOException".to_string(), Some("java.io.IOException".to_string())))
        );
        assert_eq!(
            short_name(&unit, "com.example.Child.Inner"),
            Some(("Child.Inner".to_string(), None))
        );
        assert_eq!(short_name(&unit, "java.lang.String"), Some(("String".to_string(), None)));
        // Simple name taken by another import or a class of this file
        assert_eq!(short_name(&unit, "com.base.Address"), None);
        assert_eq!(short_name(&unit, "com.base.Child"), None);
        assert_eq!(short_name(&unit, "Base.Options"), None);
        assert_eq!(short_name(&unit, "T"), None);
    }
}
