use crate::error::{GenerateError, GenerateResult};
use crate::library;
use crate::model::*;
use jsoncreator_parser::ast::{
    ClassDecl, ClassId, ClassKind, CompilationUnit, FieldDecl, Modifiers, TypeArg, TypeParam,
    TypeRef, Visibility, WildcardBound,
};
use std::collections::HashMap;
use tracing::debug;

/// Simple names of annotations that mark a value as never null
pub const NOT_NULL_ANNOTATIONS: &[&str] = &["NotNull", "Nonnull", "NonNull"];
/// Simple names of annotations that mark a value as possibly null
pub const NULLABLE_ANNOTATIONS: &[&str] = &["Nullable", "CheckForNull"];

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

pub fn nullability(modifiers: &Modifiers) -> Nullability {
    for annotation in &modifiers.annotations {
        let name = annotation.simple_name();
        if NOT_NULL_ANNOTATIONS.contains(&name) {
            return Nullability::NotNull;
        }
        if NULLABLE_ANNOTATIONS.contains(&name) {
            return Nullability::Nullable;
        }
    }
    Nullability::Unknown
}

/// Classes from a set of parsed source files, looked up by qualified or
/// simple name when resolving `extends` clauses.
#[derive(Debug, Default)]
pub struct ClassIndex {
    units: Vec<CompilationUnit>,
    by_qualified: HashMap<String, (usize, ClassId)>,
    by_simple: HashMap<String, Vec<(usize, ClassId)>>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: impl IntoIterator<Item = CompilationUnit>) -> Self {
        let mut index = Self::new();
        for unit in units {
            index.add(unit);
        }
        index
    }

    pub fn add(&mut self, unit: CompilationUnit) {
        let unit_idx = self.units.len();
        for (id, path) in unit.class_paths() {
            let qualified = unit.qualify(&path);
            self.by_simple
                .entry(unit.class(id).name.clone())
                .or_default()
                .push((unit_idx, id));
            self.by_qualified.insert(qualified, (unit_idx, id));
        }
        self.units.push(unit);
    }

    /// Number of indexed classes
    pub fn len(&self) -> usize {
        self.by_qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_qualified.is_empty()
    }

    pub fn lookup(&self, qualified_name: &str) -> Option<(&CompilationUnit, ClassId)> {
        self.by_qualified
            .get(qualified_name)
            .map(|(unit, id)| (&self.units[*unit], *id))
    }

    fn lookup_simple(&self, simple_name: &str) -> Option<(&CompilationUnit, ClassId)> {
        match self.by_simple.get(simple_name).map(|v| v.as_slice()) {
            Some([(unit, id)]) => Some((&self.units[*unit], *id)),
            _ => None,
        }
    }

    /// Build the descriptor of `class` in `unit`.
    ///
    /// `unit` does not need to be indexed; classes in it take precedence
    /// over indexed ones when resolving the superclass.
    pub fn describe(&self, unit: &CompilationUnit, class: ClassId) -> GenerateResult<ClassDescriptor> {
        let decl = unit
            .classes
            .get(class.0)
            .ok_or_else(|| GenerateError::InvalidTarget(format!("no class with id {}", class.0)))?;
        let path = class_path(unit, class).unwrap_or_else(|| decl.name.clone());

        let superclass = self.resolve_superclass(unit, class);
        let mut members = Vec::new();

        if let Some(superclass) = &superclass {
            if !superclass.is_object() {
                let same_package = package_of(&superclass.qualified_name) == unit.package.as_deref();
                for ctor in &superclass.constructors {
                    let accessible = match ctor.visibility {
                        Visibility::Private => false,
                        Visibility::Package => same_package,
                        _ => true,
                    };
                    if accessible {
                        members.push(MemberDescriptor::BaseConstructor(ctor.clone()));
                    }
                }
            }
        }

        for field in decl.fields() {
            let descriptor = describe_field(field);
            if descriptor.is_static || (descriptor.is_final && descriptor.initialized) {
                continue;
            }
            members.push(MemberDescriptor::Field(descriptor));
        }

        Ok(ClassDescriptor {
            name: decl.name.clone(),
            qualified_name: unit.qualify(&path),
            kind: decl.kind,
            visibility: decl.modifiers.visibility(),
            type_params: decl.type_params.clone(),
            superclass,
            existing_constructors: decl.constructors().map(Signature::of).collect(),
            members,
        })
    }

    /// Superclass as seen from `class`: `java.lang.Enum` for enums,
    /// `java.lang.Object` without an `extends` clause, `None` for
    /// interfaces, annotation types and records.
    pub fn resolve_superclass(&self, unit: &CompilationUnit, class: ClassId) -> Option<SuperclassRef> {
        let decl = unit.classes.get(class.0)?;
        match decl.kind {
            ClassKind::Enum => {
                let mut base = library::lookup(JAVA_LANG_ENUM)?;
                base.type_args = vec![TypeArg::Type(TypeRef::simple(decl.name.clone()))];
                Some(base)
            }
            ClassKind::Class => match &decl.extends {
                Some(extends) => Some(self.resolve_type(unit, class, extends)),
                None => library::lookup(JAVA_LANG_OBJECT),
            },
            ClassKind::Interface | ClassKind::Annotation | ClassKind::Record => None,
        }
    }

    fn resolve_type(&self, unit: &CompilationUnit, from: ClassId, ty: &TypeRef) -> SuperclassRef {
        let name = ty.name.as_str();
        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };

        // Same file
        if let Some(id) = unit.find_class(name).filter(|id| *id != from) {
            if let Some(path) = class_path(unit, id) {
                debug!(superclass = name, "resolved in same file");
                return self.superclass_from_source(unit, id, &path, ty);
            }
        }

        let mut candidates = Vec::new();
        for import in unit.imports.iter().filter(|i| !i.is_static) {
            if !import.on_demand && simple_of(&import.path) == first {
                candidates.push(match rest {
                    Some(rest) => format!("{}.{}", import.path, rest),
                    None => import.path.clone(),
                });
            }
        }
        if let Some(package) = &unit.package {
            candidates.push(format!("{}.{}", package, name));
        }
        candidates.push(name.to_string());
        for import in unit.imports.iter().filter(|i| !i.is_static && i.on_demand) {
            candidates.push(format!("{}.{}", import.path, name));
        }

        for candidate in &candidates {
            if let Some((owner, id)) = self.lookup(candidate) {
                debug!(superclass = %candidate, "resolved in index");
                let path = class_path(owner, id).unwrap_or_else(|| owner.class(id).name.clone());
                return self.superclass_from_source(owner, id, &path, ty);
            }
        }

        if rest.is_none() || name.starts_with("java.lang.") {
            if let Some(mut base) = library::lookup(name) {
                debug!(superclass = %base.qualified_name, "resolved from built-in library");
                base.type_args = ty.args.clone();
                return base;
            }
        }

        if let Some((owner, id)) = self.lookup_simple(ty.simple_name()) {
            let path = class_path(owner, id).unwrap_or_else(|| owner.class(id).name.clone());
            debug!(superclass = name, "resolved by simple name");
            return self.superclass_from_source(owner, id, &path, ty);
        }

        let qualified = candidates.into_iter().next().unwrap_or_else(|| name.to_string());
        debug!(superclass = %qualified, "superclass not found, no constructors known");
        SuperclassRef::unresolved(qualified, ty.args.clone())
    }
}

/// Rewrites type names as written in one file to names that mean the same
/// thing in any file: classes of that file, its single-type imports, its
/// package and its on-demand imports (as far as the index knows them) are
/// qualified. Primitives, type variables and `java.lang` names stay as is.
struct TypeQualifier<'a> {
    index: &'a ClassIndex,
    unit: &'a CompilationUnit,
    variables: Vec<String>,
}

impl TypeQualifier<'_> {
    fn with_variables<'p>(&self, params: impl IntoIterator<Item = &'p TypeParam>) -> Self {
        let mut variables = self.variables.clone();
        variables.extend(params.into_iter().map(|p| p.name.clone()));
        TypeQualifier {
            index: self.index,
            unit: self.unit,
            variables,
        }
    }

    fn qualify(&self, ty: &TypeRef) -> TypeRef {
        TypeRef {
            name: self.qualify_name(&ty.name),
            args: ty.args.iter().map(|arg| self.qualify_arg(arg)).collect(),
            array_dims: ty.array_dims,
        }
    }

    fn qualify_arg(&self, arg: &TypeArg) -> TypeArg {
        match arg {
            TypeArg::Type(t) => TypeArg::Type(self.qualify(t)),
            TypeArg::Wildcard(None) => TypeArg::Wildcard(None),
            TypeArg::Wildcard(Some(WildcardBound::Extends(t))) => {
                TypeArg::Wildcard(Some(WildcardBound::Extends(self.qualify(t))))
            }
            TypeArg::Wildcard(Some(WildcardBound::Super(t))) => {
                TypeArg::Wildcard(Some(WildcardBound::Super(self.qualify(t))))
            }
        }
    }

    fn qualify_params(&self, params: &[TypeParam]) -> Vec<TypeParam> {
        params
            .iter()
            .map(|param| TypeParam {
                name: param.name.clone(),
                bounds: param.bounds.iter().map(|b| self.qualify(b)).collect(),
            })
            .collect()
    }

    fn qualify_name(&self, name: &str) -> String {
        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        let join = |head: String| match rest {
            Some(rest) => format!("{}.{}", head, rest),
            None => head,
        };

        if PRIMITIVES.contains(&name) || self.variables.iter().any(|v| v == name) {
            return name.to_string();
        }
        // Already package-qualified
        if rest.is_some() && first.starts_with(|c: char| c.is_lowercase()) {
            return name.to_string();
        }

        if let Some(path) = self.unit.find_class(first).and_then(|id| class_path(self.unit, id)) {
            return join(self.unit.qualify(&path));
        }

        let unit = self.unit;
        if let Some(import) = unit
            .imports
            .iter()
            .find(|i| !i.is_static && !i.on_demand && simple_of(&i.path) == first)
        {
            return join(import.path.clone());
        }

        let mut candidates = Vec::new();
        if let Some(package) = &unit.package {
            candidates.push(format!("{}.{}", package, first));
        }
        for import in unit.imports.iter().filter(|i| !i.is_static && i.on_demand) {
            candidates.push(format!("{}.{}", import.path, first));
        }
        match candidates.into_iter().find(|c| self.index.lookup(c).is_some()) {
            Some(qualified) => join(qualified),
            None => name.to_string(),
        }
    }
}

impl ClassIndex {
    /// Superclass declared in source. Constructor types are qualified
    /// against the declaring file so they survive being copied elsewhere.
    fn superclass_from_source(
        &self,
        unit: &CompilationUnit,
        id: ClassId,
        path: &str,
        ty: &TypeRef,
    ) -> SuperclassRef {
        let decl: &ClassDecl = unit.class(id);
        let qualifier = TypeQualifier {
            index: self,
            unit,
            variables: Vec::new(),
        }
        .with_variables(&decl.type_params);

        let constructors = decl
            .constructors()
            .map(|ctor| {
                let scoped = qualifier.with_variables(&ctor.type_params);
                let mut base = BaseConstructor::from_decl(ctor);
                for param in &mut base.params {
                    param.ty = scoped.qualify(&param.ty);
                }
                base.throws = base.throws.iter().map(|t| scoped.qualify(t)).collect();
                base.type_params = scoped.qualify_params(&base.type_params);
                base
            })
            .collect();

        SuperclassRef {
            qualified_name: unit.qualify(path),
            type_args: ty.args.clone(),
            type_params: qualifier.qualify_params(&decl.type_params),
            constructors,
        }
    }
}

fn describe_field(field: &FieldDecl) -> FieldDescriptor {
    FieldDescriptor {
        name: field.name.clone(),
        ty: field.ty.clone(),
        nullability: nullability(&field.modifiers),
        annotations: field.modifiers.annotations.clone(),
        is_static: field.modifiers.has("static"),
        is_final: field.modifiers.has("final"),
        initialized: field.initializer.is_some(),
    }
}

fn class_path(unit: &CompilationUnit, id: ClassId) -> Option<String> {
    unit.class_paths()
        .into_iter()
        .find(|(candidate, _)| *candidate == id)
        .map(|(_, path)| path)
}

fn simple_of(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Package part of a qualified name, assuming lowercase package segments
fn package_of(qualified: &str) -> Option<&str> {
    let mut end = None;
    let mut offset = 0;
    for segment in qualified.split('.') {
        if segment.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
            break;
        }
        offset += segment.len();
        end = Some(offset);
        offset += 1;
    }
    end.map(|end| &qualified[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsoncreator_parser::parse;

    #[test]
    fn test_describe_fields_and_nullability() {
        let unit = parse(
            r#"
            package com.example;
            public class Point {
                private static final int ORIGIN = 0;
                private final String id = "p";
                @NotNull private final String label;
                @Nullable private Integer weight;
                private int x, y;
            }
            "#,
        )
        .unwrap();
        let index = ClassIndex::new();
        let class = index.describe(&unit, unit.top_level[0]).unwrap();

        assert_eq!(class.qualified_name, "com.example.Point");
        assert_eq!(class.visibility, Visibility::Public);
        let names: Vec<&str> = class.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["label", "weight", "x", "y"]);
        assert_eq!(class.field("label").unwrap().nullability, Nullability::NotNull);
        assert_eq!(class.field("weight").unwrap().nullability, Nullability::Nullable);
        assert!(class.superclass.as_ref().unwrap().is_object());
        assert_eq!(class.base_constructors().count(), 0);
    }

    #[test]
    fn test_superclass_in_other_file() {
        let base = parse(
            r#"
            package com.example.base;
            public abstract class Entity<K> {
                protected Entity(K id) {}
                private Entity() {}
                Entity(K id, long version) {}
            }
            "#,
        )
        .unwrap();
        let child = parse(
            r#"
            package com.example;
            import com.example.base.Entity;
            public class User extends Entity<Long> {
                private String name;
                public User(Long id) { super(id); }
            }
            "#,
        )
        .unwrap();

        let index = ClassIndex::from_units(vec![base]);
        let class = index.describe(&child, child.top_level[0]).unwrap();
        let superclass = class.superclass.as_ref().unwrap();
        assert_eq!(superclass.qualified_name, "com.example.base.Entity");
        assert_eq!(superclass.type_params[0].name, "K");
        assert_eq!(superclass.type_args.len(), 1);
        // Private and package-private constructors from another package are hidden
        assert_eq!(class.base_constructors().count(), 1);
        assert_eq!(class.existing_constructors, vec![Signature(vec!["Long".to_string()])]);
    }

    #[test]
    fn test_superclass_in_same_file_and_builtin() {
        let unit = parse(
            r#"
            class Base { Base(String id) {} }
            class Child extends Base { String value; }
            class Failure extends IllegalStateException { int code; }
            "#,
        )
        .unwrap();
        let index = ClassIndex::new();

        let child = index.describe(&unit, unit.top_level[1]).unwrap();
        assert_eq!(child.superclass.as_ref().unwrap().qualified_name, "Base");
        assert_eq!(child.base_constructors().count(), 1);

        let failure = index.describe(&unit, unit.top_level[2]).unwrap();
        let superclass = failure.superclass.as_ref().unwrap();
        assert_eq!(superclass.qualified_name, "java.lang.IllegalStateException");
        assert_eq!(failure.base_constructors().count(), 4);
    }

    #[test]
    fn test_enum_and_interface_superclass() {
        let unit = parse(
            r#"
            enum Color { RED, GREEN; private final String label; }
            interface Shape {}
            "#,
        )
        .unwrap();
        let index = ClassIndex::new();

        let color = index.resolve_superclass(&unit, unit.top_level[0]).unwrap();
        assert!(color.is_enum());
        assert!(index.resolve_superclass(&unit, unit.top_level[1]).is_none());
    }

    #[test]
    fn test_unresolved_superclass_has_no_constructors() {
        let unit = parse("package a; import b.Missing; class C extends Missing {}").unwrap();
        let class = ClassIndex::new().describe(&unit, unit.top_level[0]).unwrap();
        let superclass = class.superclass.unwrap();
        assert_eq!(superclass.qualified_name, "b.Missing");
        assert!(superclass.constructors.is_empty());
    }

    #[test]
    fn test_superclass_constructor_types_are_qualified() {
        let model = parse("package com.base.model; public class Address {}").unwrap();
        let base = parse(
            r#"
            package com.base;
            import java.util.List;
            import com.base.model.*;
            public class Base<T extends Tag> {
                public static class Options {}
                protected <E extends Exception> Base(List<T> tags, Address address, Options options, Tag primary, int[] weights)
                    throws java.io.IOException, E {}
            }
            "#,
        )
        .unwrap();
        let tag = parse("package com.base; public class Tag {}").unwrap();
        let child = parse(
            "package com.example; import com.base.Base; class Child extends Base<com.base.Tag> {}",
        )
        .unwrap();

        let index = ClassIndex::from_units(vec![model, base, tag]);
        let class = index.describe(&child, child.top_level[0]).unwrap();
        let superclass = class.superclass.as_ref().unwrap();
        assert_eq!(superclass.type_params[0].bounds[0].name, "com.base.Tag");

        let ctor = class.base_constructors().next().unwrap();
        let types: Vec<String> = ctor.params.iter().map(|p| p.ty.to_string()).collect();
        assert_eq!(
            types,
            vec![
                "java.util.List<T>",
                "com.base.model.Address",
                "com.base.Base.Options",
                "com.base.Tag",
                "int[]",
            ]
        );
        let throws: Vec<String> = ctor.throws.iter().map(|t| t.to_string()).collect();
        assert_eq!(throws, vec!["java.io.IOException", "E"]);
        assert_eq!(ctor.type_params[0].bounds[0].name, "Exception");
    }

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("com.example.Outer.Inner"), Some("com.example"));
        assert_eq!(package_of("Base"), None);
    }
}
