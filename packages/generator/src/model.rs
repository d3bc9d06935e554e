//! Host-independent view of a class and the members a constructor can be
//! generated from.

use jsoncreator_parser::ast::{
    Annotation, ClassKind, MethodDecl, Modifiers, Param, TypeArg, TypeParam, TypeRef, Visibility,
};
use serde::{Deserialize, Serialize};

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
pub const JAVA_LANG_ENUM: &str = "java.lang.Enum";

/// Target class of a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub qualified_name: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<SuperclassRef>,
    /// Signatures of constructors the class already declares
    pub existing_constructors: Vec<Signature>,
    /// Members a constructor can be built from: superclass constructors
    /// first, then fields in declaration order
    pub members: Vec<MemberDescriptor>,
}

impl ClassDescriptor {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.members.iter().filter_map(|m| match m {
            MemberDescriptor::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn base_constructors(&self) -> impl Iterator<Item = &BaseConstructor> {
        self.members.iter().filter_map(|m| match m {
            MemberDescriptor::BaseConstructor(ctor) => Some(ctor),
            _ => None,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    pub fn has_constructor(&self, signature: &Signature) -> bool {
        self.existing_constructors.contains(signature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MemberDescriptor {
    Field(FieldDescriptor),
    BaseConstructor(BaseConstructor),
}

impl MemberDescriptor {
    /// Short label for member listings
    pub fn label(&self) -> String {
        match self {
            MemberDescriptor::Field(field) => format!("{} {}", field.ty, field.name),
            MemberDescriptor::BaseConstructor(ctor) => ctor.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nullability {
    #[default]
    Unknown,
    NotNull,
    Nullable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
    pub nullability: Nullability,
    /// Annotations as declared on the field
    pub annotations: Vec<Annotation>,
    pub is_static: bool,
    pub is_final: bool,
    pub initialized: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            nullability: Nullability::Unknown,
            annotations: Vec::new(),
            is_static: false,
            is_final: false,
            initialized: false,
        }
    }

    /// Annotation that makes this field not-null, if any
    pub fn not_null_annotation(&self) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| crate::index::NOT_NULL_ANNOTATIONS.contains(&a.simple_name()))
    }
}

/// Where a superclass constructor comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstructorOrigin {
    /// Declared in a parsed source file; parameter names are known
    Source,
    /// Known only by signature; parameter names may be missing
    Binary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseConstructorParameter {
    pub name: Option<String>,
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    pub varargs: bool,
}

impl BaseConstructorParameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            modifiers: Modifiers::default(),
            varargs: false,
        }
    }

    /// Parameter known only by its type
    pub fn unnamed(ty: TypeRef) -> Self {
        Self {
            name: None,
            ty,
            modifiers: Modifiers::default(),
            varargs: false,
        }
    }

    pub fn from_param(param: &Param) -> Self {
        Self {
            name: Some(param.name.clone()),
            ty: param.ty.clone(),
            modifiers: param.modifiers.clone(),
            varargs: param.varargs,
        }
    }
}

/// A superclass constructor the generated one can delegate to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseConstructor {
    pub params: Vec<BaseConstructorParameter>,
    pub throws: Vec<TypeRef>,
    pub type_params: Vec<TypeParam>,
    pub doc: Option<String>,
    pub visibility: Visibility,
    pub origin: ConstructorOrigin,
}

impl BaseConstructor {
    pub fn new(params: Vec<BaseConstructorParameter>) -> Self {
        Self {
            params,
            throws: Vec::new(),
            type_params: Vec::new(),
            doc: None,
            visibility: Visibility::Public,
            origin: ConstructorOrigin::Source,
        }
    }

    pub fn from_decl(decl: &MethodDecl) -> Self {
        Self {
            params: decl.params.iter().map(BaseConstructorParameter::from_param).collect(),
            throws: decl.throws.clone(),
            type_params: decl.type_params.clone(),
            doc: decl.doc.clone(),
            visibility: decl.modifiers.visibility(),
            origin: ConstructorOrigin::Source,
        }
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.params.iter().map(|p| {
            let mut ty = p.ty.clone();
            if p.varargs {
                ty.array_dims += 1;
            }
            ty
        }))
    }

    /// `super(String, int)` style label
    pub fn label(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                let ty = if p.varargs {
                    format!("{}...", p.ty)
                } else {
                    p.ty.to_string()
                };
                match &p.name {
                    Some(name) => format!("{} {}", ty, name),
                    None => ty,
                }
            })
            .collect();
        format!("super({})", params.join(", "))
    }
}

/// The class named in an `extends` clause, seen from the subclass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperclassRef {
    pub qualified_name: String,
    /// Type arguments as written in the `extends` clause; empty when raw
    pub type_args: Vec<TypeArg>,
    /// The superclass's own type parameters
    pub type_params: Vec<TypeParam>,
    pub constructors: Vec<BaseConstructor>,
}

impl SuperclassRef {
    pub fn unresolved(qualified_name: impl Into<String>, type_args: Vec<TypeArg>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_args,
            type_params: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn is_enum(&self) -> bool {
        self.qualified_name == JAVA_LANG_ENUM
    }

    pub fn is_object(&self) -> bool {
        self.qualified_name == JAVA_LANG_OBJECT
    }
}

/// Constructor signature compared by erased parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(pub Vec<String>);

impl Signature {
    pub fn new(types: impl IntoIterator<Item = TypeRef>) -> Self {
        Self(types.into_iter().map(|t| t.erasure()).collect())
    }

    pub fn of(decl: &MethodDecl) -> Self {
        Self::new(decl.params.iter().map(|p| p.effective_type()))
    }
}

/// A generated constructor, ready to print and insert.
///
/// Built fresh per generation call and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorPrototype {
    pub declaration: MethodDecl,
}

impl ConstructorPrototype {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn params(&self) -> &[Param] {
        &self.declaration.params
    }

    pub fn throws(&self) -> &[TypeRef] {
        &self.declaration.throws
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.declaration.modifiers.annotations
    }

    pub fn visibility(&self) -> Visibility {
        self.declaration.modifiers.visibility()
    }

    pub fn statements(&self) -> &[jsoncreator_parser::ast::Statement] {
        self.declaration
            .body
            .as_ref()
            .map(|b| b.statements.as_slice())
            .unwrap_or(&[])
    }

    pub fn signature(&self) -> Signature {
        Signature::of(&self.declaration)
    }
}
