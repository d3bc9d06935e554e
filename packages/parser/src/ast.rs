use serde::{Deserialize, Serialize};
use std::fmt;

/// Span information for source location tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span for nodes built in memory rather than parsed
    pub fn synthetic() -> Self {
        Self::new(0, 0)
    }
}

/// Index of a class inside [`CompilationUnit::classes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassId(pub usize);

/// Root of a parsed source file.
///
/// Classes live in a flat arena; nesting is expressed by [`Member::Class`]
/// holding the id of the inner class. Nodes never point back at their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<Import>,
    /// Byte offset just past the package declaration and imports
    pub header_end: usize,
    pub classes: Vec<ClassDecl>,
    pub top_level: Vec<ClassId>,
}

/// Import statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub path: String,
    pub is_static: bool,
    pub on_demand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// Class, interface, enum, record or annotation type declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<TypeRef>,
    pub implements: Vec<TypeRef>,
    /// Record header components, empty for other kinds
    pub record_components: Vec<Param>,
    pub members: Vec<Member>,
    pub doc: Option<String>,
    /// Byte range from `{` to `}` inclusive
    pub body_span: Span,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Member {
    Field(FieldDecl),
    Constructor(MethodDecl),
    Method(MethodDecl),
    Class { id: ClassId, span: Span },
    EnumConstant(EnumConstant),
    Initializer { is_static: bool, span: Span },
}

impl Member {
    pub fn span(&self) -> &Span {
        match self {
            Member::Field(field) => &field.span,
            Member::Constructor(method) | Member::Method(method) => &method.span,
            Member::Class { span, .. } => span,
            Member::EnumConstant(constant) => &constant.span,
            Member::Initializer { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstant {
    pub name: String,
    pub args: Option<String>,
    pub span: Span,
}

/// One declarator of a field declaration (`int a, b;` yields two)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: String,
    pub initializer: Option<String>,
    pub doc: Option<String>,
    pub span: Span,
}

/// Method or constructor declaration. `return_type` is `None` for constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub return_type: Option<TypeRef>,
    pub name: String,
    pub params: Vec<Param>,
    pub throws: Vec<TypeRef>,
    pub body: Option<Block>,
    pub doc: Option<String>,
    pub span: Span,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn is_varargs(&self) -> bool {
        self.params.last().map(|p| p.varargs).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: String,
    pub varargs: bool,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            modifiers: Modifiers::default(),
            ty,
            name: name.into(),
            varargs: false,
            span: Span::synthetic(),
        }
    }

    /// Declared type with a vararg parameter counted as one more array dimension
    pub fn effective_type(&self) -> TypeRef {
        let mut ty = self.ty.clone();
        if self.varargs {
            ty.array_dims += 1;
        }
        ty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Protected => Some("protected"),
            Visibility::Private => Some("private"),
            Visibility::Package => None,
        }
    }
}

/// Modifier keywords and annotations, in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub keywords: Vec<String>,
    pub annotations: Vec<Annotation>,
}

/// Modifier keywords in the order the JLS recommends
pub const MODIFIER_ORDER: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "transient",
    "volatile",
    "synchronized",
    "native",
    "strictfp",
    "default",
    "sealed",
];

pub fn is_modifier_keyword(word: &str) -> bool {
    MODIFIER_ORDER.contains(&word)
}

impl Modifiers {
    pub fn has(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn visibility(&self) -> Visibility {
        if self.has("public") {
            Visibility::Public
        } else if self.has("protected") {
            Visibility::Protected
        } else if self.has("private") {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }

    /// Replace any access modifier with `visibility`
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.keywords
            .retain(|k| !matches!(k.as_str(), "public" | "protected" | "private"));
        if let Some(keyword) = visibility.keyword() {
            self.keywords.insert(0, keyword.to_string());
        }
    }

    pub fn add_annotation(&mut self, annotation: Annotation) -> &mut Annotation {
        self.annotations.push(annotation);
        let last = self.annotations.len() - 1;
        &mut self.annotations[last]
    }

    /// Find an annotation by simple or qualified name
    pub fn find_annotation(&self, name: &str) -> Option<&Annotation> {
        let simple = simple_name(name);
        self.annotations
            .iter()
            .find(|a| a.name == name || a.simple_name() == simple)
    }
}

/// Annotation with its argument list kept as raw source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub args: Option<String>,
    pub span: Span,
}

impl Annotation {
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
            span: Span::synthetic(),
        }
    }

    /// Annotation whose single `value` is a string literal
    pub fn with_literal(name: impl Into<String>, value: &str) -> Self {
        Self {
            name: name.into(),
            args: Some(quote_literal(value)),
            span: Span::synthetic(),
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// The string literal passed as `value`, if that is all the annotation holds
    pub fn literal_value(&self) -> Option<String> {
        let args = self.args.as_deref()?.trim();
        let args = match args.strip_prefix("value") {
            Some(rest) => rest.trim_start().strip_prefix('=')?.trim_start(),
            None => args,
        };
        unquote_literal(args)
    }
}

pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn unquote_literal(text: &str) -> Option<String> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                other => out.push(other),
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeRef>,
}

/// Reference to a type as written in source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Dotted name as written (`int`, `String`, `java.util.Map.Entry`)
    pub name: String,
    pub args: Vec<TypeArg>,
    pub array_dims: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeArg {
    Type(TypeRef),
    Wildcard(Option<WildcardBound>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardBound {
    Extends(TypeRef),
    Super(TypeRef),
}

impl TypeRef {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_dims: 0,
        }
    }

    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = args.into_iter().map(TypeArg::Type).collect();
        self
    }

    pub fn array(mut self, dims: usize) -> Self {
        self.array_dims += dims;
        self
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Erased form used for signature comparison: simple name plus dimensions
    pub fn erasure(&self) -> String {
        let mut out = self.simple_name().to_string();
        for _ in 0..self.array_dims {
            out.push_str("[]");
        }
        out
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Type(ty) => write!(f, "{}", ty),
            TypeArg::Wildcard(None) => write!(f, "?"),
            TypeArg::Wildcard(Some(WildcardBound::Extends(ty))) => write!(f, "? extends {}", ty),
            TypeArg::Wildcard(Some(WildcardBound::Super(ty))) => write!(f, "? super {}", ty),
        }
    }
}

/// Statement block of a method or constructor body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    /// `super(args)`
    SuperCall { args: Vec<String>, span: Span },

    /// `this(args)`
    ThisCall { args: Vec<String>, span: Span },

    /// `this.field = value` or `field = value`
    Assign {
        qualified: bool,
        field: String,
        value: String,
        span: Span,
    },

    /// Anything else, kept as source text without its terminator
    Other { text: String, span: Span },
}

impl CompilationUnit {
    pub fn new() -> Self {
        Self {
            package: None,
            imports: Vec::new(),
            header_end: 0,
            classes: Vec::new(),
            top_level: Vec::new(),
        }
    }

    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.0]
    }

    /// Nested classes declared directly inside `id`
    pub fn nested(&self, id: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        self.class(id).members.iter().filter_map(|m| match m {
            Member::Class { id, .. } => Some(*id),
            _ => None,
        })
    }

    /// Every class with its dotted path relative to the package (`Outer.Inner`)
    pub fn class_paths(&self) -> Vec<(ClassId, String)> {
        let mut out = Vec::new();
        let mut stack: Vec<(ClassId, String)> = self
            .top_level
            .iter()
            .rev()
            .map(|id| (*id, self.class(*id).name.clone()))
            .collect();

        while let Some((id, path)) = stack.pop() {
            let nested: Vec<ClassId> = self.nested(id).collect();
            for child in nested.into_iter().rev() {
                stack.push((child, format!("{}.{}", path, self.class(child).name)));
            }
            out.push((id, path));
        }
        out
    }

    /// Find a class by simple name or by `Outer.Inner` path
    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        let paths = self.class_paths();
        paths
            .iter()
            .find(|(_, path)| path == name)
            .or_else(|| paths.iter().find(|(id, _)| self.class(*id).name == name))
            .map(|(id, _)| *id)
    }

    /// Fully qualified name of a class path
    pub fn qualify(&self, path: &str) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, path),
            None => path.to_string(),
        }
    }

    pub fn has_import(&self, path: &str) -> bool {
        self.imports.iter().any(|import| {
            !import.is_static
                && (import.path == path
                    || (import.on_demand
                        && path
                            .rsplit_once('.')
                            .map(|(package, _)| package == import.path)
                            .unwrap_or(false)))
        })
    }
}

impl Default for CompilationUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassDecl {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }
}
