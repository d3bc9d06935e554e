use crate::model::{BaseConstructor, SuperclassRef};
use jsoncreator_parser::ast::{TypeArg, TypeParam, TypeRef, WildcardBound};
use std::collections::HashMap;

/// Maps superclass type variables to the types the subclass supplies for them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitutor {
    map: HashMap<String, TypeArg>,
    /// Raw supertype: parameterized types over a type variable lose their arguments
    raw: bool,
}

impl Substitutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitution for `class Sub extends Super<A, B>`.
    ///
    /// A raw `extends` clause erases every type variable to its first bound,
    /// or `Object` when it has none, and parameterized types that mention a
    /// type variable to their raw form.
    pub fn for_superclass(superclass: &SuperclassRef) -> Self {
        let mut map = HashMap::new();
        let raw = superclass.type_args.is_empty();
        for (i, param) in superclass.type_params.iter().enumerate() {
            let arg = if raw {
                TypeArg::Type(erase_param(param))
            } else {
                match superclass.type_args.get(i) {
                    Some(arg) => arg.clone(),
                    None => TypeArg::Type(erase_param(param)),
                }
            };
            map.insert(param.name.clone(), arg);
        }
        Self {
            raw: raw && !map.is_empty(),
            map,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: TypeRef) {
        self.map.insert(name.into(), TypeArg::Type(ty));
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn substitute(&self, ty: &TypeRef) -> TypeRef {
        if ty.args.is_empty() {
            if let Some(arg) = self.map.get(&ty.name) {
                let mut replaced = match arg {
                    TypeArg::Type(t) => t.clone(),
                    // A wildcard cannot be a declared type; use its bound
                    TypeArg::Wildcard(Some(WildcardBound::Extends(t)))
                    | TypeArg::Wildcard(Some(WildcardBound::Super(t))) => t.clone(),
                    TypeArg::Wildcard(None) => TypeRef::simple("Object"),
                };
                replaced.array_dims += ty.array_dims;
                return replaced;
            }
        }

        if self.raw && !ty.args.is_empty() && self.mentions_variable(ty) {
            return TypeRef {
                name: ty.name.clone(),
                args: Vec::new(),
                array_dims: ty.array_dims,
            };
        }

        TypeRef {
            name: ty.name.clone(),
            args: ty.args.iter().map(|arg| self.substitute_arg(arg)).collect(),
            array_dims: ty.array_dims,
        }
    }

    fn mentions_variable(&self, ty: &TypeRef) -> bool {
        (ty.args.is_empty() && self.map.contains_key(&ty.name))
            || ty.args.iter().any(|arg| match arg {
                TypeArg::Type(t) => self.mentions_variable(t),
                TypeArg::Wildcard(Some(WildcardBound::Extends(t)))
                | TypeArg::Wildcard(Some(WildcardBound::Super(t))) => self.mentions_variable(t),
                TypeArg::Wildcard(None) => false,
            })
    }

    fn substitute_arg(&self, arg: &TypeArg) -> TypeArg {
        match arg {
            TypeArg::Type(t) if t.args.is_empty() && t.array_dims == 0 => match self.map.get(&t.name) {
                Some(mapped) => mapped.clone(),
                None => TypeArg::Type(t.clone()),
            },
            TypeArg::Type(t) => TypeArg::Type(self.substitute(t)),
            TypeArg::Wildcard(None) => TypeArg::Wildcard(None),
            TypeArg::Wildcard(Some(WildcardBound::Extends(t))) => {
                TypeArg::Wildcard(Some(WildcardBound::Extends(self.substitute(t))))
            }
            TypeArg::Wildcard(Some(WildcardBound::Super(t))) => {
                TypeArg::Wildcard(Some(WildcardBound::Super(self.substitute(t))))
            }
        }
    }

    /// Copy of `ctor` with parameter and thrown types substituted.
    /// The constructor's own type parameters shadow class type variables.
    pub fn substitute_constructor(&self, ctor: &BaseConstructor) -> BaseConstructor {
        let mut scoped = self.clone();
        for param in &ctor.type_params {
            scoped.map.remove(&param.name);
        }

        let mut out = ctor.clone();
        for param in &mut out.params {
            param.ty = scoped.substitute(&param.ty);
        }
        for thrown in &mut out.throws {
            *thrown = scoped.substitute(thrown);
        }
        for type_param in &mut out.type_params {
            for bound in &mut type_param.bounds {
                *bound = scoped.substitute(bound);
            }
        }
        out
    }
}

fn erase_param(param: &TypeParam) -> TypeRef {
    match param.bounds.first() {
        Some(bound) => TypeRef::simple(bound.name.clone()).array(bound.array_dims),
        None => TypeRef::simple("Object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BaseConstructorParameter;

    fn superclass(type_params: &[(&str, Option<&str>)], type_args: Vec<TypeArg>) -> SuperclassRef {
        SuperclassRef {
            qualified_name: "com.example.Base".to_string(),
            type_args,
            type_params: type_params
                .iter()
                .map(|(name, bound)| TypeParam {
                    name: name.to_string(),
                    bounds: bound.map(TypeRef::simple).into_iter().collect(),
                })
                .collect(),
            constructors: Vec::new(),
        }
    }

    #[test]
    fn test_substitutes_nested_and_array_types() {
        let sup = superclass(
            &[("T", None)],
            vec![TypeArg::Type(TypeRef::simple("String"))],
        );
        let subst = Substitutor::for_superclass(&sup);

        let list_of_t = TypeRef::simple("List").with_args(vec![TypeRef::simple("T")]);
        assert_eq!(subst.substitute(&list_of_t).to_string(), "List<String>");
        assert_eq!(
            subst.substitute(&TypeRef::simple("T").array(2)).to_string(),
            "String[][]"
        );
    }

    #[test]
    fn test_raw_extends_erases_to_bound() {
        let sup = superclass(&[("T", Some("Number")), ("U", None)], vec![]);
        let subst = Substitutor::for_superclass(&sup);
        assert_eq!(subst.substitute(&TypeRef::simple("T")).to_string(), "Number");
        assert_eq!(subst.substitute(&TypeRef::simple("U")).to_string(), "Object");
    }

    #[test]
    fn test_raw_extends_erases_parameterized_types() {
        let sup = superclass(&[("K", Some("Comparable"))], vec![]);
        let subst = Substitutor::for_superclass(&sup);

        let list_of_k = TypeRef::simple("java.util.List").with_args(vec![TypeRef::simple("K")]);
        assert_eq!(subst.substitute(&list_of_k).to_string(), "java.util.List");
        let nested = TypeRef::simple("Map")
            .with_args(vec![
                TypeRef::simple("String"),
                TypeRef::simple("List").with_args(vec![TypeRef::simple("K")]),
            ])
            .array(1);
        assert_eq!(subst.substitute(&nested).to_string(), "Map[]");

        let list_of_string = TypeRef::simple("List").with_args(vec![TypeRef::simple("String")]);
        assert_eq!(subst.substitute(&list_of_string).to_string(), "List<String>");
    }

    #[test]
    fn test_wildcard_argument() {
        let sup = superclass(
            &[("T", None)],
            vec![TypeArg::Wildcard(Some(WildcardBound::Extends(
                TypeRef::simple("Number"),
            )))],
        );
        let subst = Substitutor::for_superclass(&sup);
        assert_eq!(subst.substitute(&TypeRef::simple("T")).to_string(), "Number");
        let list = TypeRef::simple("List").with_args(vec![TypeRef::simple("T")]);
        assert_eq!(
            subst.substitute(&list).to_string(),
            "List<? extends Number>"
        );
    }

    #[test]
    fn test_constructor_type_params_shadow() {
        let mut subst = Substitutor::new();
        subst.insert("T", TypeRef::simple("String"));

        let mut ctor = BaseConstructor::new(vec![
            BaseConstructorParameter::new("a", TypeRef::simple("T")),
        ]);
        ctor.throws = vec![TypeRef::simple("T")];
        let substituted = subst.substitute_constructor(&ctor);
        assert_eq!(substituted.params[0].ty.to_string(), "String");
        assert_eq!(substituted.throws[0].to_string(), "String");

        ctor.type_params = vec![TypeParam {
            name: "T".to_string(),
            bounds: vec![],
        }];
        let shadowed = subst.substitute_constructor(&ctor);
        assert_eq!(shadowed.params[0].ty.to_string(), "T");
    }
}
