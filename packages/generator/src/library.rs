//! Built-in `java.lang` classes a superclass may resolve to without source.
//! Their constructors are known by signature only.

use crate::model::{
    BaseConstructor, BaseConstructorParameter, ConstructorOrigin, SuperclassRef, JAVA_LANG_ENUM,
    JAVA_LANG_OBJECT,
};
use jsoncreator_parser::ast::{TypeParam, TypeRef, Visibility};

const THROWABLE_FAMILY: &[&str] = &[
    "java.lang.Throwable",
    "java.lang.Exception",
    "java.lang.RuntimeException",
    "java.lang.IllegalArgumentException",
    "java.lang.IllegalStateException",
];

/// Look up a `java.lang` class by simple or qualified name
pub fn lookup(name: &str) -> Option<SuperclassRef> {
    let qualified = if name.contains('.') {
        name.to_string()
    } else {
        format!("java.lang.{}", name)
    };

    let (type_params, constructors) = match qualified.as_str() {
        JAVA_LANG_OBJECT => (Vec::new(), vec![binary(Visibility::Public, &[])]),
        JAVA_LANG_ENUM => (
            vec![TypeParam {
                name: "E".to_string(),
                bounds: vec![TypeRef::simple("Enum").with_args(vec![TypeRef::simple("E")])],
            }],
            vec![binary(Visibility::Protected, &["String", "int"])],
        ),
        q if THROWABLE_FAMILY.contains(&q) => {
            let mut ctors = vec![
                binary(Visibility::Public, &[]),
                binary(Visibility::Public, &["String"]),
                binary(Visibility::Public, &["String", "Throwable"]),
                binary(Visibility::Public, &["Throwable"]),
            ];
            if matches!(q, "java.lang.Throwable" | "java.lang.Exception" | "java.lang.RuntimeException") {
                ctors.push(binary(
                    Visibility::Protected,
                    &["String", "Throwable", "boolean", "boolean"],
                ));
            }
            (Vec::new(), ctors)
        }
        _ => return None,
    };

    Some(SuperclassRef {
        qualified_name: qualified,
        type_args: Vec::new(),
        type_params,
        constructors,
    })
}

fn binary(visibility: Visibility, types: &[&str]) -> BaseConstructor {
    BaseConstructor {
        params: types
            .iter()
            .map(|t| BaseConstructorParameter::unnamed(TypeRef::simple(*t)))
            .collect(),
        throws: Vec::new(),
        type_params: Vec::new(),
        doc: None,
        visibility,
        origin: ConstructorOrigin::Binary,
    }
}
