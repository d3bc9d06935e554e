use crate::body::TargetSyntax;
use crate::naming::NamingConventions;
use jsoncreator_parser::ast::{ClassKind, Visibility};
use serde::{Deserialize, Serialize};

pub const JSON_CREATOR: &str = "com.fasterxml.jackson.annotation.JsonCreator";
pub const JSON_PROPERTY: &str = "com.fasterxml.jackson.annotation.JsonProperty";

/// Access modifier given to generated constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityPolicy {
    /// Same access as the class itself
    #[default]
    Escalate,
    Public,
    Protected,
    Package,
    Private,
}

impl VisibilityPolicy {
    /// Visibility for a constructor of a class with the given kind and access.
    /// Enum constructors are implicitly private and never get a modifier.
    pub fn resolve(self, kind: ClassKind, class_visibility: Visibility) -> Visibility {
        if kind == ClassKind::Enum {
            return Visibility::Package;
        }
        match self {
            VisibilityPolicy::Escalate => class_visibility,
            VisibilityPolicy::Public => Visibility::Public,
            VisibilityPolicy::Protected => Visibility::Protected,
            VisibilityPolicy::Package => Visibility::Package,
            VisibilityPolicy::Private => Visibility::Private,
        }
    }
}

/// Configuration options for constructor generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// Syntax the constructor body is generated in
    pub target: TargetSyntax,

    pub visibility: VisibilityPolicy,

    /// Copy the base constructor's doc comment onto the generated one
    pub copy_javadoc: bool,

    /// Annotation marking the deserialization entry point
    pub creator_annotation: String,

    /// Annotation carrying each parameter's property name
    pub property_annotation: String,

    pub naming: NamingConventions,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            target: TargetSyntax::Java,
            visibility: VisibilityPolicy::Escalate,
            copy_javadoc: false,
            creator_annotation: JSON_CREATOR.to_string(),
            property_annotation: JSON_PROPERTY.to_string(),
            naming: NamingConventions::default(),
        }
    }
}

impl GeneratorOptions {
    /// Options for generating into Groovy classes
    pub fn groovy() -> Self {
        Self {
            target: TargetSyntax::Groovy,
            ..Default::default()
        }
    }

    pub fn with_visibility(mut self, visibility: VisibilityPolicy) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_naming(mut self, naming: NamingConventions) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_javadoc(mut self) -> Self {
        self.copy_javadoc = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalate_follows_class() {
        let policy = VisibilityPolicy::default();
        assert_eq!(
            policy.resolve(ClassKind::Class, Visibility::Protected),
            Visibility::Protected
        );
        assert_eq!(
            VisibilityPolicy::Private.resolve(ClassKind::Class, Visibility::Public),
            Visibility::Private
        );
    }

    #[test]
    fn test_enum_constructors_have_no_modifier() {
        assert_eq!(
            VisibilityPolicy::Public.resolve(ClassKind::Enum, Visibility::Public),
            Visibility::Package
        );
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: GeneratorOptions =
            serde_json::from_str(r#"{"target": "groovy", "visibility": "public"}"#).unwrap();
        assert_eq!(options.target, TargetSyntax::Groovy);
        assert_eq!(options.visibility, VisibilityPolicy::Public);
        assert_eq!(options.creator_annotation, JSON_CREATOR);
        assert!(!options.copy_javadoc);
    }
}
