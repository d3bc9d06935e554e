use serde::{Deserialize, Serialize};

/// Java reserved words and literals; never valid as a parameter name
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null", "_",
];

pub fn is_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Whether `name` can be used as a Java identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') && !is_keyword(name)
}

/// Code style naming conventions for fields and parameters.
///
/// With everything empty (the default) field names pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingConventions {
    pub field_prefix: String,
    pub field_suffix: String,
    pub parameter_prefix: String,
    pub parameter_suffix: String,
}

impl NamingConventions {
    /// Conventions for `mName` style fields
    pub fn m_prefixed() -> Self {
        Self {
            field_prefix: "m".to_string(),
            ..Default::default()
        }
    }

    /// `mName` -> `name`, `count_` -> `count` under the configured affixes
    pub fn field_name_to_property_name(&self, field_name: &str) -> String {
        let mut name = field_name;
        let mut stripped_prefix = false;

        if !self.field_prefix.is_empty() && name.len() > self.field_prefix.len() {
            if let Some(rest) = name.strip_prefix(self.field_prefix.as_str()) {
                name = rest;
                stripped_prefix = true;
            }
        }
        if !self.field_suffix.is_empty() && name.len() > self.field_suffix.len() {
            if let Some(rest) = name.strip_suffix(self.field_suffix.as_str()) {
                name = rest;
            }
        }

        if stripped_prefix {
            decapitalize(name)
        } else {
            name.to_string()
        }
    }

    /// `name` -> `pName` for prefix `p`, `a_name` for prefix `a_`
    pub fn property_name_to_parameter_name(&self, property_name: &str) -> String {
        let mut out = String::with_capacity(
            self.parameter_prefix.len() + property_name.len() + self.parameter_suffix.len(),
        );
        out.push_str(&self.parameter_prefix);
        if self.parameter_prefix.is_empty() || self.parameter_prefix.ends_with('_') {
            out.push_str(property_name);
        } else {
            out.push_str(&capitalize(property_name));
        }
        out.push_str(&self.parameter_suffix);
        out
    }
}

/// JavaBeans decapitalization: `Name` -> `name`, but `URL` stays `URL`
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = chars.next() {
        if first.is_uppercase() && second.is_uppercase() {
            return name.to_string();
        }
    }
    first.to_lowercase().chain(name[first.len_utf8()..].chars()).collect()
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Return `candidate` if it is free, else the first free `candidate1`, `candidate2`, ...
pub fn uniquify<S: AsRef<str>>(candidate: &str, taken: &[S]) -> String {
    let is_taken = |name: &str| is_keyword(name) || taken.iter().any(|t| t.as_ref() == name);

    if !is_taken(candidate) {
        return candidate.to_string();
    }
    let mut n = 1;
    loop {
        let name = format!("{}{}", candidate, n);
        if !is_taken(&name) {
            return name;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_conventions_pass_names_through() {
        let naming = NamingConventions::default();
        let property = naming.field_name_to_property_name("mName");
        assert_eq!(property, "mName");
        assert_eq!(naming.property_name_to_parameter_name(&property), "mName");
    }

    #[test]
    fn test_field_prefix_is_stripped_and_decapitalized() {
        let naming = NamingConventions::m_prefixed();
        assert_eq!(naming.field_name_to_property_name("mName"), "name");
        assert_eq!(naming.field_name_to_property_name("mURL"), "URL");
        // Nothing would remain
        assert_eq!(naming.field_name_to_property_name("m"), "m");
    }

    #[test]
    fn test_field_suffix_is_stripped() {
        let naming = NamingConventions {
            field_suffix: "_".to_string(),
            ..Default::default()
        };
        assert_eq!(naming.field_name_to_property_name("count_"), "count");
    }

    #[test]
    fn test_parameter_affixes() {
        let naming = NamingConventions {
            parameter_prefix: "p".to_string(),
            parameter_suffix: "Arg".to_string(),
            ..Default::default()
        };
        assert_eq!(naming.property_name_to_parameter_name("name"), "pNameArg");

        let underscored = NamingConventions {
            parameter_prefix: "a_".to_string(),
            ..Default::default()
        };
        assert_eq!(underscored.property_name_to_parameter_name("name"), "a_name");
    }

    #[test]
    fn test_uniquify() {
        assert_eq!(uniquify("id", &["name"]), "id");
        assert_eq!(uniquify("id", &["id"]), "id1");
        assert_eq!(uniquify("id", &["id", "id1"]), "id2");
        assert_eq!(uniquify::<&str>("class", &[]), "class1");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("value"));
        assert!(is_identifier("$x_1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("int"));
        assert!(!is_identifier(""));
    }
}
