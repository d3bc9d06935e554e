use jsoncreator_generator::GeneratorOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "jsoncreator.config.json";

/// jsoncreator configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directories scanned for superclass declarations
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<String>,

    /// Options handed to the constructor generator
    #[serde(default)]
    pub generator: GeneratorOptions,
}

fn default_source_roots() -> Vec<String> {
    vec!["src".to_string()]
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute paths of the source roots that exist
    pub fn get_source_roots(&self, cwd: &str) -> Vec<PathBuf> {
        self.source_roots
            .iter()
            .map(|root| PathBuf::from(cwd).join(root))
            .filter(|root| root.is_dir())
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_roots: default_source_roots(),
            generator: GeneratorOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsoncreator_generator::VisibilityPolicy;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "sourceRoots": ["src/main/java", "src/main/groovy"],
            "generator": {
                "visibility": "public",
                "copyJavadoc": true,
                "naming": { "fieldPrefix": "m" }
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.source_roots, vec!["src/main/java", "src/main/groovy"]);
        assert_eq!(config.generator.visibility, VisibilityPolicy::Public);
        assert!(config.generator.copy_javadoc);
        assert_eq!(config.generator.naming.field_prefix, "m");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_roots, vec!["src"]);
        assert_eq!(config.generator.visibility, VisibilityPolicy::Escalate);
        assert!(!config.generator.copy_javadoc);
    }

    #[test]
    fn test_missing_config_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.source_roots, vec!["src"]);
        assert!(config.get_source_roots(&dir.path().display().to_string()).is_empty());
    }
}
