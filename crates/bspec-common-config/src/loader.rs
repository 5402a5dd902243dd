//! Configuration file loading and parsing.

use crate::types::BspecConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding project-local configuration.
pub const CONFIG_DIR: &str = ".bspec";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

const OUTPUT_FORMATS: &[&str] = &["json", "yaml", "yml", "markdown", "md"];
const CONFORMANCE_LEVELS: &[&str] = &["bronze", "silver", "gold"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json"];

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader.
pub struct ConfigLoader {
    config_path: PathBuf,
    required: bool,
}

impl ConfigLoader {
    /// Create a loader for `<project_dir>/.bspec/config.yaml`. A missing file yields defaults.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE),
            required: false,
        }
    }

    /// Create a loader for an explicit file, which must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    /// Path this loader reads.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration.
    pub fn load(&self) -> Result<BspecConfig, ConfigError> {
        if !self.config_path.exists() {
            if self.required {
                return Err(ConfigError::NotFound {
                    path: self.config_path.clone(),
                });
            }
            return Ok(BspecConfig::default());
        }

        let contents = std::fs::read_to_string(&self.config_path)?;
        let expanded = expand_env_vars(&contents)?;

        // An empty file deserializes as unit, not as a mapping.
        if expanded.trim().is_empty() {
            return Ok(BspecConfig::default());
        }

        let config: BspecConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        validate(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();
    let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("valid env var pattern");

    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) => v,
            Err(_) => match default {
                Some(d) => d.to_string(),
                None => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: var_name.to_string(),
                    })
                }
            },
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Validate configuration values.
pub fn validate(config: &BspecConfig) -> Result<(), ConfigError> {
    let format = config.output.format.to_lowercase();
    if !OUTPUT_FORMATS.contains(&format.as_str()) {
        return Err(ConfigError::ValidationError {
            message: format!(
                "output.format must be one of {}, got '{}'",
                OUTPUT_FORMATS.join(", "),
                config.output.format
            ),
        });
    }

    if config.output.excerpt_length == 0 {
        return Err(ConfigError::ValidationError {
            message: "output.excerpt_length must be greater than 0".to_string(),
        });
    }

    let level = config.project.conformance_level.to_lowercase();
    if !CONFORMANCE_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::ValidationError {
            message: format!(
                "project.conformance_level must be one of {}",
                CONFORMANCE_LEVELS.join(", ")
            ),
        });
    }

    let log_format = config.log.format.to_lowercase();
    if !LOG_FORMATS.contains(&log_format.as_str()) {
        return Err(ConfigError::ValidationError {
            message: format!("log.format must be one of {}", LOG_FORMATS.join(", ")),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.output.format, "markdown");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempdir().unwrap();
        let result = ConfigLoader::from_file(dir.path().join("nope.yaml")).load();
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
output:
  format: json
  pretty: false
project:
  author: Strategy Team
  conformance_level: gold
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.output.format, "json");
        assert!(!config.output.pretty);
        assert_eq!(config.project.author, "Strategy Team");
        assert_eq!(config.project.conformance_level, "gold");

        // Unspecified values keep their defaults
        assert_eq!(config.output.excerpt_length, 200);
        assert_eq!(config.project.industry_profile, "software-saas");
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "\n");
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("BSPEC_TEST_VAR", "test_value");
        let result = expand_env_vars("key: ${BSPEC_TEST_VAR}").unwrap();
        assert_eq!(result, "key: test_value");
        std::env::remove_var("BSPEC_TEST_VAR");
    }

    #[test]
    fn test_env_var_default() {
        let result = expand_env_vars("key: ${BSPEC_NONEXISTENT:-default}").unwrap();
        assert_eq!(result, "key: default");
    }

    #[test]
    fn test_env_var_missing_error() {
        let result = expand_env_vars("key: ${BSPEC_MISSING_VAR}");
        match result.unwrap_err() {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "BSPEC_MISSING_VAR"),
            _ => panic!("Expected EnvVarNotFound error"),
        }
    }

    #[test]
    fn test_env_var_expansion_in_config() {
        std::env::set_var("BSPEC_TEST_AUTHOR", "Ops Guild");

        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
project:
  author: ${BSPEC_TEST_AUTHOR}
output:
  excerpt_length: ${BSPEC_TEST_EXCERPT:-80}
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.project.author, "Ops Guild");
        assert_eq!(config.output.excerpt_length, 80);

        std::env::remove_var("BSPEC_TEST_AUTHOR");
    }

    #[test]
    fn test_validation_errors() {
        let mut config = BspecConfig::default();
        config.output.format = "xml".to_string();
        match validate(&config).unwrap_err() {
            ConfigError::ValidationError { message } => assert!(message.contains("output.format")),
            _ => panic!("Expected ValidationError"),
        }

        let mut config = BspecConfig::default();
        config.output.excerpt_length = 0;
        match validate(&config).unwrap_err() {
            ConfigError::ValidationError { message } => {
                assert!(message.contains("excerpt_length"))
            }
            _ => panic!("Expected ValidationError"),
        }

        let mut config = BspecConfig::default();
        config.project.conformance_level = "platinum".to_string();
        assert!(validate(&config).is_err());

        let mut config = BspecConfig::default();
        config.output.format = "MD".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
output:
  format: json
  pretty: [unclosed
"#,
        );

        match ConfigLoader::new(dir.path()).load().unwrap_err() {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            _ => panic!("Expected ParseError with line number"),
        }
    }
}
