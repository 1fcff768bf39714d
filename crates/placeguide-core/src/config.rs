use crate::error::{PlaceguideError, Result};
use crate::models::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default clustering threshold, pedestrian scale
pub const DEFAULT_CLUSTER_THRESHOLD_METERS: f64 = 50.0;

/// Default location of the category table
pub const DEFAULT_CATEGORIES_PATH: &str = "categories.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// What a batch does when a single candidate cannot be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure, record it in the report and continue
    #[default]
    Skip,
    /// Fail the whole batch, listing every failing candidate
    Abort,
}

/// Layered engine settings
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub cluster_threshold_meters: ConfigValue<f64>,
    pub anchor: ConfigValue<Option<Coordinate>>,
    pub categories_path: ConfigValue<PathBuf>,
    pub error_policy: ConfigValue<ErrorPolicy>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            cluster_threshold_meters: ConfigValue::new(
                DEFAULT_CLUSTER_THRESHOLD_METERS,
                ConfigSource::Default,
            ),
            anchor: ConfigValue::new(None, ConfigSource::Default),
            categories_path: ConfigValue::new(
                PathBuf::from(DEFAULT_CATEGORIES_PATH),
                ConfigSource::Default,
            ),
            error_policy: ConfigValue::new(ErrorPolicy::Skip, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| PlaceguideError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| PlaceguideError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(threshold) = file_config.cluster_threshold_meters {
            let threshold = validate_threshold(threshold)?;
            self.cluster_threshold_meters.update(threshold, ConfigSource::File);
        }

        if let Some(anchor) = file_config.anchor {
            anchor.validate()?;
            self.anchor.update(Some(anchor), ConfigSource::File);
        }

        if let Some(categories) = file_config.categories {
            // Relative table paths are resolved against the config file
            let resolved = match path.as_ref().parent() {
                Some(dir) if categories.is_relative() => dir.join(categories),
                _ => categories,
            };
            self.categories_path.update(resolved, ConfigSource::File);
        }

        if let Some(error_policy) = file_config.error_policy {
            self.error_policy.update(error_policy, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from a TOML file when it exists
    pub fn load_from_file_if_exists<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            tracing::debug!("No config file at {}", path.as_ref().display());
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // PLACEGUIDE_CLUSTER_THRESHOLD
        if let Ok(threshold_str) = env::var("PLACEGUIDE_CLUSTER_THRESHOLD") {
            match parse_threshold(&threshold_str) {
                Ok(threshold) => {
                    self.cluster_threshold_meters.update(threshold, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid PLACEGUIDE_CLUSTER_THRESHOLD value '{}': expected meters",
                    threshold_str
                ),
            }
        }

        // PLACEGUIDE_ANCHOR
        if let Ok(anchor_str) = env::var("PLACEGUIDE_ANCHOR") {
            match anchor_str.parse::<Coordinate>() {
                Ok(anchor) => self.anchor.update(Some(anchor), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PLACEGUIDE_ANCHOR value '{}': expected LAT,LNG",
                    anchor_str
                ),
            }
        }

        // PLACEGUIDE_CATEGORIES
        if let Ok(path) = env::var("PLACEGUIDE_CATEGORIES") {
            self.categories_path.update(PathBuf::from(path), ConfigSource::Environment);
        }

        // PLACEGUIDE_ERROR_POLICY
        if let Ok(policy_str) = env::var("PLACEGUIDE_ERROR_POLICY") {
            match parse_error_policy(&policy_str) {
                Ok(policy) => self.error_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid PLACEGUIDE_ERROR_POLICY value '{}': expected skip or abort",
                    policy_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(threshold) = overrides.cluster_threshold_meters {
            self.cluster_threshold_meters.update(threshold, ConfigSource::Cli);
        }

        if let Some(anchor) = overrides.anchor {
            self.anchor.update(Some(anchor), ConfigSource::Cli);
        }

        if let Some(path) = overrides.categories_path {
            self.categories_path.update(path, ConfigSource::Cli);
        }

        if let Some(policy) = overrides.error_policy {
            self.error_policy.update(policy, ConfigSource::Cli);
        }
    }

    /// The batch anchor, required for evaluation
    pub fn require_anchor(&self) -> Result<Coordinate> {
        self.anchor
            .value
            .ok_or_else(|| PlaceguideError::ConfigMissing { key: "anchor".to_string() })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "cluster_threshold_meters".to_string(),
            (
                self.cluster_threshold_meters.value.to_string(),
                self.cluster_threshold_meters.source,
            ),
        );

        map.insert(
            "anchor".to_string(),
            (
                self.anchor.value.map(|a| a.to_string()).unwrap_or_else(|| "unset".to_string()),
                self.anchor.source,
            ),
        );

        map.insert(
            "categories_path".to_string(),
            (self.categories_path.value.display().to_string(), self.categories_path.source),
        );

        map.insert(
            "error_policy".to_string(),
            (format!("{:?}", self.error_policy.value), self.error_policy.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    cluster_threshold_meters: Option<f64>,
    anchor: Option<Coordinate>,
    categories: Option<PathBuf>,
    error_policy: Option<ErrorPolicy>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub cluster_threshold_meters: Option<f64>,
    pub anchor: Option<Coordinate>,
    pub categories_path: Option<PathBuf>,
    pub error_policy: Option<ErrorPolicy>,
}

/// Parse a clustering threshold in meters
pub fn parse_threshold(s: &str) -> Result<f64> {
    s.trim().parse::<f64>().map_err(|_| invalid_threshold(s)).and_then(validate_threshold)
}

/// Reject NaN and infinite thresholds
fn validate_threshold(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid_threshold(value))
    }
}

fn invalid_threshold(value: impl std::fmt::Display) -> PlaceguideError {
    PlaceguideError::ConfigInvalid {
        key: "cluster_threshold_meters".to_string(),
        reason: format!("Invalid threshold: {}. Use a finite number of meters", value),
    }
}

/// Parse error policy from string
pub fn parse_error_policy(s: &str) -> Result<ErrorPolicy> {
    match s.to_lowercase().as_str() {
        "skip" => Ok(ErrorPolicy::Skip),
        "abort" => Ok(ErrorPolicy::Abort),
        _ => Err(PlaceguideError::ConfigInvalid {
            key: "error_policy".to_string(),
            reason: format!("Invalid error policy: {}. Use skip or abort", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.cluster_threshold_meters.value, 50.0);
        assert_eq!(config.cluster_threshold_meters.source, ConfigSource::Default);
        assert_eq!(config.anchor.value, None);
        assert_eq!(config.categories_path.value, PathBuf::from("categories.toml"));
        assert_eq!(config.error_policy.value, ErrorPolicy::Skip);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(10.0, ConfigSource::Default);

        value.update(20.0, ConfigSource::File);
        assert_eq!(value.value, 20.0);
        assert_eq!(value.source, ConfigSource::File);

        value.update(30.0, ConfigSource::Environment);
        assert_eq!(value.value, 30.0);
        assert_eq!(value.source, ConfigSource::Environment);

        value.update(40.0, ConfigSource::Cli);
        assert_eq!(value.value, 40.0);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(50.0, ConfigSource::File);
        assert_eq!(value.value, 40.0);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
cluster_threshold_meters = 75.0
anchor = {{ lat = 59.9139, lng = 10.7522 }}
categories = "/etc/placeguide/categories.toml"
error_policy = "abort"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.cluster_threshold_meters.value, 75.0);
        assert_eq!(config.cluster_threshold_meters.source, ConfigSource::File);
        assert_eq!(config.anchor.value, Some(Coordinate::new(59.9139, 10.7522).unwrap()));
        assert_eq!(
            config.categories_path.value,
            PathBuf::from("/etc/placeguide/categories.toml")
        );
        assert_eq!(config.error_policy.value, ErrorPolicy::Abort);
    }

    #[test]
    fn test_file_threshold_must_be_finite() {
        for value in ["nan", "inf", "-inf"] {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(file, "cluster_threshold_meters = {}", value).unwrap();

            let result = LayeredConfig::with_defaults().load_from_file(file.path());
            match result {
                Err(PlaceguideError::ConfigInvalid { key, .. }) => {
                    assert_eq!(key, "cluster_threshold_meters")
                }
                other => panic!("Expected ConfigInvalid for {}, got {:?}", value, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_relative_categories_path_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placeguide.toml");
        std::fs::write(&path, "categories = \"cats.toml\"\n").unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(&path).unwrap();
        assert_eq!(config.categories_path.value, dir.path().join("cats.toml"));
    }

    #[test]
    fn test_file_anchor_is_validated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "anchor = {{ lat = 123.0, lng = 10.0 }}").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(PlaceguideError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            cluster_threshold_meters: Some(25.0),
            anchor: Some(Coordinate::new(60.39, 5.32).unwrap()),
            categories_path: None,
            error_policy: None,
        };

        config.update_from_cli(overrides);

        assert_eq!(config.cluster_threshold_meters.value, 25.0);
        assert_eq!(config.cluster_threshold_meters.source, ConfigSource::Cli);
        assert_eq!(config.anchor.source, ConfigSource::Cli);
        // These should still be defaults
        assert_eq!(config.categories_path.source, ConfigSource::Default);
        assert_eq!(config.error_policy.source, ConfigSource::Default);
    }

    #[test]
    fn test_require_anchor() {
        let config = LayeredConfig::with_defaults();
        assert!(matches!(config.require_anchor(), Err(PlaceguideError::ConfigMissing { .. })));
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("50").unwrap(), 50.0);
        assert_eq!(parse_threshold(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_threshold("-1").unwrap(), -1.0);
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("far").is_err());
    }

    #[test]
    fn test_parse_error_policy() {
        assert_eq!(parse_error_policy("skip").unwrap(), ErrorPolicy::Skip);
        assert_eq!(parse_error_policy("ABORT").unwrap(), ErrorPolicy::Abort);
        assert!(parse_error_policy("retry").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("cluster_threshold_meters"));
        assert!(map.contains_key("categories_path"));
        assert!(map.contains_key("error_policy"));

        let (anchor_value, anchor_source) = &map["anchor"];
        assert_eq!(anchor_value, "unset");
        assert_eq!(*anchor_source, ConfigSource::Default);
    }
}
