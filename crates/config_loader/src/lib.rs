//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON sandbox configuration files
//! - Validate catalog and dispatcher settings
//! - Provide the built-in catalog shipped with the binary
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("sandbox.toml")).unwrap();
//! println!("APIs: {}", config.apis.len());
//! ```

mod parser;
mod validator;

pub use contracts::SandboxConfig;
pub use crate::parser::ConfigFormat;
pub use crate::validator::validate_settings;

use contracts::ContractError;
use std::path::Path;

/// Built-in catalog (KRA + M-PESA sandbox endpoints)
const BUILTIN_CATALOG: &str = include_str!("../catalog/builtin.toml");

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SandboxConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SandboxConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Load the embedded catalog
    pub fn builtin() -> Result<SandboxConfig, ContractError> {
        Self::load_from_str(BUILTIN_CATALOG, ConfigFormat::Toml)
    }

    /// Load from `path` when given, otherwise the embedded catalog
    pub fn load_or_builtin(path: Option<&Path>) -> Result<SandboxConfig, ContractError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::builtin(),
        }
    }

    /// Serialize SandboxConfig to TOML string
    pub fn to_toml(config: &SandboxConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize SandboxConfig to JSON string
    pub fn to_json(config: &SandboxConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SandboxConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
[dispatcher]
base_url = "https://sbx.example.test"
simulated_delay_ms = 250

[[apis]]
id = "pin-checker"
name = "PIN Checker"
category = "Checkers"
method = "POST"
endpoint = "/checker/v1/pinbypin"

[[apis.parameters]]
name = "pin"
type = "string"
required = true
label = "KRA PIN"
pattern = '^[A-Z]\d{9}[A-Z]$'
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.dispatcher.base_url, "https://sbx.example.test");
        assert_eq!(config.dispatcher.simulated_delay_ms, 250);
    }

    #[test]
    fn test_builtin_catalog() {
        let config = ConfigLoader::builtin().unwrap();
        let catalog = config.catalog();

        assert_eq!(catalog.len(), 12);
        assert_eq!(config.dispatcher.base_url, "https://sbx.kra.go.ke");
        assert_eq!(config.dispatcher.simulated_delay_ms, 800);

        let pin = catalog.get("pin-checker").unwrap();
        assert_eq!(pin.endpoint, "/checker/v1/pinbypin");
        assert_eq!(pin.parameters[0].pattern.as_deref(), Some(r"^[A-Z]\d{9}[A-Z]$"));

        let stk = catalog.get("mpesa-express").unwrap();
        assert_eq!(stk.parameters.len(), 5);
        assert_eq!(stk.category, "M-PESA");

        let categories: Vec<_> = catalog.by_category().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            vec!["Checkers", "Tax Returns", "Payments", "Customs", "M-PESA"]
        );
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::builtin().unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config.apis, config2.apis);
        assert_eq!(config.dispatcher, config2.dispatcher);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config.apis, config2.apis);
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.apis[0].id, "pin-checker");
    }

    #[test]
    fn test_load_from_path_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_load_or_builtin() {
        let config = ConfigLoader::load_or_builtin(None).unwrap();
        assert!(config.catalog().contains("b2c-payment"));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[[apis]]
id = "dup"
name = "First"
category = "C"
endpoint = "/a"

[[apis]]
id = "dup"
name = "Second"
category = "C"
endpoint = "/b"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }
}
