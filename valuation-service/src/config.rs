// Configuration loading and parsing (config/service.toml, config/credentials.toml).
//
// Both files are optional: the service falls back to built-in defaults, and
// a missing API key is a startup warning rather than a hard failure
// (requests will simply fail upstream). The key can also come from the
// PROPERTYDATA_API_KEY environment variable, which wins over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    #[serde(skip)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.propertydata.co.uk".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub api_key: Option<String>,
}

impl CredentialsConfig {
    /// Whether a usable (non-empty) API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Load configuration from `config/` under the given base directory.
/// Missing files fall back to defaults; present-but-broken files are errors.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let service_path = config_dir.join("service.toml");
    let mut config: Config = if service_path.exists() {
        let text = read_file(&service_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: service_path.clone(),
            source: e,
        })?
    } else {
        Config::default()
    };

    let credentials_path = config_dir.join("credentials.toml");
    if credentials_path.exists() {
        let text = read_file(&credentials_path)?;
        config.credentials = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?;
    }

    // Environment override for the key (deployments rarely ship the file).
    if let Ok(key) = std::env::var("PROPERTYDATA_API_KEY") {
        if !key.is_empty() {
            config.credentials.api_key = Some(key);
        }
    }

    validate(&config)?;

    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::ReadError {
        path: PathBuf::from("."),
        message: e.to_string(),
    })?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.provider.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "provider.base_url".into(),
            message: "must not be empty".into(),
        });
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "provider.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.server.bind.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "server.bind".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_base(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    #[test]
    fn defaults_load_without_any_file() {
        let tmp = temp_base("valuer_config_defaults");
        let config = load_config_from(&tmp).expect("defaults should load");

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.provider.base_url, "https://api.propertydata.co.uk");
        assert_eq!(config.provider.timeout(), Duration::from_secs(10));
        // The env var may be set in the developer's shell; only assert the
        // file-less default when it isn't.
        if std::env::var("PROPERTYDATA_API_KEY").is_err() {
            assert!(!config.credentials.has_api_key());
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn service_toml_overrides_defaults() {
        let tmp = temp_base("valuer_config_service");
        fs::write(
            tmp.join("config/service.toml"),
            "[server]\nbind = \"0.0.0.0:9090\"\n\n[provider]\nbase_url = \"http://localhost:4010\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9090");
        assert_eq!(config.provider.base_url, "http://localhost:4010");
        assert_eq!(config.provider.timeout_secs, 3);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_service_toml_keeps_remaining_defaults() {
        let tmp = temp_base("valuer_config_partial");
        fs::write(tmp.join("config/service.toml"), "[server]\nbind = \"0.0.0.0:80\"\n").unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:80");
        assert_eq!(config.provider.timeout_secs, 10);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_supplies_the_api_key() {
        let tmp = temp_base("valuer_config_creds");
        fs::write(
            tmp.join("config/credentials.toml"),
            "api_key = \"pdata-test-key\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        // The env var, if set, deliberately wins over the file.
        if std::env::var("PROPERTYDATA_API_KEY").is_err() {
            assert_eq!(config.credentials.api_key.as_deref(), Some("pdata-test-key"));
        }
        assert!(config.credentials.has_api_key());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let tmp = temp_base("valuer_config_zero_timeout");
        fs::write(
            tmp.join("config/service.toml"),
            "[provider]\ntimeout_secs = 0\n",
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "provider.timeout_secs");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_base_url() {
        let tmp = temp_base("valuer_config_empty_url");
        fs::write(
            tmp.join("config/service.toml"),
            "[provider]\nbase_url = \"\"\n",
        )
        .unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_base("valuer_config_bad_toml");
        fs::write(tmp.join("config/service.toml"), "this is not [[[ toml").unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("service.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let creds = CredentialsConfig {
            api_key: Some(String::new()),
        };
        assert!(!creds.has_api_key());
    }
}
