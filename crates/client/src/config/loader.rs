//! Configuration loader
//!
//! Loads client configuration from environment variables or files. The core
//! client never reads the environment itself; this is a convenience for
//! embedding applications.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `IDPKIT_ORGANIZATION`: Organization identifier (required)
//! - `IDPKIT_API_TOKEN`: Static API token (required)
//! - `IDPKIT_USER_AGENT`: User agent sent with every request
//! - `IDPKIT_BASE_URL`: Origin override
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./idpkit.json` or `./idpkit.toml` (current working directory)
//! 2. `../idpkit.json` or `../idpkit.toml` (parent directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use idpkit_domain::constants::{ENV_API_TOKEN, ENV_BASE_URL, ENV_ORGANIZATION, ENV_USER_AGENT};
use idpkit_domain::{ClientConfig, DomainError, Result};

const CONFIG_FILE_NAMES: [&str; 2] = ["idpkit.json", "idpkit.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `DomainError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `DomainError::Config` if the organization or token is missing.
pub fn load_from_env() -> Result<ClientConfig> {
    let organization = env_var(ENV_ORGANIZATION)?;
    let api_token = env_var(ENV_API_TOKEN)?;

    let config = ClientConfig {
        organization,
        api_token: Some(api_token),
        user_agent: env_opt(ENV_USER_AGENT),
        base_url: env_opt(ENV_BASE_URL),
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `DomainError::Config` if the file is missing, unreadable, malformed
/// or incomplete.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DomainError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DomainError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DomainError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DomainError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(DomainError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        DomainError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-empty environment variable, if set
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::Builder;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for key in [ENV_ORGANIZATION, ENV_API_TOKEN, ENV_USER_AGENT, ENV_BASE_URL] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ORGANIZATION, "acme");
        std::env::set_var(ENV_API_TOKEN, "tok123");
        std::env::set_var(ENV_USER_AGENT, "provisioner/2.1");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.organization, "acme");
        assert_eq!(config.api_token.as_deref(), Some("tok123"));
        assert_eq!(config.user_agent.as_deref(), Some("provisioner/2.1"));
        assert_eq!(config.base_url, None);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_token() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ORGANIZATION, "acme");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, DomainError::Config(_)), "Should be a Config error");
        assert!(err.to_string().contains(ENV_API_TOKEN));

        clear_env();
    }

    #[test]
    fn test_blank_env_values_count_as_missing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_ORGANIZATION, "   ");
        std::env::set_var(ENV_API_TOKEN, "tok123");
        assert!(load_from_env().is_err());

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"organization": "acme", "api_token": "tok123", "user_agent": "cli/1.0"}}"#
        )
        .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.organization, "acme");
        assert_eq!(config.api_token.as_deref(), Some("tok123"));
        assert_eq!(config.user_agent.as_deref(), Some("cli/1.0"));
    }

    #[test]
    fn test_load_from_file_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "organization = \"acme\"\nbase_url = \"http://127.0.0.1:9000/\"").unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.organization, "acme");
        assert_eq!(config.api_token, None);
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:9000/"));
    }

    #[test]
    fn test_load_from_file_missing() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/idpkit.toml"))).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_parse_config_rejects_unknown_extension() {
        let err = parse_config("organization = 'acme'", Path::new("idpkit.yaml")).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let err = parse_config("{not json", Path::new("idpkit.json")).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON format"));
    }
}
