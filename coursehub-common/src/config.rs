//! Bootstrap configuration and root folder resolution
//!
//! Configuration is read once at startup from a TOML file. A missing file
//! is not fatal: the service logs a warning and runs on built-in defaults.
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `COURSEHUB_ROOT_FOLDER`
//! 3. TOML `root_folder`
//! 4. OS-dependent default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "COURSEHUB_ROOT_FOLDER";

/// Environment variable carrying the AI gateway API key
pub const AI_API_KEY_ENV: &str = "COURSEHUB_AI_API_KEY";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "coursehub.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    /// TOML file replacing the built-in school/department taxonomy
    #[serde(default)]
    pub taxonomy_file: Option<PathBuf>,

    #[serde(default)]
    pub ai: AiConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Catalog browsing settings
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Materials per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// AI completion gateway settings
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Chat completions endpoint URL
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    #[serde(default = "default_ai_temperature")]
    pub temperature: f32,

    /// Whole-request timeout; a timeout counts as a transport failure
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,

    /// API key (the environment variable takes priority)
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            temperature: default_ai_temperature(),
            timeout_secs: default_ai_timeout_secs(),
            api_key: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5740
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> usize {
    9
}

fn default_ai_endpoint() -> String {
    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
}

fn default_ai_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_ai_temperature() -> f32 {
    0.3
}

fn default_ai_timeout_secs() -> u64 {
    30
}

impl TomlConfig {
    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

        if config.catalog.page_size == 0 {
            return Err(Error::Config("catalog.page_size must be at least 1".to_string()));
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// A missing file yields defaults. A file that exists but cannot be
    /// parsed is an error. Runs before logging is initialized, so callers
    /// report the outcome themselves.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        Self::from_toml_str(&content)
    }
}

/// Default config file path (`<config dir>/coursehub/config.toml`)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("coursehub").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("coursehub.toml"))
}

/// Resolves the root folder from CLI, environment, TOML and OS default
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_root: config.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        // Priority 4: OS-dependent default
        default_root_folder()
    }
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("coursehub"))
        .unwrap_or_else(|| PathBuf::from("./coursehub_data"))
}

/// Create the root folder when missing and return the database path in it
pub fn prepare_root_folder(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        std::fs::create_dir_all(root)?;
        info!("Created root folder {}", root.display());
    }
    Ok(root.join(DATABASE_FILE_NAME))
}

/// Resolve the AI gateway API key
///
/// **Priority:** ENV → TOML. Returns `None` when neither source holds a
/// non-blank key; callers then run without AI and degrade accordingly.
pub fn resolve_ai_api_key(config: &AiConfig) -> Option<String> {
    let env_key = std::env::var(AI_API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = config.api_key.clone().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "AI API key found in both {} and TOML config. Using environment (highest priority).",
            AI_API_KEY_ENV
        );
    }

    if let Some(key) = env_key {
        info!("AI API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("AI API key loaded from TOML config");
        return Some(key);
    }

    warn!(
        "AI API key not configured (set {} or ai.api_key); AI-assisted checks will use fallbacks",
        AI_API_KEY_ENV
    );
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.server.port, 5740);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.catalog.page_size, 9);
        assert_eq!(config.ai.timeout_secs, 30);
        assert!(config.ai.api_key.is_none());
        assert!(config.taxonomy_file.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            [server]
            port = 8080

            [ai]
            model = "test-model"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.ai.model, "test-model");
        assert_eq!(config.ai.temperature, 0.3);
        assert_eq!(config.catalog.page_size, 9);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = TomlConfig::from_toml_str("[catalog]\npage_size = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }
}
