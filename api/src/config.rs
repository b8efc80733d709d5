use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Client configuration that extends the base `Config` from core.
///
/// This configuration includes:
/// - All keyboard and session options from `lexisium_core::Config` (flattened via serde)
/// - Backend location and request timeout
/// - Where the admin token is kept between runs
///
/// # Example
///
/// ```rust
/// use lexisium_api::ApiConfig;
///
/// let config = ApiConfig::default();
/// assert_eq!(config.base_url, "http://localhost:5000/api");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base configuration fields (layouts, token lifetime)
    #[serde(flatten)]
    pub base: lexisium_core::Config,

    /// Backend root, without a trailing slash
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Token file; `None` keeps the token in memory only
    pub token_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: lexisium_core::Config::default(),
            base_url: "http://localhost:5000/api".to_string(),
            timeout_ms: 10_000,
            token_path: Some(default_token_path()),
        }
    }
}

impl ApiConfig {
    /// Load from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, lexisium_core::ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &lexisium_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut lexisium_core::Config {
        &mut self.base
    }
}

/// `~/.lexisium/token`, or a path relative to the working directory when
/// no home directory is known.
pub fn default_token_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".lexisium").join("token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattened_base_fields_parse() {
        let cfg: ApiConfig = toml::from_str(
            r#"
            base_url = "https://dict.example/api"
            default_layout = "urdu"
            token_ttl_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(cfg.base_url, "https://dict.example/api");
        assert_eq!(cfg.base().default_layout, "urdu");
        assert_eq!(cfg.base().token_ttl_secs, 60);
        assert_eq!(cfg.timeout_ms, 10_000);
    }
}
