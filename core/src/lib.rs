//! lexisium-core
//!
//! Virtual keyboard, form, media and session logic shared by the Lexisium
//! dictionary clients. Nothing in this crate performs network I/O.
//!
//! Public API:
//! - `LayoutSet` / `Layout` - Script keyboard tables (Urdu, Pashto, Roman, ...)
//! - `VirtualKeyboard` - Maps key activations to edit signals via callbacks
//! - `KeyboardInput` - A text field wired to its own keyboard
//! - `WordForm` / `CategoryForm` - Entry forms producing upload drafts
//! - `AudioRecorder` - Recording state machine over an injected capture port
//! - `AdminSession` / `SessionController` - Bearer token ownership and expiry
//! - `Route` - Client-side route table
//! - `Config` - Configuration loaded from TOML
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod layout;
pub use layout::{KeyLabel, Layout, LayoutError, LayoutSet, DEFAULT_LAYOUT, DELETE_LABEL, SPACE_LABEL};

pub mod keyboard;
pub use keyboard::{KeyHandler, KeyOutput, ToggleHandler, VirtualKeyboard};

pub mod view;
pub use view::{ExpandedView, KeyCap, KeyKind, KeyboardView};

pub mod input;
pub use input::{KeyboardInput, TextValue};

pub mod model;
pub use model::{Category, CategoryRef, Translation, Word, WordStatus};

pub mod media;
pub use media::{
    AudioCapture, AudioRecorder, CapturedAudio, FilePicker, MediaError, MediaFile, RecorderState,
    MAX_AUDIO_BYTES, MAX_IMAGE_BYTES, MAX_RECORDING_SECS,
};

pub mod form;
pub use form::{CategoryDraft, CategoryForm, FormError, SubmitPlan, WordDraft, WordForm};

pub mod session;
pub use session::{
    token_expiry, AdminSession, FileTokenStore, MemoryTokenStore, SessionController, SessionError, SessionEvent,
    TokenStore,
};

pub mod route;
pub use route::{Route, Screen};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration shared by every client.
///
/// Client crates extend this with their own options by flattening it into
/// their config struct.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Layout used when a field asks for an unknown one
    pub default_layout: String,

    /// Admin token lifetime in seconds
    pub token_ttl_secs: u64,

    /// Extra layouts, or replacements for built-ins with the same id.
    /// Each must contain both a "Space" and a "Backspace" key.
    pub layouts: Vec<Layout>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_layout: DEFAULT_LAYOUT.to_string(),
            token_ttl_secs: session::DEFAULT_TOKEN_TTL_SECS,
            layouts: vec![],
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build the keyboard layouts this configuration describes.
    pub fn layout_set(&self) -> Result<LayoutSet, LayoutError> {
        LayoutSet::from_config(self)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.layout_set().unwrap().default_id(), "roman");
    }

    #[test]
    fn toml_round_trip_with_layout() {
        let mut cfg = Config::default();
        cfg.default_layout = "sindhi".into();
        cfg.layouts.push(Layout::new(
            "sindhi",
            vec![vec!["ڄ".into(), "ڃ".into()], vec!["Space".into(), "Backspace".into()]],
        ));
        let text = cfg.to_toml_string().unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert_eq!(back, cfg);
        let set = back.layout_set().unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.resolve("nope").id, "sindhi");
        assert_eq!(set.next_id("roman"), "sindhi");
    }

    #[test]
    fn unknown_default_is_rejected() {
        let cfg = Config::from_toml_str("default_layout = \"hindi\"").unwrap();
        assert_eq!(
            cfg.layout_set(),
            Err(LayoutError::UnknownDefault("hindi".into()))
        );
    }
}
