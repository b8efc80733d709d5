//! # lexisium-api
//!
//! Blocking REST client for the Lexisium dictionary backend, built on
//! lexisium-core.

pub mod client;
pub mod config;
pub mod entry;
pub mod error;
pub mod files;
pub mod repl;

// Re-export the shared model and session types
pub use lexisium_core::{
    AdminSession, Category, CategoryDraft, FileTokenStore, MemoryTokenStore, TokenStore, Word,
    WordDraft, WordStatus,
};

pub use client::ApiClient;
pub use config::{default_token_path, ApiConfig};
pub use entry::EntryError;
pub use error::ApiError;
pub use files::PathPicker;
