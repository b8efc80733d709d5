//! Admin session management.
//!
//! `AdminSession` is the single owner of the bearer token. Views that need
//! authorization are handed the session instead of reading token storage
//! themselves. Expiry is checked in one place: `SessionController::tick`,
//! driven by the top-level application's timer.
//!
//! Tokens are JWTs. Their `exp` claim sets the expiry; a token without one
//! lives for the configured TTL. The signature is never checked here, the
//! backend does that.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use thiserror::Error;

/// Default token lifetime: one day.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("refusing to store an empty token")]
    EmptyToken,
    #[error("token is not a readable JWT")]
    MalformedToken,
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<f64>,
}

/// Expiry from a JWT's `exp` claim; `Ok(None)` when the claim is absent.
pub fn token_expiry(token: &str) -> Result<Option<SystemTime>, SessionError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(SessionError::MalformedToken),
    };
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| SessionError::MalformedToken)?;
    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(|_| SessionError::MalformedToken)?;
    let Some(exp) = claims.exp else {
        return Ok(None);
    };
    Duration::try_from_secs_f64(exp)
        .ok()
        .and_then(|d| UNIX_EPOCH.checked_add(d))
        .map(Some)
        .ok_or(SessionError::MalformedToken)
}

/// Persistence for the bearer token.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&mut self, token: &str) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

/// Token kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<(), SessionError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.token = None;
        Ok(())
    }
}

/// Token kept in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Logged-in admin state.
#[derive(Debug)]
pub struct AdminSession<S: TokenStore> {
    store: S,
    token: Option<String>,
    expires_at: Option<SystemTime>,
    ttl: Duration,
}

impl<S: TokenStore> AdminSession<S> {
    /// Create a logged-out session.
    pub fn new(store: S, ttl: Duration) -> Self {
        Self {
            store,
            token: None,
            expires_at: None,
            ttl,
        }
    }

    /// Pick up a token left in the store by an earlier run.
    ///
    /// A stored token that is unreadable or already expired at `now` is
    /// removed from the store and the session starts logged out.
    pub fn restore(store: S, ttl: Duration, now: SystemTime) -> Result<Self, SessionError> {
        let mut session = Self::new(store, ttl);
        let Some(token) = session.store.load()? else {
            return Ok(session);
        };
        match session.expiry_for(&token, now) {
            Ok(expiry) if now < expiry => {
                tracing::debug!("restored admin token from store");
                session.token = Some(token);
                session.expires_at = Some(expiry);
            }
            Ok(_) => {
                tracing::info!("stored admin token expired");
                session.store.clear()?;
            }
            Err(_) => {
                tracing::warn!("stored admin token unreadable, discarding");
                session.store.clear()?;
            }
        }
        Ok(session)
    }

    /// Record a freshly issued token.
    pub fn login(&mut self, token: &str, now: SystemTime) -> Result<(), SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let expiry = self.expiry_for(token, now)?;
        self.store.save(token)?;
        self.token = Some(token.to_string());
        self.expires_at = Some(expiry);
        tracing::info!("admin logged in");
        Ok(())
    }

    fn expiry_for(&self, token: &str, now: SystemTime) -> Result<SystemTime, SessionError> {
        Ok(token_expiry(token)?.unwrap_or(now + self.ttl))
    }

    /// Forget the token here and in the store.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.token = None;
        self.expires_at = None;
        tracing::info!("admin logged out");
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the `Authorization` header, if logged in.
    pub fn authorization_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// True once the token's lifetime has run out at `now`.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match self.expires_at() {
            Some(expiry) => now >= expiry,
            None => false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Session change reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The token lapsed and the admin was logged out
    Expired,
}

/// Owns the session on behalf of the top-level application.
#[derive(Debug)]
pub struct SessionController<S: TokenStore> {
    session: AdminSession<S>,
}

impl<S: TokenStore> SessionController<S> {
    pub fn new(session: AdminSession<S>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &AdminSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut AdminSession<S> {
        &mut self.session
    }

    /// Expiry check, called from the application timer.
    pub fn tick(&mut self, now: SystemTime) -> Result<Option<SessionEvent>, SessionError> {
        if self.session.is_admin() && self.session.is_expired_at(now) {
            tracing::info!("admin token expired");
            self.session.logout()?;
            return Ok(Some(SessionEvent::Expired));
        }
        Ok(None)
    }
}
