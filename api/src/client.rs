//! Blocking client for the dictionary backend.
//!
//! Uses the `reqwest` blocking client, like the rest of the tooling: the
//! admin CLI issues one request at a time and needs no async runtime.
//!
//! Every request first runs the session expiry check, then carries
//! `Authorization: Bearer <token>` if the session still holds a token. The
//! token is owned by the session controller inside the client; nothing else
//! reads token storage.

use std::time::{Duration, SystemTime};

use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use lexisium_core::{
    AdminSession, Category, CategoryDraft, MediaFile, SessionController, SessionEvent, TokenStore,
    Word, WordDraft, WordStatus,
};

use crate::config::ApiConfig;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct WordList {
    #[serde(default)]
    words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
struct CategoryList {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    message: String,
}

/// REST client bound to one backend and one admin session.
pub struct ApiClient<S: TokenStore> {
    http: Client,
    base_url: String,
    controller: SessionController<S>,
    clock: fn() -> SystemTime,
}

impl<S: TokenStore> ApiClient<S> {
    /// Create a client for the backend named in `config`.
    pub fn new(config: &ApiConfig, session: AdminSession<S>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            controller: SessionController::new(session),
            clock: SystemTime::now,
        })
    }

    /// Use `clock` instead of the system time for expiry checks.
    pub fn with_clock(mut self, clock: fn() -> SystemTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &AdminSession<S> {
        self.controller.session()
    }

    /// Expiry check; call from the application's timer.
    pub fn check_session(&mut self, now: SystemTime) -> Result<Option<SessionEvent>, ApiError> {
        Ok(self.controller.tick(now)?)
    }

    // ========== Auth ==========

    /// Log in as admin and keep the returned token.
    pub fn login(&mut self, username: &str, password: &str, now: SystemTime) -> Result<(), ApiError> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        let body = serde_json::json!({ "username": username, "password": password });
        let request = self.request(Method::POST, "/auth/admin-login")?.json(&body);
        let reply: LoginReply = self.send_json(request)?;
        let token = reply.token.filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)?;
        self.controller.session_mut().login(&token, now)?;
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), ApiError> {
        Ok(self.controller.session_mut().logout()?)
    }

    // ========== Categories ==========

    pub fn categories(&mut self) -> Result<Vec<Category>, ApiError> {
        let request = self.request(Method::GET, "/categories")?;
        let list: CategoryList = self.send_json(request)?;
        Ok(list.categories)
    }

    pub fn search_categories(&mut self, query: &str) -> Result<Vec<Category>, ApiError> {
        let path = format!("/categories/search?query={}", urlencoding::encode(query));
        let request = self.request(Method::GET, &path)?;
        let list: CategoryList = self.send_json(request)?;
        Ok(list.categories)
    }

    pub fn add_category(&mut self, draft: &CategoryDraft) -> Result<(), ApiError> {
        let form = category_form(draft)?;
        let request = self.request(Method::POST, "/categories")?.multipart(form);
        self.send(request)?;
        Ok(())
    }

    pub fn update_category(&mut self, id: &str, draft: &CategoryDraft) -> Result<(), ApiError> {
        let form = category_form(draft)?;
        let request = self.request(Method::PUT, &format!("/categories/{}", id))?.multipart(form);
        self.send(request)?;
        Ok(())
    }

    pub fn delete_category(&mut self, id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/categories/{}", id))?;
        self.send(request)?;
        Ok(())
    }

    // ========== Words ==========

    pub fn words(&mut self) -> Result<Vec<Word>, ApiError> {
        self.word_list("/words")
    }

    pub fn approved_words(&mut self) -> Result<Vec<Word>, ApiError> {
        self.word_list("/words/approved")
    }

    pub fn hidden_words(&mut self) -> Result<Vec<Word>, ApiError> {
        self.word_list("/words/hidden")
    }

    pub fn pending_words(&mut self) -> Result<Vec<Word>, ApiError> {
        self.word_list("/words/pending")
    }

    /// Words in one moderation state.
    pub fn words_with_status(&mut self, status: WordStatus) -> Result<Vec<Word>, ApiError> {
        match status {
            WordStatus::Pending => self.pending_words(),
            WordStatus::Approved => self.approved_words(),
            WordStatus::Hidden => self.hidden_words(),
        }
    }

    pub fn words_by_category(&mut self, category_id: &str) -> Result<Vec<Word>, ApiError> {
        self.word_list(&format!("/words/category/{}", category_id))
    }

    pub fn search_words(&mut self, query: &str) -> Result<Vec<Word>, ApiError> {
        self.word_list(&format!("/words/search?query={}", urlencoding::encode(query)))
    }

    /// Public search: only approved words. A blank query lists them all.
    pub fn search_approved_words(&mut self, query: &str) -> Result<Vec<Word>, ApiError> {
        if query.trim().is_empty() {
            return self.approved_words();
        }
        let mut words = self.search_words(query)?;
        words.retain(|w| w.status == WordStatus::Approved);
        Ok(words)
    }

    pub fn add_word(&mut self, draft: &WordDraft) -> Result<(), ApiError> {
        let form = word_form(draft)?;
        let request = self.request(Method::POST, "/words")?.multipart(form);
        self.send(request)?;
        Ok(())
    }

    pub fn update_word(&mut self, id: &str, draft: &WordDraft) -> Result<(), ApiError> {
        let form = word_form(draft)?;
        let request = self.request(Method::PUT, &format!("/words/{}", id))?.multipart(form);
        self.send(request)?;
        Ok(())
    }

    pub fn delete_word(&mut self, id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/words/{}", id))?;
        self.send(request)?;
        Ok(())
    }

    pub fn approve_word(&mut self, id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::PUT, &format!("/words/approve/{}", id))?;
        self.send(request)?;
        Ok(())
    }

    pub fn hide_word(&mut self, id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::PUT, &format!("/words/hide/{}", id))?;
        self.send(request)?;
        Ok(())
    }

    pub fn move_word(&mut self, id: &str, new_category: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "newCategory": new_category });
        let request = self.request(Method::PUT, &format!("/words/move/{}", id))?.json(&body);
        self.send(request)?;
        Ok(())
    }

    // ========== Plumbing ==========

    fn word_list(&mut self, path: &str) -> Result<Vec<Word>, ApiError> {
        let request = self.request(Method::GET, path)?;
        let list: WordList = self.send_json(request)?;
        Ok(list.words)
    }

    fn request(&mut self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        self.controller.tick((self.clock)())?;
        tracing::debug!(%method, path, "api request");
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        Ok(match self.controller.session().authorization_header() {
            Some(header) => builder.header(reqwest::header::AUTHORIZATION, header),
            None => builder,
        })
    }

    fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send()?;
        let status = response.status();
        let body = response.text()?;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "request not authorized");
            return Err(ApiError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Prefer the backend's `{"message": ...}`, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorReply>(body)
        .map(|reply| reply.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn file_part(file: &MediaFile) -> Result<multipart::Part, ApiError> {
    Ok(multipart::Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime)?)
}

fn word_form(draft: &WordDraft) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new()
        .text("word", draft.word.clone())
        .text("translation", draft.translation_json()?);
    if let Some(category) = &draft.category {
        form = form.text("category", category.clone());
    }
    form = form.text("description", draft.description.clone());
    if let Some(audio) = &draft.audio {
        form = form.part("audio", file_part(audio)?);
    }
    if let Some(image) = &draft.image {
        form = form.part("image", file_part(image)?);
    }
    Ok(form)
}

fn category_form(draft: &CategoryDraft) -> Result<multipart::Form, ApiError> {
    let mut form = multipart::Form::new()
        .text("name", draft.name.clone())
        .text("description", draft.description.clone());
    if let Some(image) = &draft.image {
        form = form.part("image", file_part(image)?);
    }
    Ok(form)
}
