//! Research form: the draft idea plus the session's transient credentials.

use secrecy::{ExposeSecret, SecretString};

use super::ProductIdeaDraft;

/// Secrets typed in by the user for this session only.
///
/// Never persisted and never copied into an analysis result. Blank input
/// clears the stored value.
#[derive(Debug, Default)]
pub struct SessionCredentials {
    analysis_key: Option<SecretString>,
    tracker_token: Option<SecretString>,
    tracker_repository: String,
}

impl SessionCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_analysis_key(&mut self, key: impl Into<String>) {
        self.analysis_key = non_blank_secret(key.into());
    }

    pub fn set_tracker_token(&mut self, token: impl Into<String>) {
        self.tracker_token = non_blank_secret(token.into());
    }

    pub fn set_tracker_repository(&mut self, repository: impl Into<String>) {
        self.tracker_repository = repository.into();
    }

    pub fn analysis_key(&self) -> Option<&SecretString> {
        self.analysis_key.as_ref()
    }

    pub fn tracker_token(&self) -> Option<&SecretString> {
        self.tracker_token.as_ref()
    }

    pub fn tracker_repository(&self) -> &str {
        &self.tracker_repository
    }

    /// Copies the analysis key for handing to a handler.
    pub fn analysis_key_copy(&self) -> Option<SecretString> {
        self.analysis_key.as_ref().map(copy_secret)
    }

    /// Copies the tracker token for handing to a handler.
    pub fn tracker_token_copy(&self) -> Option<SecretString> {
        self.tracker_token.as_ref().map(copy_secret)
    }
}

fn non_blank_secret(value: String) -> Option<SecretString> {
    if value.trim().is_empty() {
        None
    } else {
        Some(SecretString::new(value))
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().clone())
}

/// Everything the user edits before invoking an action.
#[derive(Debug, Default)]
pub struct ResearchForm {
    pub idea: ProductIdeaDraft,
    pub credentials: SessionCredentials,
}

impl ResearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the idea and every credential to empty.
    pub fn reset(&mut self) {
        self.idea.reset();
        self.credentials = SessionCredentials::new();
    }
}
