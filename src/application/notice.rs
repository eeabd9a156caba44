//! Transient confirmation messages.

use std::time::{Duration, Instant};

/// How long an export confirmation stays visible.
pub const EXPORT_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// How long a publication confirmation stays visible.
pub const PUBLICATION_NOTICE_DURATION: Duration = Duration::from_secs(5);

/// A success message that expires after a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    shown_at: Instant,
    display_for: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, display_for: Duration) -> Self {
        Self::shown_at(message, Instant::now(), display_for)
    }

    pub fn shown_at(message: impl Into<String>, shown_at: Instant, display_for: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at,
            display_for,
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(message, EXPORT_NOTICE_DURATION)
    }

    pub fn publication(message: impl Into<String>) -> Self {
        Self::new(message, PUBLICATION_NOTICE_DURATION)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn display_for(&self) -> Duration {
        self.display_for
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.display_for
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
