//! Click event model for asynchronous click counting.

/// A resolved short code waiting to have its counter incremented.
///
/// Created by [`crate::application::services::LinkService::resolve`] and sent
/// over a bounded channel, so the redirect never waits on the database write.
/// Processed by [`crate::domain::click_worker::run_click_worker`].
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub short_code: String,
}

impl ClickEvent {
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
        }
    }
}
