//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Delivering registrations (Discord bot, Discord webhook, nothing at all)
//! - Clock (for testing)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rushroyale_domain::Submission;
use serde::{Deserialize, Serialize};

// =============================================================================
// Submission Delivery
// =============================================================================

/// What a sink reports back to the player after accepting a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReceipt {
    /// `false` when the sink could not take the registration and the player
    /// has to finish with the export code instead
    pub accepted: bool,
    pub message: String,
    /// Tell the player to finish registering in Discord with the export code
    pub use_export_code: bool,
    /// Discord channel the registration was posted to, if known
    pub channel_id: Option<String>,
}

impl SinkReceipt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            accepted: true,
            message: message.into(),
            use_export_code: false,
            channel_id: None,
        }
    }

    /// Nothing was delivered; the player registers with the export code.
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            ..Self::new(message).with_export_code()
        }
    }

    pub fn with_export_code(mut self) -> Self {
        self.use_export_code = true;
        self
    }

    pub fn in_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }
}

/// Delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The request never got a response (connection refused, timeout, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// Discord answered with a non-success status.
    #[error("Discord rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Discord answered 2xx with a body we could not read.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SinkError {
    pub fn request(message: impl ToString) -> Self {
        Self::Request(message.to_string())
    }

    pub fn invalid_response(message: impl ToString) -> Self {
        Self::InvalidResponse(message.to_string())
    }
}

/// Where validated registrations go for moderator review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn deliver(&self, submission: &Submission) -> Result<SinkReceipt, SinkError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
