//! Submit registration use case - re-checks a registration and hands it to a sink.

use std::sync::Arc;

use rushroyale_domain::{Catalog, RegistrationRequest, SubmissionError};

use crate::infrastructure::correlation::CorrelationId;
use crate::infrastructure::ports::{SinkError, SinkReceipt, SubmissionSink};

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// The player has something to fix before submitting.
    #[error(transparent)]
    Invalid(#[from] SubmissionError),

    /// The registration was fine but could not be delivered.
    #[error("Registration could not be delivered: {0}")]
    Delivery(#[from] SinkError),
}

/// Validates a registration server side and delivers it for review.
///
/// Strength and export code are recomputed from the build, so whatever the
/// client claimed for them is discarded.
pub struct SubmitRegistration {
    catalog: Arc<Catalog>,
    sink: Arc<dyn SubmissionSink>,
}

impl SubmitRegistration {
    pub fn new(catalog: Arc<Catalog>, sink: Arc<dyn SubmissionSink>) -> Self {
        Self { catalog, sink }
    }

    pub async fn execute(
        &self,
        request: RegistrationRequest,
        correlation_id: CorrelationId,
    ) -> Result<SinkReceipt, RegisterError> {
        let submission = request.validate(&self.catalog).map_err(|e| {
            tracing::info!(
                correlation_id = %correlation_id.short(),
                error = %e,
                "Registration rejected"
            );
            e
        })?;

        tracing::info!(
            correlation_id = %correlation_id.short(),
            discord_id = %submission.context.discord_id,
            total_strength = submission.strength.total_strength,
            division = submission.strength.division.as_deref().unwrap_or_default(),
            sink = self.sink.name(),
            "Delivering registration"
        );

        let receipt = self.sink.deliver(&submission).await.map_err(|e| {
            tracing::error!(
                correlation_id = %correlation_id.short(),
                error = %e,
                sink = self.sink.name(),
                "Failed to deliver registration"
            );
            e
        })?;

        if !receipt.accepted {
            tracing::warn!(
                correlation_id = %correlation_id.short(),
                sink = self.sink.name(),
                message = %receipt.message,
                "Registration declined by sink"
            );
        }

        Ok(receipt)
    }
}
