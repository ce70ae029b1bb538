//! Sink used when no Discord credentials are configured.
//!
//! Nothing is sent anywhere; the player finishes registering in Discord by
//! pasting their export code into the bot.

use async_trait::async_trait;
use rushroyale_domain::Submission;

use crate::infrastructure::ports::{SinkError, SinkReceipt, SubmissionSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct ExportOnlySink;

#[async_trait]
impl SubmissionSink for ExportOnlySink {
    fn name(&self) -> &'static str {
        "export-only"
    }

    async fn deliver(&self, submission: &Submission) -> Result<SinkReceipt, SinkError> {
        tracing::debug!(
            discord_id = %submission.context.discord_id,
            "No Discord delivery configured, returning export code only"
        );
        Ok(
            SinkReceipt::new("Registration received! Use the export code to complete in Discord.")
                .with_export_code(),
        )
    }
}
