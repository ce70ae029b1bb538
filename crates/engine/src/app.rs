//! Application state and composition.

use std::sync::Arc;

use rushroyale_domain::Catalog;

use crate::config::{Delivery, DiscordConfig};
use crate::infrastructure::{
    clock::SystemClock,
    discord::{BotChannelSink, WebhookSink},
    export_only::ExportOnlySink,
    ports::{ClockPort, SubmissionSink},
};
use crate::use_cases::SubmitRegistration;

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub catalog: Arc<Catalog>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub register: SubmitRegistration,
}

impl App {
    pub fn new(catalog: Arc<Catalog>, sink: Arc<dyn SubmissionSink>) -> Self {
        Self {
            use_cases: UseCases {
                register: SubmitRegistration::new(catalog.clone(), sink),
            },
            catalog,
        }
    }
}

/// Pick the sink matching the configured Discord credentials.
pub fn build_sink(discord: &DiscordConfig, catalog: &Catalog) -> Arc<dyn SubmissionSink> {
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    match discord.delivery() {
        Delivery::Bot {
            token,
            fallback_channel_id,
        } => {
            let divisions = catalog
                .divisions
                .names()
                .into_iter()
                .map(str::to_string)
                .collect();
            Arc::new(BotChannelSink::new(
                &discord.api_base,
                &token,
                fallback_channel_id.as_deref(),
                divisions,
                clock,
            ))
        }
        Delivery::Webhook { url } => Arc::new(WebhookSink::new(&url, clock)),
        Delivery::ExportOnly => Arc::new(ExportOnlySink),
    }
}
