//! Rush Royale registration engine.
//!
//! Server side of tournament registration: re-validates what the browser
//! form submits and delivers it to Discord for moderator review.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

/// Shared registrations and a fake Discord for tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
pub use config::{ConfigError, EngineConfig};
