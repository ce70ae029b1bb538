//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod correlation;
pub mod discord;
pub mod export_only;
pub mod ports;
