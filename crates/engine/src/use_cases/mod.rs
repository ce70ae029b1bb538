//! Use cases - User story orchestration.

pub mod register;

pub use register::{RegisterError, SubmitRegistration};
