//! Server library module.
//!
//! Exposes the polling loop so integration tests can drive it against a mock
//! Bot API.

pub mod poller;
