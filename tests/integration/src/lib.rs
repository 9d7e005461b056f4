//! Integration test utilities for the relay
//!
//! Helpers for running end-to-end tests against the WebSocket gateway.

pub mod helpers;

pub use helpers::*;
