//! Connection management
//!
//! Per-connection protocol sessions and their outbound frame queues.

mod outbound;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use outbound::{FrameSender, Outbound, OutboundError};
pub use session::{ConnectionSession, SessionState};
