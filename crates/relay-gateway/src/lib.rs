//! # relay-gateway
//!
//! WebSocket relay: an in-process topic router plus the per-connection
//! protocol session that feeds it.

pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod router;
pub mod server;

pub use server::run;
