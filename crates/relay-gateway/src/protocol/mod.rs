//! Relay wire protocol
//!
//! Defines inbound frame decoding, outbound frames, and close codes.

mod close_codes;
mod frames;

pub use close_codes::CloseCode;
pub use frames::{
    frame_types, presence_payload, AuthAck, FrameError, FrameKind, InboundFrame,
    SessionDescriptor,
};
