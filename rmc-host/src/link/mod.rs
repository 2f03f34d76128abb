//! Link-layer protocol engine: the stop-and-wait sender plus the event
//! dispatcher that interprets inbound V01 codes.

pub mod dispatcher;
pub mod jitter;
pub mod sender;

pub use sender::{send_all, LinkError, DEFAULT_RESEND_TIMEOUT};
