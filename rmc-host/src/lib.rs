//! Motion pipeline and serial link-layer driver for the drawing robot's
//! motor controller.
//!
//! `pipeline` turns tool-path text into packed [`frame::FrameV02`] motion
//! commands; `link` streams them to the controller over a framed serial
//! channel using a stop-and-wait handshake driven by `link::dispatcher`'s
//! interpretation of inbound [`frame::FrameV01`] event codes.

pub mod config;
pub mod crc;
pub mod error;
pub mod frame;
pub mod kinematics;
pub mod link;
pub mod notify;
pub mod pipeline;
pub mod quantize;
pub mod spline;
pub mod spool;
pub mod toolpath;
pub mod tracing_support;
pub mod zplan;

pub use error::{Result, RmcError};
