//! Crate-wide error type.
//!
//! Every module-local error enum ([`ParseError`], [`KinematicsError`],
//! [`QuantizeError`], [`FrameError`], [`LinkError`], [`SpoolError`]) converts
//! into [`RmcError`] via `#[from]`. Only the two binaries translate an
//! `RmcError` into a process exit code; everything below that boundary
//! returns a typed `Result`.

use thiserror::Error;

use crate::frame::FrameError;
use crate::kinematics::KinematicsError;
use crate::link::LinkError;
use crate::pipeline::PlanError;
use crate::quantize::QuantizeError;
use crate::spool::SpoolError;
use crate::toolpath::ParseError;

pub type Result<T> = std::result::Result<T, RmcError>;

#[derive(Debug, Error)]
pub enum RmcError {
    #[error("file I/O error: {0}")]
    FileIo(#[from] std::io::Error),

    #[error("serial I/O error: {0}")]
    SerialIo(String),

    #[error("malformed tool-path: {0}")]
    MalformedPath(#[from] ParseError),

    #[error("inverse kinematics failure: {0}")]
    Unreachable(#[from] KinematicsError),

    #[error("quantization failure: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("frame codec failure: {0}")]
    FrameCorrupt(#[from] FrameError),

    #[error("spool file error: {0}")]
    Spool(#[from] SpoolError),

    #[error("planning failure: {0}")]
    Plan(#[from] PlanError),

    #[error("link-layer failure: {0}")]
    Link(#[from] LinkError),

    #[error("controller fault, code {0}")]
    ControllerFault(i16),

    #[error("resend budget exhausted after {0} attempts")]
    TimeoutExhausted(u32),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RmcError {
    /// Short machine-readable kind, used in notifier footnotes.
    pub fn kind(&self) -> &'static str {
        match self {
            RmcError::FileIo(_) => "FileIO",
            RmcError::SerialIo(_) => "SerialIO",
            RmcError::MalformedPath(_) => "MalformedPath",
            RmcError::Unreachable(_) => "Unreachable",
            RmcError::Quantize(_) => "Quantize",
            RmcError::FrameCorrupt(_) => "FrameCorrupt",
            RmcError::Spool(_) => "Spool",
            RmcError::Plan(_) => "Plan",
            RmcError::Link(_) => "Link",
            RmcError::ControllerFault(_) => "ControllerFault",
            RmcError::TimeoutExhausted(_) => "TimeoutExhausted",
            RmcError::Config(_) => "Config",
        }
    }
}
