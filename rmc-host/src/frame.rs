//! Bit-exact pack/unpack for the three wire frame versions, plus the
//! byte-wise inbound framing state machine.
//!
//! In-memory representation is an explicit struct per version; wire layout
//! is produced and consumed with little-endian reader/writer routines
//! instead of a `#[repr(packed)]` reinterpret cast over a byte buffer.

use thiserror::Error;

use crate::crc;

pub const SFD: u8 = 0xAB;
pub const EFD: u8 = 0xCD;

pub const V01_VERSION: u8 = 1;
pub const V01_SIZE: usize = 7;

pub const V02_VERSION: u8 = 2;
pub const V02_SIZE: usize = 12;

pub const V03_VERSION: u8 = 3;
pub const V03_SIZE: usize = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("bad start delimiter: expected {SFD:#04x}, got {0:#04x}")]
    BadStartDelimiter(u8),

    #[error("bad end delimiter: expected {EFD:#04x}, got {0:#04x}")]
    BadEndDelimiter(u8),

    #[error("bad version: expected {expected}, got {actual}")]
    BadVersion { expected: u8, actual: u8 },

    #[error("CRC check failed")]
    CrcMismatch,
}

/// Ack/event frame, controller to host (7 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameV01 {
    pub code: i16,
}

impl FrameV01 {
    pub fn pack(&self) -> [u8; V01_SIZE] {
        let mut buf = [0u8; V01_SIZE];
        buf[0] = SFD;
        buf[1] = V01_VERSION;
        buf[2..4].copy_from_slice(&self.code.to_le_bytes());
        let crc = crc::compute(&buf[..4]);
        buf[4..6].copy_from_slice(&crc.to_le_bytes());
        buf[6] = EFD;
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < V01_SIZE {
            return Err(FrameError::TooShort {
                expected: V01_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != SFD {
            return Err(FrameError::BadStartDelimiter(bytes[0]));
        }
        if bytes[1] != V01_VERSION {
            return Err(FrameError::BadVersion {
                expected: V01_VERSION,
                actual: bytes[1],
            });
        }
        if bytes[6] != EFD {
            return Err(FrameError::BadEndDelimiter(bytes[6]));
        }
        if !crc::residue_is_zero(&bytes[..V01_SIZE]) {
            return Err(FrameError::CrcMismatch);
        }
        let code = i16::from_le_bytes([bytes[2], bytes[3]]);
        Ok(FrameV01 { code })
    }
}

/// Motion command frame, host to controller (12 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameV02 {
    pub code: u8,
    pub theta1: i16,
    pub theta2: i16,
    pub d3: i16,
}

impl FrameV02 {
    pub fn pack(&self) -> [u8; V02_SIZE] {
        let mut buf = [0u8; V02_SIZE];
        buf[0] = SFD;
        buf[1] = V02_VERSION;
        buf[2] = self.code;
        buf[3..5].copy_from_slice(&self.theta1.to_le_bytes());
        buf[5..7].copy_from_slice(&self.theta2.to_le_bytes());
        buf[7..9].copy_from_slice(&self.d3.to_le_bytes());
        let crc = crc::compute(&buf[..9]);
        buf[9..11].copy_from_slice(&crc.to_le_bytes());
        buf[11] = EFD;
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < V02_SIZE {
            return Err(FrameError::TooShort {
                expected: V02_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != SFD {
            return Err(FrameError::BadStartDelimiter(bytes[0]));
        }
        if bytes[1] != V02_VERSION {
            return Err(FrameError::BadVersion {
                expected: V02_VERSION,
                actual: bytes[1],
            });
        }
        if bytes[11] != EFD {
            return Err(FrameError::BadEndDelimiter(bytes[11]));
        }
        if !crc::residue_is_zero(&bytes[..V02_SIZE]) {
            return Err(FrameError::CrcMismatch);
        }
        Ok(FrameV02 {
            code: bytes[2],
            theta1: i16::from_le_bytes([bytes[3], bytes[4]]),
            theta2: i16::from_le_bytes([bytes[5], bytes[6]]),
            d3: i16::from_le_bytes([bytes[7], bytes[8]]),
        })
    }
}

/// Reserved 5-joint frame (15 bytes). Not produced or consumed anywhere in
/// this implementation; a forward-compatible wire version with its own
/// testable codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameV03 {
    pub theta: [i16; 4],
    pub d5: i16,
}

impl FrameV03 {
    pub fn pack(&self) -> [u8; V03_SIZE] {
        let mut buf = [0u8; V03_SIZE];
        buf[0] = SFD;
        buf[1] = V03_VERSION;
        for (i, theta) in self.theta.iter().enumerate() {
            let off = 2 + i * 2;
            buf[off..off + 2].copy_from_slice(&theta.to_le_bytes());
        }
        buf[10..12].copy_from_slice(&self.d5.to_le_bytes());
        let crc = crc::compute(&buf[..12]);
        buf[12..14].copy_from_slice(&crc.to_le_bytes());
        buf[14] = EFD;
        buf
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < V03_SIZE {
            return Err(FrameError::TooShort {
                expected: V03_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != SFD {
            return Err(FrameError::BadStartDelimiter(bytes[0]));
        }
        if bytes[1] != V03_VERSION {
            return Err(FrameError::BadVersion {
                expected: V03_VERSION,
                actual: bytes[1],
            });
        }
        if bytes[14] != EFD {
            return Err(FrameError::BadEndDelimiter(bytes[14]));
        }
        if !crc::residue_is_zero(&bytes[..V03_SIZE]) {
            return Err(FrameError::CrcMismatch);
        }
        let mut theta = [0i16; 4];
        for (i, slot) in theta.iter_mut().enumerate() {
            let off = 2 + i * 2;
            *slot = i16::from_le_bytes([bytes[off], bytes[off + 1]]);
        }
        let d5 = i16::from_le_bytes([bytes[10], bytes[11]]);
        Ok(FrameV03 { theta, d5 })
    }
}

/// Byte-wise framing state machine for inbound V01 frames. Feed it one
/// byte at a time; it never blocks and never looks ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReceiverState {
    SeekSfd,
    SeekVersion,
    Body { len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverEvent {
    Frame(FrameV01),
    BadVersion(u8),
    FrameCorrupt,
}

pub struct FrameReceiver {
    state: ReceiverState,
    buf: [u8; V01_SIZE],
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReceiver {
    pub fn new() -> Self {
        FrameReceiver {
            state: ReceiverState::SeekSfd,
            buf: [0u8; V01_SIZE],
        }
    }

    /// Feed one inbound byte. Returns `Some` exactly when a frame boundary
    /// (good or corrupt) completes; `None` while still accumulating.
    pub fn feed_byte(&mut self, byte: u8) -> Option<ReceiverEvent> {
        match self.state {
            ReceiverState::SeekSfd => {
                if byte == SFD {
                    self.buf[0] = byte;
                    self.state = ReceiverState::SeekVersion;
                }
                None
            }
            ReceiverState::SeekVersion => {
                if byte == V01_VERSION {
                    self.buf[1] = byte;
                    self.state = ReceiverState::Body { len: 2 };
                    None
                } else {
                    // The SFD found so far is discarded along with this byte.
                    self.state = ReceiverState::SeekSfd;
                    Some(ReceiverEvent::BadVersion(byte))
                }
            }
            ReceiverState::Body { len } => {
                self.buf[len] = byte;
                let len = len + 1;
                if len < V01_SIZE {
                    self.state = ReceiverState::Body { len };
                    return None;
                }
                self.state = ReceiverState::SeekSfd;
                match FrameV01::unpack(&self.buf) {
                    Ok(frame) => Some(ReceiverEvent::Frame(frame)),
                    Err(_) => Some(ReceiverEvent::FrameCorrupt),
                }
            }
        }
    }
}

/// `tokio_util::codec::Decoder` adapter over [`FrameReceiver`], so the
/// sender's event loop can drive the receiver through a
/// `tokio_util::codec::FramedRead`. This is a thin wrapper, not a second
/// implementation of the state machine — it cannot drift from
/// [`FrameReceiver::feed_byte`].
#[derive(Default)]
pub struct InboundFrameCodec {
    receiver: FrameReceiver,
}

impl tokio_util::codec::Decoder for InboundFrameCodec {
    type Item = ReceiverEvent;
    type Error = std::io::Error;

    fn decode(
        &mut self,
        src: &mut bytes::BytesMut,
    ) -> Result<Option<Self::Item>, Self::Error> {
        while !src.is_empty() {
            let byte = src[0];
            bytes::Buf::advance(src, 1);
            if let Some(event) = self.receiver.feed_byte(byte) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}
