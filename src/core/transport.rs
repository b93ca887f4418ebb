//! Transport trait for the connection to the daemon

use super::error::Result;
use std::fmt;

/// Acknowledgement read back after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// `OK`
    Accepted,
    /// `NO`
    Rejected,
    /// Any other two bytes
    Unrecognized([u8; 2]),
}

impl Ack {
    pub const OK: [u8; 2] = *b"OK";
    pub const NO: [u8; 2] = *b"NO";

    pub fn from_bytes(token: [u8; 2]) -> Self {
        match token {
            Self::OK => Ack::Accepted,
            Self::NO => Ack::Rejected,
            other => Ack::Unrecognized(other),
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        match self {
            Ack::Accepted => Self::OK,
            Ack::Rejected => Self::NO,
            Ack::Unrecognized(token) => token,
        }
    }

    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Ack::Accepted)
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.to_bytes()))
    }
}

/// A single stream connection to the daemon
///
/// Implementations are not expected to be safe for concurrent use; the
/// dispatcher holds them behind a mutex and performs a write and its ack
/// read under one lock.
pub trait Transport: Send {
    /// Write one complete frame
    fn send_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Read the two-byte acknowledgement for the last frame
    fn read_ack(&mut self) -> Result<Ack>;

    /// Drop the current stream, if any, and dial again
    fn reconnect(&mut self) -> Result<()>;

    /// Close the stream
    fn close(&mut self) -> Result<()>;

    /// Whether a stream is open and can take the next frame
    ///
    /// Transports without a stream to lose may keep the default.
    fn is_connected(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send_frame(frame)
    }

    fn read_ack(&mut self) -> Result<Ack> {
        (**self).read_ack()
    }

    fn reconnect(&mut self) -> Result<()> {
        (**self).reconnect()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
