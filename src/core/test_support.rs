//! In-memory transport for unit tests

use super::error::{LoggerError, Result};
use super::frame::decode_frame;
use super::transport::{Ack, Transport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// What the scripted transport observed, shared with the test body
#[derive(Debug, Default)]
pub struct Observed {
    pub frames: Vec<Vec<u8>>,
    pub send_calls: usize,
    pub reconnects: usize,
    pub closed: bool,
}

impl Observed {
    pub fn bodies(&self) -> Vec<String> {
        self.frames
            .iter()
            .map(|f| decode_frame(f).expect("valid frame").body().to_string())
            .collect()
    }
}

/// Transport that fails or acks according to a script
///
/// Sends pop from `send_failures` (true = fail this write); acks pop from
/// `acks`, defaulting to `OK` once the script runs out. A failed write
/// loses the connection until the next `reconnect`, like a socket does.
pub struct ScriptedTransport {
    pub observed: Arc<Mutex<Observed>>,
    send_failures: VecDeque<bool>,
    acks: VecDeque<Ack>,
    connected: bool,
}

impl ScriptedTransport {
    pub fn reliable() -> Self {
        Self {
            observed: Arc::new(Mutex::new(Observed::default())),
            send_failures: VecDeque::new(),
            acks: VecDeque::new(),
            connected: true,
        }
    }

    /// Fail the first `n` writes
    pub fn failing_first(n: usize) -> Self {
        let mut transport = Self::reliable();
        transport.send_failures = std::iter::repeat(true).take(n).collect();
        transport
    }

    pub fn with_acks(mut self, acks: impl IntoIterator<Item = Ack>) -> Self {
        self.acks = acks.into_iter().collect();
        self
    }

    pub fn observer(&self) -> Arc<Mutex<Observed>> {
        Arc::clone(&self.observed)
    }
}

impl Transport for ScriptedTransport {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        let mut observed = self.observed.lock();
        observed.send_calls += 1;
        if !self.connected {
            return Err(LoggerError::NotConnected);
        }
        if self.send_failures.pop_front().unwrap_or(false) {
            self.connected = false;
            return Err(LoggerError::transport(
                "writing frame",
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "scripted failure"),
            ));
        }
        observed.frames.push(frame.to_vec());
        Ok(())
    }

    fn read_ack(&mut self) -> Result<Ack> {
        Ok(self.acks.pop_front().unwrap_or(Ack::Accepted))
    }

    fn reconnect(&mut self) -> Result<()> {
        self.observed.lock().reconnects += 1;
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.observed.lock().closed = true;
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
