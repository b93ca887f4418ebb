//! Stub collector daemon shared by the integration and stress tests
//!
//! Accepts any number of connections, reads fixed-size frames, decodes
//! them and keeps the records it accepted. In ack mode it answers each
//! frame from a script, falling back to `OK` once the script is used up.
//! It can also hang up on its first connection after reading one frame.

#![allow(dead_code)]

use evenscribe::core::{decode_frame, LogRecord, FRAME_SIZE};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[derive(Default)]
struct Shared {
    records: Mutex<Vec<LogRecord>>,
    acks: Mutex<VecDeque<[u8; 2]>>,
    connections: AtomicUsize,
    frames: AtomicUsize,
    hang_up_first: AtomicBool,
}

pub struct StubDaemon {
    address: String,
    shared: Arc<Shared>,
    _dir: Option<TempDir>,
}

impl StubDaemon {
    /// Listen on a random local TCP port without acknowledging frames
    pub fn tcp() -> Self {
        Self::tcp_with(None)
    }

    /// Listen on TCP and answer every frame, scripted tokens first
    pub fn tcp_acking(script: &[&[u8; 2]]) -> Self {
        Self::tcp_with(Some(script))
    }

    /// Acking TCP daemon that drops the first connection after one frame,
    /// leaving that frame unanswered
    pub fn tcp_hanging_up_first() -> Self {
        let daemon = Self::tcp_with(Some(&[]));
        daemon.shared.hang_up_first.store(true, Ordering::SeqCst);
        daemon
    }

    fn tcp_with(script: Option<&[&[u8; 2]]>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub daemon");
        let address = format!("tcp://{}", listener.local_addr().unwrap());
        let shared = Self::shared(script);
        let ack = script.is_some();

        let accept_shared = Arc::clone(&shared);
        thread::spawn(move || {
            for conn in listener.incoming() {
                let Ok(conn) = conn else { break };
                let shared = Arc::clone(&accept_shared);
                thread::spawn(move || serve(conn, &shared, ack));
            }
        });

        Self {
            address,
            shared,
            _dir: None,
        }
    }

    /// Listen on a Unix socket in a fresh temporary directory
    #[cfg(unix)]
    pub fn unix(script: Option<&[&[u8; 2]]>) -> Self {
        use std::os::unix::net::UnixListener;

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("olympus_socket.sock");
        let listener = UnixListener::bind(&path).expect("bind stub daemon");
        let shared = Self::shared(script);
        let ack = script.is_some();

        let accept_shared = Arc::clone(&shared);
        thread::spawn(move || {
            for conn in listener.incoming() {
                let Ok(conn) = conn else { break };
                let shared = Arc::clone(&accept_shared);
                thread::spawn(move || serve(conn, &shared, ack));
            }
        });

        Self {
            address: path.to_string_lossy().into_owned(),
            shared,
            _dir: Some(dir),
        }
    }

    fn shared(script: Option<&[&[u8; 2]]>) -> Arc<Shared> {
        let shared = Shared::default();
        if let Some(script) = script {
            shared.acks.lock().extend(script.iter().map(|token| **token));
        }
        Arc::new(shared)
    }

    /// Value for `Options::socket_address`
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.shared.records.lock().clone()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.records().iter().map(|r| r.body().to_string()).collect()
    }

    pub fn connections(&self) -> usize {
        self.shared.connections.load(Ordering::SeqCst)
    }

    /// Frames read, accepted or not
    pub fn frames_seen(&self) -> usize {
        self.shared.frames.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` records were accepted
    pub fn wait_for(&self, count: usize, timeout: Duration) -> Vec<LogRecord> {
        let start = Instant::now();
        loop {
            let records = self.records();
            if records.len() >= count || start.elapsed() >= timeout {
                return records;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

fn serve<S: Read + Write>(mut conn: S, shared: &Shared, ack: bool) {
    let index = shared.connections.fetch_add(1, Ordering::SeqCst);
    let mut frame = vec![0u8; FRAME_SIZE];
    loop {
        if conn.read_exact(&mut frame).is_err() {
            return;
        }
        shared.frames.fetch_add(1, Ordering::SeqCst);
        if index == 0 && shared.hang_up_first.load(Ordering::SeqCst) {
            return;
        }
        let Ok(record) = decode_frame(&frame) else {
            return;
        };

        if !ack {
            shared.records.lock().push(record);
            continue;
        }

        let token = shared.acks.lock().pop_front().unwrap_or(*b"OK");
        if &token == b"OK" {
            shared.records.lock().push(record);
        }
        if conn.write_all(&token).is_err() {
            return;
        }
    }
}
