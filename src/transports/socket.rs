//! Stream socket transport to the collector daemon
//!
//! Connects over a Unix domain socket (the default) or TCP, writes whole
//! frames and reads two-byte acknowledgements. A failed write or read
//! discards the stream so the next attempt has to re-dial.

use crate::core::{Ack, LoggerError, Result, Transport};
use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// Where the daemon listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Unix domain socket path
    Unix(PathBuf),
    /// `host:port`
    Tcp(String),
}

impl Endpoint {
    /// Parse a socket address
    ///
    /// `tcp://host:port` selects TCP; `unix://path` or a bare path selects a
    /// Unix domain socket.
    ///
    /// ```
    /// use evenscribe::transports::Endpoint;
    ///
    /// assert_eq!(
    ///     Endpoint::parse("tcp://127.0.0.1:7070").unwrap(),
    ///     Endpoint::Tcp("127.0.0.1:7070".to_string())
    /// );
    /// assert!(matches!(
    ///     Endpoint::parse("/tmp/olympus_socket.sock").unwrap(),
    ///     Endpoint::Unix(_)
    /// ));
    /// ```
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim();
        if let Some(host_port) = address.strip_prefix("tcp://") {
            if host_port.is_empty() || !host_port.contains(':') {
                return Err(LoggerError::config(
                    "Endpoint",
                    format!("expected tcp://host:port, got '{address}'"),
                ));
            }
            return Ok(Endpoint::Tcp(host_port.to_string()));
        }

        let path = address.strip_prefix("unix://").unwrap_or(address);
        if path.is_empty() {
            return Err(LoggerError::config("Endpoint", "socket path is empty"));
        }
        Ok(Endpoint::Unix(PathBuf::from(path)))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            Endpoint::Tcp(host_port) => write!(f, "tcp://{host_port}"),
        }
    }
}

/// Open stream to the daemon
enum Stream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Stream {
    fn set_timeouts(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            Stream::Tcp(stream) => {
                stream.set_write_timeout(timeout)?;
                stream.set_read_timeout(timeout)
            }
            #[cfg(unix)]
            Stream::Unix(stream) => {
                stream.set_write_timeout(timeout)?;
                stream.set_read_timeout(timeout)
            }
        }
    }

    fn shutdown(&self) -> io::Result<()> {
        match self {
            Stream::Tcp(stream) => stream.shutdown(Shutdown::Both),
            #[cfg(unix)]
            Stream::Unix(stream) => stream.shutdown(Shutdown::Both),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Stream::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Stream::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Stream::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Stream::Unix(stream) => stream.flush(),
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Stream::Unix(stream) => stream.read(buf),
        }
    }
}

fn connect_tcp(host_port: &str, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let mut last_error = None;
    for addr in host_port.to_socket_addrs()? {
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                // Frames are written whole; don't let Nagle hold them back
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses resolved for {host_port}"),
        )
    }))
}

fn dial(endpoint: &Endpoint, timeout: Option<Duration>) -> io::Result<Stream> {
    let stream = match endpoint {
        Endpoint::Tcp(host_port) => Stream::Tcp(connect_tcp(host_port, timeout)?),
        Endpoint::Unix(path) => {
            #[cfg(unix)]
            {
                Stream::Unix(UnixStream::connect(path)?)
            }
            #[cfg(not(unix))]
            {
                let _ = path;
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "unix domain sockets are not supported on this platform",
                ));
            }
        }
    };
    stream.set_timeouts(timeout)?;
    Ok(stream)
}

/// Single stream connection to the daemon
///
/// # Example
///
/// ```no_run
/// use evenscribe::transports::{Endpoint, SocketTransport};
/// use std::time::Duration;
///
/// let endpoint = Endpoint::parse("/tmp/olympus_socket.sock").unwrap();
/// let transport = SocketTransport::connect(endpoint, Duration::from_secs(1))
///     .expect("daemon not running");
/// ```
pub struct SocketTransport {
    endpoint: Endpoint,
    timeout: Option<Duration>,
    stream: Option<Stream>,
    name: String,
}

impl SocketTransport {
    /// Dial `endpoint`
    ///
    /// `timeout` bounds connecting, each frame write and each ack read.
    /// A zero timeout means block indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Connection`] if the daemon cannot be reached.
    pub fn connect(endpoint: Endpoint, timeout: Duration) -> Result<Self> {
        let timeout = (!timeout.is_zero()).then_some(timeout);
        let stream = dial(&endpoint, timeout)
            .map_err(|e| LoggerError::connection(endpoint.to_string(), e))?;

        Ok(Self {
            name: endpoint.to_string(),
            endpoint,
            timeout,
            stream: Some(stream),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn stream(&mut self) -> Result<&mut Stream> {
        self.stream.as_mut().ok_or(LoggerError::NotConnected)
    }
}

impl Transport for SocketTransport {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        let stream = self.stream()?;
        let result = stream.write_all(frame).and_then(|()| stream.flush());
        if let Err(e) = result {
            // Part of the frame may be on the wire; the stream is out of sync
            self.stream = None;
            return Err(LoggerError::transport("writing frame", e));
        }
        Ok(())
    }

    fn read_ack(&mut self) -> Result<Ack> {
        let mut token = [0u8; 2];
        let result = self.stream()?.read_exact(&mut token);
        if let Err(e) = result {
            self.stream = None;
            return Err(LoggerError::transport("reading acknowledgement", e));
        }
        Ok(Ack::from_bytes(token))
    }

    fn reconnect(&mut self) -> Result<()> {
        if let Some(old) = self.stream.take() {
            let _ = old.shutdown();
        }
        let stream = dial(&self.endpoint, self.timeout)
            .map_err(|e| LoggerError::connection(self.endpoint.to_string(), e))?;
        log::debug!("reconnected to {}", self.endpoint);
        self.stream = Some(stream);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            match stream.shutdown() {
                Ok(()) => {}
                // Peer already went away
                Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
                Err(e) => return Err(LoggerError::transport("closing stream", e)),
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for SocketTransport {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
