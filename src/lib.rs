//! # evenscribe
//!
//! Client-side log shipping for the evenscribe collector daemon.
//!
//! ## Features
//!
//! - **Structured records**: OpenTelemetry-style severity, trace and span ids,
//!   resource and log attributes
//! - **Non-blocking calls**: records are queued and shipped by a fixed worker pool
//! - **Bounded retries**: per-record retry budget with jittered backoff and reconnects
//! - **Unix or TCP**: fixed-size frames with an optional `OK`/`NO` acknowledgement
//!
//! ## Example
//!
//! ```no_run
//! use evenscribe::prelude::*;
//!
//! let logger = Logger::new(
//!     Options::new()
//!         .with_service_name("acme-auth-service")
//!         .with_number_of_workers(2),
//! )?;
//!
//! logger.info("service started");
//! logger.warn_with("slow request", LogArgs::new().trace_id("4bf92f3577b34da6"));
//! # Ok::<(), evenscribe::LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod transports;

pub mod prelude {
    pub use crate::core::{
        Attributes, LogArgs, LogRecord, Logger, LoggerError, LoggerMetrics, Options,
        RecordBuilder, Result, Severity, TimestampPrecision, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::transports::{Endpoint, SocketTransport};
}

pub use core::{
    Ack, ArgValue, Attributes, DeliveryOutcome, LogArgs, LogRecord, Logger, LoggerError,
    LoggerMetrics, Options, RecordBuilder, Result, RetryPolicy, Severity, TimestampPrecision,
    Transport, DEFAULT_SHUTDOWN_TIMEOUT, FRAME_SIZE,
};
pub use transports::{Endpoint, SocketTransport};
