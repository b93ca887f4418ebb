//! Core pipeline types and traits

pub mod dispatch;
pub mod error;
pub mod frame;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod record_builder;
pub mod retry;
pub mod severity;
pub mod timestamp;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::{DispatchConfig, Dispatcher, SharedTransport, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use frame::{decode_frame, encode_frame, FRAME_SIZE, PADDING_BYTE};
pub use log_record::{Attributes, LogRecord};
pub use logger::{ExitHook, Logger, FATAL_EXIT_CODE, MIRROR_TARGET};
pub use metrics::LoggerMetrics;
pub use options::{Options, DEFAULT_SOCKET_ADDRESS};
pub use record_builder::{ArgValue, LogArgs, RecordBuilder};
pub use retry::{DeliveryOutcome, RetryController, RetryPolicy, RetryState};
pub use severity::Severity;
pub use timestamp::TimestampPrecision;
pub use transport::{Ack, Transport};
