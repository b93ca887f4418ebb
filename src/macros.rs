//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```no_run
//! use evenscribe::prelude::*;
//! use evenscribe::info;
//!
//! let logger = Logger::new(Options::new().with_service_name("acme-auth-service"))?;
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Complex formatting
//! let user_id = 42;
//! let action = "login";
//! info!(logger, "User {} performed action: {}", user_id, action);
//! # Ok::<(), evenscribe::LoggerError>(())
//! ```

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```no_run
/// # use evenscribe::prelude::*;
/// # let logger = Logger::new(Options::new().with_service_name("svc")).unwrap();
/// use evenscribe::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error3, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// ```no_run
/// # use evenscribe::prelude::*;
/// # let logger = Logger::new(Options::new().with_service_name("svc")).unwrap();
/// use evenscribe::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```no_run
/// # use evenscribe::prelude::*;
/// # let logger = Logger::new(Options::new().with_service_name("svc")).unwrap();
/// use evenscribe::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```no_run
/// # use evenscribe::prelude::*;
/// # let logger = Logger::new(Options::new().with_service_name("svc")).unwrap();
/// use evenscribe::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's exit hook.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Fatal, $($arg)+)
    };
}
