//! Main logger implementation

use super::{
    dispatch::{DispatchConfig, Dispatcher},
    error::Result,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    options::Options,
    record_builder::{LogArgs, RecordBuilder},
    severity::Severity,
    transport::Transport,
};
use crate::transports::{Endpoint, SocketTransport};
use std::sync::Arc;
use std::time::Duration;

/// Target used when mirroring records through the `log` facade
pub const MIRROR_TARGET: &str = "evenscribe::mirror";

/// Process exit status after a FATAL record
pub const FATAL_EXIT_CODE: i32 = 1;

/// Called with [`FATAL_EXIT_CODE`] once a FATAL record has been handed off
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

fn exit_process(code: i32) {
    std::process::exit(code)
}

/// Handle to the shipping pipeline
///
/// Logging calls never fail from the caller's point of view: records are
/// queued and delivered in the background, and delivery problems go to the
/// local `log` sink. The one exception is FATAL, which ends the process.
///
/// # Example
///
/// ```no_run
/// use evenscribe::{Logger, Options};
///
/// let logger = Logger::new(
///     Options::new()
///         .with_service_name("acme-auth-service")
///         .with_resource_attribute("environment", "production"),
/// )
/// .expect("collector daemon is not reachable");
///
/// logger.info("user logged in");
/// ```
pub struct Logger {
    options: Options,
    dispatcher: Dispatcher,
    metrics: Arc<LoggerMetrics>,
    template: RecordBuilder,
    exit_hook: ExitHook,
}

impl Logger {
    /// Validate `options`, dial the daemon and start the workers
    ///
    /// # Errors
    ///
    /// [`InvalidConfiguration`](super::LoggerError::InvalidConfiguration) for
    /// bad options (checked before dialing), and
    /// [`Connection`](super::LoggerError::Connection) when the daemon cannot
    /// be reached.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;
        let endpoint = Endpoint::parse(&options.socket_address)?;
        let transport = SocketTransport::connect(endpoint, options.max_execution_time())?;
        Self::with_transport(options, Box::new(transport))
    }

    /// Start the workers over an already established transport
    pub fn with_transport(options: Options, transport: Box<dyn Transport>) -> Result<Self> {
        options.validate()?;

        let metrics = Arc::new(LoggerMetrics::new());
        let dispatcher = Dispatcher::start(
            transport,
            DispatchConfig {
                workers: options.number_of_workers,
                queue_capacity: options.queue_capacity,
                policy: options.retry_policy(),
            },
            Arc::clone(&metrics),
        )?;

        let template = RecordBuilder::new()
            .with_service_name(options.service_name.clone())
            .with_resource_attributes(options.resource_attributes.clone())
            .with_timestamp_precision(options.timestamp_precision);

        log::debug!(
            "evenscribe started for '{}' with {} worker(s)",
            options.service_name,
            options.number_of_workers
        );

        Ok(Self {
            options,
            dispatcher,
            metrics,
            template,
            exit_hook: Arc::new(exit_process),
        })
    }

    /// Replace what happens after a FATAL record
    ///
    /// The default exits the process with status 1.
    #[must_use]
    pub fn with_exit_hook(mut self, hook: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.exit_hook = Arc::new(hook);
        self
    }

    /// Builder pre-filled with this logger's service name, resource
    /// attributes and timestamp precision
    pub fn record_builder(&self, severity: Severity, body: impl Into<String>) -> RecordBuilder {
        self.template
            .clone()
            .with_severity(severity)
            .with_body(body)
    }

    /// Ship a prepared record
    pub fn submit(&self, record: LogRecord) {
        if self.options.print_to_stdout {
            Self::mirror(&record);
        }

        let fatal = record.severity().is_some_and(|s| s.is_fatal());
        if fatal {
            self.submit_fatal(record);
            return;
        }

        if let Err(e) = self.dispatcher.enqueue(record) {
            log::warn!("record not queued: {}", e);
        }
    }

    fn submit_fatal(&self, record: LogRecord) {
        let deadline = self.options.max_execution_time();
        match self.dispatcher.enqueue_tracked(record) {
            Ok(done) => {
                let outcome = if deadline.is_zero() {
                    done.recv().ok()
                } else {
                    done.recv_timeout(deadline).ok()
                };
                match outcome {
                    Some(outcome) if outcome.is_delivered() => {}
                    Some(outcome) => log::error!(
                        "fatal record dropped after {} attempt(s)",
                        outcome.attempts()
                    ),
                    None => log::error!("fatal record not confirmed within {:?}", deadline),
                }
            }
            Err(e) => log::error!("fatal record not queued: {}", e),
        }

        (self.exit_hook)(FATAL_EXIT_CODE);
    }

    fn mirror(record: &LogRecord) {
        let severity = record.severity().unwrap_or_default();
        log::log!(
            target: MIRROR_TARGET,
            severity.log_level(),
            "[{}] {}: {}",
            severity,
            record.service_name(),
            record.body()
        );
    }

    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.submit(self.record_builder(severity, message).build());
    }

    pub fn log_with(&self, severity: Severity, message: impl Into<String>, args: LogArgs) {
        self.submit(
            self.record_builder(severity, message)
                .with_log_args(args)
                .build(),
        );
    }

    /// Log at the configured default severity
    pub fn print(&self, message: impl Into<String>) {
        self.log(self.options.default_severity, message);
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(Severity::Trace, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    /// Ship the record, wait for it, then run the exit hook
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Severity::Fatal, message);
    }

    pub fn trace_with(&self, message: impl Into<String>, args: LogArgs) {
        self.log_with(Severity::Trace, message, args);
    }

    pub fn debug_with(&self, message: impl Into<String>, args: LogArgs) {
        self.log_with(Severity::Debug, message, args);
    }

    /// Log with structured arguments
    ///
    /// ```no_run
    /// use evenscribe::{LogArgs, Logger, Options};
    ///
    /// let logger = Logger::new(Options::new().with_service_name("checkout")).unwrap();
    /// logger.info_with(
    ///     "order placed",
    ///     LogArgs::new()
    ///         .log_attribute("order_id", "A-1001")
    ///         .trace_id("4bf92f3577b34da6"),
    /// );
    /// ```
    pub fn info_with(&self, message: impl Into<String>, args: LogArgs) {
        self.log_with(Severity::Info, message, args);
    }

    pub fn warn_with(&self, message: impl Into<String>, args: LogArgs) {
        self.log_with(Severity::Warn, message, args);
    }

    pub fn error_with(&self, message: impl Into<String>, args: LogArgs) {
        self.log_with(Severity::Error, message, args);
    }

    pub fn fatal_with(&self, message: impl Into<String>, args: LogArgs) {
        self.log_with(Severity::Fatal, message, args);
    }

    /// Get the pipeline metrics
    ///
    /// # Example
    ///
    /// ```no_run
    /// use evenscribe::{Logger, Options};
    ///
    /// let logger = Logger::new(Options::new().with_service_name("svc")).unwrap();
    ///
    /// // After logging operations...
    /// let metrics = logger.metrics();
    /// println!("Delivered: {}", metrics.delivered_count());
    /// println!("Dropped: {}", metrics.dropped_count());
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Records waiting for a worker
    pub fn queued(&self) -> usize {
        self.dispatcher.queued()
    }

    /// Stop accepting records and drain what is buffered
    ///
    /// When the logger is dropped without calling `shutdown()` explicitly,
    /// it drains for `drain_timeout_ms`.
    ///
    /// # Returns
    ///
    /// `true` if every buffered record was processed within `timeout`
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let clean = self.dispatcher.shutdown(timeout);
        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            log::warn!(
                "evenscribe for '{}' dropped {} record(s) ({:.2}% of {})",
                self.options.service_name,
                dropped,
                self.metrics.drop_rate(),
                self.metrics.enqueued_count()
            );
        }
        clean
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.dispatcher.is_running() && !self.shutdown(self.options.drain_timeout()) {
            log::warn!(
                "logger shutdown timed out after {:?}; buffered records may be lost",
                self.options.drain_timeout()
            );
        }
    }
}
