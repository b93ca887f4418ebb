//! Dispatch pipeline: hand-off channel plus a fixed worker pool
//!
//! Logging calls enqueue records; `number_of_workers` threads drain the
//! channel and push each record through the retry controller over the one
//! shared transport. With a single worker, records leave in enqueue order.
//! With more workers, every record is still sent exactly once, but order
//! across workers is not preserved.

use super::{
    error::{LoggerError, Result},
    frame::encode_frame,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    retry::{DeliveryOutcome, RetryController, RetryPolicy},
    transport::Transport,
};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for draining buffered records (5 seconds)
///
/// Used when the dispatcher is dropped without explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport shared by all workers
pub type SharedTransport = Arc<Mutex<Box<dyn Transport>>>;

/// Unit of work on the hand-off channel
struct Job {
    record: LogRecord,
    completion: Option<Sender<DeliveryOutcome>>,
}

/// Worker pool settings
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub workers: usize,
    pub queue_capacity: Option<usize>,
    pub policy: RetryPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            queue_capacity: None,
            policy: RetryPolicy::default(),
        }
    }
}

pub struct Dispatcher {
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
    transport: SharedTransport,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    /// Spawn the worker pool around `transport`
    pub fn start(
        transport: Box<dyn Transport>,
        config: DispatchConfig,
        metrics: Arc<LoggerMetrics>,
    ) -> Result<Self> {
        if config.workers == 0 {
            return Err(LoggerError::config(
                "Dispatcher",
                "at least one worker is required",
            ));
        }

        let (sender, receiver) = match config.queue_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };
        let transport: SharedTransport = Arc::new(Mutex::new(transport));
        let policy = Arc::new(config.policy);

        let mut workers = Vec::with_capacity(config.workers);
        for id in 0..config.workers {
            let receiver = receiver.clone();
            let transport = Arc::clone(&transport);
            let policy = Arc::clone(&policy);
            let metrics = Arc::clone(&metrics);

            let handle = thread::Builder::new()
                .name(format!("evenscribe-worker-{id}"))
                .spawn(move || Self::worker_loop(receiver, transport, policy, metrics))?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
            transport,
            metrics,
        })
    }

    fn worker_loop(
        receiver: Receiver<Job>,
        transport: SharedTransport,
        policy: Arc<RetryPolicy>,
        metrics: Arc<LoggerMetrics>,
    ) {
        while let Ok(job) = receiver.recv() {
            let Job { record, completion } = job;

            // A panic while encoding or sending must not take the worker down with it
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                Self::process(&record, &transport, &policy, &metrics)
            }))
            .unwrap_or_else(|panic_info| {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                log::error!("worker panicked while sending a record: {}", panic_msg);
                metrics.record_dropped();
                DeliveryOutcome::Dropped {
                    attempts: 0,
                    error: LoggerError::WorkerPanicked(panic_msg),
                }
            });

            if let Some(done) = completion {
                let _ = done.send(outcome);
            }
        }
    }

    fn process(
        record: &LogRecord,
        transport: &SharedTransport,
        policy: &RetryPolicy,
        metrics: &LoggerMetrics,
    ) -> DeliveryOutcome {
        let outcome = match encode_frame(record) {
            Ok(frame) => RetryController::new(policy, metrics).deliver(transport.as_ref(), &frame),
            Err(error) => DeliveryOutcome::Dropped { attempts: 0, error },
        };

        match &outcome {
            DeliveryOutcome::Delivered { .. } => {
                metrics.record_delivered();
            }
            DeliveryOutcome::Dropped { attempts, error } => {
                metrics.record_dropped();
                log::warn!(
                    "dropping {} record from '{}' after {} attempt(s): {}",
                    record.severity_text(),
                    record.service_name(),
                    attempts,
                    error
                );
            }
        }
        outcome
    }

    /// Hand a record to the workers
    ///
    /// Blocks only when the channel is bounded and full.
    pub fn enqueue(&self, record: LogRecord) -> Result<()> {
        self.send_job(Job {
            record,
            completion: None,
        })
    }

    /// Hand a record to the workers and get notified of its outcome
    pub fn enqueue_tracked(&self, record: LogRecord) -> Result<Receiver<DeliveryOutcome>> {
        let (done, outcome) = bounded(1);
        self.send_job(Job {
            record,
            completion: Some(done),
        })?;
        Ok(outcome)
    }

    fn send_job(&self, job: Job) -> Result<()> {
        self.metrics.record_enqueued();
        let sent = match self.sender {
            Some(ref sender) => sender.send(job).is_ok(),
            None => false,
        };
        if sent {
            Ok(())
        } else {
            self.metrics.record_dropped();
            Err(LoggerError::LoggerStopped)
        }
    }

    /// Records waiting in the channel
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, |s| s.len())
    }

    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Close the channel, drain buffered records, then close the socket
    ///
    /// Returns `true` if every worker finished within `timeout`.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        // Closing the channel lets workers finish what is buffered and exit
        drop(self.sender.take());

        let start = Instant::now();
        let mut clean = true;

        for handle in self.workers.drain(..) {
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        log::error!("worker thread panicked during shutdown: {:?}", e);
                        clean = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    log::warn!(
                        "worker thread did not finish within {:?}; buffered records may be lost",
                        timeout
                    );
                    clean = false;
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        let grace = timeout
            .saturating_sub(start.elapsed())
            .max(Duration::from_millis(10));
        match self.transport.try_lock_for(grace) {
            Some(mut transport) => {
                if let Err(e) = transport.close() {
                    log::warn!("failed to close {} transport: {}", transport.name(), e);
                }
            }
            None => {
                log::warn!("transport still busy at shutdown; leaving it open");
                clean = false;
            }
        }

        clean
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if self.sender.is_some() || !self.workers.is_empty() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}
