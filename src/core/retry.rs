//! Bounded retry around one write (and optional ack) cycle
//!
//! The controller walks `Idle → Sending → (Acked | Failed) → (Done | Retrying)`
//! for a single record. The retry budget belongs to the record: a record
//! gets at most `retry_count + 1` attempts and is dropped afterwards.

use super::error::LoggerError;
use super::metrics::LoggerMetrics;
use super::transport::{Ack, Transport};
use parking_lot::Mutex;
use rand::Rng;
use std::thread;
use std::time::Duration;

/// Default pause before the first retry
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// Default upper bound for the pause between retries
pub const DEFAULT_RETRY_BACKOFF_CAP: Duration = Duration::from_millis(250);

/// Retry budget and pacing for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one
    pub retry_count: u32,
    /// Read the daemon's `OK`/`NO` after each frame
    pub wait_for_ack: bool,
    /// Pause before the first retry, doubled for each further retry
    pub backoff_base: Duration,
    /// Upper bound for the pause
    pub backoff_cap: Duration,
}

impl RetryPolicy {
    pub fn new(retry_count: u32) -> Self {
        Self {
            retry_count,
            wait_for_ack: false,
            backoff_base: DEFAULT_RETRY_BACKOFF,
            backoff_cap: DEFAULT_RETRY_BACKOFF_CAP,
        }
    }

    #[must_use]
    pub fn with_ack(mut self, wait_for_ack: bool) -> Self {
        self.wait_for_ack = wait_for_ack;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_cap = cap;
        self
    }

    /// Attempts one record may use, first one included
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    /// Upper bound of the pause before retry number `retry` (1-based)
    pub fn backoff_ceiling(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor).min(self.backoff_cap)
    }

    /// Jittered pause in the upper half of [`backoff_ceiling`](Self::backoff_ceiling)
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let ceiling = self.backoff_ceiling(retry);
        let max_nanos = ceiling.as_nanos().min(u128::from(u64::MAX)) as u64;
        if max_nanos == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(rand::thread_rng().gen_range(max_nanos / 2..=max_nanos))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Idle,
    Sending,
    Acked,
    Failed,
    Retrying,
    Done,
}

/// Final result for one record
#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    Dropped { attempts: u32, error: LoggerError },
}

impl DeliveryOutcome {
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryOutcome::Delivered { attempts } | DeliveryOutcome::Dropped { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Drives one frame through send, optional ack, and retries
///
/// The transport lock is taken per attempt and covers any re-dial, the write
/// and its ack read. Backoff sleeps happen outside the lock so other
/// workers can use the connection meanwhile.
pub struct RetryController<'a> {
    policy: &'a RetryPolicy,
    metrics: &'a LoggerMetrics,
    state: RetryState,
    attempts: u32,
}

impl<'a> RetryController<'a> {
    pub fn new(policy: &'a RetryPolicy, metrics: &'a LoggerMetrics) -> Self {
        Self {
            policy,
            metrics,
            state: RetryState::Idle,
            attempts: 0,
        }
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn deliver<T>(&mut self, transport: &Mutex<T>, frame: &[u8]) -> DeliveryOutcome
    where
        T: Transport + ?Sized,
    {
        self.transition(RetryState::Sending);
        loop {
            self.attempts = self.attempts.saturating_add(1);
            let result = {
                let mut conn = transport.lock();
                self.attempt(&mut *conn, frame)
            };

            let error = match result {
                Ok(()) => {
                    self.transition(RetryState::Acked);
                    self.transition(RetryState::Done);
                    return DeliveryOutcome::Delivered {
                        attempts: self.attempts,
                    };
                }
                Err(error) => error,
            };

            self.transition(RetryState::Failed);
            self.metrics.record_failed_attempt();

            if !error.is_retryable() || self.attempts > self.policy.retry_count {
                self.transition(RetryState::Done);
                return DeliveryOutcome::Dropped {
                    attempts: self.attempts,
                    error,
                };
            }

            log::debug!(
                "attempt {} of {} failed: {}",
                self.attempts,
                self.policy.max_attempts(),
                error
            );
            self.transition(RetryState::Retrying);
            self.metrics.record_retry();

            let delay = self.policy.backoff_delay(self.attempts);
            if !delay.is_zero() {
                thread::sleep(delay);
            }

            self.transition(RetryState::Sending);
        }
    }

    /// One write and optional ack read, under the caller's lock
    ///
    /// A lost stream is dialed again first, whoever lost it. A failure that
    /// leaves the stream out of sync closes it so the next attempt re-dials.
    fn attempt<T>(&self, transport: &mut T, frame: &[u8]) -> Result<(), LoggerError>
    where
        T: Transport + ?Sized,
    {
        if !transport.is_connected() {
            transport.reconnect()?;
            self.metrics.record_reconnect();
        }

        let result = Self::exchange(transport, frame, self.policy.wait_for_ack);
        if let Err(error) = &result {
            if error.breaks_connection() && transport.is_connected() {
                if let Err(e) = transport.close() {
                    log::debug!("closing {} failed: {}", transport.name(), e);
                }
            }
        }
        result
    }

    fn exchange<T>(transport: &mut T, frame: &[u8], wait_for_ack: bool) -> Result<(), LoggerError>
    where
        T: Transport + ?Sized,
    {
        transport.send_frame(frame)?;
        if !wait_for_ack {
            return Ok(());
        }
        match transport.read_ack()? {
            Ack::Accepted => Ok(()),
            Ack::Rejected => Err(LoggerError::AckRejected),
            Ack::Unrecognized(token) => Err(LoggerError::Protocol { token }),
        }
    }

    fn transition(&mut self, next: RetryState) {
        log::trace!("retry state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
