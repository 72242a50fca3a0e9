//! Poll policy: attempt budget and wait between attempts
//!
//! The budget counts *retries*: the first status query is always made, and
//! up to `max_attempts` further queries follow while the request is pending.
//! A budget of zero therefore means "look exactly once, never wait".

use std::time::Duration;

/// Configuration for a poll session
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Number of follow-up queries allowed after the first one
    pub max_attempts: u32,

    /// Wait before the first follow-up query
    pub interval: Duration,

    /// Multiplier applied to the wait on each further follow-up (1.0 = fixed)
    pub backoff_factor: f64,

    /// Ceiling for the wait between queries
    pub max_interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            interval: Duration::from_secs(5),
            backoff_factor: 1.0,
            max_interval: Duration::from_secs(60),
        }
    }
}

impl PollPolicy {
    /// Single status check, no retries
    pub fn once() -> Self {
        Self::default()
    }

    /// Fixed wait between a bounded number of follow-up queries
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            backoff_factor: 1.0,
            max_interval: interval,
        }
    }

    /// Switch to exponential backoff capped at `max_interval`
    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor;
        self.max_interval = max_interval;
        self
    }

    /// Set the budget to the most follow-ups whose waits add up to at most `window`
    ///
    /// With backoff the waits grow, so a window holds fewer follow-ups than
    /// it would at the base interval.
    pub fn fit_to_window(mut self, window: Duration) -> Self {
        let ceiling = self.max_interval.max(self.interval);
        let mut elapsed = Duration::ZERO;
        let mut attempts: u32 = 0;

        loop {
            let next = self.delay_for(attempts.saturating_add(1));
            if !self.backs_off() || next >= ceiling || next.is_zero() {
                // Every remaining wait is `next`
                let remaining = window.saturating_sub(elapsed);
                let step = next.max(Duration::from_nanos(1));
                let extra = u32::try_from(remaining.as_nanos() / step.as_nanos()).unwrap_or(u32::MAX);
                attempts = attempts.saturating_add(extra);
                break;
            }
            if elapsed + next > window {
                break;
            }
            elapsed += next;
            attempts += 1;
        }

        self.max_attempts = attempts;
        self
    }

    fn backs_off(&self) -> bool {
        self.backoff_factor.is_finite() && self.backoff_factor > 1.0
    }

    /// Wait before follow-up query number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = if self.backs_off() {
            self.backoff_factor
        } else {
            1.0
        };
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let scaled = self.interval.as_secs_f64() * factor.powi(exponent);
        let ceiling = self.max_interval.max(self.interval);

        if !scaled.is_finite() || scaled >= ceiling.as_secs_f64() {
            ceiling
        } else {
            Duration::from_secs_f64(scaled)
        }
    }
}
