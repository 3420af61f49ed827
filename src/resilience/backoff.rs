//! Retry budget and exponential backoff delay derivation.

use rand::Rng;
use std::time::Duration;

/// Immutable retry policy: attempt ceiling plus backoff shape.
///
/// The delay before retrying after attempt `n` (1-indexed) is
/// `min(max_delay, base_delay * multiplier^(n - 1))`, pure exponential by
/// default. Jitter (0 to 10% of the capped delay) can be enabled for callers
/// sharing an upstream with many peers.
#[derive(Debug, Clone)]
pub struct RetryBudget {
    /// Total attempts allowed, including the first (>= 1).
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Ceiling applied to the derived delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Add random jitter on top of the capped delay.
    pub jitter: bool,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: false,
        }
    }
}

impl RetryBudget {
    /// Delay to sleep before the retry that follows `attempt` (1-indexed).
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = raw.min(self.max_delay.as_secs_f64());

        let delayed = if self.jitter && capped > 0.0 {
            capped + rand::thread_rng().gen_range(0.0..capped / 10.0)
        } else {
            capped
        };

        Duration::from_secs_f64(delayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_doubles_until_the_cap() {
        let budget = RetryBudget::default();
        assert_eq!(budget.delay(1), Duration::from_secs(2));
        assert_eq!(budget.delay(2), Duration::from_secs(4));
        assert_eq!(budget.delay(3), Duration::from_secs(8));
        assert_eq!(budget.delay(4), Duration::from_secs(10));
        assert_eq!(budget.delay(10), Duration::from_secs(10));
    }

    #[test]
    fn attempt_zero_has_no_delay() {
        assert_eq!(RetryBudget::default().delay(0), Duration::ZERO);
    }

    #[test]
    fn jitter_stays_within_ten_percent() {
        let budget = RetryBudget {
            jitter: true,
            ..RetryBudget::default()
        };
        for _ in 0..100 {
            let d = budget.delay(2);
            assert!(d >= Duration::from_secs(4));
            assert!(d <= Duration::from_millis(4400));
        }
    }
}
