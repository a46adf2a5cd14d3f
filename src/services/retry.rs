//! Bounded retry schedules for transient request failures.
//!
//! An explicit policy object replaces ad hoc timeout-and-recurse retry:
//! the caller asks the policy for the delay after each failed attempt and
//! stops when it says so.

use std::time::Duration;

/// Delay progression between attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backoff {
	/// The same delay before every retry.
	Fixed(Duration),
	/// Delay doubles after each failed attempt, starting from the base.
	Exponential { base: Duration },
}

/// How many attempts to make in total, and how long to wait between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub backoff: Backoff,
}

impl RetryPolicy {
	pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
		Self {
			max_attempts,
			backoff: Backoff::Fixed(delay),
		}
	}

	pub fn exponential(max_attempts: u32, base: Duration) -> Self {
		Self {
			max_attempts,
			backoff: Backoff::Exponential { base },
		}
	}

	/// A single attempt, no retries.
	pub fn none() -> Self {
		Self::fixed(1, Duration::ZERO)
	}

	/// Delay to wait after the given failed attempt (1-based), or `None`
	/// when the attempt budget is spent.
	pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
		if attempt == 0 || attempt >= self.max_attempts {
			return None;
		}
		Some(match self.backoff {
			Backoff::Fixed(delay) => delay,
			Backoff::Exponential { base } => base.saturating_mul(1 << (attempt - 1).min(16)),
		})
	}

	/// The full delay schedule, one entry per retry.
	pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
		(1..self.max_attempts).filter_map(|attempt| self.delay_after(attempt))
	}
}

impl Default for RetryPolicy {
	// Matches the observed loader behavior: three tries, fixed pause.
	fn default() -> Self {
		Self::fixed(3, Duration::from_millis(800))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn fixed_schedule_has_constant_delays() {
		let policy = RetryPolicy::fixed(3, Duration::from_millis(500));
		let delays: Vec<_> = policy.delays().collect();
		assert_eq!(
			delays,
			vec![Duration::from_millis(500), Duration::from_millis(500)]
		);
		assert_eq!(policy.delay_after(3), None);
	}

	#[test]
	fn exponential_schedule_doubles() {
		let policy = RetryPolicy::exponential(4, Duration::from_millis(100));
		let delays: Vec<_> = policy.delays().collect();
		assert_eq!(
			delays,
			vec![
				Duration::from_millis(100),
				Duration::from_millis(200),
				Duration::from_millis(400),
			]
		);
	}

	#[test]
	fn no_retry_policy_never_waits() {
		let policy = RetryPolicy::none();
		assert_eq!(policy.delays().count(), 0);
		assert_eq!(policy.delay_after(1), None);
	}
}
