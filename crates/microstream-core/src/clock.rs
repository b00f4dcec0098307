//! Clock capability.
//!
//! Due-ness is always computed against an injected clock so lifecycle logic
//! stays deterministic under test.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Source of the current time.
pub trait Clock: Send + Sync {
	/// Returns the current instant.
	fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation backed by `Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// Settable clock for tests.
///
/// # Example
///
/// ```
/// use microstream_core::{Clock, ManualClock};
/// use chrono::{Duration, Utc};
///
/// let clock = ManualClock::new(Utc::now());
/// let before = clock.now();
/// clock.advance(Duration::days(3));
/// assert_eq!(clock.now(), before + Duration::days(3));
/// ```
#[derive(Debug)]
pub struct ManualClock {
	now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
	/// Creates a clock frozen at the given instant.
	pub fn new(now: DateTime<Utc>) -> Self {
		Self { now: RwLock::new(now) }
	}

	/// Moves the clock forward.
	pub fn advance(&self, by: Duration) {
		let mut now = self.now.write().expect("clock lock poisoned");
		*now = *now + by;
	}

	/// Sets the clock to an exact instant.
	pub fn set(&self, to: DateTime<Utc>) {
		*self.now.write().expect("clock lock poisoned") = to;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> DateTime<Utc> {
		*self.now.read().expect("clock lock poisoned")
	}
}
