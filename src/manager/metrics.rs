// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for lifecycle outcomes.
#[derive(Debug, Default)]
pub struct LifecycleMetrics {
	logins: AtomicU64,
	refreshes: AtomicU64,
	fallbacks: AtomicU64,
	failures: AtomicU64,
}
impl LifecycleMetrics {
	/// Returns the number of login attempts, counting both cache-factory logins and
	/// fallback logins after a failed refresh.
	pub fn logins(&self) -> u64 {
		self.logins.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh attempts.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh failures that fell back to a fresh login.
	pub fn fallbacks(&self) -> u64 {
		self.fallbacks.load(Ordering::Relaxed)
	}

	/// Returns the number of `ensure` calls that surfaced an error to the caller.
	///
	/// Absorbed refresh failures count as fallbacks, not failures; this only moves when
	/// the caller actually sees an `Err`.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_login(&self) {
		self.logins.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_fallback(&self) {
		self.fallbacks.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
