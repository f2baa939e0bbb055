// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for authentication calls.
#[derive(Debug, Default)]
pub struct AuthMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	discarded: AtomicU64,
}
impl AuthMetrics {
	/// Returns the total number of `authenticate` calls.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that resolved with a verified user.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that resolved with an error.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of verifications that succeeded after their call had settled.
	pub fn discarded(&self) -> u64 {
		self.discarded.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_discarded(&self) {
		self.discarded.fetch_add(1, Ordering::Relaxed);
	}
}
