//! Optional observability helpers for authentication attempts.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `auth_race.stage` with the `stage` and
//!   `provider` fields, plus debug/warn events for individual failures. Tokens only ever
//!   appear as fingerprints.
//! - Enable `metrics` to increment the `auth_race_stage_total` counter for every
//!   attempt/success/failure/discard, labeled by `stage` + `outcome`. Verified tokens that
//!   lost the race are also counted per provider on `auth_race_late_wins_total`, and every
//!   readiness signal records how many callers it released on the
//!   `auth_race_extension_waiters_released` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Stages of an authentication attempt observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Whole orchestration call.
	Authenticate,
	/// A provider producing its token.
	Acquire,
	/// A token round-trip against the verification endpoint.
	Verify,
	/// Waiting for the external SDK.
	ExtensionReady,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Authenticate => "authenticate",
			Stage::Acquire => "acquire",
			Stage::Verify => "verify",
			Stage::ExtensionReady => "extension_ready",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure recorded (and, for inner stages, absorbed).
	Failure,
	/// Completed after the attempt already settled; result ignored.
	Discarded,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
			Outcome::Discarded => "discarded",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
