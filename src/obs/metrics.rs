// self
use crate::obs::{Outcome, Stage};

/// Records a stage outcome on `auth_race_stage_total` (when `metrics` is enabled).
pub fn record_outcome(stage: Stage, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"auth_race_stage_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

/// Counts a verified token that lost the race, labeled by the provider that produced it.
pub(crate) fn record_late_win(provider: &str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("auth_race_late_wins_total", "provider" => provider.to_owned())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = provider;
	}
}

/// Tracks how many callers one readiness signal released.
pub(crate) fn record_waiters_released(count: usize) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("auth_race_extension_waiters_released").record(count as f64);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = count;
	}
}
