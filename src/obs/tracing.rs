// self
use crate::{_prelude::*, obs::Stage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// A span builder used by the orchestrator and providers.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage + provider label.
	pub fn new(stage: Stage, provider: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("auth_race.stage", stage = stage.as_str(), provider);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, provider);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn provider_failed(provider: &str, error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	tracing::debug!(provider, error = %error, "provider failed to produce a token");
	#[cfg(not(feature = "tracing"))]
	let _ = (provider, error);
}

pub(crate) fn verification_failed(provider: &str, fingerprint: &str, error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	tracing::debug!(provider, fingerprint, error = %error, "token rejected by verification");
	#[cfg(not(feature = "tracing"))]
	let _ = (provider, fingerprint, error);
}

pub(crate) fn verification_skipped(provider: &str, fingerprint: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(provider, fingerprint, "attempt already settled; token not submitted");
	#[cfg(not(feature = "tracing"))]
	let _ = (provider, fingerprint);
}

pub(crate) fn late_result_discarded(provider: &str, fingerprint: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(provider, fingerprint, "verification finished after settlement; discarded");
	#[cfg(not(feature = "tracing"))]
	let _ = (provider, fingerprint);
}

pub(crate) fn attempt_exhausted(providers: usize) {
	#[cfg(feature = "tracing")]
	tracing::warn!(providers, "every auth provider failed");
	#[cfg(not(feature = "tracing"))]
	let _ = providers;
}

pub(crate) fn extension_installing() {
	#[cfg(feature = "tracing")]
	tracing::debug!("installing extension sdk");
}

pub(crate) fn extension_ready(notified: usize) {
	#[cfg(feature = "tracing")]
	tracing::debug!(notified, "extension sdk ready");
	#[cfg(not(feature = "tracing"))]
	let _ = notified;
}
