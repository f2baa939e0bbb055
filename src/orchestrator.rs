//! Multi-provider authentication race.
//!
//! [`Authenticator::authenticate`] starts every provider at once, submits each usable token
//! to the [`Verifier`], and settles exactly once:
//!
//! - with the first verification to complete successfully, regardless of provider order;
//! - with [`Error::AllFailed`] once every provider or verification has failed;
//! - with [`Error::Config`] immediately when no providers are supplied.
//!
//! Nothing is cancelled after settlement. Contenders still in flight run to completion and
//! their results are discarded (and counted in [`AuthMetrics::discarded`]); a provider that
//! only produces its token after settlement does not start a new verification.
//!
//! Contenders run as Tokio tasks, so `authenticate` must be called within a Tokio runtime.

mod attempt;
mod metrics;

pub use metrics::AuthMetrics;

// self
use crate::{
	_prelude::*,
	auth::Authenticated,
	error::{ConfigError, ProviderError},
	obs::{self, Outcome, Stage, StageSpan},
	orchestrator::attempt::AuthAttempt,
	provider::TokenProvider,
	verify::Verifier,
};
#[cfg(feature = "reqwest")] use crate::verify::{HttpVerifier, VerifierConfig};

/// Races token providers against a verifier; see the [module docs](self).
#[derive(Clone)]
pub struct Authenticator {
	/// Verifier every produced token is submitted to.
	pub verifier: Arc<dyn Verifier>,
	/// Shared counters for authentication outcomes.
	pub metrics: Arc<AuthMetrics>,
	timeout: Option<std::time::Duration>,
}
impl Authenticator {
	/// Creates an authenticator around the provided verifier.
	pub fn new(verifier: Arc<dyn Verifier>) -> Self {
		Self { verifier, metrics: Default::default(), timeout: None }
	}

	/// Settles with [`Error::TimedOut`] when no outcome is reached within `after`.
	///
	/// Disabled by default: without it, a provider that never completes keeps the call
	/// pending unless another provider wins or every other one fails first. Contenders are
	/// not cancelled when the deadline fires.
	pub fn with_timeout(mut self, after: std::time::Duration) -> Self {
		self.timeout = Some(after);

		self
	}

	/// Authenticates with the first provider whose token verifies.
	pub async fn authenticate(
		&self,
		providers: &[Arc<dyn TokenProvider>],
	) -> Result<Authenticated> {
		const STAGE: Stage = Stage::Authenticate;

		let span = StageSpan::new(STAGE, "*");

		obs::record_outcome(STAGE, Outcome::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(self.race(providers)).await;

		match &result {
			Ok(_) => {
				obs::record_outcome(STAGE, Outcome::Success);
				self.metrics.record_success();
			},
			Err(_) => {
				obs::record_outcome(STAGE, Outcome::Failure);
				self.metrics.record_failure();
			},
		}

		result
	}

	async fn race(&self, providers: &[Arc<dyn TokenProvider>]) -> Result<Authenticated> {
		if providers.is_empty() {
			return Err(ConfigError::NoProviders.into());
		}

		let total = providers.len();
		let (attempt, mut settlement) = AuthAttempt::new(total);

		for provider in providers {
			let contender = Contender {
				provider: provider.clone(),
				verifier: self.verifier.clone(),
				metrics: self.metrics.clone(),
				attempt: attempt.clone(),
			};

			tokio::spawn(contender.run());
		}

		let settled = match self.timeout {
			Some(after) => match tokio::time::timeout(after, &mut settlement).await {
				Ok(settled) => settled,
				Err(_) => {
					// Loses to any outcome committed in the meantime.
					attempt.settle(Err(Error::TimedOut { after }));

					settlement.await
				},
			},
			None => {
				drop(attempt);

				settlement.await
			},
		};

		// Only empty if every contender task died (e.g. a provider panicked), which leaves
		// nothing that could still succeed.
		settled.unwrap_or(Err(Error::AllFailed { providers: total }))
	}
}
#[cfg(feature = "reqwest")]
impl Authenticator {
	/// Creates an authenticator that verifies tokens against an HTTP endpoint.
	pub fn with_endpoint(config: VerifierConfig) -> Result<Self> {
		Ok(Self::new(Arc::new(HttpVerifier::new(config)?)))
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("metrics", &self.metrics)
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// One provider's journey from `acquire` to verification.
struct Contender {
	provider: Arc<dyn TokenProvider>,
	verifier: Arc<dyn Verifier>,
	metrics: Arc<AuthMetrics>,
	attempt: Arc<AuthAttempt>,
}
impl Contender {
	async fn run(self) {
		let label = self.provider.label().to_owned();

		obs::record_outcome(Stage::Acquire, Outcome::Attempt);

		let acquired =
			StageSpan::new(Stage::Acquire, &label).instrument(self.provider.acquire()).await;
		let token = match acquired {
			Ok(token) if !token.is_empty() => token,
			Ok(_) => return self.provider_failed(&label, &ProviderError::EmptyToken),
			Err(e) => return self.provider_failed(&label, &e),
		};

		obs::record_outcome(Stage::Acquire, Outcome::Success);

		if self.attempt.is_settled() {
			obs::verification_skipped(&label, token.fingerprint());

			return;
		}

		obs::record_outcome(Stage::Verify, Outcome::Attempt);

		let verified =
			StageSpan::new(Stage::Verify, &label).instrument(self.verifier.verify(&token)).await;

		match verified {
			Ok(user) => {
				let fingerprint = token.fingerprint().to_owned();
				let won = self.attempt.succeed(Authenticated {
					user,
					token,
					provider: label.clone(),
					verified_at: OffsetDateTime::now_utc(),
				});

				if won {
					obs::record_outcome(Stage::Verify, Outcome::Success);
				} else {
					obs::record_outcome(Stage::Verify, Outcome::Discarded);
					obs::late_result_discarded(&label, &fingerprint);
					obs::record_late_win(&label);
					self.metrics.record_discarded();
				}
			},
			Err(e) => {
				obs::record_outcome(Stage::Verify, Outcome::Failure);
				obs::verification_failed(&label, token.fingerprint(), &e);
				self.attempt.fail();
			},
		}
	}

	fn provider_failed(&self, label: &str, error: &ProviderError) {
		obs::record_outcome(Stage::Acquire, Outcome::Failure);
		obs::provider_failed(label, error);
		self.attempt.fail();
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Duration;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		auth::Token,
		extension::{ExtensionLoader, ExtensionSdk, ReadySignal, SdkLoader},
		provider::{
			ExtensionTokenProvider, FnTokenProvider, FragmentSource, FragmentTokenProvider,
			QueryTokenProvider,
		},
	};

	fn ms(value: u64) -> Duration {
		Duration::from_millis(value)
	}

	fn authenticator(verifier: ScriptedVerifier) -> (Authenticator, Arc<ScriptedVerifier>) {
		let verifier = Arc::new(verifier);

		(Authenticator::new(verifier.clone()), verifier)
	}

	fn never_ready_loader() -> SdkLoader {
		ExtensionLoader::new(|_signal: ReadySignal<Arc<dyn ExtensionSdk>>| {})
	}

	#[tokio::test]
	async fn empty_provider_list_is_a_configuration_error() {
		let (auth, verifier) = authenticator(ScriptedVerifier::default());
		let err = auth.authenticate(&[]).await.expect_err("No providers should fail.");

		assert!(matches!(err, Error::Config(ConfigError::NoProviders)));
		assert!(verifier.calls().is_empty());
		assert_eq!(auth.metrics.failures(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn fragment_token_wins_without_waiting_for_extension() {
		let (auth, _verifier) = authenticator(ScriptedVerifier::default().accept(
			"abc",
			serde_json::json!({ "id": 42 }),
			ms(5),
		));
		let providers: Vec<Arc<dyn TokenProvider>> = vec![
			Arc::new(FragmentTokenProvider::new(FragmentSource::new("#_b=abc"))),
			Arc::new(ExtensionTokenProvider::new(never_ready_loader(), "app-1")),
		];
		let authenticated =
			auth.authenticate(&providers).await.expect("Fragment token should verify.");

		assert_eq!(authenticated.user.get("id"), Some(&serde_json::json!(42)));
		assert_eq!(authenticated.token.expose(), "abc");
		assert_eq!(authenticated.provider, "fragment");
	}

	#[tokio::test]
	async fn missing_query_token_fails_the_only_provider() {
		let (auth, verifier) = authenticator(ScriptedVerifier::default());
		let page = Url::parse("https://bot.example.com/app?other=1")
			.expect("Failed to parse page URL fixture.");
		let providers: Vec<Arc<dyn TokenProvider>> = vec![Arc::new(QueryTokenProvider::new(page))];
		let err = auth.authenticate(&providers).await.expect_err("Missing token should fail.");

		assert!(matches!(err, Error::AllFailed { providers: 1 }));
		assert_eq!(err.to_string(), "All auth backend failed");
		assert!(verifier.calls().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn first_completed_verification_wins_regardless_of_order() {
		for reversed in [false, true] {
			let (auth, verifier) = authenticator(
				ScriptedVerifier::default()
					.accept("slow", serde_json::json!({ "id": "slow" }), ms(50))
					.accept("fast", serde_json::json!({ "id": "fast" }), ms(10)),
			);
			let slow = ScriptedProvider::new("slow", Script::Token("slow", ms(0)));
			let fast = ScriptedProvider::new("fast", Script::Token("fast", ms(0)));
			let mut providers: Vec<Arc<dyn TokenProvider>> = vec![slow, fast];

			if reversed {
				providers.reverse();
			}

			let authenticated =
				auth.authenticate(&providers).await.expect("One token should verify.");

			assert_eq!(authenticated.token.expose(), "fast");
			assert_eq!(authenticated.provider, "fast");

			// The losing round-trip is not cancelled; its result is discarded.
			tokio::time::sleep(ms(100)).await;

			assert_eq!(verifier.completed(), 2);
			assert_eq!(auth.metrics.discarded(), 1);
			assert_eq!(auth.metrics.successes(), 1);
		}
	}

	#[tokio::test(start_paused = true)]
	async fn aggregate_failure_waits_for_every_contender() {
		let (auth, verifier) =
			authenticator(ScriptedVerifier::default().with_rejection_delay(ms(20)));
		let providers: Vec<Arc<dyn TokenProvider>> = vec![
			ScriptedProvider::new("broken", Script::Fail(ms(5))),
			ScriptedProvider::new("rejected", Script::Token("bad", ms(0))),
		];
		let err = auth.authenticate(&providers).await.expect_err("Every contender fails.");

		assert!(matches!(err, Error::AllFailed { providers: 2 }));
		assert_eq!(verifier.calls(), vec!["bad".to_owned()]);
		assert_eq!(verifier.completed(), 1);
		assert_eq!(auth.metrics.failures(), 1);
	}

	#[tokio::test]
	async fn empty_token_counts_as_failure_without_network_call() {
		let (auth, verifier) = authenticator(ScriptedVerifier::default());
		let providers: Vec<Arc<dyn TokenProvider>> =
			vec![Arc::new(FnTokenProvider::new("blank", || async { Ok(Token::new("")) }))];
		let err = auth.authenticate(&providers).await.expect_err("Empty token should fail.");

		assert!(matches!(err, Error::AllFailed { providers: 1 }));
		assert!(verifier.calls().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn tokens_produced_after_settlement_are_not_submitted() {
		let (auth, verifier) = authenticator(ScriptedVerifier::default().accept(
			"early",
			serde_json::json!({ "id": 1 }),
			ms(0),
		));
		let late = ScriptedProvider::new("late", Script::Token("late", ms(100)));
		let providers: Vec<Arc<dyn TokenProvider>> =
			vec![ScriptedProvider::new("early", Script::Token("early", ms(0))), late.clone()];
		let authenticated = auth.authenticate(&providers).await.expect("Early token should win.");

		assert_eq!(authenticated.token.expose(), "early");

		tokio::time::sleep(ms(200)).await;

		assert_eq!(late.calls(), 1);
		assert_eq!(verifier.calls(), vec!["early".to_owned()]);
	}

	#[tokio::test(start_paused = true)]
	async fn optional_timeout_settles_pending_attempts() {
		let (auth, _verifier) = authenticator(ScriptedVerifier::default());
		let auth = auth.with_timeout(Duration::from_secs(1));
		let providers: Vec<Arc<dyn TokenProvider>> =
			vec![ScriptedProvider::new("stuck", Script::Pending)];
		let err = auth.authenticate(&providers).await.expect_err("Pending provider times out.");

		assert!(matches!(err, Error::TimedOut { after } if after == Duration::from_secs(1)));
	}

	#[tokio::test(start_paused = true)]
	async fn timeout_does_not_override_an_earlier_success() {
		let (auth, _verifier) = authenticator(ScriptedVerifier::default().accept(
			"abc",
			serde_json::json!({ "id": 7 }),
			ms(10),
		));
		let auth = auth.with_timeout(Duration::from_secs(1));
		let providers: Vec<Arc<dyn TokenProvider>> = vec![
			ScriptedProvider::new("stuck", Script::Pending),
			ScriptedProvider::new("ok", Script::Token("abc", ms(0))),
		];
		let authenticated = auth.authenticate(&providers).await.expect("Token should verify.");

		assert_eq!(authenticated.user.get("id"), Some(&serde_json::json!(7)));
	}

	#[tokio::test]
	async fn fragment_source_cannot_be_replayed_across_calls() {
		let (auth, _verifier) = authenticator(ScriptedVerifier::default().accept(
			"abc",
			serde_json::json!({ "id": 42 }),
			ms(0),
		));
		let source = FragmentSource::new("_b=abc");
		let providers: Vec<Arc<dyn TokenProvider>> =
			vec![Arc::new(FragmentTokenProvider::new(source.clone()))];

		auth.authenticate(&providers).await.expect("First call should consume the token.");

		assert!(source.is_consumed());
		assert!(matches!(
			auth.authenticate(&providers).await,
			Err(Error::AllFailed { providers: 1 })
		));
		assert_eq!(auth.metrics.attempts(), 2);
		assert_eq!(auth.metrics.successes(), 1);
		assert_eq!(auth.metrics.failures(), 1);
	}
}
