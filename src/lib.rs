//! Race pluggable token providers against a verification endpoint and settle exactly once.
//!
//! An [`Authenticator`](orchestrator::Authenticator) fans out to every configured
//! [`TokenProvider`](provider::TokenProvider), submits each usable token to a
//! [`Verifier`](verify::Verifier), and resolves with the first verified identity or a single
//! aggregate failure. Providers backed by an external SDK share one
//! [`ExtensionLoader`](extension::ExtensionLoader) that installs the SDK at most once and
//! notifies every waiter when it becomes ready.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod extension;
#[cfg(feature = "reqwest")] pub mod http;
pub mod obs;
pub mod orchestrator;
pub mod provider;
pub mod verify;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and scripted fixtures for integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use crate::{
		auth::{Token, VerifiedUser},
		error::{ProviderError, VerificationError},
		provider::{ProviderFuture, TokenProvider},
		verify::{VerifyFuture, Verifier},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> crate::http::ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		crate::http::ReqwestHttpClient::with_client(client)
	}

	/// Scripted outcome produced by a [`ScriptedProvider`].
	#[derive(Clone, Debug)]
	pub enum Script {
		/// Yield the token after the delay.
		Token(&'static str, std::time::Duration),
		/// Fail after the delay.
		Fail(std::time::Duration),
		/// Never complete.
		Pending,
	}

	/// Provider that replays a fixed [`Script`] and counts invocations.
	#[derive(Debug)]
	pub struct ScriptedProvider {
		label: &'static str,
		script: Script,
		calls: AtomicUsize,
	}
	impl ScriptedProvider {
		/// Creates a provider with the given label and script.
		pub fn new(label: &'static str, script: Script) -> Arc<Self> {
			Arc::new(Self { label, script, calls: AtomicUsize::new(0) })
		}

		/// Number of times [`TokenProvider::acquire`] was called.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl TokenProvider for ScriptedProvider {
		fn label(&self) -> &str {
			self.label
		}

		fn acquire(&self) -> ProviderFuture<'_> {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let script = self.script.clone();

			Box::pin(async move {
				match script {
					Script::Token(value, delay) => {
						tokio::time::sleep(delay).await;

						Ok(Token::new(value))
					},
					Script::Fail(delay) => {
						tokio::time::sleep(delay).await;

						Err(ProviderError::custom("scripted failure"))
					},
					Script::Pending => std::future::pending().await,
				}
			})
		}
	}

	/// Verifier that accepts known tokens after a per-token delay and rejects the rest.
	#[derive(Debug, Default)]
	pub struct ScriptedVerifier {
		accepted: HashMap<String, (serde_json::Value, std::time::Duration)>,
		rejection_delay: std::time::Duration,
		calls: Mutex<Vec<String>>,
		completed: AtomicUsize,
	}
	impl ScriptedVerifier {
		/// Accepts `token` with the provided user payload once `delay` elapses.
		pub fn accept(
			mut self,
			token: &str,
			user: serde_json::Value,
			delay: std::time::Duration,
		) -> Self {
			self.accepted.insert(token.to_owned(), (user, delay));

			self
		}

		/// Delays rejections by `delay`.
		pub fn with_rejection_delay(mut self, delay: std::time::Duration) -> Self {
			self.rejection_delay = delay;

			self
		}

		/// Tokens submitted so far, in submission order.
		pub fn calls(&self) -> Vec<String> {
			self.calls.lock().clone()
		}

		/// Number of verification calls that ran to completion.
		pub fn completed(&self) -> usize {
			self.completed.load(Ordering::SeqCst)
		}
	}
	impl Verifier for ScriptedVerifier {
		fn verify<'a>(&'a self, token: &'a Token) -> VerifyFuture<'a> {
			self.calls.lock().push(token.expose().to_owned());

			let outcome = self.accepted.get(token.expose()).cloned();

			Box::pin(async move {
				let result = match outcome {
					Some((user, delay)) => {
						tokio::time::sleep(delay).await;

						Ok(VerifiedUser::new(user))
					},
					None => {
						tokio::time::sleep(self.rejection_delay).await;

						Err(VerificationError::Rejected { status: 401 })
					},
				};

				self.completed.fetch_add(1, Ordering::SeqCst);

				result
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{HashMap, VecDeque},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
