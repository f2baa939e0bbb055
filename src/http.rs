//! Shared reqwest transport for verification round-trips.

// std
use std::ops::Deref;
// crates.io
use reqwest::redirect::Policy;
// self
use crate::{_prelude::*, error::ConfigError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Verification endpoints answer directly; a redirect usually means a login page or a
/// misconfigured endpoint, and following it would turn the rejection into a `200` with an
/// HTML body. [`ReqwestHttpClient::build`] therefore disables redirect following; configure
/// any custom [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] the same way.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client that never follows redirects.
	pub fn build() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
