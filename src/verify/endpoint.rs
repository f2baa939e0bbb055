//! reqwest-backed [`Verifier`] for both endpoint shapes.

// crates.io
use reqwest::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	auth::{Token, VerifiedUser},
	error::{ConfigError, TransportError, VerificationError},
	http::ReqwestHttpClient,
	verify::{TokenPlacement, VerifierConfig, VerifyFuture, Verifier, parse_verified_user},
};

/// POSTs tokens to the configured endpoint and parses the JSON identity it returns.
///
/// Any non-2xx status, transport failure, or non-object body is a
/// [`VerificationError`]; specific status codes are not distinguished further.
#[derive(Clone, Debug)]
pub struct HttpVerifier {
	http_client: ReqwestHttpClient,
	config: VerifierConfig,
}
impl HttpVerifier {
	/// Creates a verifier with its own redirect-free client.
	pub fn new(config: VerifierConfig) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::build()?))
	}

	/// Creates a verifier that reuses the caller-provided client.
	pub fn with_http_client(config: VerifierConfig, http_client: ReqwestHttpClient) -> Self {
		Self { http_client, config }
	}

	/// Active configuration.
	pub fn config(&self) -> &VerifierConfig {
		&self.config
	}

	async fn exchange(&self, token: &Token) -> Result<VerifiedUser, VerificationError> {
		let request =
			self.http_client.post(self.config.endpoint.clone()).header(ACCEPT, "application/json");
		let request = match self.config.placement {
			TokenPlacement::FormBody =>
				request.form(&[(self.config.token_field.as_str(), token.expose())]),
			TokenPlacement::BearerHeader => request.bearer_auth(token.expose()),
		};
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			return Err(VerificationError::Rejected { status: status.as_u16() });
		}

		let body = response.bytes().await.map_err(TransportError::from)?;

		parse_verified_user(&body)
	}
}
impl Verifier for HttpVerifier {
	fn verify<'a>(&'a self, token: &'a Token) -> VerifyFuture<'a> {
		Box::pin(self.exchange(token))
	}
}
