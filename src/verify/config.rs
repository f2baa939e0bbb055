//! Typed configuration for the HTTP verification endpoint.

// self
use crate::{_prelude::*, error::ConfigError};

/// Path appended to an origin by [`VerifierConfig::for_origin`].
pub const DEFAULT_VERIFY_PATH: &str = "/postback/auth";
/// Form field carrying the token unless overridden.
pub const DEFAULT_TOKEN_FIELD: &str = "token";

/// How the token travels to the verification endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
	#[default]
	/// `application/x-www-form-urlencoded` body field.
	FormBody,
	/// `Authorization: Bearer <token>` header with an empty body.
	BearerHeader,
}

/// Verification endpoint settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
	/// Absolute URL tokens are POSTed to.
	pub endpoint: Url,
	/// Where the token is placed in the request.
	#[serde(default)]
	pub placement: TokenPlacement,
	/// Form field carrying the token for [`TokenPlacement::FormBody`].
	#[serde(default = "default_token_field")]
	pub token_field: String,
}
impl VerifierConfig {
	/// Targets an explicit endpoint with default placement and field.
	pub fn new(endpoint: Url) -> Self {
		Self { endpoint, placement: TokenPlacement::default(), token_field: default_token_field() }
	}

	/// Targets [`DEFAULT_VERIFY_PATH`] on the origin of `base`.
	pub fn for_origin(base: &Url) -> Result<Self, ConfigError> {
		let endpoint = base
			.join(DEFAULT_VERIFY_PATH)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self::new(endpoint))
	}

	/// Overrides the token placement.
	pub fn with_placement(mut self, placement: TokenPlacement) -> Self {
		self.placement = placement;

		self
	}

	/// Overrides the form field name.
	pub fn with_token_field(mut self, field: impl Into<String>) -> Self {
		self.token_field = field.into();

		self
	}
}

fn default_token_field() -> String {
	DEFAULT_TOKEN_FIELD.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn for_origin_uses_default_path() {
		let base = Url::parse("https://bot.example.com/app/page?x=1")
			.expect("Failed to parse base URL fixture.");
		let config = VerifierConfig::for_origin(&base).expect("Origin should produce an endpoint.");

		assert_eq!(config.endpoint.as_str(), "https://bot.example.com/postback/auth");
		assert_eq!(config.placement, TokenPlacement::FormBody);
		assert_eq!(config.token_field, "token");
	}

	#[test]
	fn deserializes_with_defaults() {
		let config: VerifierConfig =
			serde_json::from_str("{\"endpoint\":\"https://api.example.com/verify\"}")
				.expect("Minimal config should deserialize.");

		assert_eq!(config.placement, TokenPlacement::FormBody);
		assert_eq!(config.token_field, "token");

		let config: VerifierConfig = serde_json::from_str(
			"{\"endpoint\":\"https://api.example.com/verify\",\"placement\":\"bearer_header\"}",
		)
		.expect("Bearer config should deserialize.");

		assert_eq!(config.placement, TokenPlacement::BearerHeader);
	}
}
