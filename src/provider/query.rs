//! Token read from a query-string parameter.

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::ProviderError,
	provider::{DEFAULT_TOKEN_PARAM, ProviderFuture, TokenProvider, find_param},
};

/// Returns the first percent-decoded value of `key` in the query string of `url`.
pub fn query_param(url: &Url, key: &str) -> Option<String> {
	find_param(url.query()?, key)
}

/// Reads a token from a query parameter of a fixed URL.
///
/// The source is never mutated, so every `acquire` yields the same outcome.
#[derive(Clone, Debug)]
pub struct QueryTokenProvider {
	url: Url,
	param: String,
}
impl QueryTokenProvider {
	/// Reads the [`DEFAULT_TOKEN_PARAM`] parameter of `url`.
	pub fn new(url: Url) -> Self {
		Self { url, param: DEFAULT_TOKEN_PARAM.into() }
	}

	/// Overrides the parameter name.
	pub fn with_param(mut self, param: impl Into<String>) -> Self {
		self.param = param.into();

		self
	}

	fn read(&self) -> Result<Token, ProviderError> {
		match query_param(&self.url, &self.param) {
			Some(value) if !value.is_empty() => Ok(Token::new(value)),
			_ => Err(ProviderError::MissingParameter { name: self.param.clone(), location: "query" }),
		}
	}
}
impl TokenProvider for QueryTokenProvider {
	fn label(&self) -> &str {
		"query"
	}

	fn acquire(&self) -> ProviderFuture<'_> {
		Box::pin(async move { self.read() })
	}
}
