//! One-shot token read from a URL fragment.
//!
//! The fragment is cleared in the same critical section that reads the token, before the
//! token is handed out, so no second reader can observe and replay it.

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::ProviderError,
	provider::{DEFAULT_TOKEN_PARAM, ProviderFuture, TokenProvider, find_param},
};

/// Shared, clearable fragment (`#key=value&...`) a page was opened with.
///
/// Clones observe the same underlying value.
#[derive(Clone, Debug)]
pub struct FragmentSource(Arc<Mutex<Option<String>>>);
impl FragmentSource {
	/// Wraps a raw fragment; a leading `#` is ignored.
	pub fn new(fragment: impl Into<String>) -> Self {
		let fragment = fragment.into();
		let fragment = fragment.strip_prefix('#').map(str::to_owned).unwrap_or(fragment);

		Self(Arc::new(Mutex::new(Some(fragment))))
	}

	/// Captures the fragment of `url`, or an empty fragment when there is none.
	pub fn from_url(url: &Url) -> Self {
		Self::new(url.fragment().unwrap_or_default())
	}

	/// Returns true once a token has been taken from this source.
	pub fn is_consumed(&self) -> bool {
		self.0.lock().is_none()
	}

	/// Removes and returns the decoded value of `key`, clearing the whole fragment.
	///
	/// Fails with [`ProviderError::Consumed`] once any token was taken, and with
	/// [`ProviderError::MissingParameter`] when `key` is absent or empty (the fragment is
	/// left untouched in that case).
	pub fn take(&self, key: &str) -> Result<Token, ProviderError> {
		let mut guard = self.0.lock();
		let fragment =
			guard.as_deref().ok_or_else(|| ProviderError::Consumed { name: key.to_owned() })?;
		let value = find_param(fragment, key)
			.filter(|value| !value.is_empty())
			.ok_or_else(|| ProviderError::MissingParameter {
				name: key.to_owned(),
				location: "fragment",
			})?;

		*guard = None;

		Ok(Token::new(value))
	}
}

/// Reads a token from a [`FragmentSource`] at most once.
#[derive(Clone, Debug)]
pub struct FragmentTokenProvider {
	source: FragmentSource,
	param: String,
}
impl FragmentTokenProvider {
	/// Reads the [`DEFAULT_TOKEN_PARAM`] parameter of `source`.
	pub fn new(source: FragmentSource) -> Self {
		Self { source, param: DEFAULT_TOKEN_PARAM.into() }
	}

	/// Overrides the parameter name.
	pub fn with_param(mut self, param: impl Into<String>) -> Self {
		self.param = param.into();

		self
	}

	/// Shared source this provider consumes.
	pub fn source(&self) -> &FragmentSource {
		&self.source
	}
}
impl TokenProvider for FragmentTokenProvider {
	fn label(&self) -> &str {
		"fragment"
	}

	fn acquire(&self) -> ProviderFuture<'_> {
		Box::pin(async move { self.source.take(&self.param) })
	}
}
