//! Closure-backed provider for caller-defined strategies.

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::ProviderError,
	provider::{ProviderFuture, TokenProvider},
};

/// Adapts an async closure into a [`TokenProvider`].
pub struct FnTokenProvider<F> {
	label: String,
	acquire: F,
}
impl<F, Fut> FnTokenProvider<F>
where
	F: Fn() -> Fut + Send + Sync,
	Fut: 'static + Future<Output = Result<Token, ProviderError>> + Send,
{
	/// Wraps `acquire` under the given label.
	pub fn new(label: impl Into<String>, acquire: F) -> Self {
		Self { label: label.into(), acquire }
	}
}
impl<F, Fut> TokenProvider for FnTokenProvider<F>
where
	F: Fn() -> Fut + Send + Sync,
	Fut: 'static + Future<Output = Result<Token, ProviderError>> + Send,
{
	fn label(&self) -> &str {
		&self.label
	}

	fn acquire(&self) -> ProviderFuture<'_> {
		Box::pin((self.acquire)())
	}
}
impl<F> Debug for FnTokenProvider<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FnTokenProvider").field("label", &self.label).finish()
	}
}
