//! Pluggable token sources raced by the orchestrator.
//!
//! Every strategy implements [`TokenProvider`], a single async `acquire` that yields a
//! [`Token`] or a [`ProviderError`]. Adapters share no state with their siblings:
//!
//! - [`QueryTokenProvider`] reads a named query parameter from a fixed URL.
//! - [`FragmentTokenProvider`] reads from a shared [`FragmentSource`] and clears it before
//!   yielding, so a token can be consumed at most once.
//! - [`ExtensionTokenProvider`] waits for the shared SDK loader, then asks the SDK for a
//!   signed context.
//! - [`FnTokenProvider`] wraps any async closure.

pub mod extension;
pub mod fragment;
pub mod func;
pub mod query;

pub use extension::*;
pub use fragment::*;
pub use func::*;
pub use query::*;

// crates.io
use percent_encoding::percent_decode_str;
// self
use crate::{_prelude::*, auth::Token, error::ProviderError};

/// Parameter name read by the URL-based providers unless overridden.
pub const DEFAULT_TOKEN_PARAM: &str = "_b";

/// Boxed future returned by [`TokenProvider::acquire`].
pub type ProviderFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Token, ProviderError>> + 'a + Send>>;

/// Strategy that asynchronously produces a raw token or fails.
///
/// Implementors must be `Send + Sync`; the orchestrator shares them behind `Arc` and drives
/// each `acquire` on its own task.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Stable label used in logs, metrics, and [`Authenticated::provider`].
	///
	/// [`Authenticated::provider`]: crate::auth::Authenticated::provider
	fn label(&self) -> &str;

	/// Attempts to produce a token.
	fn acquire(&self) -> ProviderFuture<'_>;
}

/// Returns the first percent-decoded value of `key` in a raw `name=value&...` string.
///
/// Only `%XX` escapes are decoded; a literal `+` stays a `+`. Pairs without `=` are skipped.
pub fn find_param(raw: &str, key: &str) -> Option<String> {
	raw.split('&').filter_map(|pair| pair.split_once('=')).find_map(|(name, value)| {
		(percent_decode_str(name).decode_utf8_lossy() == key)
			.then(|| percent_decode_str(value).decode_utf8_lossy().into_owned())
	})
}
