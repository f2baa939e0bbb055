//! Capability exposed by the external SDK once the loader reports it ready.

// self
use crate::{_prelude::*, extension::ExtensionLoader};

/// Boxed future returned by [`ExtensionSdk::get_context`].
pub type ContextFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ExtensionContext, SdkError>> + 'a + Send>>;

/// Loader specialized for the shared SDK handle consumed by
/// [`ExtensionTokenProvider`](crate::provider::ExtensionTokenProvider).
pub type SdkLoader = ExtensionLoader<Arc<dyn ExtensionSdk>>;

/// Context-fetch capability of the external SDK.
///
/// The SDK reports exactly one outcome per call; the transport it uses is opaque.
pub trait ExtensionSdk
where
	Self: Send + Sync,
{
	/// Requests the signed context for `app_id`.
	fn get_context<'a>(&'a self, app_id: &'a str) -> ContextFuture<'a>;
}

/// Context returned by [`ExtensionSdk::get_context`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionContext {
	/// Signed request the backend verifies; used as the provider's token.
	pub signed_request: String,
	/// Remaining fields reported by the SDK.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}
impl ExtensionContext {
	/// Creates a context carrying only the signed request.
	pub fn new(signed_request: impl Into<String>) -> Self {
		Self { signed_request: signed_request.into(), extra: Default::default() }
	}
}
impl Debug for ExtensionContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExtensionContext")
			.field("signed_request", &"<redacted>")
			.field("extra", &self.extra)
			.finish()
	}
}

/// Failure reported by the SDK's context fetch.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct SdkError {
	/// SDK-supplied error code, when present.
	pub code: Option<i64>,
	/// SDK-supplied message.
	pub message: String,
}
impl SdkError {
	/// Creates an error without a code.
	pub fn new(message: impl Into<String>) -> Self {
		Self { code: None, message: message.into() }
	}

	/// Attaches the SDK error code.
	pub fn with_code(mut self, code: i64) -> Self {
		self.code = Some(code);

		self
	}
}
