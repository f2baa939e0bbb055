//! Token obtained from the external SDK's signed context.

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::ProviderError,
	extension::SdkLoader,
	provider::{ProviderFuture, TokenProvider},
};

/// Waits for the shared SDK, then exchanges `app_id` for a signed context.
///
/// The SDK's success maps to a token (the context's `signed_request`); its failure maps to
/// [`ProviderError::Extension`]. When the loader was given a ready timeout, an SDK that never
/// loads surfaces as [`ProviderError::ExtensionUnavailable`]; otherwise the provider simply
/// never completes.
#[derive(Clone, Debug)]
pub struct ExtensionTokenProvider {
	loader: SdkLoader,
	app_id: String,
}
impl ExtensionTokenProvider {
	/// Creates a provider bound to the shared loader and the application identifier.
	pub fn new(loader: SdkLoader, app_id: impl Into<String>) -> Self {
		Self { loader, app_id: app_id.into() }
	}
}
impl TokenProvider for ExtensionTokenProvider {
	fn label(&self) -> &str {
		"extension"
	}

	fn acquire(&self) -> ProviderFuture<'_> {
		Box::pin(async move {
			let sdk = self.loader.ready().await?;
			let context = sdk
				.get_context(&self.app_id)
				.await
				.map_err(|e| ProviderError::Extension { message: e.to_string() })?;

			Ok(Token::new(context.signed_request))
		})
	}
}
