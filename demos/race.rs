//! Races three token sources against an in-process verifier.
//!
//! 1. A query-string provider that finds no token and fails immediately.
//! 2. A fragment provider whose token the verifier accepts after a short delay.
//! 3. An extension provider whose SDK loads in the background and whose token verifies
//!    faster, so it wins the race even though the fragment provider produced its token first.

// std
use std::{sync::Arc, time::Duration};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use auth_race::{
	auth::{Token, VerifiedUser},
	error::VerificationError,
	extension::{
		ContextFuture, ExtensionContext, ExtensionLoader, ExtensionSdk, ReadySignal, SdkLoader,
	},
	orchestrator::Authenticator,
	provider::{
		ExtensionTokenProvider, FragmentSource, FragmentTokenProvider, QueryTokenProvider,
		TokenProvider,
	},
	verify::{Verifier, VerifyFuture},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let page = Url::parse("https://bot.example.com/webview?lang=en#_b=fragment-token")?;
	let loader: SdkLoader = ExtensionLoader::new(|signal: ReadySignal<Arc<dyn ExtensionSdk>>| {
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(20)).await;
			signal.ready(Arc::new(DemoSdk));
		});
	});
	let providers: Vec<Arc<dyn TokenProvider>> = vec![
		Arc::new(QueryTokenProvider::new(page.clone())),
		Arc::new(FragmentTokenProvider::new(FragmentSource::from_url(&page))),
		Arc::new(ExtensionTokenProvider::new(loader, "demo-app")),
	];
	let auth = Authenticator::new(Arc::new(DemoVerifier));
	let authenticated = auth.authenticate(&providers).await?;

	println!(
		"Provider `{}` won with user {} (token fingerprint {}).",
		authenticated.provider,
		authenticated.user.payload(),
		authenticated.token.fingerprint(),
	);

	tokio::time::sleep(Duration::from_millis(250)).await;

	println!("Late verifications discarded: {}.", auth.metrics.discarded());

	Ok(())
}

struct DemoSdk;
impl ExtensionSdk for DemoSdk {
	fn get_context<'a>(&'a self, app_id: &'a str) -> ContextFuture<'a> {
		Box::pin(async move { Ok(ExtensionContext::new(format!("signed.{app_id}"))) })
	}
}

struct DemoVerifier;
impl Verifier for DemoVerifier {
	fn verify<'a>(&'a self, token: &'a Token) -> VerifyFuture<'a> {
		Box::pin(async move {
			let (delay, id) = match token.expose() {
				"fragment-token" => (200, 1),
				value if value.starts_with("signed.") => (10, 2),
				_ => return Err(VerificationError::Rejected { status: 401 }),
			};

			tokio::time::sleep(Duration::from_millis(delay)).await;

			Ok(VerifiedUser::new(serde_json::json!({ "id": id })))
		})
	}
}
