// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use auth_race::{
	auth::Token,
	error::{Error, VerificationError},
	http::ReqwestHttpClient,
	orchestrator::Authenticator,
	provider::{QueryTokenProvider, TokenProvider},
	reqwest::{Client, redirect::Policy},
	verify::{HttpVerifier, TokenPlacement, Verifier, VerifierConfig},
};

fn config(server: &MockServer) -> VerifierConfig {
	let origin = Url::parse(&server.base_url()).expect("Mock server URL should parse.");

	VerifierConfig::for_origin(&origin).expect("Mock origin should produce an endpoint.")
}

// `httpmock` serves HTTPS with a self-signed certificate.
fn mock_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(Policy::none())
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

fn verifier(config: VerifierConfig) -> HttpVerifier {
	HttpVerifier::with_http_client(config, mock_http_client())
}

fn authenticator(server: &MockServer) -> Authenticator {
	Authenticator::new(Arc::new(verifier(config(server))))
}

#[tokio::test]
async fn form_body_token_is_exchanged_for_user() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/postback/auth")
				.header("content-type", "application/x-www-form-urlencoded")
				.header("accept", "application/json")
				.body("token=a%2Bb%3Dc");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":42,\"name\":\"Ada\"}");
		})
		.await;
	let user = verifier(config(&server))
		.verify(&Token::new("a+b=c"))
		.await
		.expect("Accepted token should verify.");

	assert_eq!(user.get("id"), Some(&serde_json::json!(42)));

	mock.assert_async().await;
}

#[tokio::test]
async fn bearer_header_placement_sends_authorization() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/postback/auth").header("authorization", "Bearer abc");
			then.status(200).header("content-type", "application/json").body("{\"id\":7}");
		})
		.await;
	let user = verifier(config(&server).with_placement(TokenPlacement::BearerHeader))
		.verify(&Token::new("abc"))
		.await
		.expect("Bearer token should verify.");

	assert_eq!(user.get("id"), Some(&serde_json::json!(7)));

	mock.assert_async().await;
}

#[tokio::test]
async fn rejected_status_and_malformed_body_are_verification_failures() {
	let server = MockServer::start_async().await;
	let forbidden = server
		.mock_async(|when, then| {
			when.method(POST).path("/postback/auth").body("token=denied");
			then.status(403).body("{\"error\":\"nope\"}");
		})
		.await;
	let garbled = server
		.mock_async(|when, then| {
			when.method(POST).path("/postback/auth").body("token=garbled");
			then.status(200).body("<html>not json</html>");
		})
		.await;
	let verifier = verifier(config(&server));
	let err = verifier
		.verify(&Token::new("denied"))
		.await
		.expect_err("Forbidden status should fail verification.");

	assert!(matches!(err, VerificationError::Rejected { status: 403 }));

	let err = verifier
		.verify(&Token::new("garbled"))
		.await
		.expect_err("Malformed body should fail verification.");

	assert!(matches!(err, VerificationError::MalformedBody { .. }));

	forbidden.assert_async().await;
	garbled.assert_async().await;
}

#[tokio::test]
async fn authenticator_verifies_query_token_over_http() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/postback/auth").body("token=abc");
			then.status(200).header("content-type", "application/json").body("{\"id\":42}");
		})
		.await;
	let auth = authenticator(&server);
	let page = Url::parse("https://bot.example.com/app?_b=abc").expect("Page URL should parse.");
	let providers: Vec<Arc<dyn TokenProvider>> = vec![Arc::new(QueryTokenProvider::new(page))];
	let authenticated = auth.authenticate(&providers).await.expect("Query token should verify.");

	assert_eq!(authenticated.user.get("id"), Some(&serde_json::json!(42)));
	assert_eq!(authenticated.provider, "query");

	mock.assert_async().await;
}

#[tokio::test]
async fn authenticator_reports_aggregate_error_when_endpoint_rejects() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/postback/auth");
			then.status(401);
		})
		.await;
	let auth = authenticator(&server);
	let page = Url::parse("https://bot.example.com/app?_b=abc").expect("Page URL should parse.");
	let providers: Vec<Arc<dyn TokenProvider>> = vec![Arc::new(QueryTokenProvider::new(page))];
	let err = auth.authenticate(&providers).await.expect_err("Rejected token should fail.");

	assert!(matches!(err, Error::AllFailed { providers: 1 }));

	mock.assert_async().await;
}
