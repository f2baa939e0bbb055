//! Verification boundary: exchange a raw token for a verified identity.
//!
//! [`Verifier`] is the only contract the orchestrator depends on. Each call yields exactly
//! one outcome, asynchronously. [`HttpVerifier`] implements it over reqwest for both
//! endpoint shapes described by [`TokenPlacement`].

pub mod config;
#[cfg(feature = "reqwest")] pub mod endpoint;

pub use config::*;
#[cfg(feature = "reqwest")] pub use endpoint::*;

// self
use crate::{
	_prelude::*,
	auth::{Token, VerifiedUser},
	error::VerificationError,
};

/// Boxed future returned by [`Verifier::verify`].
pub type VerifyFuture<'a> =
	Pin<Box<dyn Future<Output = Result<VerifiedUser, VerificationError>> + 'a + Send>>;

/// Exchanges a token for a [`VerifiedUser`].
pub trait Verifier
where
	Self: Send + Sync,
{
	/// Submits `token` to the backend.
	fn verify<'a>(&'a self, token: &'a Token) -> VerifyFuture<'a>;
}

/// Parses a verification response body.
///
/// Anything other than a JSON object is a verification failure; callers never see a
/// distinct parse error.
pub fn parse_verified_user(body: &[u8]) -> Result<VerifiedUser, VerificationError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let payload: serde_json::Value = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| VerificationError::MalformedBody { source })?;

	if !payload.is_object() {
		return Err(VerificationError::NotAnObject);
	}

	Ok(VerifiedUser::new(payload))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn object_bodies_are_verified_users() {
		let user = parse_verified_user(b"{\"id\":42,\"name\":\"Ada\"}")
			.expect("Object body should parse into a verified user.");

		assert_eq!(user.get("id"), Some(&serde_json::json!(42)));
	}

	#[test]
	fn malformed_and_non_object_bodies_fail() {
		assert!(matches!(
			parse_verified_user(b"<html>"),
			Err(VerificationError::MalformedBody { .. })
		));
		assert!(matches!(parse_verified_user(b"[1,2]"), Err(VerificationError::NotAnObject)));
		assert!(matches!(parse_verified_user(b"null"), Err(VerificationError::NotAnObject)));
	}
}
