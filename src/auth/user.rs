//! Verified identity payloads returned by the verification endpoint.

// self
use crate::{_prelude::*, auth::Token};

/// Identity payload returned by a [`Verifier`](crate::verify::Verifier).
///
/// The payload is passed through unmodified; callers decide how to interpret it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifiedUser(pub serde_json::Value);
impl VerifiedUser {
	/// Wraps a JSON payload.
	pub fn new(payload: serde_json::Value) -> Self {
		Self(payload)
	}

	/// Borrows the raw payload.
	pub fn payload(&self) -> &serde_json::Value {
		&self.0
	}

	/// Looks up a top-level field of an object payload.
	pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
		self.0.get(field)
	}

	/// Consumes the wrapper and returns the raw payload.
	pub fn into_inner(self) -> serde_json::Value {
		self.0
	}
}

/// Successful outcome of one authentication attempt.
#[derive(Clone, Debug)]
pub struct Authenticated {
	/// Identity returned by the verification endpoint.
	pub user: VerifiedUser,
	/// Token that produced [`user`](Self::user).
	pub token: Token,
	/// Label of the provider whose token won the race.
	pub provider: String,
	/// Instant the winning verification completed.
	pub verified_at: OffsetDateTime,
}
