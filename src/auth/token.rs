//! Opaque token wrapper that redacts the raw value and exposes a stable fingerprint.

// std
use std::sync::OnceLock;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Raw token produced by a provider; no structure is assumed.
///
/// Formatting never prints the raw value. Use [`fingerprint`](Self::fingerprint) when a token
/// has to be correlated across log lines.
#[derive(Default)]
pub struct Token {
	value: String,
	fingerprint_cache: OnceLock<String>,
}
impl Token {
	/// Wraps a raw token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self { value: value.into(), fingerprint_cache: OnceLock::new() }
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.value
	}

	/// Returns true for tokens that must be treated as a provider failure.
	pub fn is_empty(&self) -> bool {
		self.value.is_empty()
	}

	/// Base64 (no padding) SHA-256 digest of the raw value, truncated to 12 characters.
	pub fn fingerprint(&self) -> &str {
		self.fingerprint_cache.get_or_init(|| compute_fingerprint(&self.value))
	}
}
impl Clone for Token {
	fn clone(&self) -> Self {
		Self { value: self.value.clone(), fingerprint_cache: self.fingerprint_cache.clone() }
	}
}
impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}
impl Eq for Token {}
impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<String> for Token {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl From<&str> for Token {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Token").field(&"<redacted>").finish()
	}
}
impl Display for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

fn compute_fingerprint(value: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(value.as_bytes());

	let mut encoded = STANDARD_NO_PAD.encode(hasher.finalize());

	encoded.truncate(12);

	encoded
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = Token::new("super-secret");

		assert_eq!(format!("{token:?}"), "Token(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
	}

	#[test]
	fn fingerprint_is_stable_and_short() {
		let a = Token::new("abc");
		let b = Token::new("abc");
		let c = Token::new("abd");

		assert_eq!(a.fingerprint(), b.fingerprint());
		assert_ne!(a.fingerprint(), c.fingerprint());
		assert_eq!(a.fingerprint().len(), 12);
		assert!(!a.fingerprint().contains("abc"));
	}

	#[test]
	fn empty_tokens_are_detected() {
		assert!(Token::new("").is_empty());
		assert!(!Token::new("x").is_empty());
	}
}
