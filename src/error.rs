//! Error taxonomy shared by providers, verifiers, the extension loader, and the orchestrator.
//!
//! Only [`Error`] ever reaches callers of
//! [`Authenticator::authenticate`](crate::orchestrator::Authenticator::authenticate).
//! [`ProviderError`] and [`VerificationError`] describe individual strategy failures; the
//! orchestrator counts and logs them but never returns them.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Every provider failed to produce a token or every produced token was rejected.
	#[error("All auth backend failed")]
	AllFailed {
		/// Number of providers that took part in the attempt.
		providers: usize,
	},
	/// The optional attempt deadline elapsed before any outcome was reached.
	#[error("Authentication did not settle within {after:?}.")]
	TimedOut {
		/// Configured deadline.
		after: std::time::Duration,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// `authenticate` was called without any providers.
	#[error("No auth providers were configured.")]
	NoProviders,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Verification endpoint cannot be derived from the supplied base URL.
	#[error("Verification endpoint is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// A single provider could not produce a token.
#[derive(Debug, ThisError)]
pub enum ProviderError {
	/// The expected parameter is absent from its source.
	#[error("No `{name}` {location} parameter found.")]
	MissingParameter {
		/// Parameter name that was looked up.
		name: String,
		/// Where the parameter was expected (`query`, `fragment`).
		location: &'static str,
	},
	/// A one-shot source was already consumed by an earlier read.
	#[error("The `{name}` token was already consumed.")]
	Consumed {
		/// Parameter name of the consumed token.
		name: String,
	},
	/// The provider produced an empty token.
	#[error("Provider returned an empty token.")]
	EmptyToken,
	/// The external SDK rejected the context request.
	#[error("Extension SDK failed to provide a context: {message}.")]
	Extension {
		/// SDK-supplied message.
		message: String,
	},
	/// The external SDK never became ready.
	#[error(transparent)]
	ExtensionUnavailable(#[from] ExtensionError),
	/// Failure raised by a caller-supplied provider.
	#[error("{message}")]
	Custom {
		/// Caller-supplied description.
		message: String,
	},
}
impl ProviderError {
	/// Builds a [`ProviderError::Custom`] from any displayable message.
	pub fn custom(message: impl Into<String>) -> Self {
		Self::Custom { message: message.into() }
	}
}

/// A token was rejected by, or could not be checked against, the verification endpoint.
#[derive(Debug, ThisError)]
pub enum VerificationError {
	/// The endpoint answered with a non-success status.
	#[error("Verification endpoint rejected the token with status {status}.")]
	Rejected {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
	/// The endpoint answered with a body that is not valid JSON.
	#[error("Verification endpoint returned malformed JSON.")]
	MalformedBody {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The endpoint answered with JSON that is not an object.
	#[error("Verification endpoint returned a non-object payload.")]
	NotAnObject,
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Transport-level failures reported by the HTTP client.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the verification endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised while waiting on the [`ExtensionLoader`](crate::extension::ExtensionLoader).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ExtensionError {
	/// The SDK did not signal readiness within the configured bound.
	#[error("Extension SDK was not ready within {after:?}.")]
	TimedOut {
		/// Configured bound.
		after: std::time::Duration,
	},
	/// The loader was dropped before the SDK signalled readiness.
	#[error("Extension loader was dropped before the SDK became ready.")]
	Abandoned,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn aggregate_error_keeps_legacy_message() {
		let err = Error::AllFailed { providers: 1 };

		assert_eq!(err.to_string(), "All auth backend failed");
	}

	#[test]
	fn config_error_is_transparent() {
		let err: Error = ConfigError::NoProviders.into();

		assert!(matches!(err, Error::Config(ConfigError::NoProviders)));
		assert_eq!(err.to_string(), "No auth providers were configured.");
	}

	#[test]
	fn missing_parameter_names_location() {
		let err = ProviderError::MissingParameter { name: "_b".into(), location: "query" };

		assert_eq!(err.to_string(), "No `_b` query parameter found.");
	}
}
