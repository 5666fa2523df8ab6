//! Crate-level error types shared by the decoder, both introspection strategies, and the
//! transport layer.

// self
use crate::{_prelude::*, oauth2_error::OAuth2Error};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// An inactive token is never an error: both strategies report it through
/// [`IntrospectionResult`](crate::introspection::IntrospectionResult). Every variant here means the
/// validation mechanism itself failed or the caller misused the API.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token could not be parsed or verified.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// Strict claim access failed.
	#[error(transparent)]
	Claims(#[from] ClaimsError),
	/// Introspection endpoint answered with a non-success status.
	#[error(transparent)]
	Internal(#[from] InternalError),
	/// Introspection endpoint answered with a standards-compliant OAuth 2.0 error payload.
	#[error(transparent)]
	OAuth2(#[from] OAuth2Error),
}

/// Configuration and validation failures raised before any token is inspected.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Introspection endpoint cannot be derived from the configured base URL and path.
	#[error("Introspection endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Introspection endpoint uses a scheme other than `http` or `https`.
	#[error("Introspection endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Introspection config was built without a base URL.
	#[error("Introspection config is missing a base URL.")]
	MissingBaseUrl,
	/// Verification key material could not be loaded.
	#[error("Verification key material is invalid.")]
	InvalidVerificationKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
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

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Transport gave up waiting for the introspection endpoint.
	#[error("Request timed out while calling the introspection endpoint.")]
	Timeout {
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Introspection endpoint returned an unexpected but non-fatal response.
	#[error("Introspection endpoint returned an unexpected response: {message}.")]
	IntrospectionEndpoint {
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Introspection endpoint responded with JSON that does not match the expected shape.
	#[error("Introspection endpoint returned malformed JSON.")]
	IntrospectionResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the introspection endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the introspection endpoint.")]
	Io(#[from] std::io::Error),
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

/// Failures raised by the token decode-and-verify pipeline.
///
/// Neither variant carries claim data.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// Token is not a well-formed three-part signed token.
	#[error("Token could not be parsed: {reason}.")]
	Parsing {
		/// Which structural check failed.
		reason: String,
		/// Underlying decoding fault, when one exists.
		#[source]
		source: Option<BoxError>,
	},
	/// Token is well formed but its signature was rejected.
	#[error("Token signature could not be verified: {reason}.")]
	Verification {
		/// Why verification failed.
		reason: String,
		/// Underlying verification fault, when one exists.
		#[source]
		source: Option<jsonwebtoken::errors::Error>,
	},
}
impl TokenError {
	/// Builds a [`TokenError::Parsing`] without an underlying fault.
	pub fn parsing(reason: impl Into<String>) -> Self {
		Self::Parsing { reason: reason.into(), source: None }
	}

	/// Builds a [`TokenError::Parsing`] wrapping the underlying fault.
	pub fn parsing_with(
		reason: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Parsing { reason: reason.into(), source: Some(Box::new(src)) }
	}

	/// Builds a [`TokenError::Verification`] without an underlying fault.
	pub fn verification(reason: impl Into<String>) -> Self {
		Self::Verification { reason: reason.into(), source: None }
	}

	/// Returns `true` for structural failures.
	pub fn is_parsing(&self) -> bool {
		matches!(self, Self::Parsing { .. })
	}

	/// Returns `true` for signature failures.
	pub fn is_verification(&self) -> bool {
		matches!(self, Self::Verification { .. })
	}
}

/// Failures raised by strict [`Claims`](crate::claims::Claims) access.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ClaimsError {
	/// Requested claim is absent.
	#[error("Claim `{name}` is not present.")]
	KeyNotFound {
		/// Claim name that was requested.
		name: String,
	},
}

/// Non-success response from the introspection endpoint.
///
/// This is a transport or configuration fault and never a statement about the token.
#[derive(Clone, Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
	/// Multi-line diagnostic built from the upstream response.
	pub message: String,
	/// HTTP status returned by the introspection endpoint.
	pub upstream_status: u16,
	/// Structured error payload, when the body contained a recognizable `error` member.
	pub oauth2: Option<OAuth2Error>,
}
impl InternalError {
	/// Status code reported to callers for every internal error.
	pub const STATUS_CODE: u16 = 500;

	/// Returns the status code reported to callers.
	pub const fn status_code(&self) -> u16 {
		Self::STATUS_CODE
	}
}
