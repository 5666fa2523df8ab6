//! OAuth 2.0 protocol error taxonomy.
//!
//! [`OAuth2Error::from_response`] turns the raw `(error, error_description, hint)` triple found in a
//! protocol response into a typed error. Unknown codes collapse into
//! [`OAuth2ErrorKind::UndefinedError`] so callers always receive a usable kind and status.

// self
use crate::_prelude::*;

/// Protocol error kinds defined by RFC 6749 plus a catch-all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuth2ErrorKind {
	/// Request is missing a parameter or is otherwise malformed.
	InvalidRequest,
	/// Client authentication failed.
	InvalidClient,
	/// Grant or refresh token is invalid, expired, or revoked.
	InvalidGrant,
	/// Requested scope is invalid or exceeds the granted scope.
	InvalidScope,
	/// Client is not allowed to use this grant type.
	UnauthorizedClient,
	/// Grant type is not supported by the authorization server.
	UnsupportedGrantType,
	/// Response type is not supported by the authorization server.
	UnsupportedResponseType,
	/// Resource owner or server denied the request.
	AccessDenied,
	/// Authorization server hit an unexpected condition.
	ServerError,
	/// Authorization server is overloaded or under maintenance.
	TemporarilyUnavailable,
	/// Code not covered by the taxonomy.
	UndefinedError,
}
impl OAuth2ErrorKind {
	/// Every kind, in declaration order.
	pub const ALL: [Self; 11] = [
		Self::InvalidRequest,
		Self::InvalidClient,
		Self::InvalidGrant,
		Self::InvalidScope,
		Self::UnauthorizedClient,
		Self::UnsupportedGrantType,
		Self::UnsupportedResponseType,
		Self::AccessDenied,
		Self::ServerError,
		Self::TemporarilyUnavailable,
		Self::UndefinedError,
	];

	/// Returns the wire code for the kind.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::InvalidRequest => "invalid_request",
			Self::InvalidClient => "invalid_client",
			Self::InvalidGrant => "invalid_grant",
			Self::InvalidScope => "invalid_scope",
			Self::UnauthorizedClient => "unauthorized_client",
			Self::UnsupportedGrantType => "unsupported_grant_type",
			Self::UnsupportedResponseType => "unsupported_response_type",
			Self::AccessDenied => "access_denied",
			Self::ServerError => "server_error",
			Self::TemporarilyUnavailable => "temporarily_unavailable",
			Self::UndefinedError => "undefined_error",
		}
	}

	/// Default HTTP status associated with the kind.
	pub const fn default_status(self) -> u16 {
		match self {
			Self::InvalidClient => 401,
			Self::AccessDenied => 403,
			Self::ServerError => 500,
			Self::TemporarilyUnavailable => 503,
			Self::InvalidRequest
			| Self::InvalidGrant
			| Self::InvalidScope
			| Self::UnauthorizedClient
			| Self::UnsupportedGrantType
			| Self::UnsupportedResponseType
			| Self::UndefinedError => 400,
		}
	}

	/// Maps a wire code onto a kind, falling back to [`Self::UndefinedError`].
	///
	/// Matching is exact; providers that vary the case are treated as unknown.
	pub fn from_code(code: &str) -> Self {
		Self::ALL.into_iter().find(|kind| kind.as_str() == code).unwrap_or(Self::UndefinedError)
	}
}
impl Display for OAuth2ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Typed OAuth 2.0 protocol error.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("OAuth 2.0 error `{kind}` ({status_code}): {message}")]
pub struct OAuth2Error {
	/// Classified error kind.
	pub kind: OAuth2ErrorKind,
	/// Human-readable description, falling back to the wire code.
	pub message: String,
	/// Optional remediation hint supplied by the server.
	pub hint: Option<String>,
	/// HTTP status associated with the error.
	pub status_code: u16,
}
impl OAuth2Error {
	/// Creates an error of `kind` with its default status.
	pub fn new(kind: OAuth2ErrorKind, message: impl Into<String>) -> Self {
		Self { kind, message: message.into(), hint: None, status_code: kind.default_status() }
	}

	/// Classifies the raw triple taken from a protocol response.
	///
	/// A missing description falls back to the original error code so unknown codes stay visible
	/// after collapsing into [`OAuth2ErrorKind::UndefinedError`].
	pub fn from_response(code: &str, description: Option<&str>, hint: Option<&str>) -> Self {
		let kind = OAuth2ErrorKind::from_code(code);
		let message = description.map(str::to_owned).unwrap_or_else(|| code.to_owned());
		let mut error = Self::new(kind, message);

		error.hint = hint.map(str::to_owned);

		error
	}

	/// Attaches a hint.
	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = Some(hint.into());

		self
	}

	/// Overrides the default status, for origins that supply one explicitly.
	pub fn with_status(mut self, status_code: u16) -> Self {
		self.status_code = status_code;

		self
	}

	/// Renders the standard JSON error payload.
	pub fn to_payload(&self) -> Value {
		let mut payload = Map::new();

		payload.insert("error".into(), Value::String(self.kind.as_str().into()));
		payload.insert("error_description".into(), Value::String(self.message.clone()));

		if let Some(hint) = &self.hint {
			payload.insert("hint".into(), Value::String(hint.clone()));
		}

		Value::Object(payload)
	}
}

/// Wire shape of a standards-compliant error body.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct OAuth2ErrorPayload {
	pub(crate) error: String,
	#[serde(default)]
	pub(crate) error_description: Option<String>,
	#[serde(default)]
	pub(crate) hint: Option<String>,
}
impl From<OAuth2ErrorPayload> for OAuth2Error {
	fn from(payload: OAuth2ErrorPayload) -> Self {
		Self::from_response(
			&payload.error,
			payload.error_description.as_deref(),
			payload.hint.as_deref(),
		)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn factory_maps_every_defined_code() {
		let expected = [
			("invalid_request", OAuth2ErrorKind::InvalidRequest, 400),
			("invalid_client", OAuth2ErrorKind::InvalidClient, 401),
			("invalid_grant", OAuth2ErrorKind::InvalidGrant, 400),
			("invalid_scope", OAuth2ErrorKind::InvalidScope, 400),
			("unauthorized_client", OAuth2ErrorKind::UnauthorizedClient, 400),
			("unsupported_grant_type", OAuth2ErrorKind::UnsupportedGrantType, 400),
			("unsupported_response_type", OAuth2ErrorKind::UnsupportedResponseType, 400),
			("access_denied", OAuth2ErrorKind::AccessDenied, 403),
			("server_error", OAuth2ErrorKind::ServerError, 500),
			("temporarily_unavailable", OAuth2ErrorKind::TemporarilyUnavailable, 503),
			("undefined_error", OAuth2ErrorKind::UndefinedError, 400),
		];

		for (code, kind, status) in expected {
			let err = OAuth2Error::from_response(code, Some("description"), None);

			assert_eq!(err.kind, kind, "Code `{code}` should map to {kind:?}.");
			assert_eq!(err.status_code, status, "Code `{code}` should default to {status}.");
			assert_eq!(err.message, "description");
		}
	}

	#[test]
	fn unknown_codes_collapse_to_catch_all() {
		let err = OAuth2Error::from_response("totally_made_up", None, Some("check the docs"));

		assert_eq!(err.kind, OAuth2ErrorKind::UndefinedError);
		assert_eq!(err.status_code, 400);
		assert_eq!(err.message, "totally_made_up");
		assert_eq!(err.hint.as_deref(), Some("check the docs"));
		assert_eq!(OAuth2ErrorKind::from_code("INVALID_GRANT"), OAuth2ErrorKind::UndefinedError);
	}

	#[test]
	fn explicit_status_overrides_default() {
		let err = OAuth2Error::new(OAuth2ErrorKind::InvalidClient, "bad secret").with_status(400);

		assert_eq!(err.status_code, 400);
		assert_eq!(err.kind.default_status(), 401);
	}

	#[test]
	fn payload_round_trips_through_factory() {
		let err =
			OAuth2Error::new(OAuth2ErrorKind::AccessDenied, "denied").with_hint("ask an admin");
		let payload: OAuth2ErrorPayload = serde_json::from_value(err.to_payload())
			.expect("Rendered payload should deserialize.");

		assert_eq!(OAuth2Error::from(payload), err);
	}
}
