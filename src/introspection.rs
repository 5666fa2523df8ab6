//! Token introspection: one contract, two strategies.
//!
//! [`TokenIntrospector::introspect`] answers "is this token active, and what does it grant?".
//! [`RemoteIntrospection`] asks the authorization server; [`SelfIntrospection`] verifies the token
//! locally. An inactive token is a normal [`IntrospectionResult`], never an error: errors are
//! reserved for failures of the validation mechanism itself (transport, configuration, or an
//! upstream error response). Neither strategy caches, so every call re-verifies.

pub mod remote;
pub mod self_contained;

pub use remote::*;
pub use self_contained::*;

// self
use crate::{
	_prelude::*,
	config::IntrospectionConfig,
	http::{IntrospectionHttpClient, TransportErrorMapper},
	scope::Scopes,
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

/// Boxed future returned by [`TokenIntrospector::introspect`].
pub type IntrospectFuture<'a> =
	Pin<Box<dyn Future<Output = Result<IntrospectionResult>> + 'a + Send>>;

#[cfg(feature = "reqwest")]
/// Introspector specialized for the crate's default reqwest transport stack.
pub type ReqwestIntrospector = Introspector<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Shared contract implemented by every introspection strategy.
pub trait TokenIntrospector: Send + Sync {
	/// Determines whether `token` is active and, if so, what it grants.
	fn introspect<'a>(&'a self, token: &'a str) -> IntrospectFuture<'a>;
}

/// Why a token was reported inactive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveReason {
	/// Token could not be parsed.
	Malformed,
	/// Token signature could not be verified.
	InvalidSignature,
	/// Token expiry is not in the future.
	Expired,
	/// Token carries no expiry claim.
	MissingExpiry,
	/// Authorization server reported the token inactive.
	Rejected,
}
impl InactiveReason {
	/// Returns a stable label suitable for logs or metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Malformed => "malformed",
			Self::InvalidSignature => "invalid_signature",
			Self::Expired => "expired",
			Self::MissingExpiry => "missing_expiry",
			Self::Rejected => "rejected",
		}
	}
}
impl Display for InactiveReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome of a single introspection call.
///
/// Inactive results never carry scopes or metadata, so nothing on an inactive result can be
/// mistaken for a grant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntrospectionResult {
	active: bool,
	scopes: Scopes,
	metadata: Map<String, Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	inactive_reason: Option<InactiveReason>,
}
impl IntrospectionResult {
	/// Active result carrying the granted scopes and metadata.
	pub fn active(scopes: Scopes, metadata: Map<String, Value>) -> Self {
		Self { active: true, scopes, metadata, inactive_reason: None }
	}

	/// Inactive result without a diagnostic reason.
	pub fn inactive() -> Self {
		Self::default()
	}

	/// Inactive result tagged with `reason`.
	pub fn inactive_because(reason: InactiveReason) -> Self {
		Self { inactive_reason: Some(reason), ..Self::default() }
	}

	/// Returns `true` if the token is currently valid.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Granted scopes; always empty for inactive results.
	pub fn scopes(&self) -> &Scopes {
		&self.scopes
	}

	/// Custom metadata; always empty for inactive results.
	pub fn metadata(&self) -> &Map<String, Value> {
		&self.metadata
	}

	/// Diagnostic reason for inactivity, when the strategy knows it.
	pub fn inactive_reason(&self) -> Option<InactiveReason> {
		self.inactive_reason
	}

	/// Returns `true` if the result is active and grants `scope`.
	pub fn has_scope(&self, scope: &str) -> bool {
		self.active && self.scopes.contains(scope)
	}
}

/// Strategy selected from an [`IntrospectionConfig`].
pub enum Introspector<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Authorization server introspection.
	Remote(RemoteIntrospection<C, M>),
	/// Local signature verification.
	SelfContained(SelfIntrospection),
}
impl<C, M> Introspector<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the configured strategy over a caller-provided transport.
	///
	/// The transport is ignored when the config selects the self-contained strategy.
	pub fn with_http_client(
		config: IntrospectionConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		match config {
			IntrospectionConfig::Remote(config) =>
				Ok(Self::Remote(RemoteIntrospection::with_http_client(config, http_client, mapper)?)),
			IntrospectionConfig::SelfContained(config) =>
				Ok(Self::SelfContained(SelfIntrospection::new(&config)?)),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Introspector<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Builds the configured strategy, provisioning the default reqwest transport.
	pub fn from_config(config: IntrospectionConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> TokenIntrospector for Introspector<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn introspect<'a>(&'a self, token: &'a str) -> IntrospectFuture<'a> {
		match self {
			Self::Remote(strategy) => strategy.introspect(token),
			Self::SelfContained(strategy) => strategy.introspect(token),
		}
	}
}
impl<C, M> Debug for Introspector<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Remote(strategy) => f.debug_tuple("Remote").field(strategy).finish(),
			Self::SelfContained(strategy) => f.debug_tuple("SelfContained").field(strategy).finish(),
		}
	}
}
