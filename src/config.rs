//! Strategy configuration: client credentials, endpoint settings, and key material.
//!
//! Configs are plain serde structs built once and passed by value into a strategy. Defaults are
//! applied explicitly here rather than merged from any global state.

// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::{_prelude::*, error::ConfigError, token::VerificationKey};

/// Client identifier and secret used to authenticate introspection calls.
///
/// The secret is redacted by its `Debug` implementation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub identifier: ClientId,
	/// OAuth 2.0 client secret.
	pub secret: ClientSecret,
}
impl ClientCredentials {
	/// Creates a credential pair.
	pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { identifier: ClientId::new(identifier.into()), secret: ClientSecret::new(secret.into()) }
	}

	/// Client identifier as a string slice.
	pub fn identifier(&self) -> &str {
		self.identifier.as_str()
	}

	/// Client secret. Callers must avoid logging this string.
	pub fn expose_secret(&self) -> &str {
		self.secret.secret()
	}
}

/// Settings for [`RemoteIntrospection`](crate::introspection::RemoteIntrospection).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteIntrospectionConfig {
	/// Authorization server base URL.
	pub base_url: Url,
	/// Introspection path, resolved against `base_url` with standard URL joining rules.
	#[serde(default = "RemoteIntrospectionConfig::default_path")]
	pub path: String,
	/// Credentials sent with every introspection call.
	pub credentials: ClientCredentials,
	/// Optional `token_type_hint` form parameter.
	#[serde(default)]
	pub token_type_hint: Option<String>,
}
impl RemoteIntrospectionConfig {
	/// Path used when none is configured.
	pub const DEFAULT_PATH: &'static str = "/introspect";

	/// Creates a builder seeded with `credentials`.
	pub fn builder(credentials: ClientCredentials) -> RemoteIntrospectionConfigBuilder {
		RemoteIntrospectionConfigBuilder::new(credentials)
	}

	/// Resolves and validates the full introspection endpoint URL.
	pub fn endpoint(&self) -> Result<Url, ConfigError> {
		let endpoint = self
			.base_url
			.join(&self.path)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		match endpoint.scheme() {
			"http" | "https" => Ok(endpoint),
			_ => Err(ConfigError::UnsupportedScheme { url: endpoint.to_string() }),
		}
	}

	fn default_path() -> String {
		Self::DEFAULT_PATH.into()
	}
}

/// Builder for [`RemoteIntrospectionConfig`] values.
#[derive(Debug)]
pub struct RemoteIntrospectionConfigBuilder {
	/// Authorization server base URL.
	pub base_url: Option<Url>,
	/// Introspection path.
	pub path: String,
	/// Credentials sent with every call.
	pub credentials: ClientCredentials,
	/// Optional `token_type_hint` form parameter.
	pub token_type_hint: Option<String>,
}
impl RemoteIntrospectionConfigBuilder {
	/// Creates a builder with the default path and no base URL.
	pub fn new(credentials: ClientCredentials) -> Self {
		Self {
			base_url: None,
			path: RemoteIntrospectionConfig::DEFAULT_PATH.into(),
			credentials,
			token_type_hint: None,
		}
	}

	/// Sets the authorization server base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the introspection path.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();

		self
	}

	/// Sends `token_type_hint` with every call.
	pub fn token_type_hint(mut self, hint: impl Into<String>) -> Self {
		self.token_type_hint = Some(hint.into());

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<RemoteIntrospectionConfig, ConfigError> {
		let base_url = self.base_url.ok_or(ConfigError::MissingBaseUrl)?;
		let config = RemoteIntrospectionConfig {
			base_url,
			path: self.path,
			credentials: self.credentials,
			token_type_hint: self.token_type_hint,
		};

		config.endpoint()?;

		Ok(config)
	}
}

/// Settings for [`SelfIntrospection`](crate::introspection::SelfIntrospection).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfIntrospectionConfig {
	/// Key used to verify every token.
	pub key: VerificationKey,
}

/// Selects and configures an introspection strategy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum IntrospectionConfig {
	/// Ask the authorization server.
	Remote(RemoteIntrospectionConfig),
	/// Verify tokens locally.
	SelfContained(SelfIntrospectionConfig),
}
