//! Introspection delegated to the authorization server.
//!
//! Each call sends one form-encoded POST (`client_id`, `client_secret`, `token`, and an optional
//! `token_type_hint`) to the configured endpoint. Response handling:
//!
//! - Success status with an `error` member: surfaced as [`Error::OAuth2`].
//! - Success status otherwise: `active` is taken verbatim, `scope` is split on spaces, `metadata`
//!   is copied when present. Malformed JSON is a [`TransientError::IntrospectionResponseParse`].
//! - Any other status: [`InternalError`] carrying a diagnostic built from the status and body. The
//!   body is not assumed to follow the OAuth 2.0 error format.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	config::RemoteIntrospectionConfig,
	error::{ConfigError, InternalError, TransientError},
	http::{IntrospectionHttpClient, ResponseMetadataSlot, TransportErrorMapper},
	introspection::{InactiveReason, IntrospectFuture, IntrospectionResult, TokenIntrospector},
	oauth2_error::{OAuth2Error, OAuth2ErrorPayload},
	obs::{self, IntrospectionOutcome, IntrospectionSpan, StrategyKind},
	scope::Scopes,
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestHttpClient, ReqwestTransportErrorMapper};

const ERROR_PREAMBLE: &str = "The introspection endpoint returned an error response.";

/// Strategy that asks the authorization server's introspection endpoint.
pub struct RemoteIntrospection<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: RemoteIntrospectionConfig,
	endpoint: Url,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> RemoteIntrospection<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a strategy that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: RemoteIntrospectionConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let endpoint = config.endpoint()?;

		Ok(Self { config, endpoint, http_client: http_client.into(), error_mapper: mapper.into() })
	}

	/// Resolved introspection endpoint.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Config the strategy was built from.
	pub fn config(&self) -> &RemoteIntrospectionConfig {
		&self.config
	}

	async fn request(&self, token: &str) -> Result<IntrospectionResult> {
		let request = self.build_request(token)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle
			.call(request)
			.await
			.map_err(|err| self.error_mapper.map_transport_error(meta.take().as_ref(), err))?;

		map_response(response)
	}

	fn build_request(&self, token: &str) -> Result<HttpRequest> {
		let credentials = &self.config.credentials;
		let mut form = FormSerializer::new(String::new());

		form.append_pair("client_id", credentials.identifier())
			.append_pair("client_secret", credentials.expose_secret())
			.append_pair("token", token);

		if let Some(hint) = &self.config.token_type_hint {
			form.append_pair("token_type_hint", hint);
		}

		let request = oauth2::http::Request::builder()
			.method(Method::POST)
			.uri(self.endpoint.as_str())
			.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
			.header(ACCEPT, "application/json")
			.body(form.finish().into_bytes())
			.map_err(ConfigError::from)?;

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl RemoteIntrospection<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a strategy that provisions its own reqwest-backed transport.
	pub fn new(config: RemoteIntrospectionConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> TokenIntrospector for RemoteIntrospection<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn introspect<'a>(&'a self, token: &'a str) -> IntrospectFuture<'a> {
		const KIND: StrategyKind = StrategyKind::Remote;

		let span = IntrospectionSpan::new(KIND, "remote_introspect");

		Box::pin(async move {
			obs::record_outcome(KIND, IntrospectionOutcome::Attempt);

			let result = span.instrument(self.request(token)).await;

			span.close(&result);
			obs::record_result(KIND, &result);

			result
		})
	}
}
impl<C, M> Debug for RemoteIntrospection<C, M>
where
	C: ?Sized + IntrospectionHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RemoteIntrospection")
			.field("endpoint", &self.endpoint.as_str())
			.field("client_id", &self.config.credentials.identifier())
			.finish()
	}
}

#[derive(Deserialize)]
struct IntrospectionResponse {
	active: bool,
	#[serde(default)]
	scope: Scopes,
	#[serde(default)]
	metadata: Option<Map<String, Value>>,
}
impl IntrospectionResponse {
	fn into_result(self) -> IntrospectionResult {
		if self.active {
			IntrospectionResult::active(self.scope, self.metadata.unwrap_or_default())
		} else {
			IntrospectionResult::inactive_because(InactiveReason::Rejected)
		}
	}
}

fn map_response(response: HttpResponse) -> Result<IntrospectionResult> {
	let status = response.status();
	let body = response.body();

	if !status.is_success() {
		return Err(internal_error(status.as_u16(), body).into());
	}
	if let Ok(payload) = serde_json::from_slice::<OAuth2ErrorPayload>(body) {
		return Err(OAuth2Error::from(payload).into());
	}

	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let wire: IntrospectionResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransientError::IntrospectionResponseParse {
			source,
			status: Some(status.as_u16()),
		})?;

	Ok(wire.into_result())
}

fn internal_error(status: u16, body: &[u8]) -> InternalError {
	let text = String::from_utf8_lossy(body);
	let text = text.trim();
	let mut message = format!("{ERROR_PREAMBLE}\nStatus code: {status}");
	let mut oauth2 = None;

	if !text.is_empty() {
		match serde_json::from_str::<Value>(text) {
			Ok(Value::Object(fields)) => {
				for (name, value) in fields.iter() {
					message.push_str(&format!("\n{name}: {}", render_field(value)));
				}

				oauth2 = serde_json::from_value::<OAuth2ErrorPayload>(Value::Object(fields))
					.ok()
					.map(|payload| OAuth2Error::from(payload).with_status(status));
			},
			_ => message.push_str(&format!("\nBody: {text}")),
		}
	}

	InternalError { message, upstream_status: status, oauth2 }
}

fn render_field(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
