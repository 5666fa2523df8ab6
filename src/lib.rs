//! Client-side OAuth 2.0 token validation.
//!
//! Tokens are either checked against the authorization server's introspection endpoint or verified
//! locally as self-contained signed tokens. Protocol failures are classified into one typed error
//! taxonomy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod claims;
pub mod config;
pub mod error;
pub mod http;
pub mod introspection;
pub mod oauth2_error;
pub mod obs;
pub mod scope;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use jsonwebtoken::{Algorithm, EncodingKey, Header};
	// self
	use crate::{
		config::{ClientCredentials, RemoteIntrospectionConfig},
		http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
		introspection::RemoteIntrospection,
	};

	/// Shared HMAC secret used to mint and verify fixtures.
	pub const TEST_HMAC_SECRET: &str = "introspection-test-secret-with-enough-entropy";

	/// Remote strategy type alias used by reqwest-backed integration tests.
	pub type ReqwestTestIntrospection =
		RemoteIntrospection<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`RemoteIntrospection`] pointed at `base_url` with the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_introspection(
		base_url: &str,
		client_id: &str,
		client_secret: &str,
	) -> ReqwestTestIntrospection {
		let config = RemoteIntrospectionConfig::builder(ClientCredentials::new(
			client_id,
			client_secret,
		))
		.base_url(Url::parse(base_url).expect("Failed to parse mock introspection base URL."))
		.build()
		.expect("Failed to build remote introspection config.");

		RemoteIntrospection::with_http_client(
			config,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
		.expect("Failed to build remote introspection strategy.")
	}

	/// Signs `claims` with [`TEST_HMAC_SECRET`] using HS256.
	pub fn sign_hs256(claims: &Value) -> String {
		jsonwebtoken::encode(
			&Header::new(Algorithm::HS256),
			claims,
			&EncodingKey::from_secret(TEST_HMAC_SECRET.as_bytes()),
		)
		.expect("Failed to sign HS256 fixture token.")
	}

	/// Returns a unix timestamp offset from now by `offset`.
	pub fn unix_from_now(offset: Duration) -> i64 {
		(OffsetDateTime::now_utc() + offset).unix_timestamp()
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use jsonwebtoken;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
