//! Decode-and-verify pipeline for self-contained signed tokens.
//!
//! [`TokenDecoder::decode`] runs three stages and stops at the first failure:
//!
//! 1. Split the compact token into header, payload, and signature segments and decode each one.
//!    Any structural fault yields [`TokenError::Parsing`].
//! 2. When the decoder holds a key, verify the signature with the algorithm named by the token
//!    header. Unsecured (`none`) or algorithm-less tokens are rejected outright. Failures yield
//!    [`TokenError::Verification`].
//! 3. Build an immutable [`Claims`] set from the payload.
//!
//! Output is all-or-nothing: no claim data escapes a failed decode.

pub mod key;

pub use key::*;

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
// self
use crate::{
	_prelude::*,
	claims::Claims,
	error::{ConfigError, TokenError},
};

/// JOSE header fields relevant to verification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
	/// Declared signing algorithm.
	#[serde(default)]
	pub alg: Option<String>,
	/// Declared media type.
	#[serde(default)]
	pub typ: Option<String>,
	/// Key identifier hint.
	#[serde(default)]
	pub kid: Option<String>,
}

/// Successfully decoded token.
#[derive(Clone, Debug)]
pub struct DecodedToken {
	header: TokenHeader,
	claims: Claims,
	verified: bool,
}
impl DecodedToken {
	/// Decoded JOSE header.
	pub fn header(&self) -> &TokenHeader {
		&self.header
	}

	/// Decoded claim set.
	pub fn claims(&self) -> &Claims {
		&self.claims
	}

	/// Consumes the token, returning its claims.
	pub fn into_claims(self) -> Claims {
		self.claims
	}

	/// Returns `true` when the signature was checked against a key.
	///
	/// `false` means the caller built the decoder without key material; it never means a
	/// verification failure, which is always reported as an error.
	pub fn is_verified(&self) -> bool {
		self.verified
	}
}

/// Parses compact signed tokens and, when configured with a key, verifies them.
#[derive(Clone, Default)]
pub struct TokenDecoder {
	key: Option<DecodingKey>,
}
impl TokenDecoder {
	/// Decoder that skips signature verification.
	pub fn unverified() -> Self {
		Self { key: None }
	}

	/// Decoder that verifies every token against `key`.
	pub fn verifying(key: DecodingKey) -> Self {
		Self { key: Some(key) }
	}

	/// Builds a verifying decoder from serializable key material.
	pub fn from_key(key: &VerificationKey) -> Result<Self, ConfigError> {
		Ok(Self::verifying(key.to_decoding_key()?))
	}

	/// Returns `true` if signatures are checked.
	pub fn verifies(&self) -> bool {
		self.key.is_some()
	}

	/// Decodes `token`, verifying its signature when a key is configured.
	///
	/// Returns [`Error::Token`] for malformed or unverifiable tokens and [`Error::Config`] when the
	/// configured key cannot be used at all.
	pub fn decode(&self, token: &str) -> Result<DecodedToken> {
		let segments = Segments::split(token)?;
		let header = segments.header()?;
		let payload = segments.payload()?;

		if let Some(key) = &self.key {
			verify_signature(token, &header, key)?;
		}

		let claims = Claims::from_map(payload);

		Ok(DecodedToken { header, claims, verified: self.key.is_some() })
	}
}
impl Debug for TokenDecoder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenDecoder").field("verifies", &self.verifies()).finish()
	}
}

struct Segments<'a> {
	header: &'a str,
	payload: &'a str,
}
impl<'a> Segments<'a> {
	fn split(token: &'a str) -> Result<Self, TokenError> {
		let mut parts = token.split('.');
		let (Some(header), Some(payload), Some(signature), None) =
			(parts.next(), parts.next(), parts.next(), parts.next())
		else {
			return Err(TokenError::parsing("expected three dot-separated segments"));
		};

		if header.is_empty() || payload.is_empty() {
			return Err(TokenError::parsing("header and payload segments must not be empty"));
		}
		if !signature.is_empty() {
			URL_SAFE_NO_PAD
				.decode(signature)
				.map_err(|e| TokenError::parsing_with("signature segment is not base64url", e))?;
		}

		Ok(Self { header, payload })
	}

	fn header(&self) -> Result<TokenHeader, TokenError> {
		let bytes = decode_segment("header", self.header)?;

		serde_json::from_slice(&bytes)
			.map_err(|e| TokenError::parsing_with("header segment is not a JSON object", e))
	}

	fn payload(&self) -> Result<Map<String, Value>, TokenError> {
		let bytes = decode_segment("payload", self.payload)?;

		serde_json::from_slice(&bytes)
			.map_err(|e| TokenError::parsing_with("payload segment is not a JSON object", e))
	}
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, TokenError> {
	URL_SAFE_NO_PAD
		.decode(segment)
		.map_err(|e| TokenError::parsing_with(format!("{name} segment is not base64url"), e))
}

fn verify_signature(token: &str, header: &TokenHeader, key: &DecodingKey) -> Result<()> {
	let name = match header.alg.as_deref().map(str::trim) {
		None | Some("") =>
			return Err(TokenError::verification("token header declares no algorithm").into()),
		Some(name) if name.eq_ignore_ascii_case("none") =>
			return Err(TokenError::verification("unsecured tokens are not accepted").into()),
		Some(name) => name,
	};
	let algorithm = Algorithm::from_str(name).map_err(|source| TokenError::Verification {
		reason: format!("algorithm `{name}` is not supported"),
		source: Some(source),
	})?;
	let mut validation = Validation::new(algorithm);

	// Time-based and audience checks belong to the caller; only the signature is verified here.
	validation.validate_exp = false;
	validation.validate_nbf = false;
	validation.validate_aud = false;
	validation.required_spec_claims.clear();

	jsonwebtoken::decode::<Map<String, Value>>(token, key, &validation)
		.map(|_| ())
		.map_err(map_verification_error)
}

fn map_verification_error(err: jsonwebtoken::errors::Error) -> Error {
	let reason = match err.kind() {
		ErrorKind::InvalidKeyFormat | ErrorKind::InvalidEcdsaKey =>
			return ConfigError::InvalidVerificationKey { source: err }.into(),
		ErrorKind::InvalidSignature => "signature does not match",
		ErrorKind::InvalidAlgorithm => "token algorithm does not match the configured key",
		_ => "token was rejected by the verifier",
	};

	TokenError::Verification { reason: reason.into(), source: Some(err) }.into()
}
