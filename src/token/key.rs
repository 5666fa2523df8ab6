//! Verification key material accepted by the token decoder.

// crates.io
use jsonwebtoken::{DecodingKey, jwk::Jwk};
// self
use crate::{_prelude::*, error::ConfigError};

/// Serializable description of the key used to verify token signatures.
///
/// Material is converted into a [`DecodingKey`] once, when the decoder is built, so malformed keys
/// surface as [`ConfigError::InvalidVerificationKey`] instead of per-token failures.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationKey {
	/// Raw HMAC secret.
	Secret {
		/// Secret bytes as UTF-8 text.
		value: String,
	},
	/// Base64-encoded HMAC secret.
	Base64Secret {
		/// Standard base64 encoding of the secret bytes.
		value: String,
	},
	/// RSA public key in PEM form.
	RsaPem {
		/// PEM document.
		pem: String,
	},
	/// EC public key in PEM form.
	EcPem {
		/// PEM document.
		pem: String,
	},
	/// Ed25519 public key in PEM form.
	EdPem {
		/// PEM document.
		pem: String,
	},
	/// Single JSON Web Key.
	Jwk {
		/// Key as published in a JWKS document.
		jwk: Jwk,
	},
}
impl VerificationKey {
	/// Convenience constructor for HMAC secrets.
	pub fn secret(value: impl Into<String>) -> Self {
		Self::Secret { value: value.into() }
	}

	/// Stable label for the key family.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Secret { .. } => "secret",
			Self::Base64Secret { .. } => "base64_secret",
			Self::RsaPem { .. } => "rsa_pem",
			Self::EcPem { .. } => "ec_pem",
			Self::EdPem { .. } => "ed_pem",
			Self::Jwk { .. } => "jwk",
		}
	}

	/// Loads the material into a [`DecodingKey`].
	pub fn to_decoding_key(&self) -> Result<DecodingKey, ConfigError> {
		let key = match self {
			Self::Secret { value } => Ok(DecodingKey::from_secret(value.as_bytes())),
			Self::Base64Secret { value } => DecodingKey::from_base64_secret(value),
			Self::RsaPem { pem } => DecodingKey::from_rsa_pem(pem.as_bytes()),
			Self::EcPem { pem } => DecodingKey::from_ec_pem(pem.as_bytes()),
			Self::EdPem { pem } => DecodingKey::from_ed_pem(pem.as_bytes()),
			Self::Jwk { jwk } => DecodingKey::from_jwk(jwk),
		};

		key.map_err(|source| ConfigError::InvalidVerificationKey { source })
	}
}
impl Debug for VerificationKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Secret { .. } | Self::Base64Secret { .. } =>
				f.debug_struct("VerificationKey").field("kind", &self.kind()).finish_non_exhaustive(),
			Self::RsaPem { pem } | Self::EcPem { pem } | Self::EdPem { pem } => f
				.debug_struct("VerificationKey")
				.field("kind", &self.kind())
				.field("pem_len", &pem.len())
				.finish(),
			Self::Jwk { jwk } => f
				.debug_struct("VerificationKey")
				.field("kind", &self.kind())
				.field("kid", &jwk.common.key_id)
				.finish(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secrets_never_reach_debug_output() {
		let key = VerificationKey::secret("super-secret");

		assert!(!format!("{key:?}").contains("super-secret"));
	}

	#[test]
	fn malformed_material_is_a_config_error() {
		let key = VerificationKey::RsaPem { pem: "not a pem".into() };

		assert!(matches!(key.to_decoding_key(), Err(ConfigError::InvalidVerificationKey { .. })));

		let key = VerificationKey::Base64Secret { value: "***".into() };

		assert!(key.to_decoding_key().is_err());
	}

	#[test]
	fn deserializes_tagged_config() {
		let key: VerificationKey = serde_json::from_str(r#"{"kind":"secret","value":"abc"}"#)
			.expect("Tagged secret should deserialize.");

		assert_eq!(key.kind(), "secret");
		assert!(key.to_decoding_key().is_ok());
	}
}
