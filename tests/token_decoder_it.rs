// crates.io
use jsonwebtoken::DecodingKey;
use serde_json::json;
// self
use oauth2_introspect::{
	_preludet::*,
	error::{ClaimsError, TokenError},
	token::TokenDecoder,
};

#[test]
fn unverified_decode_exposes_claims() {
	let token = sign_hs256(&json!({
		"sub": "alice",
		"aud": ["api", "admin"],
		"scope": "email",
		"exp": unix_from_now(Duration::minutes(5)),
	}));
	let decoded = TokenDecoder::unverified().decode(&token).expect("Token should decode.");
	let claims = decoded.claims();

	assert!(!decoded.is_verified());
	assert_eq!(decoded.header().alg.as_deref(), Some("HS256"));
	assert!(claims.check("sub", &json!("alice")));
	assert!(!claims.check("sub", &json!("mallory")));
	assert!(claims.check("nonce", &Value::Null));
	assert!(claims.check_all([("sub", &json!("alice")), ("scope", &json!("email"))]));
	assert!(claims.registered().aud.contains("admin"));
	assert!(matches!(claims.require("nonce"), Err(ClaimsError::KeyNotFound { .. })));
}

#[test]
fn verified_decode_rejects_foreign_keys() {
	let token = sign_hs256(&json!({ "sub": "alice" }));
	let decoded = TokenDecoder::verifying(DecodingKey::from_secret(TEST_HMAC_SECRET.as_bytes()))
		.decode(&token)
		.expect("Token should verify.");

	assert!(decoded.is_verified());

	let err = TokenDecoder::verifying(DecodingKey::from_secret(b"another-secret"))
		.decode(&token)
		.expect_err("Foreign key must fail verification.");

	assert!(matches!(err, Error::Token(TokenError::Verification { .. })));
}

#[test]
fn structural_faults_are_parsing_errors() {
	for token in ["", "one", "one.two", "a.b.c.d", "e30..sig"] {
		let err = TokenDecoder::unverified().decode(token).expect_err("Malformed token must fail.");

		match err {
			Error::Token(err) => assert!(err.is_parsing(), "Token {token:?} should be a parsing error."),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
