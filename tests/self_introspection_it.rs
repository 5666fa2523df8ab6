// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;
// self
use oauth2_introspect::{
	_preludet::*,
	config::{IntrospectionConfig, SelfIntrospectionConfig},
	introspection::{
		InactiveReason, Introspector, ReqwestIntrospector, SelfIntrospection, TokenIntrospector,
	},
	token::VerificationKey,
};

fn strategy() -> SelfIntrospection {
	SelfIntrospection::new(&SelfIntrospectionConfig {
		key: VerificationKey::secret(TEST_HMAC_SECRET),
	})
	.expect("HMAC key should load.")
}

#[tokio::test]
async fn unexpired_token_is_active() {
	let token = sign_hs256(&json!({
		"sub": "alice",
		"exp": unix_from_now(Duration::days(1)),
		"scope": "email profile",
		"metadata": { "plan": "pro" },
	}));
	let result = strategy().introspect(&token).await.expect("Introspection should succeed.");

	assert!(result.is_active());
	assert!(result.has_scope("profile"));
	assert_eq!(result.metadata().get("plan"), Some(&json!("pro")));
}

#[tokio::test]
async fn expired_token_is_inactive() {
	let token = sign_hs256(&json!({
		"exp": unix_from_now(-Duration::days(1)),
		"scope": "email",
	}));
	let result = strategy().introspect(&token).await.expect("Introspection should succeed.");

	assert!(!result.is_active());
	assert!(result.scopes().is_empty());
	assert_eq!(result.inactive_reason(), Some(InactiveReason::Expired));
}

#[tokio::test]
async fn foreign_signature_is_inactive() {
	let token = jsonwebtoken::encode(
		&Header::new(Algorithm::HS256),
		&json!({ "exp": unix_from_now(Duration::days(1)) }),
		&EncodingKey::from_secret(b"some-other-issuer-secret"),
	)
	.expect("Foreign token should sign.");
	let result = strategy().introspect(&token).await.expect("Introspection should succeed.");

	assert!(!result.is_active());
	assert_eq!(result.inactive_reason(), Some(InactiveReason::InvalidSignature));
}

#[tokio::test]
async fn garbage_is_inactive() {
	for token in ["", "garbage", "a.b", "a.b.c.d", "!!!.###.$$$"] {
		let result = strategy().introspect(token).await.expect("Introspection should succeed.");

		assert!(!result.is_active(), "Token {token:?} must be inactive.");
		assert_eq!(result.inactive_reason(), Some(InactiveReason::Malformed));
	}
}

#[tokio::test]
async fn missing_expiry_is_inactive() {
	let token = sign_hs256(&json!({ "sub": "alice" }));
	let result = strategy().introspect(&token).await.expect("Introspection should succeed.");

	assert!(!result.is_active());
	assert_eq!(result.inactive_reason(), Some(InactiveReason::MissingExpiry));
}

#[tokio::test]
async fn config_selects_self_contained_strategy() {
	let config: IntrospectionConfig = serde_json::from_value(json!({
		"strategy": "self_contained",
		"key": { "kind": "secret", "value": TEST_HMAC_SECRET },
	}))
	.expect("Config should deserialize.");
	let introspector = ReqwestIntrospector::from_config(config).expect("Introspector should build.");
	let token = sign_hs256(&json!({ "exp": unix_from_now(Duration::hours(1)) }));

	assert!(matches!(introspector, Introspector::SelfContained(_)));
	assert!(
		introspector
			.introspect(&token)
			.await
			.expect("Introspection should succeed.")
			.is_active()
	);
}

#[tokio::test]
async fn mistyped_optional_claims_do_not_deactivate() {
	let extras = [
		json!({ "sub": 42 }),
		json!({ "metadata": ["a"] }),
		json!({ "active": "yes" }),
		json!({ "aud": 7 }),
		json!({ "iat": 99_999_999_999_999_i64 }),
	];

	for extra in extras {
		let mut claims = json!({ "exp": unix_from_now(Duration::days(1)), "scope": "email" });

		if let (Value::Object(claims), Value::Object(extra)) = (&mut claims, &extra) {
			claims.extend(extra.clone());
		}

		let token = sign_hs256(&claims);
		let result = strategy().introspect(&token).await.expect("Introspection should succeed.");

		assert!(result.is_active(), "Claims {extra} must not deactivate a valid token.");
		assert!(result.has_scope("email"));
	}
}

#[tokio::test]
async fn mistyped_expiry_is_inactive() {
	let token = sign_hs256(&json!({ "exp": "tomorrow", "scope": "email" }));
	let result = strategy().introspect(&token).await.expect("Introspection should succeed.");

	assert!(!result.is_active());
	assert_eq!(result.inactive_reason(), Some(InactiveReason::MissingExpiry));
}
