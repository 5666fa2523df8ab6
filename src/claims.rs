//! Immutable claim sets decoded from signed tokens.
//!
//! [`Claims`] keeps every original claim for generic lookup and, alongside it, a
//! [`RegisteredClaims`] projection of the well-known fields with defaults filled in. Both are fixed
//! at construction; the type exposes no mutating API, so adding or removing a claim is rejected at
//! compile time:
//!
//! ```compile_fail
//! use oauth2_introspect::claims::Claims;
//!
//! let mut claims = Claims::default();
//!
//! claims.insert("sub".to_owned(), "alice".into());
//! ```
//!
//! ```compile_fail
//! use oauth2_introspect::claims::Claims;
//!
//! let mut claims = Claims::default();
//!
//! claims.remove("sub");
//! ```

// crates.io
use constant_time_eq::constant_time_eq;
use serde::{Deserializer, Serializer, de::DeserializeOwned, ser::SerializeMap};
use serde_json::Number;
// self
use crate::{
	_prelude::*,
	error::ClaimsError,
	scope::Scopes,
};

/// Immutable, cheaply clonable view over a decoded claim set.
#[derive(Clone, Default)]
pub struct Claims {
	inner: Arc<Map<String, Value>>,
	registered: RegisteredClaims,
}
impl Claims {
	/// Builds a claim set, projecting the well-known fields.
	///
	/// A well-known claim whose value does not fit its slot (for example a numeric `sub`) leaves
	/// the slot at its default; the raw value stays reachable through [`get`](Self::get).
	pub fn from_map(map: Map<String, Value>) -> Self {
		let registered = RegisteredClaims::project(&map);

		Self { inner: Arc::new(map), registered }
	}

	/// Returns the claim value, if present.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.inner.get(name)
	}

	/// Returns the claim value or `default` when absent.
	pub fn get_or<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
		self.inner.get(name).unwrap_or(default)
	}

	/// Returns the claim value or fails with [`ClaimsError::KeyNotFound`].
	pub fn require(&self, name: &str) -> Result<&Value, ClaimsError> {
		self.inner.get(name).ok_or_else(|| ClaimsError::KeyNotFound { name: name.to_owned() })
	}

	/// Returns true if the claim is present.
	pub fn has(&self, name: &str) -> bool {
		self.inner.contains_key(name)
	}

	/// Compares a claim against `expected`.
	///
	/// [`Value::Null`] matches only an absent claim. Strings are compared in constant time so the
	/// cost does not depend on the position of the first mismatching byte; every other type uses
	/// exact, type-sensitive equality (`1` never equals `"1"`).
	pub fn check(&self, name: &str, expected: &Value) -> bool {
		match (self.inner.get(name), expected) {
			(None, Value::Null) => true,
			(None, _) | (Some(_), Value::Null) => false,
			(Some(Value::String(actual)), Value::String(expected)) =>
				constant_time_eq(actual.as_bytes(), expected.as_bytes()),
			(Some(actual), expected) => actual == expected,
		}
	}

	/// Returns true if [`check`](Self::check) holds for every pair; stops at the first failure.
	pub fn check_all<'a, I, K>(&self, expected: I) -> bool
	where
		I: IntoIterator<Item = (K, &'a Value)>,
		K: AsRef<str>,
	{
		expected.into_iter().all(|(name, value)| self.check(name.as_ref(), value))
	}

	/// Projected well-known claims.
	pub fn registered(&self) -> &RegisteredClaims {
		&self.registered
	}

	/// Iterator over every claim in the set.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.inner.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Number of claims.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns true if the set holds no claims.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Returns an owned copy of the raw claim map.
	pub fn to_map(&self) -> Map<String, Value> {
		self.inner.as_ref().clone()
	}
}
impl From<Map<String, Value>> for Claims {
	fn from(value: Map<String, Value>) -> Self {
		Self::from_map(value)
	}
}
impl PartialEq for Claims {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}
impl Debug for Claims {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Claims")
			.field("names", &self.inner.keys().collect::<Vec<_>>())
			.field("registered", &self.registered)
			.finish()
	}
}
impl Serialize for Claims {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.inner.len()))?;

		for (name, value) in self.inner.iter() {
			map.serialize_entry(name, value)?;
		}

		map.end()
	}
}

/// Well-known claims projected into defaulted slots.
///
/// Each slot is filled independently. An absent claim, or one whose value does not fit the slot,
/// leaves the default in place. A mistyped or out-of-range `exp` therefore reads as missing, which
/// keeps [`is_unexpired_at`](Self::is_unexpired_at) fail-closed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisteredClaims {
	/// Server-asserted activity flag; defaults to `false`.
	pub active: bool,
	/// Granted scopes; empty when absent.
	pub scope: Scopes,
	/// Custom metadata object; empty when absent.
	pub metadata: Map<String, Value>,
	/// Expiry instant.
	pub exp: Option<OffsetDateTime>,
	/// Issued-at instant.
	pub iat: Option<OffsetDateTime>,
	/// Not-before instant.
	pub nbf: Option<OffsetDateTime>,
	/// Subject.
	pub sub: Option<String>,
	/// Intended audience(s).
	pub aud: Audience,
	/// Issuer.
	pub iss: Option<String>,
	/// Token identifier.
	pub jti: Option<String>,
	/// Resource owner username.
	pub username: Option<String>,
	/// Token type, e.g. `Bearer`.
	pub token_type: Option<String>,
}
impl RegisteredClaims {
	fn project(map: &Map<String, Value>) -> Self {
		Self {
			active: slot(map, "active"),
			scope: slot(map, "scope"),
			metadata: slot::<Option<Map<String, Value>>>(map, "metadata").unwrap_or_default(),
			exp: numeric_date_slot(map, "exp"),
			iat: numeric_date_slot(map, "iat"),
			nbf: numeric_date_slot(map, "nbf"),
			sub: slot(map, "sub"),
			aud: slot(map, "aud"),
			iss: slot(map, "iss"),
			jti: slot(map, "jti"),
			username: slot(map, "username"),
			token_type: slot(map, "token_type"),
		}
	}

	/// Returns true if the token carries an expiry later than `now`.
	///
	/// A missing expiry never counts as unexpired.
	pub fn is_unexpired_at(&self, now: OffsetDateTime) -> bool {
		self.exp.is_some_and(|exp| exp > now)
	}
}

/// Audience claim, accepted either as a single string or a list of strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Audience(Vec<String>);
impl Audience {
	/// Returns true if `audience` is one of the intended recipients.
	pub fn contains(&self, audience: &str) -> bool {
		self.0.iter().any(|candidate| candidate == audience)
	}

	/// Returns true if no audience was declared.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the declared audiences.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl<'de> Deserialize<'de> for Audience {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Wire {
			Single(String),
			Many(Vec<String>),
		}

		match Option::<Wire>::deserialize(deserializer)? {
			Some(Wire::Single(aud)) => Ok(Self(vec![aud])),
			Some(Wire::Many(auds)) => Ok(Self(auds)),
			None => Ok(Self::default()),
		}
	}
}

fn slot<T>(map: &Map<String, Value>, name: &str) -> T
where
	T: Default + DeserializeOwned,
{
	map.get(name).and_then(|value| T::deserialize(value).ok()).unwrap_or_default()
}

fn numeric_date_slot(map: &Map<String, Value>, name: &str) -> Option<OffsetDateTime> {
	match map.get(name) {
		Some(Value::Number(raw)) => numeric_date(raw),
		_ => None,
	}
}

fn numeric_date(raw: &Number) -> Option<OffsetDateTime> {
	let secs = match raw.as_i64() {
		Some(secs) => secs,
		None => {
			let secs = raw.as_f64()?;

			if !secs.is_finite() {
				return None;
			}

			secs.floor() as i64
		},
	};

	OffsetDateTime::from_unix_timestamp(secs).ok()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn claims(value: Value) -> Claims {
		let Value::Object(map) = value else { panic!("Fixture must be a JSON object.") };

		Claims::from_map(map)
	}

	#[test]
	fn missing_names_return_default() {
		let claims = claims(json!({ "sub": "alice" }));
		let fallback = json!("fallback");

		assert_eq!(claims.get_or("nope", &fallback), &fallback);
		assert!(claims.get("nope").is_none());
		assert!(!claims.has("nope"));
		assert!(claims.has("sub"));
	}

	#[test]
	fn strict_access_reports_missing_key() {
		let claims = claims(json!({ "sub": "alice" }));

		assert_eq!(claims.require("sub").expect("Present claim should resolve."), "alice");
		assert_eq!(
			claims.require("email").expect_err("Absent claim must fail strict access."),
			ClaimsError::KeyNotFound { name: "email".into() }
		);
	}

	#[test]
	fn check_handles_strings_nulls_and_types() {
		let claims = claims(json!({ "sub": "alice", "level": 3, "admin": false }));

		assert!(claims.check("sub", &json!("alice")));
		assert!(!claims.check("sub", &json!("alicf")));
		assert!(!claims.check("sub", &json!("alice-longer")));
		assert!(claims.check("missing", &Value::Null));
		assert!(!claims.check("sub", &Value::Null));
		assert!(!claims.check("missing", &json!("alice")));
		assert!(claims.check("level", &json!(3)));
		assert!(!claims.check("level", &json!("3")), "Numbers never equal their string form.");
		assert!(claims.check("admin", &json!(false)));
	}

	#[test]
	fn check_all_requires_every_pair() {
		let claims = claims(json!({ "sub": "alice", "iss": "https://issuer.example" }));
		let empty: Vec<(&str, &Value)> = Vec::new();
		let sub = json!("alice");
		let iss = json!("https://issuer.example");
		let wrong = json!("mallory");

		assert!(claims.check_all(empty));
		assert!(claims.check_all([("sub", &sub), ("iss", &iss)]));
		assert!(!claims.check_all([("sub", &wrong), ("iss", &iss)]));
	}

	#[test]
	fn projects_registered_claims() {
		let claims = claims(json!({
			"active": true,
			"scope": "email name",
			"metadata": { "tenant": "acme" },
			"exp": 1_900_000_000,
			"iat": 1_700_000_000.75,
			"aud": "api",
			"sub": "alice",
			"custom": [1, 2, 3]
		}));
		let registered = claims.registered();

		assert!(registered.active);
		assert_eq!(registered.scope.iter().collect::<Vec<_>>(), vec!["email", "name"]);
		assert_eq!(registered.metadata.get("tenant"), Some(&json!("acme")));
		assert_eq!(registered.exp.map(|t| t.unix_timestamp()), Some(1_900_000_000));
		assert_eq!(registered.iat.map(|t| t.unix_timestamp()), Some(1_700_000_000));
		assert!(registered.aud.contains("api"));
		assert_eq!(registered.sub.as_deref(), Some("alice"));
		assert!(registered.nbf.is_none());
		assert_eq!(claims.get("custom"), Some(&json!([1, 2, 3])));
	}

	#[test]
	fn mistyped_registered_claims_fall_back_to_defaults() {
		let claims = claims(json!({
			"sub": 42,
			"aud": 7,
			"active": "yes",
			"metadata": ["a"],
			"scope": { "not": "a scope" },
			"iat": 99_999_999_999_999_i64,
			"iss": "https://issuer.example",
			"exp": 1_900_000_000
		}));
		let registered = claims.registered();

		assert!(registered.sub.is_none());
		assert!(registered.aud.is_empty());
		assert!(!registered.active);
		assert!(registered.metadata.is_empty());
		assert!(registered.scope.is_empty());
		assert!(registered.iat.is_none(), "Out-of-range dates leave the slot empty.");
		assert_eq!(registered.iss.as_deref(), Some("https://issuer.example"));
		assert_eq!(registered.exp.map(|t| t.unix_timestamp()), Some(1_900_000_000));
		assert_eq!(claims.require("sub").expect("Raw claim should stay reachable."), &json!(42));
		assert_eq!(claims.get("metadata"), Some(&json!(["a"])));
	}

	#[test]
	fn mistyped_expiry_reads_as_missing() {
		let now = OffsetDateTime::now_utc();

		for exp in [json!("tomorrow"), json!(true), json!(99_999_999_999_999_i64), json!(null)] {
			let claims = claims(json!({ "exp": exp }));

			assert!(claims.registered().exp.is_none());
			assert!(!claims.registered().is_unexpired_at(now));
			assert!(claims.has("exp"));
		}
	}

	#[test]
	fn clones_share_the_same_claims() {
		let original = claims(json!({ "sub": "alice" }));
		let copy = original.clone();

		assert_eq!(original, copy);
		assert!(Arc::ptr_eq(&original.inner, &copy.inner));
	}

	#[test]
	fn expiry_check_is_fail_closed() {
		let now = OffsetDateTime::now_utc();
		let missing = RegisteredClaims::default();
		let future = RegisteredClaims { exp: Some(now + Duration::hours(1)), ..Default::default() };
		let past = RegisteredClaims { exp: Some(now - Duration::hours(1)), ..Default::default() };

		assert!(!missing.is_unexpired_at(now));
		assert!(future.is_unexpired_at(now));
		assert!(!past.is_unexpired_at(now));
	}
}
