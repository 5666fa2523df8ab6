//! Ordered scope lists parsed from space-delimited scope strings.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Ordered list of scopes granted to a token.
///
/// Order follows the source string and duplicates are kept, so the list mirrors exactly what the
/// authorization server reported. Splitting happens on runs of whitespace: an empty or
/// whitespace-only string yields an empty list rather than a single empty entry.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Scopes(Vec<String>);
impl Scopes {
	/// Creates a list from already-split scope values.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(scopes.into_iter().map(Into::<String>::into).filter(|s| !s.is_empty()).collect())
	}

	/// Splits a space-delimited scope string.
	pub fn parse(raw: &str) -> Self {
		Self(raw.split_whitespace().map(str::to_owned).collect())
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains `scope`.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Returns true if every entry of `required` is present.
	pub fn contains_all<'a, I>(&self, required: I) -> bool
	where
		I: IntoIterator<Item = &'a str>,
	{
		required.into_iter().all(|scope| self.contains(scope))
	}

	/// Iterator over scope values in their original order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	/// Re-joins the list into its space-delimited wire form.
	pub fn to_scope_string(&self) -> String {
		self.0.join(" ")
	}
}
impl Debug for Scopes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Scopes").field(&self.0).finish()
	}
}
impl Display for Scopes {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.to_scope_string())
	}
}
impl FromStr for Scopes {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse(s))
	}
}
impl From<Scopes> for Vec<String> {
	fn from(value: Scopes) -> Self {
		value.0
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a Scopes {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.0.iter() }
	}
}
impl Serialize for Scopes {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in self.0.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for Scopes {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Wire {
			Delimited(String),
			List(Vec<String>),
		}

		match Option::<Wire>::deserialize(deserializer)
			.map_err(|_| DeError::custom("scope must be a string or a list of strings"))?
		{
			Some(Wire::Delimited(raw)) => Ok(Self::parse(&raw)),
			Some(Wire::List(values)) => Ok(Self::new(values)),
			None => Ok(Self::default()),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn split_preserves_order() {
		let scopes = Scopes::parse("email name");

		assert_eq!(scopes.as_slice(), ["email".to_string(), "name".to_string()]);

		let reversed = Scopes::parse("name email");

		assert_eq!(reversed.iter().collect::<Vec<_>>(), vec!["name", "email"]);
		assert_ne!(scopes, reversed);
	}

	#[test]
	fn empty_and_blank_strings_yield_empty_list() {
		assert!(Scopes::parse("").is_empty());
		assert!(Scopes::parse("   ").is_empty());
		assert_eq!(Scopes::parse("a  b").len(), 2, "Repeated separators must not create blanks.");
	}

	#[test]
	fn contains_helpers_work() {
		let scopes = Scopes::parse("read write admin");

		assert!(scopes.contains("write"));
		assert!(!scopes.contains("wri"));
		assert!(scopes.contains_all(["read", "admin"]));
		assert!(!scopes.contains_all(["read", "delete"]));
		assert_eq!(scopes.to_string(), "read write admin");
	}

	#[test]
	fn deserializes_from_string_or_list() {
		let from_string: Scopes =
			serde_json::from_str("\"openid profile\"").expect("String form should deserialize.");
		let from_list: Scopes = serde_json::from_str("[\"openid\",\"profile\"]")
			.expect("List form should deserialize.");

		assert_eq!(from_string, from_list);
		assert!(serde_json::from_str::<Scopes>("null").expect("Null should be accepted.").is_empty());
		assert!(serde_json::from_str::<Scopes>("42").is_err());
	}
}
