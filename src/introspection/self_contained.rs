//! Introspection by local signature verification.
//!
//! Decode and verification failures are folded into inactive results; only configuration faults
//! (unusable key material) propagate as errors.

// crates.io
use jsonwebtoken::DecodingKey;
// self
use crate::{
	_prelude::*,
	config::SelfIntrospectionConfig,
	error::{ConfigError, TokenError},
	introspection::{InactiveReason, IntrospectFuture, IntrospectionResult, TokenIntrospector},
	obs::{self, IntrospectionOutcome, IntrospectionSpan, StrategyKind},
	token::TokenDecoder,
};

/// Strategy that verifies self-contained tokens without contacting the network.
#[derive(Clone, Debug)]
pub struct SelfIntrospection {
	decoder: TokenDecoder,
}
impl SelfIntrospection {
	/// Builds the strategy, loading the configured key once.
	pub fn new(config: &SelfIntrospectionConfig) -> Result<Self, ConfigError> {
		Ok(Self { decoder: TokenDecoder::from_key(&config.key)? })
	}

	/// Builds the strategy from an already loaded key.
	pub fn with_key(key: DecodingKey) -> Self {
		Self { decoder: TokenDecoder::verifying(key) }
	}

	/// Synchronously introspects `token` against the current clock.
	pub fn inspect(&self, token: &str) -> Result<IntrospectionResult> {
		self.inspect_at(token, OffsetDateTime::now_utc())
	}

	/// Synchronously introspects `token` as of `now`.
	///
	/// The token is active only when it verifies and its `exp` lies strictly after `now`.
	pub fn inspect_at(&self, token: &str, now: OffsetDateTime) -> Result<IntrospectionResult> {
		let decoded = match self.decoder.decode(token) {
			Ok(decoded) => decoded,
			Err(Error::Token(err)) => return Ok(IntrospectionResult::inactive_because(reason(&err))),
			Err(err) => return Err(err),
		};
		let registered = decoded.claims().registered();

		match registered.exp {
			None => Ok(IntrospectionResult::inactive_because(InactiveReason::MissingExpiry)),
			Some(_) if !registered.is_unexpired_at(now) =>
				Ok(IntrospectionResult::inactive_because(InactiveReason::Expired)),
			Some(_) => Ok(IntrospectionResult::active(
				registered.scope.clone(),
				registered.metadata.clone(),
			)),
		}
	}
}
impl TokenIntrospector for SelfIntrospection {
	fn introspect<'a>(&'a self, token: &'a str) -> IntrospectFuture<'a> {
		const KIND: StrategyKind = StrategyKind::SelfContained;

		Box::pin(async move {
			let span = IntrospectionSpan::new(KIND, "self_introspect");

			obs::record_outcome(KIND, IntrospectionOutcome::Attempt);

			let result = span.in_scope(|| self.inspect(token));

			span.close(&result);
			obs::record_result(KIND, &result);

			result
		})
	}
}

fn reason(err: &TokenError) -> InactiveReason {
	match err {
		TokenError::Parsing { .. } => InactiveReason::Malformed,
		TokenError::Verification { .. } => InactiveReason::InvalidSignature,
	}
}
