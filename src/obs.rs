//! Optional observability helpers for introspection calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `oauth2_introspect.introspect` with the `strategy` and
//!   `stage` (call site) fields, plus `outcome` and `inactive_reason` once the call ends.
//! - Enable `metrics` to increment the `oauth2_introspect_total` counter for every
//!   attempt/active/inactive/failure, labeled by `strategy` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, introspection::IntrospectionResult};

/// Introspection strategies observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
	/// Authorization server introspection endpoint.
	Remote,
	/// Local signature verification.
	SelfContained,
}
impl StrategyKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StrategyKind::Remote => "remote",
			StrategyKind::SelfContained => "self_contained",
		}
	}
}
impl Display for StrategyKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrospectionOutcome {
	/// Entry to `introspect`.
	Attempt,
	/// Token reported active.
	Active,
	/// Token reported inactive.
	Inactive,
	/// Failure propagated back to the caller.
	Failure,
}
impl IntrospectionOutcome {
	/// Classifies the terminal result of an `introspect` call.
	pub fn of(result: &Result<IntrospectionResult>) -> Self {
		match result {
			Ok(result) if result.is_active() => Self::Active,
			Ok(_) => Self::Inactive,
			Err(_) => Self::Failure,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			IntrospectionOutcome::Attempt => "attempt",
			IntrospectionOutcome::Active => "active",
			IntrospectionOutcome::Inactive => "inactive",
			IntrospectionOutcome::Failure => "failure",
		}
	}
}
impl Display for IntrospectionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
