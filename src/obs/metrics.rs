// self
use crate::{
	_prelude::*,
	introspection::IntrospectionResult,
	obs::{IntrospectionOutcome, StrategyKind},
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_outcome(kind: StrategyKind, outcome: IntrospectionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_introspect_total",
			"strategy" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records the terminal outcome of an `introspect` call.
pub fn record_result(kind: StrategyKind, result: &Result<IntrospectionResult>) {
	record_outcome(kind, IntrospectionOutcome::of(result));
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_outcome_noop_without_metrics() {
		record_outcome(StrategyKind::Remote, IntrospectionOutcome::Failure);
		record_result(StrategyKind::SelfContained, &Ok(IntrospectionResult::inactive()));
	}
}
