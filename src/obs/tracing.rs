// self
#[cfg(feature = "tracing")] use crate::obs::IntrospectionOutcome;
use crate::{_prelude::*, introspection::IntrospectionResult, obs::StrategyKind};

#[cfg(feature = "tracing")]
type Traced<F> = tracing::instrument::Instrumented<F>;
#[cfg(not(feature = "tracing"))]
type Traced<F> = F;

/// Span covering one `introspect` call.
///
/// Opened with `strategy` and `stage` fields; `outcome` and `inactive_reason` stay empty until
/// [`IntrospectionSpan::close`] records how the call ended. Token values are never recorded.
#[derive(Clone, Debug)]
pub struct IntrospectionSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl IntrospectionSpan {
	/// Opens a span for `kind` at `stage`.
	pub fn new(kind: StrategyKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_introspect.introspect",
				strategy = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
				inactive_reason = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs a synchronous section inside the span.
	pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to `fut` so it is entered on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> impl Future<Output = Fut::Output> + use<Fut>
	where
		Fut: Future,
	{
		self.traced(fut)
	}

	/// Records the terminal outcome of the call on the span.
	pub fn close(&self, result: &Result<IntrospectionResult>) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", IntrospectionOutcome::of(result).as_str());

			match result {
				Ok(result) =>
					if let Some(reason) = result.inactive_reason() {
						self.span.record("inactive_reason", reason.as_str());
					},
				Err(err) => tracing::debug!(parent: &self.span, error = %err, "Introspection failed."),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = result;
		}
	}

	#[cfg(feature = "tracing")]
	fn traced<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}

	#[cfg(not(feature = "tracing"))]
	fn traced<Fut>(&self, fut: Fut) -> Traced<Fut>
	where
		Fut: Future,
	{
		fut
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::introspection::InactiveReason;

	#[test]
	fn close_accepts_every_outcome() {
		let span = IntrospectionSpan::new(StrategyKind::SelfContained, "close_accepts_every_outcome");

		span.in_scope(|| ());
		span.close(&Ok(IntrospectionResult::inactive_because(InactiveReason::Expired)));
		span.close(&Err(crate::error::ClaimsError::KeyNotFound { name: "exp".into() }.into()));
	}

	#[tokio::test]
	async fn instrument_preserves_output() {
		let span = IntrospectionSpan::new(StrategyKind::Remote, "instrument_preserves_output");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
