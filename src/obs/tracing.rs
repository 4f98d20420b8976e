// self
use crate::{
	_prelude::*,
	obs::{OperationKind, OperationOutcome},
};

/// Future returned by [`OperationSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`].
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// `oidc_rp.operation` span carrying the `operation`, `stage`, and (once known) `outcome`
/// fields.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens a span for `kind` at call site `stage`.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oidc_rp.operation",
				operation = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Fills the span's `outcome` field.
	pub fn record_outcome(&self, outcome: OperationOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());

		#[cfg(not(feature = "tracing"))]
		let _ = outcome;
	}

	/// Enters the span for a synchronous operation.
	pub fn entered(&self) -> OperationSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { _guard: self.span.clone().entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			OperationSpanGuard {}
		}
	}

	/// Attaches the span to `fut` so no guard lives across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Keeps an [`OperationSpan`] entered until dropped.
pub struct OperationSpanGuard {
	#[cfg(feature = "tracing")]
	_guard: tracing::span::EnteredSpan,
}
impl Debug for OperationSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}
