//! Optional observability helpers for provider operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oidc_rp.operation` with the `operation`
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `oidc_rp_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::time::Instant;
// self
use crate::_prelude::*;

/// Protocol operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Discovery document fetch.
	Discovery,
	/// Authorization URL construction.
	Authorize,
	/// Authorization code exchange.
	TokenExchange,
	/// Userinfo fetch.
	UserInfo,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Discovery => "discovery",
			OperationKind::Authorize => "authorize",
			OperationKind::TokenExchange => "token_exchange",
			OperationKind::UserInfo => "userinfo",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside an operation span, recording the attempt, outcome, and duration.
pub(crate) async fn observe<T, Fut>(kind: OperationKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, stage);
	let started = Instant::now();

	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	finish(kind, &span, started, &result);

	result
}

/// Runs the synchronous `op` inside an operation span, with the same bookkeeping as
/// [`observe`].
pub(crate) fn observe_sync<T, F>(kind: OperationKind, stage: &'static str, op: F) -> Result<T>
where
	F: FnOnce() -> Result<T>,
{
	let span = OperationSpan::new(kind, stage);
	let started = Instant::now();

	record_operation_outcome(kind, OperationOutcome::Attempt);

	let result = {
		let _entered = span.entered();

		op()
	};

	finish(kind, &span, started, &result);

	result
}

fn finish<T>(kind: OperationKind, span: &OperationSpan, started: Instant, result: &Result<T>) {
	let outcome = match result {
		Ok(_) => OperationOutcome::Success,
		Err(_) => OperationOutcome::Failure,
	};

	span.record_outcome(outcome);
	record_operation_outcome(kind, outcome);
	record_operation_duration(kind, outcome, started.elapsed());
}
