// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{OperationKind, OperationOutcome};

const OPERATION_TOTAL: &str = "oidc_rp_operation_total";
const OPERATION_DURATION: &str = "oidc_rp_operation_duration_seconds";

/// Counts one attempt or outcome of `kind` (no-op without the `metrics` feature).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(OPERATION_TOTAL, "operation" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (OPERATION_TOTAL, kind, outcome);
}

/// Records how long a finished operation took, labeled by its terminal outcome.
pub fn record_operation_duration(
	kind: OperationKind,
	outcome: OperationOutcome,
	elapsed: StdDuration,
) {
	#[cfg(feature = "metrics")]
	metrics::histogram!(
		OPERATION_DURATION,
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.record(elapsed.as_secs_f64());

	#[cfg(not(feature = "metrics"))]
	let _ = (OPERATION_DURATION, kind, outcome, elapsed);
}
