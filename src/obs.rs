//! Optional observability helpers for pipeline calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each call inside a span named `twipla_3as.call` with the `method`
//!   and `path` fields.
//! - Enable `metrics` to increment the `twipla_3as_call_total` counter for every
//!   attempt/success/failure, labeled by `method` + `outcome`.
//!
//! With both features off every helper here is a no-op.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to the pipeline.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
