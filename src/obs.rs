//! Optional observability helpers for mirror stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oidc_mirror.stage` with the `stage`
//!   (fetch/store) and `site` (call site) fields, plus a warn event for every per-provider
//!   failure the batch discards.
//! - Enable `metrics` to increment the `oidc_mirror_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
	/// Discovery document fetches.
	Fetch,
	/// Object-store writes.
	Store,
}
impl StageKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageKind::Fetch => "fetch",
			StageKind::Store => "store",
		}
	}
}
impl Display for StageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage for one provider.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure, whether discarded or propagated.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
