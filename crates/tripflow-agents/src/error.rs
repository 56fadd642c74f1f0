//! Public failure types for the pipeline entry points.

/// Terminal failure of a planning invocation.
///
/// Carries the error list accumulated across the run. Intent-parse
/// failures and retry exhaustion both surface through this same shape;
/// either way the caller must resubmit rather than retry internally.
#[derive(Debug, Clone, thiserror::Error)]
#[error("planning failed after {} attempt(s): {}", .attempts, .errors.join("; "))]
pub struct PlanningFailure {
    /// Accumulated error messages, in the order they were recorded.
    pub errors: Vec<String>,
    /// Generation attempts consumed before giving up.
    pub attempts: u32,
}

/// Infrastructure failure of a review invocation.
///
/// Distinct from a user rejection, which is a legitimate `ReviewOutcome`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("review pipeline failed: {message}")]
pub struct ReviewFailure {
    pub message: String,
}
