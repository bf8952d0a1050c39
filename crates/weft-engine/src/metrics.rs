//! Per-tick timing and outcome counters.

/// Performance metrics for one tick.
///
/// Returned in every [`TickReport`](crate::TickReport) and retained as
/// [`Workspace::last_metrics`](crate::Workspace::last_metrics) so hosts
/// can surface a status line without holding on to reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Total wall-clock time for the tick, in microseconds.
    pub total_us: u64,
    /// Update-phase time per component, `(display name, microseconds)`,
    /// in registration order.
    pub update_us: Vec<(String, u64)>,
    /// Resolve-phase wall-clock time, in microseconds.
    pub resolve_us: u64,
    /// Commit-phase wall-clock time (round-completed hooks plus queued
    /// command application), in microseconds.
    pub commit_us: u64,
    /// Couplings that propagated a value this tick.
    pub couplings_resolved: u32,
    /// Couplings skipped with a warning this tick.
    pub couplings_skipped: u32,
}
