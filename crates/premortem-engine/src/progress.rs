//! Advisory progress reporting.

use serde::{Deserialize, Serialize};

/// A status notification emitted at each orchestrator state transition.
///
/// Delivered through an unbounded channel so emission never blocks the loop;
/// a closed or absent receiver is silently ignored. Correctness of the run
/// never depends on the observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Machine-readable stage tag, e.g. `generating_queries`, `searching`.
    pub stage: String,
    /// Human-readable detail line.
    pub detail: String,
}
