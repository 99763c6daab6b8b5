//! Per-day completion aggregation
//!
//! Default-resolution rules live here and nowhere else: a missing quantity
//! contributes 0, a missing count target means a target of 1.

use cadence_domain::{CheckinRecord, TrackType};

/// Aggregate one local day's records into a completion quantity.
///
/// Skip records are filtered out here; whether a skip counts as success is
/// streak-evaluation policy, not aggregation.
pub fn aggregate_completions(track_type: TrackType, records: &[CheckinRecord]) -> f64 {
    let mut completions = records.iter().filter(|record| record.is_completion());

    match track_type {
        TrackType::Binary => {
            if completions.next().is_some() {
                1.0
            } else {
                0.0
            }
        }
        TrackType::Count | TrackType::Duration | TrackType::Timer => {
            completions.map(|record| record.quantity.unwrap_or(0.0)).sum()
        }
    }
}

/// Daily target a habit's completions are measured against.
pub fn target_for(track_type: TrackType, count_target: Option<i64>) -> f64 {
    match track_type {
        TrackType::Binary => 1.0,
        #[allow(clippy::cast_precision_loss)]
        TrackType::Count | TrackType::Duration | TrackType::Timer => {
            count_target.unwrap_or(1) as f64
        }
    }
}
