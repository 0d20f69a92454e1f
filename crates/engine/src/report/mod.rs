//! Pure reporting computations: period aggregation and split settlement.
//!
//! Everything in this module is a synchronous function over fully-materialized
//! slices; no I/O, no database handles, no shared state. The [`ops`] layer
//! fetches the records and hands them over, so these functions can be tested
//! in isolation and cached trivially by the caller.
//!
//! Data-quality issues never abort a computation. A malformed row is skipped
//! and counted in [`Diagnostics`], and the caller decides how loudly to
//! surface that; a dashboard with one poisoned record still renders.
//!
//! [`ops`]: crate::Engine

pub use aggregate::{
    Delta, PeriodSummary, PeriodTotals, build_series, category_breakdown, period_over_period,
    period_totals,
};
pub use settlement::{
    orphaned_participant_count, total_owed_by_user, total_owed_to_user, unpaid_participants,
};
pub use window::{DateWindow, Period, PeriodKind};

mod aggregate;
mod settlement;
mod window;

/// Non-fatal data-quality counters returned alongside computed values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Rows skipped for a non-positive amount or a failed decode.
    pub malformed_records: u64,
    /// Participant rows referencing a split expense that does not exist.
    pub orphaned_participants: u64,
    /// Category ids on expenses that matched no known category.
    pub unknown_categories: u64,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.malformed_records == 0
            && self.orphaned_participants == 0
            && self.unknown_categories == 0
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.malformed_records += other.malformed_records;
        self.orphaned_participants += other.orphaned_participants;
        self.unknown_categories += other.unknown_categories;
    }
}

#[cfg(test)]
mod tests {
    use super::Diagnostics;

    #[test]
    fn merge_accumulates_counters() {
        let mut left = Diagnostics {
            malformed_records: 1,
            orphaned_participants: 0,
            unknown_categories: 2,
        };
        let right = Diagnostics {
            malformed_records: 2,
            orphaned_participants: 3,
            unknown_categories: 0,
        };
        left.merge(right);
        assert_eq!(left.malformed_records, 3);
        assert_eq!(left.orphaned_participants, 3);
        assert_eq!(left.unknown_categories, 2);
        assert!(!left.is_clean());
        assert!(Diagnostics::default().is_clean());
    }
}
