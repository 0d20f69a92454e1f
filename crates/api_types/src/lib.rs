use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
        /// Marks the category as holding fixed/recurring bills.
        pub is_fixed: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryList {
        pub include_archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub is_fixed: Option<bool>,
        pub archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub is_fixed: bool,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
        pub name: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        /// Minor units (cents), must be > 0.
        pub amount_minor: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        pub category_id: Option<Uuid>,
        pub is_fixed: Option<bool>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        /// Inclusive lower bound.
        pub from: Option<DateTime<FixedOffset>>,
        /// Inclusive upper bound.
        pub to: Option<DateTime<FixedOffset>>,
        pub category_id: Option<Uuid>,
        pub fixed_only: Option<bool>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub amount_minor: Option<i64>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
        /// Absent field leaves the category as is; explicit `null` clears it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category_id: Option<Option<Uuid>>,
        pub is_fixed: Option<bool>,
        /// Absent field leaves the note as is; explicit `null` clears it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub note: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
        pub category_id: Option<Uuid>,
        pub is_fixed: bool,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }
}

pub mod income {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        /// Minor units (cents), must be > 0.
        pub amount_minor: i64,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
        pub source: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeList {
        /// Inclusive lower bound.
        pub from: Option<DateTime<FixedOffset>>,
        /// Inclusive upper bound.
        pub to: Option<DateTime<FixedOffset>>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        pub amount_minor: Option<i64>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
        /// Absent field leaves the source as is; explicit `null` clears it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub source: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
        pub source: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeListResponse {
        pub incomes: Vec<IncomeView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeCreated {
        pub id: Uuid,
    }
}

pub mod split {
    use super::*;

    /// Settlement status of one participant's share.
    ///
    /// The engine treats statuses as:
    /// - `pending`: asked, not yet answered.
    /// - `accepted`: share acknowledged, money still due.
    /// - `declined`: share refused; drops out of owed totals.
    /// - `paid`: settled.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ParticipantStatus {
        Pending,
        Accepted,
        Declined,
        Paid,
    }

    impl ParticipantStatus {
        /// Returns the canonical status string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Accepted => "accepted",
                Self::Declined => "declined",
                Self::Paid => "paid",
            }
        }
    }

    /// One person's share of a new split expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShareNew {
        pub username: String,
        /// Minor units (cents), must be > 0; all shares sum to the total.
        pub amount_due_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        /// Minor units (cents), must be > 0.
        pub total_amount_minor: i64,
        pub description: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub created_at: DateTime<FixedOffset>,
        pub shares: Vec<ShareNew>,
    }

    /// Request body for moving one share through the status state machine.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantStatusUpdate {
        pub status: ParticipantStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantView {
        pub username: String,
        pub amount_due_minor: i64,
        pub status: ParticipantStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub id: Uuid,
        pub creator: String,
        pub total_amount_minor: i64,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub participants: Vec<ParticipantView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitListResponse {
        pub splits: Vec<SplitView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitCreated {
        pub id: Uuid,
    }
}

pub mod friend {
    use super::*;

    /// Request body for sending a friend request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendRequest {
        pub username: String,
    }

    /// One friendship seen from the authenticated user's side.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendView {
        /// The other user of the pair.
        pub username: String,
        pub requested_by: String,
        pub accepted: bool,
        pub since: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FriendListResponse {
        pub friends: Vec<FriendView>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalCreate {
        pub name: String,
        /// Minor units (cents), must be > 0.
        pub target_amount_minor: i64,
        pub target_date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub target_amount_minor: Option<i64>,
        /// Absent field leaves the date as is; explicit `null` clears it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub target_date: Option<Option<DateTime<FixedOffset>>>,
        /// Contribution applied to the saved total. May be negative to take
        /// money back out; the saved total never goes below zero.
        pub add_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_amount_minor: i64,
        pub saved_amount_minor: i64,
        pub target_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalCreated {
        pub id: Uuid,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PeriodKind {
        Month,
        Year,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryGet {
        /// Month to report on; the server uses now() when absent.
        pub anchor: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SeriesGet {
        /// Last period of the series; the server uses now() when absent.
        pub anchor: Option<DateTime<FixedOffset>>,
        pub kind: PeriodKind,
        /// Number of consecutive periods, ending at the anchor's.
        pub periods: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeriodTotalsView {
        pub income_minor: i64,
        pub expenses_minor: i64,
        pub net_savings_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DeltaView {
        pub absolute_minor: i64,
        pub percent: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        /// `null` is the uncategorized bucket.
        pub category_id: Option<Uuid>,
        pub name: String,
        pub amount_minor: i64,
    }

    /// Non-fatal data-quality counters attached to every report response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DiagnosticsView {
        pub malformed_records: u64,
        pub orphaned_participants: u64,
        pub unknown_categories: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        /// `"YYYY-MM"` of the reported month.
        pub label: String,
        pub current: PeriodTotalsView,
        pub previous: PeriodTotalsView,
        pub income_delta: DeltaView,
        pub expenses_delta: DeltaView,
        pub net_savings_delta: DeltaView,
        pub breakdown: Vec<CategoryTotalView>,
        pub diagnostics: DiagnosticsView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PeriodSummaryView {
        pub label: String,
        pub income_minor: i64,
        pub variable_expenses_minor: i64,
        pub fixed_expenses_minor: i64,
        pub total_expenses_minor: i64,
        pub net_savings_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SeriesResponse {
        pub series: Vec<PeriodSummaryView>,
        pub diagnostics: DiagnosticsView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementResponse {
        pub owed_by_user_minor: i64,
        pub owed_to_user_minor: i64,
        pub diagnostics: DiagnosticsView,
    }
}
