use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use sea_orm::{Condition, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::report::{
    self, DateWindow, Delta, Diagnostics, Period, PeriodKind, PeriodSummary, PeriodTotals,
};
use crate::{
    EngineError, Income, ResultEngine, SplitExpense, SplitParticipant, Transaction, categories,
    incomes, split_expenses, split_participants, transactions,
};

use super::{Engine, with_tx};

/// How long a computed series answers further requests before the rows are
/// re-read.
const SERIES_CACHE_TTL: Duration = Duration::from_secs(300);

const UNCATEGORIZED_LABEL: &str = "Uncategorized";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(super) struct SeriesCacheKey {
    user_id: String,
    anchor_period: Period,
    periods: u32,
}

#[derive(Clone, Debug)]
pub(super) struct CachedSeries {
    computed_at: Instant,
    series: Vec<PeriodSummary>,
    diagnostics: Diagnostics,
}

impl CachedSeries {
    fn is_fresh(&self) -> bool {
        self.computed_at.elapsed() < SERIES_CACHE_TTL
    }
}

/// One labeled row of a category breakdown, largest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    /// `None` is the uncategorized bucket.
    pub category_id: Option<Uuid>,
    pub name: String,
    pub amount_minor: i64,
}

/// Dashboard numbers for the month containing the anchor: totals, the same
/// totals for the month before, deltas between the two, and where the money
/// went.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlySummary {
    /// `"YYYY-MM"` of the current month.
    pub label: String,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub income_delta: Delta,
    pub expenses_delta: Delta,
    pub net_savings_delta: Delta,
    pub breakdown: Vec<CategoryTotal>,
    pub diagnostics: Diagnostics,
}

/// Both settlement directions for one user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementOverview {
    pub owed_by_user_minor: i64,
    pub owed_to_user_minor: i64,
    pub diagnostics: Diagnostics,
}

impl Engine {
    /// Month dashboard for the month containing `anchor`.
    pub async fn monthly_summary(
        &self,
        user_id: &str,
        anchor: DateTime<Utc>,
    ) -> ResultEngine<MonthlySummary> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let current = Period::containing(anchor, PeriodKind::Month);
            let previous = current.prev();
            let current_window = current.window();
            let previous_window = previous.window();

            let fetch_window = DateWindow::new(previous_window.start(), current_window.end())?;
            let (tx_rows, income_rows) = self
                .fetch_report_rows(&db_tx, user_id, &fetch_window)
                .await?;

            let (current_totals, mut diagnostics) =
                report::period_totals(&tx_rows, &income_rows, &current_window);
            let (previous_totals, previous_diagnostics) =
                report::period_totals(&tx_rows, &income_rows, &previous_window);
            diagnostics.merge(previous_diagnostics);

            // The breakdown pass re-skips the same malformed rows the totals
            // pass already counted, so only its labeling feeds diagnostics.
            let (by_category, _) = report::category_breakdown(&tx_rows, &current_window);
            let breakdown = self
                .label_breakdown(&db_tx, user_id, by_category, &mut diagnostics)
                .await?;

            Ok(MonthlySummary {
                label: current.label(),
                current: current_totals,
                previous: previous_totals,
                income_delta: report::period_over_period(
                    current_totals.income_minor,
                    previous_totals.income_minor,
                ),
                expenses_delta: report::period_over_period(
                    current_totals.expenses_minor,
                    previous_totals.expenses_minor,
                ),
                net_savings_delta: report::period_over_period(
                    current_totals.net_savings_minor,
                    previous_totals.net_savings_minor,
                ),
                breakdown,
                diagnostics,
            })
        })
    }

    /// Period series ending at the period containing `anchor`, oldest first.
    ///
    /// Results are cached per (user, anchor period, length) and served from
    /// the cache until the TTL lapses; expired entries are recomputed from a
    /// fresh read, never patched in place.
    pub async fn report_series(
        &self,
        user_id: &str,
        anchor: DateTime<Utc>,
        kind: PeriodKind,
        periods: u32,
    ) -> ResultEngine<(Vec<PeriodSummary>, Diagnostics)> {
        if periods == 0 {
            return Err(EngineError::InvalidWindow(
                "series must span at least one period".to_string(),
            ));
        }
        let anchor_period = Period::containing(anchor, kind);
        let key = SeriesCacheKey {
            user_id: user_id.to_string(),
            anchor_period,
            periods,
        };
        if let Some(hit) = self.cached_series(&key) {
            return Ok(hit);
        }

        let computed = with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let mut oldest = anchor_period;
            for _ in 1..periods {
                oldest = oldest.prev();
            }
            let fetch_window =
                DateWindow::new(oldest.start_instant(), anchor_period.window().end())?;
            let (tx_rows, income_rows) = self
                .fetch_report_rows(&db_tx, user_id, &fetch_window)
                .await?;
            report::build_series(&tx_rows, &income_rows, anchor, kind, periods)
        })?;

        self.store_series(key, &computed);
        Ok(computed)
    }

    /// Both owed directions over every split the user can see.
    pub async fn settlement_overview(&self, user_id: &str) -> ResultEngine<SettlementOverview> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let own_rows = split_participants::Entity::find()
                .filter(split_participants::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            let participating: Vec<Uuid> =
                own_rows.iter().map(|row| row.split_expense_id).collect();

            let expense_models = split_expenses::Entity::find()
                .filter(
                    Condition::any()
                        .add(split_expenses::Column::CreatorId.eq(user_id.to_string()))
                        .add(split_expenses::Column::Id.is_in(participating)),
                )
                .all(&db_tx)
                .await?;
            let expense_ids: Vec<Uuid> = expense_models.iter().map(|model| model.id).collect();

            let participant_rows = split_participants::Entity::find()
                .filter(
                    Condition::any()
                        .add(split_participants::Column::SplitExpenseId.is_in(expense_ids))
                        .add(split_participants::Column::UserId.eq(user_id.to_string())),
                )
                .all(&db_tx)
                .await?;

            let mut decode_failures = 0u64;
            let mut by_expense: HashMap<Uuid, Vec<SplitParticipant>> = HashMap::new();
            for row in participant_rows {
                match SplitParticipant::try_from(row) {
                    Ok(participant) => by_expense
                        .entry(participant.split_expense_id)
                        .or_default()
                        .push(participant),
                    // A poisoned row degrades one record, not the whole
                    // overview.
                    Err(_) => decode_failures += 1,
                }
            }

            let expenses: Vec<SplitExpense> =
                expense_models.into_iter().map(SplitExpense::from).collect();

            let (owed_by, by_diagnostics) =
                report::total_owed_by_user(user_id, &expenses, &by_expense);
            let (owed_to, to_diagnostics) =
                report::total_owed_to_user(user_id, &expenses, &by_expense);

            // The two passes walk disjoint expense sets, so their malformed
            // counts add; the orphan scan is identical in both, so it is
            // taken once.
            let diagnostics = Diagnostics {
                malformed_records: by_diagnostics.malformed_records
                    + to_diagnostics.malformed_records
                    + decode_failures,
                orphaned_participants: by_diagnostics.orphaned_participants,
                unknown_categories: 0,
            };

            Ok(SettlementOverview {
                owed_by_user_minor: owed_by,
                owed_to_user_minor: owed_to,
                diagnostics,
            })
        })
    }

    async fn fetch_report_rows(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        window: &DateWindow,
    ) -> ResultEngine<(Vec<Transaction>, Vec<Income>)> {
        let tx_models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::OccurredAt.gte(window.start()))
            .filter(transactions::Column::OccurredAt.lte(window.end()))
            .all(db_tx)
            .await?;
        let income_models = incomes::Entity::find()
            .filter(incomes::Column::UserId.eq(user_id.to_string()))
            .filter(incomes::Column::OccurredAt.gte(window.start()))
            .filter(incomes::Column::OccurredAt.lte(window.end()))
            .all(db_tx)
            .await?;
        Ok((
            tx_models.into_iter().map(Transaction::from).collect(),
            income_models.into_iter().map(Income::from).collect(),
        ))
    }

    /// Resolve breakdown keys to category names. Amounts under an id that no
    /// longer resolves stay visible in the uncategorized bucket and bump the
    /// `unknown_categories` counter.
    async fn label_breakdown(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        by_category: HashMap<Option<Uuid>, i64>,
        diagnostics: &mut Diagnostics,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        let names: HashMap<Uuid, String> = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .all(db_tx)
            .await?
            .into_iter()
            .map(|model| (model.id, model.name))
            .collect();

        let mut uncategorized_minor = 0i64;
        let mut labeled: Vec<CategoryTotal> = Vec::new();
        for (key, amount_minor) in by_category {
            match key {
                None => uncategorized_minor += amount_minor,
                Some(id) => match names.get(&id) {
                    Some(name) => labeled.push(CategoryTotal {
                        category_id: Some(id),
                        name: name.clone(),
                        amount_minor,
                    }),
                    None => {
                        diagnostics.unknown_categories += 1;
                        uncategorized_minor += amount_minor;
                    }
                },
            }
        }
        if uncategorized_minor > 0 {
            labeled.push(CategoryTotal {
                category_id: None,
                name: UNCATEGORIZED_LABEL.to_string(),
                amount_minor: uncategorized_minor,
            });
        }
        labeled.sort_by(|a, b| {
            b.amount_minor
                .cmp(&a.amount_minor)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(labeled)
    }

    fn cached_series(&self, key: &SeriesCacheKey) -> Option<(Vec<PeriodSummary>, Diagnostics)> {
        let cache = match self.series_cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache
            .get(key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| (entry.series.clone(), entry.diagnostics))
    }

    fn store_series(&self, key: SeriesCacheKey, computed: &(Vec<PeriodSummary>, Diagnostics)) {
        let mut cache = match self.series_cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.retain(|_, entry| entry.is_fresh());
        cache.insert(
            key,
            CachedSeries {
                computed_at: Instant::now(),
                series: computed.0.clone(),
                diagnostics: computed.1,
            },
        );
    }
}
