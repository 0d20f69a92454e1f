//! Period aggregation: totals, category breakdowns, deltas, and series.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, Income, ResultEngine, Transaction};

use super::{DateWindow, Diagnostics, Period, PeriodKind};

/// Income/expense/net totals for one window, in minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income_minor: i64,
    pub expenses_minor: i64,
    pub net_savings_minor: i64,
}

/// Change between two period values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delta {
    pub absolute_minor: i64,
    pub percent: f64,
}

/// One entry of a period series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodSummary {
    /// `"YYYY-MM"` or `"YYYY"`.
    pub label: String,
    pub income_minor: i64,
    pub variable_expenses_minor: i64,
    pub fixed_expenses_minor: i64,
    pub total_expenses_minor: i64,
    pub net_savings_minor: i64,
}

/// Sums income and expenses falling inside `window`.
///
/// Pure over its inputs: empty slices give all-zero totals, input order is
/// irrelevant, nothing is mutated. Rows with a non-positive amount are
/// skipped and counted as malformed.
pub fn period_totals(
    transactions: &[Transaction],
    incomes: &[Income],
    window: &DateWindow,
) -> (PeriodTotals, Diagnostics) {
    let mut totals = PeriodTotals::default();
    let mut diagnostics = Diagnostics::default();

    for tx in transactions {
        if !window.contains(tx.occurred_at) {
            continue;
        }
        if tx.amount_minor <= 0 {
            diagnostics.malformed_records += 1;
            continue;
        }
        totals.expenses_minor += tx.amount_minor;
    }
    for income in incomes {
        if !window.contains(income.occurred_at) {
            continue;
        }
        if income.amount_minor <= 0 {
            diagnostics.malformed_records += 1;
            continue;
        }
        totals.income_minor += income.amount_minor;
    }
    totals.net_savings_minor = totals.income_minor - totals.expenses_minor;

    (totals, diagnostics)
}

/// Groups in-window expenses by category id; `None` is the uncategorized
/// bucket. Categories with no in-window expense simply do not appear.
pub fn category_breakdown(
    transactions: &[Transaction],
    window: &DateWindow,
) -> (HashMap<Option<Uuid>, i64>, Diagnostics) {
    let mut by_category: HashMap<Option<Uuid>, i64> = HashMap::new();
    let mut diagnostics = Diagnostics::default();

    for tx in transactions {
        if !window.contains(tx.occurred_at) {
            continue;
        }
        if tx.amount_minor <= 0 {
            diagnostics.malformed_records += 1;
            continue;
        }
        *by_category.entry(tx.category_id).or_insert(0) += tx.amount_minor;
    }

    (by_category, diagnostics)
}

/// Change from `previous_minor` to `current_minor`.
///
/// The zero-previous rule is deliberate: a 0 -> N change reports as a flat
/// 100% increase rather than an infinite or undefined one, and 0 -> 0 is 0%.
pub fn period_over_period(current_minor: i64, previous_minor: i64) -> Delta {
    let absolute_minor = current_minor - previous_minor;
    let percent = if previous_minor == 0 {
        if current_minor > 0 { 100.0 } else { 0.0 }
    } else {
        absolute_minor as f64 / previous_minor as f64 * 100.0
    };
    Delta {
        absolute_minor,
        percent,
    }
}

/// Builds `periods` consecutive period summaries ending at the period that
/// contains `anchor`, oldest first.
///
/// Fixed and variable expenses are separated by `Transaction::is_fixed`.
/// Period boundaries come from [`Period`] stepping, so an anchor on Jan 31
/// still yields whole calendar months.
pub fn build_series(
    transactions: &[Transaction],
    incomes: &[Income],
    anchor: DateTime<Utc>,
    kind: PeriodKind,
    periods: u32,
) -> ResultEngine<(Vec<PeriodSummary>, Diagnostics)> {
    if periods == 0 {
        return Err(EngineError::InvalidWindow(
            "series must span at least one period".to_string(),
        ));
    }

    let mut period = Period::containing(anchor, kind);
    for _ in 1..periods {
        period = period.prev();
    }

    let mut out = Vec::with_capacity(periods as usize);
    let mut diagnostics = Diagnostics::default();

    for _ in 0..periods {
        let window = period.window();
        let mut income_minor = 0;
        let mut variable_minor = 0;
        let mut fixed_minor = 0;

        for tx in transactions {
            if !window.contains(tx.occurred_at) {
                continue;
            }
            if tx.amount_minor <= 0 {
                diagnostics.malformed_records += 1;
                continue;
            }
            if tx.is_fixed {
                fixed_minor += tx.amount_minor;
            } else {
                variable_minor += tx.amount_minor;
            }
        }
        for income in incomes {
            if !window.contains(income.occurred_at) {
                continue;
            }
            if income.amount_minor <= 0 {
                diagnostics.malformed_records += 1;
                continue;
            }
            income_minor += income.amount_minor;
        }

        let total_expenses_minor = variable_minor + fixed_minor;
        out.push(PeriodSummary {
            label: period.label(),
            income_minor,
            variable_expenses_minor: variable_minor,
            fixed_expenses_minor: fixed_minor,
            total_expenses_minor,
            net_savings_minor: income_minor - total_expenses_minor,
        });
        period = period.next();
    }

    Ok((out, diagnostics))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn expense(amount_minor: i64, occurred_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            category_id: None,
            amount_minor,
            occurred_at,
            is_fixed: false,
            note: None,
        }
    }

    fn fixed_expense(amount_minor: i64, occurred_at: DateTime<Utc>) -> Transaction {
        Transaction {
            is_fixed: true,
            ..expense(amount_minor, occurred_at)
        }
    }

    fn income(amount_minor: i64, occurred_at: DateTime<Utc>) -> Income {
        Income {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            amount_minor,
            occurred_at,
            source: None,
        }
    }

    fn january() -> DateWindow {
        DateWindow::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn empty_inputs_yield_zero_totals() {
        let (totals, diagnostics) = period_totals(&[], &[], &january());
        assert_eq!(totals, PeriodTotals::default());
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn totals_sum_in_window_records_independent_of_order() {
        let txs = vec![
            expense(300, utc(2024, 1, 10)),
            expense(200, utc(2024, 1, 20)),
            expense(500, utc(2024, 2, 1)),
        ];
        let incs = vec![income(1000, utc(2024, 1, 5)), income(250, utc(2024, 1, 28))];

        let (totals, diagnostics) = period_totals(&txs, &incs, &january());
        assert_eq!(totals.expenses_minor, 500);
        assert_eq!(totals.income_minor, 1250);
        assert_eq!(totals.net_savings_minor, 750);
        assert!(diagnostics.is_clean());

        let mut reversed_txs = txs.clone();
        reversed_txs.reverse();
        let mut reversed_incs = incs.clone();
        reversed_incs.reverse();
        let (reordered, _) = period_totals(&reversed_txs, &reversed_incs, &january());
        assert_eq!(reordered, totals);
    }

    #[test]
    fn malformed_amounts_are_skipped_and_counted() {
        let txs = vec![expense(-50, utc(2024, 1, 10)), expense(100, utc(2024, 1, 11))];
        let incs = vec![income(0, utc(2024, 1, 12))];

        let (totals, diagnostics) = period_totals(&txs, &incs, &january());
        assert_eq!(totals.expenses_minor, 100);
        assert_eq!(totals.income_minor, 0);
        assert_eq!(diagnostics.malformed_records, 2);
    }

    #[test]
    fn delta_zero_over_zero_is_flat() {
        let delta = period_over_period(0, 0);
        assert_eq!(delta.absolute_minor, 0);
        assert_eq!(delta.percent, 0.0);
    }

    #[test]
    fn delta_from_zero_previous_reports_one_hundred_percent() {
        let delta = period_over_period(150, 0);
        assert_eq!(delta.absolute_minor, 150);
        assert_eq!(delta.percent, 100.0);
    }

    #[test]
    fn delta_halving_reports_minus_fifty_percent() {
        let delta = period_over_period(50, 100);
        assert_eq!(delta.absolute_minor, -50);
        assert_eq!(delta.percent, -50.0);
    }

    #[test]
    fn breakdown_sums_per_category_and_omits_empty_ones() {
        let food = Uuid::new_v4();
        let rent = Uuid::new_v4();
        let unused = Uuid::new_v4();
        let txs = vec![
            Transaction {
                category_id: Some(food),
                ..expense(300, utc(2024, 1, 3))
            },
            Transaction {
                category_id: Some(food),
                ..expense(200, utc(2024, 1, 9))
            },
            Transaction {
                category_id: Some(rent),
                ..expense(900, utc(2024, 1, 1))
            },
            // Outside the window; must not leak in.
            Transaction {
                category_id: Some(unused),
                ..expense(400, utc(2024, 2, 1))
            },
            expense(70, utc(2024, 1, 15)),
        ];

        let (by_category, diagnostics) = category_breakdown(&txs, &january());
        assert_eq!(by_category.len(), 3);
        assert_eq!(by_category[&Some(food)], 500);
        assert_eq!(by_category[&Some(rent)], 900);
        assert_eq!(by_category[&None], 70);
        assert!(!by_category.contains_key(&Some(unused)));
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn series_rejects_zero_periods() {
        let err = build_series(&[], &[], utc(2024, 1, 31), PeriodKind::Month, 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow(_)));
    }

    #[test]
    fn series_anchored_on_jan_31_steps_by_whole_months() {
        let txs = vec![
            expense(100, utc(2023, 12, 31)),
            expense(200, utc(2024, 1, 1)),
            expense(300, utc(2024, 1, 31)),
        ];
        let (series, diagnostics) =
            build_series(&txs, &[], utc(2024, 1, 31), PeriodKind::Month, 2).unwrap();

        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01"]);
        assert_eq!(series[0].total_expenses_minor, 100);
        assert_eq!(series[1].total_expenses_minor, 500);
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn series_counts_leap_day_in_february_bucket() {
        let txs = vec![expense(250, utc(2024, 2, 29))];
        let (series, _) =
            build_series(&txs, &[], utc(2024, 3, 31), PeriodKind::Month, 3).unwrap();

        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(series[1].total_expenses_minor, 250);
        assert_eq!(series[0].total_expenses_minor, 0);
        assert_eq!(series[2].total_expenses_minor, 0);
    }

    #[test]
    fn series_splits_fixed_from_variable_expenses() {
        let txs = vec![
            expense(400, utc(2024, 1, 10)),
            fixed_expense(900, utc(2024, 1, 2)),
        ];
        let incs = vec![income(2000, utc(2024, 1, 1))];
        let (series, _) =
            build_series(&txs, &incs, utc(2024, 1, 20), PeriodKind::Month, 1).unwrap();

        assert_eq!(series.len(), 1);
        let summary = &series[0];
        assert_eq!(summary.variable_expenses_minor, 400);
        assert_eq!(summary.fixed_expenses_minor, 900);
        assert_eq!(summary.total_expenses_minor, 1300);
        assert_eq!(summary.income_minor, 2000);
        assert_eq!(summary.net_savings_minor, 700);
    }

    #[test]
    fn yearly_series_buckets_by_calendar_year() {
        let txs = vec![
            expense(100, utc(2022, 12, 31)),
            expense(200, utc(2023, 6, 1)),
            expense(300, utc(2024, 1, 1)),
        ];
        let (series, _) = build_series(&txs, &[], utc(2024, 5, 1), PeriodKind::Year, 3).unwrap();

        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2022", "2023", "2024"]);
        assert_eq!(series[0].total_expenses_minor, 100);
        assert_eq!(series[1].total_expenses_minor, 200);
        assert_eq!(series[2].total_expenses_minor, 300);
    }
}
