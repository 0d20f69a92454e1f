//! Report API endpoints: monthly summary, period series, settlement.

use api_types::report::{
    CategoryTotalView, DeltaView, DiagnosticsView, PeriodKind as ApiPeriodKind,
    PeriodSummaryView, PeriodTotalsView, SeriesGet, SeriesResponse, SettlementResponse,
    SummaryGet, SummaryResponse,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use engine::report::{Delta, Diagnostics, PeriodKind, PeriodSummary, PeriodTotals};

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: ApiPeriodKind) -> PeriodKind {
    match kind {
        ApiPeriodKind::Month => PeriodKind::Month,
        ApiPeriodKind::Year => PeriodKind::Year,
    }
}

fn map_totals(totals: PeriodTotals) -> PeriodTotalsView {
    PeriodTotalsView {
        income_minor: totals.income_minor,
        expenses_minor: totals.expenses_minor,
        net_savings_minor: totals.net_savings_minor,
    }
}

fn map_delta(delta: Delta) -> DeltaView {
    DeltaView {
        absolute_minor: delta.absolute_minor,
        percent: delta.percent,
    }
}

fn map_diagnostics(diagnostics: Diagnostics) -> DiagnosticsView {
    DiagnosticsView {
        malformed_records: diagnostics.malformed_records,
        orphaned_participants: diagnostics.orphaned_participants,
        unknown_categories: diagnostics.unknown_categories,
    }
}

fn map_period_summary(summary: PeriodSummary) -> PeriodSummaryView {
    PeriodSummaryView {
        label: summary.label,
        income_minor: summary.income_minor,
        variable_expenses_minor: summary.variable_expenses_minor,
        fixed_expenses_minor: summary.fixed_expenses_minor,
        total_expenses_minor: summary.total_expenses_minor,
        net_savings_minor: summary.net_savings_minor,
    }
}

pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SummaryGet>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let anchor = payload
        .anchor
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let summary = state.engine.monthly_summary(&user.username, anchor).await?;

    Ok(Json(SummaryResponse {
        label: summary.label,
        current: map_totals(summary.current),
        previous: map_totals(summary.previous),
        income_delta: map_delta(summary.income_delta),
        expenses_delta: map_delta(summary.expenses_delta),
        net_savings_delta: map_delta(summary.net_savings_delta),
        breakdown: summary
            .breakdown
            .into_iter()
            .map(|row| CategoryTotalView {
                category_id: row.category_id,
                name: row.name,
                amount_minor: row.amount_minor,
            })
            .collect(),
        diagnostics: map_diagnostics(summary.diagnostics),
    }))
}

pub async fn series(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SeriesGet>,
) -> Result<Json<SeriesResponse>, ServerError> {
    let anchor = payload
        .anchor
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let (series, diagnostics) = state
        .engine
        .report_series(
            &user.username,
            anchor,
            map_kind(payload.kind),
            payload.periods,
        )
        .await?;

    Ok(Json(SeriesResponse {
        series: series.into_iter().map(map_period_summary).collect(),
        diagnostics: map_diagnostics(diagnostics),
    }))
}

pub async fn settlement(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SettlementResponse>, ServerError> {
    let overview = state.engine.settlement_overview(&user.username).await?;

    Ok(Json(SettlementResponse {
        owed_by_user_minor: overview.owed_by_user_minor,
        owed_to_user_minor: overview.owed_to_user_minor,
        diagnostics: map_diagnostics(overview.diagnostics),
    }))
}
