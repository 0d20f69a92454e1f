use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::report::PeriodKind;
use engine::{Engine, EngineError, ExpenseCmd, IncomeCmd, ParticipantStatus, SplitCmd};
use migration::MigratorTrait;

async fn engine_with_db(users: &[&str]) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in users {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![(*user).into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
}

#[tokio::test]
async fn monthly_summary_compares_against_the_previous_month() {
    let (engine, _db) = engine_with_db(&["alice"]).await;

    engine
        .create_income(IncomeCmd::new("alice", 2000, utc(2024, 1, 25)))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseCmd::new("alice", 1000, utc(2024, 1, 10)))
        .await
        .unwrap();
    engine
        .create_income(IncomeCmd::new("alice", 3000, utc(2024, 2, 25)))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseCmd::new("alice", 500, utc(2024, 2, 10)))
        .await
        .unwrap();

    let summary = engine
        .monthly_summary("alice", utc(2024, 2, 15))
        .await
        .unwrap();

    assert_eq!(summary.label, "2024-02");
    assert_eq!(summary.current.income_minor, 3000);
    assert_eq!(summary.current.expenses_minor, 500);
    assert_eq!(summary.current.net_savings_minor, 2500);
    assert_eq!(summary.previous.income_minor, 2000);
    assert_eq!(summary.previous.expenses_minor, 1000);

    assert_eq!(summary.income_delta.absolute_minor, 1000);
    assert_eq!(summary.income_delta.percent, 50.0);
    assert_eq!(summary.expenses_delta.absolute_minor, -500);
    assert_eq!(summary.expenses_delta.percent, -50.0);
    assert_eq!(summary.net_savings_delta.absolute_minor, 1500);
    assert_eq!(summary.net_savings_delta.percent, 150.0);
    assert!(summary.diagnostics.is_clean());
}

#[tokio::test]
async fn first_month_against_an_empty_previous_reads_as_flat_hundred() {
    let (engine, _db) = engine_with_db(&["alice"]).await;
    engine
        .create_income(IncomeCmd::new("alice", 150, utc(2024, 3, 3)))
        .await
        .unwrap();

    let summary = engine
        .monthly_summary("alice", utc(2024, 3, 20))
        .await
        .unwrap();
    assert_eq!(summary.income_delta.absolute_minor, 150);
    assert_eq!(summary.income_delta.percent, 100.0);
    assert_eq!(summary.expenses_delta.absolute_minor, 0);
    assert_eq!(summary.expenses_delta.percent, 0.0);
}

#[tokio::test]
async fn summary_breakdown_is_labeled_and_sorted() {
    let (engine, _db) = engine_with_db(&["alice"]).await;
    let groceries = engine
        .create_category("alice", "Groceries", false)
        .await
        .unwrap();

    engine
        .create_expense(ExpenseCmd::new("alice", 300, utc(2024, 2, 3)).category_id(groceries.id))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseCmd::new("alice", 200, utc(2024, 2, 9)).category_id(groceries.id))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseCmd::new("alice", 70, utc(2024, 2, 12)))
        .await
        .unwrap();

    let summary = engine
        .monthly_summary("alice", utc(2024, 2, 28))
        .await
        .unwrap();
    let rows: Vec<(&str, i64)> = summary
        .breakdown
        .iter()
        .map(|row| (row.name.as_str(), row.amount_minor))
        .collect();
    assert_eq!(rows, vec![("Groceries", 500), ("Uncategorized", 70)]);
}

#[tokio::test]
async fn series_buckets_by_whole_calendar_months() {
    let (engine, _db) = engine_with_db(&["alice"]).await;
    let rent = engine.create_category("alice", "Rent", true).await.unwrap();

    engine
        .create_expense(ExpenseCmd::new("alice", 100, utc(2023, 12, 31)))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseCmd::new("alice", 200, utc(2024, 1, 1)).category_id(rent.id))
        .await
        .unwrap();
    engine
        .create_income(IncomeCmd::new("alice", 1000, utc(2024, 1, 15)))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseCmd::new("alice", 300, utc(2024, 2, 29)))
        .await
        .unwrap();

    let (series, diagnostics) = engine
        .report_series("alice", utc(2024, 2, 29), PeriodKind::Month, 3)
        .await
        .unwrap();

    let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);

    assert_eq!(series[0].variable_expenses_minor, 100);
    assert_eq!(series[0].fixed_expenses_minor, 0);

    assert_eq!(series[1].fixed_expenses_minor, 200);
    assert_eq!(series[1].income_minor, 1000);
    assert_eq!(series[1].net_savings_minor, 800);

    assert_eq!(series[2].total_expenses_minor, 300);
    assert!(diagnostics.is_clean());
}

#[tokio::test]
async fn series_is_served_from_cache_until_the_ttl_lapses() {
    let (engine, _db) = engine_with_db(&["alice"]).await;
    engine
        .create_expense(ExpenseCmd::new("alice", 100, utc(2024, 2, 5)))
        .await
        .unwrap();

    let (first, _) = engine
        .report_series("alice", utc(2024, 2, 20), PeriodKind::Month, 2)
        .await
        .unwrap();
    assert_eq!(first[1].total_expenses_minor, 100);

    engine
        .create_expense(ExpenseCmd::new("alice", 400, utc(2024, 2, 6)))
        .await
        .unwrap();

    // Same key within the TTL: the cached series answers, without the new
    // expense.
    let (cached, _) = engine
        .report_series("alice", utc(2024, 2, 20), PeriodKind::Month, 2)
        .await
        .unwrap();
    assert_eq!(cached, first);

    // A different length is a different key and reads fresh rows.
    let (fresh, _) = engine
        .report_series("alice", utc(2024, 2, 20), PeriodKind::Month, 1)
        .await
        .unwrap();
    assert_eq!(fresh[0].total_expenses_minor, 500);
}

#[tokio::test]
async fn yearly_series_and_zero_periods() {
    let (engine, _db) = engine_with_db(&["alice"]).await;
    engine
        .create_expense(ExpenseCmd::new("alice", 100, utc(2023, 6, 1)))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseCmd::new("alice", 200, utc(2024, 6, 1)))
        .await
        .unwrap();

    let (series, _) = engine
        .report_series("alice", utc(2024, 7, 1), PeriodKind::Year, 2)
        .await
        .unwrap();
    let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["2023", "2024"]);
    assert_eq!(series[0].total_expenses_minor, 100);
    assert_eq!(series[1].total_expenses_minor, 200);

    let err = engine
        .report_series("alice", utc(2024, 7, 1), PeriodKind::Year, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidWindow(_)));
}

#[tokio::test]
async fn settlement_overview_nets_out_paid_and_declined_shares() {
    let (engine, _db) = engine_with_db(&["alice", "bob", "carol"]).await;
    engine.request_friendship("alice", "bob").await.unwrap();
    engine.accept_friendship("bob", "alice").await.unwrap();
    engine.request_friendship("alice", "carol").await.unwrap();
    engine.accept_friendship("carol", "alice").await.unwrap();

    let view = engine
        .create_split_expense(
            SplitCmd::new("alice", 90, utc(2024, 2, 14))
                .share("alice", 30)
                .share("bob", 30)
                .share("carol", 30)
                .description("dinner"),
        )
        .await
        .unwrap();

    let alice = engine.settlement_overview("alice").await.unwrap();
    assert_eq!(alice.owed_to_user_minor, 60);
    assert_eq!(alice.owed_by_user_minor, 0);
    assert!(alice.diagnostics.is_clean());

    let bob = engine.settlement_overview("bob").await.unwrap();
    assert_eq!(bob.owed_by_user_minor, 30);
    assert_eq!(bob.owed_to_user_minor, 0);

    engine
        .set_participant_status("bob", view.expense.id, "bob", ParticipantStatus::Declined)
        .await
        .unwrap();

    let alice = engine.settlement_overview("alice").await.unwrap();
    assert_eq!(alice.owed_to_user_minor, 30);
    let bob = engine.settlement_overview("bob").await.unwrap();
    assert_eq!(bob.owed_by_user_minor, 0);

    engine
        .set_participant_status("alice", view.expense.id, "carol", ParticipantStatus::Paid)
        .await
        .unwrap();
    let alice = engine.settlement_overview("alice").await.unwrap();
    assert_eq!(alice.owed_to_user_minor, 0);
}
