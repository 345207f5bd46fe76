use chrono::NaiveDate;
use sea_orm::Database;

use engine::{Engine, NewTransaction};
use migration::MigratorTrait;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn tx(category: &str, on: NaiveDate, amount_minor: i64, is_expense: bool) -> NewTransaction {
    NewTransaction {
        transaction_id: None,
        title: None,
        description: None,
        category: category.to_string(),
        date: on,
        time: None,
        payment_method: None,
        amount_minor,
        is_expense,
        items: Vec::new(),
    }
}

#[tokio::test]
async fn monthly_totals_split_by_direction() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    engine
        .record_transaction("alice", tx("RENT", date(2026, 3, 3), 1_000, true))
        .await
        .unwrap();
    engine
        .record_transaction("alice", tx("FOOD", date(2026, 3, 15), 250, true))
        .await
        .unwrap();
    engine
        .record_transaction("alice", tx("OTHER", date(2026, 3, 20), 4_000, false))
        .await
        .unwrap();
    // Previous month, excluded from both totals.
    engine
        .record_transaction("alice", tx("RENT", date(2026, 2, 10), 999, true))
        .await
        .unwrap();

    let today = date(2026, 3, 28);
    assert_eq!(
        engine.spending_per_month("alice", today).await.unwrap(),
        1_250
    );
    assert_eq!(
        engine.income_per_month("alice", today).await.unwrap(),
        4_000
    );
}

#[tokio::test]
async fn first_of_month_is_excluded_from_monthly_totals() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    engine
        .record_transaction("alice", tx("RENT", date(2026, 3, 1), 1_000, true))
        .await
        .unwrap();
    engine
        .record_transaction("alice", tx("FOOD", date(2026, 3, 2), 250, true))
        .await
        .unwrap();

    // The window opens strictly after the first of the month.
    assert_eq!(
        engine
            .spending_per_month("alice", date(2026, 3, 28))
            .await
            .unwrap(),
        250
    );
}

#[tokio::test]
async fn last_week_summary_picks_top_spending_category() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    let today = date(2026, 3, 28);
    engine
        .record_transaction("alice", tx("FOOD", date(2026, 3, 24), 300, true))
        .await
        .unwrap();
    engine
        .record_transaction("alice", tx("FOOD", date(2026, 3, 26), 200, true))
        .await
        .unwrap();
    engine
        .record_transaction("alice", tx("TRANSPORT", date(2026, 3, 25), 400, true))
        .await
        .unwrap();
    engine
        .record_transaction("alice", tx("OTHER", date(2026, 3, 27), 1_500, false))
        .await
        .unwrap();
    // Eight days old, outside the window.
    engine
        .record_transaction("alice", tx("RENT", date(2026, 3, 20), 9_000, true))
        .await
        .unwrap();

    let summary = engine.last_week_summary("alice", today).await.unwrap();
    assert_eq!(summary.income_minor, 1_500);
    assert_eq!(summary.category, "FOOD");
    assert_eq!(summary.spending_minor, 500);
}

#[tokio::test]
async fn last_week_summary_without_spending_has_no_category() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    let summary = engine
        .last_week_summary("alice", date(2026, 3, 28))
        .await
        .unwrap();
    assert_eq!(summary.income_minor, 0);
    assert_eq!(summary.category, "No Category Found");
    assert_eq!(summary.spending_minor, 0);
}
