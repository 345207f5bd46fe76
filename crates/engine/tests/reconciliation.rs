use chrono::NaiveDate;
use sea_orm::{Database, EntityTrait};

use engine::{Engine, EngineError, GoalLink, NewTransaction, NewTransactionItem, categories};
use migration::MigratorTrait;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn expense(category: &str, on: NaiveDate, amount_minor: i64) -> NewTransaction {
    NewTransaction {
        transaction_id: None,
        title: None,
        description: None,
        category: category.to_string(),
        date: on,
        time: None,
        payment_method: None,
        amount_minor,
        is_expense: true,
        items: Vec::new(),
    }
}

#[tokio::test]
async fn category_catalog_is_seeded() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let mut seeded: Vec<(String, String)> = categories::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    seeded.sort();

    let mut expected: Vec<(String, String)> = categories::CATALOG
        .iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();
    expected.sort();

    assert_eq!(seeded, expected);
}

#[tokio::test]
async fn expense_reduces_balance_income_increases_it() {
    let engine = engine().await;
    engine.open_account("alice", 10_000).await.unwrap();

    let tx = expense("RENT", date(2026, 3, 10), 2_500);
    engine.record_transaction("alice", tx).await.unwrap();
    assert_eq!(engine.balance("alice").await.unwrap(), 7_500);

    let mut salary = expense("OTHER", date(2026, 3, 25), 4_000);
    salary.is_expense = false;
    engine.record_transaction("alice", salary).await.unwrap();
    assert_eq!(engine.balance("alice").await.unwrap(), 11_500);
}

#[tokio::test]
async fn groceries_saving_scenario() {
    let engine = engine().await;
    engine.open_account("alice", 100_000).await.unwrap();
    engine
        .create_saving_goal("alice", "March 2026 Saving Goal", date(2026, 4, 1))
        .await
        .unwrap();
    engine
        .set_category_budget("alice", "GROCERIES", 500, date(2026, 3, 5))
        .await
        .unwrap();

    // Paid 120 for items worth 150: the 30 difference is the saving.
    let mut tx = expense("GROCERIES", date(2026, 3, 10), 120);
    tx.items = vec![
        NewTransactionItem {
            product_name: "Oat milk".to_string(),
            quantity: 2,
            unit_price_minor: 50,
            total_minor: 100,
        },
        NewTransactionItem {
            product_name: "Bread".to_string(),
            quantity: 1,
            unit_price_minor: 50,
            total_minor: 50,
        },
    ];

    let outcome = engine.record_transaction("alice", tx).await.unwrap();
    assert_eq!(outcome.goal_link, GoalLink::Applied { saved_minor: 30 });

    let line = engine
        .per_category_saving_percentage("alice", "GROCERIES")
        .await
        .unwrap();
    assert_eq!(line.current_minor, 30);
    assert_eq!(line.target_minor, 500);
    assert_eq!(line.percentage, 6.0);

    let overall = engine.overall_saving_percentage("alice").await.unwrap();
    assert_eq!(overall.current_minor, 30);
    assert_eq!(overall.target_minor, 500);

    let records = engine
        .saving_records_by_category("alice", "GROCERIES")
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount_minor, 30);
    assert_eq!(records[0].transaction_id, outcome.transaction_id);

    assert_eq!(engine.balance("alice").await.unwrap(), 99_880);
}

#[tokio::test]
async fn transaction_without_matching_goal_still_persists() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    let outcome = engine
        .record_transaction("alice", expense("FOOD", date(2026, 3, 10), 900))
        .await
        .unwrap();
    assert_eq!(outcome.goal_link, GoalLink::NoMatch);

    let details = engine
        .transaction_details(&outcome.transaction_id)
        .await
        .unwrap();
    assert_eq!(details.category, "FOOD");
    assert_eq!(details.transaction.amount_minor, 900);
    assert_eq!(details.transaction.time_group, "March 2026");

    let records = engine
        .saving_records_by_category("alice", "FOOD")
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn transaction_outside_goal_window_is_not_linked() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();
    engine
        .create_saving_goal("alice", "March 2026 Saving Goal", date(2026, 4, 1))
        .await
        .unwrap();
    engine
        .set_category_budget("alice", "GROCERIES", 500, date(2026, 3, 5))
        .await
        .unwrap();

    // April transaction against a goal completing in April: one month late.
    let outcome = engine
        .record_transaction("alice", expense("GROCERIES", date(2026, 4, 10), 100))
        .await
        .unwrap();
    assert_eq!(outcome.goal_link, GoalLink::NoMatch);
}

#[tokio::test]
async fn unknown_category_falls_back_to_other() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    let outcome = engine
        .record_transaction("alice", expense("lasertag", date(2026, 3, 10), 100))
        .await
        .unwrap();
    let details = engine
        .transaction_details(&outcome.transaction_id)
        .await
        .unwrap();
    assert_eq!(details.category, "OTHER");
}

#[tokio::test]
async fn category_lookup_is_case_insensitive() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    let outcome = engine
        .record_transaction("alice", expense("groceries", date(2026, 3, 10), 100))
        .await
        .unwrap();
    let details = engine
        .transaction_details(&outcome.transaction_id)
        .await
        .unwrap();
    assert_eq!(details.category, "GROCERIES");
}

#[tokio::test]
async fn supplied_transaction_id_is_trimmed() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    let mut tx = expense("FOOD", date(2026, 3, 10), 100);
    tx.transaction_id = Some("  receipt-42  ".to_string());
    let outcome = engine.record_transaction("alice", tx).await.unwrap();
    assert_eq!(outcome.transaction_id, "receipt-42");
}

#[tokio::test]
async fn duplicate_transaction_id_is_rejected() {
    let engine = engine().await;
    engine.open_account("alice", 1_000).await.unwrap();

    let mut tx = expense("FOOD", date(2026, 3, 10), 100);
    tx.transaction_id = Some("receipt-42".to_string());
    engine.record_transaction("alice", tx.clone()).await.unwrap();

    let err = engine.record_transaction("alice", tx).await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("receipt-42".to_string()));

    // The rejected transaction must not have touched the balance.
    assert_eq!(engine.balance("alice").await.unwrap(), 900);
}

#[tokio::test]
async fn list_transactions_returns_newest_first() {
    let engine = engine().await;
    engine.open_account("alice", 0).await.unwrap();

    engine
        .record_transaction("alice", expense("FOOD", date(2026, 3, 1), 100))
        .await
        .unwrap();
    engine
        .record_transaction("alice", expense("RENT", date(2026, 3, 20), 200))
        .await
        .unwrap();

    let all = engine.list_transactions("alice").await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].transaction.date, date(2026, 3, 20));
    assert_eq!(all[1].transaction.date, date(2026, 3, 1));
}

#[tokio::test]
async fn negative_payment_amount_is_rejected() {
    let engine = engine().await;
    engine.open_account("alice", 1_000).await.unwrap();

    let err = engine
        .record_transaction("alice", expense("FOOD", date(2026, 3, 10), -50))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(engine.balance("alice").await.unwrap(), 1_000);
}

#[tokio::test]
async fn recording_for_unknown_owner_fails() {
    let engine = engine().await;
    let err = engine
        .record_transaction("nobody", expense("FOOD", date(2026, 3, 10), 100))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("account for nobody".to_string())
    );
}
