use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};

use engine::{Engine, GoalLink, GoalStatus, NewTransaction, NewTransactionItem, saving_goals};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

async fn goals_for(db: &DatabaseConnection, owner: &str) -> Vec<saving_goals::Model> {
    saving_goals::Entity::find()
        .filter(saving_goals::Column::OwnerId.eq(owner))
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn period_open_creates_one_goal_per_account() {
    let (engine, db) = engine_with_db().await;
    engine.open_account("alice", 0).await.unwrap();
    engine.open_account("bob", 0).await.unwrap();

    let created = engine.open_period_goals(date(2026, 3, 1)).await.unwrap();
    assert_eq!(created, 2);

    let goals = goals_for(&db, "alice").await;
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].name, "March 2026 Saving Goal");
    assert_eq!(goals[0].completion_date, date(2026, 4, 1));
    assert_eq!(goals[0].status, GoalStatus::Active.as_str());
}

#[tokio::test]
async fn period_open_is_idempotent() {
    let (engine, db) = engine_with_db().await;
    engine.open_account("alice", 0).await.unwrap();

    assert_eq!(engine.open_period_goals(date(2026, 3, 1)).await.unwrap(), 1);
    assert_eq!(engine.open_period_goals(date(2026, 3, 1)).await.unwrap(), 0);
    assert_eq!(goals_for(&db, "alice").await.len(), 1);
}

#[tokio::test]
async fn unfunded_goal_closes_on_hold() {
    let (engine, db) = engine_with_db().await;
    engine.open_account("alice", 0).await.unwrap();
    engine.open_period_goals(date(2026, 3, 1)).await.unwrap();
    engine
        .set_category_budget("alice", "GROCERIES", 500, date(2026, 3, 5))
        .await
        .unwrap();

    let closed = engine.close_expired_goals(date(2026, 4, 2)).await.unwrap();
    assert_eq!(closed, 1);

    let goals = goals_for(&db, "alice").await;
    assert_eq!(goals[0].status, GoalStatus::OnHold.as_str());
}

#[tokio::test]
async fn funded_goal_closes_completed() {
    let (engine, db) = engine_with_db().await;
    engine.open_account("alice", 0).await.unwrap();
    // No budget lines: target 0 <= current 0 counts as funded.
    engine.open_period_goals(date(2026, 3, 1)).await.unwrap();

    let closed = engine.close_expired_goals(date(2026, 4, 2)).await.unwrap();
    assert_eq!(closed, 1);

    let goals = goals_for(&db, "alice").await;
    assert_eq!(goals[0].status, GoalStatus::Completed.as_str());
}

#[tokio::test]
async fn close_skips_goals_still_running() {
    let (engine, _db) = engine_with_db().await;
    engine.open_account("alice", 0).await.unwrap();
    engine.open_period_goals(date(2026, 3, 1)).await.unwrap();

    // Completion date is 2026-04-01; not yet expired on that same day.
    assert_eq!(
        engine.close_expired_goals(date(2026, 4, 1)).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn close_is_idempotent() {
    let (engine, _db) = engine_with_db().await;
    engine.open_account("alice", 0).await.unwrap();
    engine.open_period_goals(date(2026, 3, 1)).await.unwrap();

    assert_eq!(
        engine.close_expired_goals(date(2026, 4, 2)).await.unwrap(),
        1
    );
    assert_eq!(
        engine.close_expired_goals(date(2026, 4, 2)).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn closing_frees_the_owner_for_the_next_period() {
    let (engine, db) = engine_with_db().await;
    engine.open_account("alice", 0).await.unwrap();
    engine.open_period_goals(date(2026, 3, 1)).await.unwrap();
    engine.close_expired_goals(date(2026, 4, 2)).await.unwrap();

    // A fresh instance appears for April; the closed one stays terminal.
    assert_eq!(engine.open_period_goals(date(2026, 4, 2)).await.unwrap(), 1);
    let goals = goals_for(&db, "alice").await;
    assert_eq!(goals.len(), 2);
}

#[tokio::test]
async fn full_period_cycle_accumulates_savings() {
    let (engine, db) = engine_with_db().await;
    engine.open_account("alice", 50_000).await.unwrap();
    engine.open_period_goals(date(2026, 3, 1)).await.unwrap();
    engine
        .set_category_budget("alice", "GROCERIES", 500, date(2026, 3, 5))
        .await
        .unwrap();

    let tx = NewTransaction {
        transaction_id: None,
        title: Some("Weekly shop".to_string()),
        description: None,
        category: "GROCERIES".to_string(),
        date: date(2026, 3, 10),
        time: None,
        payment_method: None,
        amount_minor: 120,
        is_expense: true,
        items: vec![NewTransactionItem {
            product_name: "Groceries".to_string(),
            quantity: 1,
            unit_price_minor: 150,
            total_minor: 150,
        }],
    };
    let outcome = engine.record_transaction("alice", tx).await.unwrap();
    assert_eq!(outcome.goal_link, GoalLink::Applied { saved_minor: 30 });

    engine.close_expired_goals(date(2026, 4, 2)).await.unwrap();

    let goals = goals_for(&db, "alice").await;
    assert_eq!(goals.len(), 1);
    // 30 saved against a 500 budget: expired unfunded.
    assert_eq!(goals[0].status, GoalStatus::OnHold.as_str());
    assert_eq!(goals[0].current_minor, 30);
    assert_eq!(goals[0].target_minor, 500);
}
