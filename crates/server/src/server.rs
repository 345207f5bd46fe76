use axum::{
    Router,
    routing::{get, patch, post},
};

use std::sync::Arc;

use crate::{accounts, events, goals, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/users/{owner_id}/transactions",
            post(transactions::record).get(transactions::list),
        )
        .route("/transactions/{id}", get(transactions::details))
        .route("/users/{owner_id}/balance", get(transactions::balance))
        .route(
            "/users/{owner_id}/spending-per-month",
            get(transactions::spending_per_month),
        )
        .route(
            "/users/{owner_id}/income-per-month",
            get(transactions::income_per_month),
        )
        .route(
            "/users/{owner_id}/last-week-summary",
            get(transactions::last_week_summary),
        )
        .route("/users/{owner_id}/goals", patch(goals::update_target))
        .route(
            "/users/{owner_id}/goals/categories",
            post(goals::upsert_category_budget),
        )
        .route("/users/{owner_id}/goals/current", get(goals::current_categories))
        .route("/users/{owner_id}/goals/summary", get(goals::summary))
        .route(
            "/users/{owner_id}/goals/category-summary",
            post(goals::category_summary),
        )
        .route(
            "/users/{owner_id}/goals/category-details",
            post(goals::category_details),
        )
        .route("/users/{owner_id}/goals/records", post(goals::saving_records))
        .route("/users/{owner_id}/accounts", post(accounts::open))
        .route("/ws/{subsystem}/{owner_id}", get(events::subscribe))
        .with_state(state)
}

pub async fn run(engine: Engine, bind: &str) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
pub(crate) fn test_router(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use tower::ServiceExt;

    use super::*;

    async fn app() -> Router {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        test_router(engine)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn open_account_then_read_balance() {
        let app = app().await;

        let res = app
            .clone()
            .oneshot(post_json(
                "/users/alice/accounts",
                serde_json::json!({ "opening_balance_minor": 1000 }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/users/alice/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["balance_minor"], 1000);
    }

    #[tokio::test]
    async fn balance_for_unknown_owner_is_404() {
        let app = app().await;
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/users/nobody/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn record_transaction_reports_goal_link() {
        let app = app().await;
        let res = app
            .clone()
            .oneshot(post_json("/users/alice/accounts", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(post_json(
                "/users/alice/transactions",
                serde_json::json!({
                    "category": "GROCERIES",
                    "date": "2026-03-10",
                    "amount_minor": 1200,
                    "is_expense": true,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["goal_link"]["state"], "no_match");
        assert!(parsed["transaction_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn budget_without_active_goal_is_404() {
        let app = app().await;
        let res = app
            .clone()
            .oneshot(post_json("/users/alice/accounts", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(post_json(
                "/users/alice/goals/categories",
                serde_json::json!({ "category": "RENT", "budgeted_minor": 5000 }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
