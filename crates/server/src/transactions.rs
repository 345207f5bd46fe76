//! Transactions and report API endpoints

use api_types::account::BalanceView;
use api_types::report::{LastWeekSummaryView, MonthlyTotal};
use api_types::transaction::{
    GoalLinkView, TransactionListResponse, TransactionNew, TransactionRecorded, TransactionView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{ServerError, server::ServerState};
use engine::{GoalLink, NewTransaction, NewTransactionItem, TransactionDetails};

fn map_goal_link(link: GoalLink) -> GoalLinkView {
    match link {
        GoalLink::Applied { saved_minor } => GoalLinkView::Applied { saved_minor },
        GoalLink::NoMatch => GoalLinkView::NoMatch,
        GoalLink::Failed => GoalLinkView::Failed,
    }
}

fn map_details(details: TransactionDetails) -> TransactionView {
    let tx = details.transaction;
    TransactionView {
        id: tx.id,
        title: tx.title,
        description: tx.description,
        category: details.category,
        date: tx.date,
        time: tx.time,
        time_group: tx.time_group,
        payment_method: tx.payment_method,
        amount_minor: tx.amount_minor,
        is_expense: tx.is_expense,
        items: details
            .items
            .into_iter()
            .map(|item| api_types::transaction::TransactionItemView {
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price_minor: item.unit_price_minor,
                total_minor: item.total_minor,
            })
            .collect(),
    }
}

pub async fn record(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionRecorded>), ServerError> {
    let new_transaction = NewTransaction {
        transaction_id: payload.transaction_id,
        title: payload.title,
        description: payload.description,
        category: payload.category,
        date: payload.date,
        time: payload.time,
        payment_method: payload.payment_method,
        amount_minor: payload.amount_minor,
        is_expense: payload.is_expense,
        items: payload
            .items
            .into_iter()
            .map(|item| NewTransactionItem {
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price_minor: item.unit_price_minor,
                total_minor: item.total_minor,
            })
            .collect(),
    };

    let outcome = state
        .engine
        .record_transaction(&owner_id, new_transaction)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionRecorded {
            transaction_id: outcome.transaction_id,
            goal_link: map_goal_link(outcome.goal_link),
        }),
    ))
}

pub async fn list(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let details = state.engine.list_transactions(&owner_id).await?;
    Ok(Json(TransactionListResponse {
        transactions: details.into_iter().map(map_details).collect(),
    }))
}

pub async fn details(
    Path(id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionView>, ServerError> {
    let details = state.engine.transaction_details(&id).await?;
    Ok(Json(map_details(details)))
}

pub async fn balance(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceView>, ServerError> {
    let balance_minor = state.engine.balance(&owner_id).await?;
    Ok(Json(BalanceView { balance_minor }))
}

pub async fn spending_per_month(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<MonthlyTotal>, ServerError> {
    let today = Utc::now().date_naive();
    let total_minor = state.engine.spending_per_month(&owner_id, today).await?;
    Ok(Json(MonthlyTotal { total_minor }))
}

pub async fn income_per_month(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<MonthlyTotal>, ServerError> {
    let today = Utc::now().date_naive();
    let total_minor = state.engine.income_per_month(&owner_id, today).await?;
    Ok(Json(MonthlyTotal { total_minor }))
}

pub async fn last_week_summary(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<LastWeekSummaryView>, ServerError> {
    let today = Utc::now().date_naive();
    let summary = state.engine.last_week_summary(&owner_id, today).await?;
    Ok(Json(LastWeekSummaryView {
        income_minor: summary.income_minor,
        category: summary.category,
        spending_minor: summary.spending_minor,
    }))
}
