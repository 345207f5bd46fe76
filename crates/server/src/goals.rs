//! Goal and budget API endpoints

use api_types::goal::{
    CategoryBudgetResponse, CategoryBudgetUpsert, CategoryGet, CategoryGoalDetailView,
    CategoryGoalDetailsResponse, CurrentGoalCategoriesResponse, CurrentGoalCategoryView,
    GoalSummaryView, GoalTargetUpdate, SavingRecordView, SavingRecordsResponse,
};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::{ServerError, server::ServerState};
use engine::GoalSummary;

fn map_summary(summary: GoalSummary) -> GoalSummaryView {
    GoalSummaryView {
        percentage: summary.percentage,
        current_minor: summary.current_minor,
        target_minor: summary.target_minor,
    }
}

pub async fn update_target(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalTargetUpdate>,
) -> Result<Json<GoalTargetUpdate>, ServerError> {
    let target_minor = state
        .engine
        .update_goal_target(&owner_id, payload.target_minor)
        .await?;
    Ok(Json(GoalTargetUpdate { target_minor }))
}

pub async fn upsert_category_budget(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryBudgetUpsert>,
) -> Result<Json<CategoryBudgetResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let budgeted_minor = state
        .engine
        .set_category_budget(&owner_id, &payload.category, payload.budgeted_minor, today)
        .await?;
    Ok(Json(CategoryBudgetResponse {
        category: payload.category,
        budgeted_minor,
    }))
}

pub async fn current_categories(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<CurrentGoalCategoriesResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let categories = state
        .engine
        .list_current_goal_categories(&owner_id, today)
        .await?;
    Ok(Json(CurrentGoalCategoriesResponse {
        categories: categories
            .into_iter()
            .map(|line| CurrentGoalCategoryView {
                goal_category_id: line.goal_category_id,
                category: line.category,
            })
            .collect(),
    }))
}

pub async fn summary(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
) -> Result<Json<GoalSummaryView>, ServerError> {
    let summary = state.engine.overall_saving_percentage(&owner_id).await?;
    Ok(Json(map_summary(summary)))
}

pub async fn category_summary(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryGet>,
) -> Result<Json<GoalSummaryView>, ServerError> {
    let summary = state
        .engine
        .per_category_saving_percentage(&owner_id, &payload.category)
        .await?;
    Ok(Json(map_summary(summary)))
}

pub async fn category_details(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryGet>,
) -> Result<Json<CategoryGoalDetailsResponse>, ServerError> {
    let details = state
        .engine
        .category_goal_details(&owner_id, &payload.category)
        .await?;
    Ok(Json(CategoryGoalDetailsResponse {
        details: details
            .into_iter()
            .map(|line| CategoryGoalDetailView {
                status: line.status,
                time_group: line.time_group,
                budgeted_minor: line.budgeted_minor,
                saved_minor: line.saved_minor,
                remaining_percentage: line.remaining_percentage,
            })
            .collect(),
    }))
}

pub async fn saving_records(
    Path(owner_id): Path<String>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryGet>,
) -> Result<Json<SavingRecordsResponse>, ServerError> {
    let records = state
        .engine
        .saving_records_by_category(&owner_id, &payload.category)
        .await?;
    Ok(Json(SavingRecordsResponse {
        records: records
            .into_iter()
            .map(|record| SavingRecordView {
                transaction_id: record.transaction_id,
                date: record.date,
                amount_minor: record.amount_minor,
                time_group: record.time_group,
            })
            .collect(),
    }))
}
