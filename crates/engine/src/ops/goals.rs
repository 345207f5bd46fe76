//! Goal and budget management.
//!
//! Mutators here and in the reconciliation path are the only writers of
//! `target_minor`/`current_minor`/`budgeted_minor`/`saved_minor`; every
//! read-modify-write runs inside one `with_tx!` unit.

use chrono::{Datelike, NaiveDate};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, GoalCategory, GoalStatus, ResultEngine, SavingGoal, Subsystem, accounts,
    goal_categories, saving_goals, saving_records, transactions,
    util::{is_current_or_next_month, saving_percentage},
};

use super::{Engine, normalize_required_name, require_non_negative, with_tx};

/// Percentage figures for a goal or one of its category lines.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub percentage: f64,
    pub current_minor: i64,
    pub target_minor: i64,
}

/// One budget line of a current or upcoming goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentGoalCategory {
    pub goal_category_id: String,
    pub category: String,
}

/// Per-line detail for one category across goal periods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryGoalDetails {
    pub status: String,
    /// Label of the funded period: the month before the goal's completion.
    pub time_group: String,
    pub budgeted_minor: i64,
    pub saved_minor: i64,
    pub remaining_percentage: f64,
}

/// Audit-trail view of one saving record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingRecordView {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub amount_minor: i64,
    pub time_group: String,
}

impl Engine {
    /// Open a fresh ACTIVE saving goal for an owner and point the account's
    /// `active_goal_id` at it.
    ///
    /// Refuses when an ACTIVE goal already exists; a new instance is always
    /// created per period rather than reopening an old one.
    pub async fn create_saving_goal(
        &self,
        owner_id: &str,
        name: &str,
        completion_date: NaiveDate,
    ) -> ResultEngine<String> {
        let name = normalize_required_name(name, "goal")?;
        let goal_id = with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, owner_id).await?;
            if let Some(active) = self.active_goal(&db_tx, &account).await? {
                return Err(EngineError::ExistingKey(format!(
                    "active goal {} for {owner_id}",
                    active.id
                )));
            }

            let goal = SavingGoal::new(owner_id.to_string(), name, completion_date);
            let goal_id = goal.id.to_string();
            saving_goals::ActiveModel::from(&goal).insert(&db_tx).await?;

            let account_patch = accounts::ActiveModel {
                id: ActiveValue::Set(account.id),
                active_goal_id: ActiveValue::Set(Some(goal_id.clone())),
                ..Default::default()
            };
            account_patch.update(&db_tx).await?;

            tracing::info!("{} saving goal created for {owner_id}", goal.name);
            Ok(goal_id)
        })?;

        self.notifier().publish(Subsystem::Goals, owner_id);
        Ok(goal_id)
    }

    /// Replace the ACTIVE goal's target amount.
    pub async fn update_goal_target(
        &self,
        owner_id: &str,
        new_target_minor: i64,
    ) -> ResultEngine<i64> {
        require_non_negative(new_target_minor, "goal target")?;
        let target = with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, owner_id).await?;
            let goal = self
                .active_goal(&db_tx, &account)
                .await?
                .ok_or_else(|| EngineError::NoActiveGoal(owner_id.to_string()))?;

            let goal_patch = saving_goals::ActiveModel {
                id: ActiveValue::Set(goal.id),
                target_minor: ActiveValue::Set(new_target_minor),
                ..Default::default()
            };
            goal_patch.update(&db_tx).await?;
            tracing::info!("saving goal target updated for {owner_id}");
            Ok(new_target_minor)
        })?;

        self.notifier().publish(Subsystem::Goals, owner_id);
        Ok(target)
    }

    /// Create or update the budget line for a category.
    ///
    /// An existing line (resolved with the same next-period rule the
    /// reconciliation uses, evaluated at `today`) gets the new budget and the
    /// delta propagates into the parent goal's target; otherwise a fresh line
    /// with zero saved amount is added to the ACTIVE goal. Returns the
    /// effective budgeted amount.
    pub async fn set_category_budget(
        &self,
        owner_id: &str,
        category_name: &str,
        budgeted_minor: i64,
        today: NaiveDate,
    ) -> ResultEngine<i64> {
        require_non_negative(budgeted_minor, "category budget")?;
        let effective = with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, owner_id).await?;
            let category = self.resolve_category(&db_tx, category_name).await?;

            let matched = self
                .find_goal_category(&db_tx, &account, &category.id, today)
                .await?;
            if let Some((line, goal)) = matched {
                self.update_budget_line(&db_tx, &line.id, &goal, budgeted_minor)
                    .await
            } else {
                let goal = self
                    .active_goal(&db_tx, &account)
                    .await?
                    .ok_or_else(|| EngineError::NoActiveGoal(owner_id.to_string()))?;

                // Uniqueness is (goal, category): a line created in an earlier
                // period drift still counts as the one to update.
                let existing = goal_categories::Entity::find()
                    .filter(goal_categories::Column::GoalId.eq(goal.id.clone()))
                    .filter(goal_categories::Column::CategoryId.eq(category.id.clone()))
                    .one(&db_tx)
                    .await?;
                if let Some(line) = existing {
                    self.update_budget_line(&db_tx, &line.id, &goal, budgeted_minor)
                        .await
                } else {
                    let line =
                        GoalCategory::new(goal.id.clone(), category.id.clone(), budgeted_minor);
                    goal_categories::ActiveModel::from(&line).insert(&db_tx).await?;

                    let goal_patch = saving_goals::ActiveModel {
                        id: ActiveValue::Set(goal.id),
                        target_minor: ActiveValue::Set(goal.target_minor + budgeted_minor),
                        ..Default::default()
                    };
                    goal_patch.update(&db_tx).await?;
                    tracing::info!("category goal created for {owner_id}");

                    Ok(budgeted_minor)
                }
            }
        })?;

        self.notifier().publish(Subsystem::Goals, owner_id);
        Ok(effective)
    }

    async fn update_budget_line(
        &self,
        db_tx: &DatabaseTransaction,
        line_id: &str,
        goal: &saving_goals::Model,
        new_budgeted_minor: i64,
    ) -> ResultEngine<i64> {
        let line = goal_categories::Entity::find_by_id(line_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("goal category {line_id}")))?;

        let delta = new_budgeted_minor - line.budgeted_minor;

        let line_patch = goal_categories::ActiveModel {
            id: ActiveValue::Set(line.id),
            budgeted_minor: ActiveValue::Set(new_budgeted_minor),
            ..Default::default()
        };
        line_patch.update(db_tx).await?;

        let goal_patch = saving_goals::ActiveModel {
            id: ActiveValue::Set(goal.id.clone()),
            target_minor: ActiveValue::Set(goal.target_minor + delta),
            ..Default::default()
        };
        goal_patch.update(db_tx).await?;
        tracing::info!("category goal updated for goal {}", goal.id);

        Ok(new_budgeted_minor)
    }

    /// Overall progress of the ACTIVE goal.
    pub async fn overall_saving_percentage(&self, owner_id: &str) -> ResultEngine<GoalSummary> {
        with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, owner_id).await?;
            let goal = self
                .active_goal(&db_tx, &account)
                .await?
                .ok_or_else(|| EngineError::NoActiveGoal(owner_id.to_string()))?;

            Ok(GoalSummary {
                percentage: saving_percentage(goal.target_minor, goal.current_minor),
                current_minor: goal.current_minor,
                target_minor: goal.target_minor,
            })
        })
    }

    /// Progress of one category line on the ACTIVE goal.
    pub async fn per_category_saving_percentage(
        &self,
        owner_id: &str,
        category_name: &str,
    ) -> ResultEngine<GoalSummary> {
        with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, owner_id).await?;
            let category = self.resolve_category(&db_tx, category_name).await?;
            let goal = self
                .active_goal(&db_tx, &account)
                .await?
                .ok_or_else(|| EngineError::NoActiveGoal(owner_id.to_string()))?;

            let line = goal_categories::Entity::find()
                .filter(goal_categories::Column::GoalId.eq(goal.id))
                .filter(goal_categories::Column::CategoryId.eq(category.id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound(format!("goal category {}", category.name))
                })?;

            Ok(GoalSummary {
                percentage: saving_percentage(line.budgeted_minor, line.saved_minor),
                current_minor: line.saved_minor,
                target_minor: line.budgeted_minor,
            })
        })
    }

    /// Budget lines whose goal completes in the current or next month.
    pub async fn list_current_goal_categories(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<Vec<CurrentGoalCategory>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, owner_id).await?;
            let goals: Vec<saving_goals::Model> = saving_goals::Entity::find()
                .filter(saving_goals::Column::OwnerId.eq(owner_id))
                .all(&db_tx)
                .await?;

            let mut current = Vec::new();
            for goal in goals {
                if !is_current_or_next_month(today, goal.completion_date) {
                    continue;
                }
                let lines = goal_categories::Entity::find()
                    .filter(goal_categories::Column::GoalId.eq(goal.id.clone()))
                    .find_also_related(crate::categories::Entity)
                    .all(&db_tx)
                    .await?;
                for (line, category) in lines {
                    let category = category.ok_or_else(|| {
                        EngineError::KeyNotFound("category not exists".to_string())
                    })?;
                    current.push(CurrentGoalCategory {
                        goal_category_id: line.id,
                        category: category.name,
                    });
                }
            }
            Ok(current)
        })
    }

    /// All lines for one category across the owner's goals, with period
    /// labels and remaining percentages.
    pub async fn category_goal_details(
        &self,
        owner_id: &str,
        category_name: &str,
    ) -> ResultEngine<Vec<CategoryGoalDetails>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, owner_id).await?;
            let category = self.resolve_category(&db_tx, category_name).await?;

            let lines = goal_categories::Entity::find()
                .filter(goal_categories::Column::CategoryId.eq(category.id))
                .find_also_related(saving_goals::Entity)
                .all(&db_tx)
                .await?;

            let mut details = Vec::new();
            for (line, goal) in lines {
                let Some(goal) = goal else { continue };
                if goal.owner_id != owner_id {
                    continue;
                }
                let remaining = if line.budgeted_minor > 0 {
                    saving_percentage(
                        line.budgeted_minor,
                        line.budgeted_minor - line.saved_minor,
                    )
                } else {
                    0.0
                };
                details.push(CategoryGoalDetails {
                    status: goal.status.clone(),
                    time_group: funded_period_label(goal.completion_date),
                    budgeted_minor: line.budgeted_minor,
                    saved_minor: line.saved_minor,
                    remaining_percentage: remaining,
                });
            }
            Ok(details)
        })
    }

    /// Audit entries for one category, linked back to their transactions.
    pub async fn saving_records_by_category(
        &self,
        owner_id: &str,
        category_name: &str,
    ) -> ResultEngine<Vec<SavingRecordView>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, owner_id).await?;
            let category = self.resolve_category(&db_tx, category_name).await?;

            let records = saving_records::Entity::find()
                .find_also_related(goal_categories::Entity)
                .order_by_asc(saving_records::Column::Date)
                .all(&db_tx)
                .await?;

            let mut views = Vec::new();
            for (record, line) in records {
                let Some(line) = line else { continue };
                if line.category_id != category.id {
                    continue;
                }
                let Some(goal) = saving_goals::Entity::find_by_id(record.goal_id.clone())
                    .one(&db_tx)
                    .await?
                else {
                    continue;
                };
                if goal.owner_id != owner_id {
                    continue;
                }
                let tx = transactions::Entity::find_by_id(record.transaction_id.clone())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::KeyNotFound("transaction not exists".to_string())
                    })?;
                views.push(SavingRecordView {
                    transaction_id: record.transaction_id,
                    date: record.date,
                    amount_minor: record.amount_minor,
                    time_group: tx.time_group,
                });
            }
            Ok(views)
        })
    }

    /// The goal `accounts.active_goal_id` points at, when it is still ACTIVE.
    pub(super) async fn active_goal(
        &self,
        db_tx: &DatabaseTransaction,
        account: &accounts::Model,
    ) -> ResultEngine<Option<saving_goals::Model>> {
        let Some(goal_id) = account.active_goal_id.as_deref() else {
            return Ok(None);
        };
        let goal = saving_goals::Entity::find_by_id(goal_id.to_string())
            .one(db_tx)
            .await?;
        Ok(goal.filter(|goal| goal.status == GoalStatus::Active.as_str()))
    }
}

/// Label of the period a goal funds: the month before its completion date,
/// with the completion date's year.
fn funded_period_label(completion_date: NaiveDate) -> String {
    let month = if completion_date.month() == 1 {
        12
    } else {
        completion_date.month() - 1
    };
    let month_name = match NaiveDate::from_ymd_opt(2000, month, 1) {
        Some(date) => date.format("%B").to_string(),
        None => String::new(),
    };
    format!("{month_name} {}", completion_date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn funded_period_is_month_before_completion() {
        let completion = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        assert_eq!(funded_period_label(completion), "November 2025");
    }

    #[test]
    fn funded_period_january_keeps_completion_year() {
        let completion = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(funded_period_label(completion), "December 2026");
    }
}
