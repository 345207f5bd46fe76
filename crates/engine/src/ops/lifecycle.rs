//! Goal lifecycle batch jobs.
//!
//! Both jobs are idempotent per period and per owner, and a failure on one
//! item never aborts the rest of the batch. Each item runs in its own DB
//! transaction so a failed owner leaves no partial state behind.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    GoalStatus, ResultEngine, SavingGoal, Subsystem, accounts, saving_goals,
    util::{plus_one_month, time_group},
};

use super::{Engine, with_tx};

impl Engine {
    /// Period-open job: create the new month's saving goal for every owner.
    ///
    /// The goal is named "<Month Year> Saving Goal" and completes one month
    /// after `today`. Owners that already carry an ACTIVE goal are skipped.
    /// Returns the number of goals created.
    pub async fn open_period_goals(&self, today: NaiveDate) -> ResultEngine<usize> {
        let goal_name = format!("{} Saving Goal", time_group(today));
        let completion_date = plus_one_month(today);

        let accounts: Vec<accounts::Model> =
            accounts::Entity::find().all(&self.database).await?;

        let mut created = 0;
        for account in accounts {
            match self
                .open_goal_for_account(&account, &goal_name, completion_date)
                .await
            {
                Ok(true) => created += 1,
                Ok(false) => {
                    tracing::debug!("owner {} already has an active goal", account.owner_id);
                }
                Err(err) => {
                    tracing::error!("failed to create goal for {}: {err}", account.owner_id);
                }
            }
        }

        tracing::info!("period-open job created {created} saving goal(s)");
        Ok(created)
    }

    async fn open_goal_for_account(
        &self,
        account: &accounts::Model,
        goal_name: &str,
        completion_date: NaiveDate,
    ) -> ResultEngine<bool> {
        let created = with_tx!(self, |db_tx| {
            if self.active_goal(&db_tx, account).await?.is_some() {
                Ok(false)
            } else {
                let goal = SavingGoal::new(
                    account.owner_id.clone(),
                    goal_name.to_string(),
                    completion_date,
                );
                let goal_id = goal.id.to_string();
                saving_goals::ActiveModel::from(&goal).insert(&db_tx).await?;

                let account_patch = accounts::ActiveModel {
                    id: ActiveValue::Set(account.id.clone()),
                    active_goal_id: ActiveValue::Set(Some(goal_id)),
                    ..Default::default()
                };
                account_patch.update(&db_tx).await?;

                tracing::info!("{goal_name} created for {}", account.owner_id);
                Ok(true)
            }
        })?;

        if created {
            self.notifier().publish(Subsystem::Goals, &account.owner_id);
        }
        Ok(created)
    }

    /// Period-close job: settle every ACTIVE goal whose completion date has
    /// passed.
    ///
    /// A goal whose target was met becomes COMPLETED, otherwise ON_HOLD; both
    /// are terminal. The owner's `active_goal_id` is cleared so the next
    /// period starts from a fresh instance. Returns the number of goals
    /// closed.
    pub async fn close_expired_goals(&self, today: NaiveDate) -> ResultEngine<usize> {
        let expired: Vec<saving_goals::Model> = saving_goals::Entity::find()
            .filter(saving_goals::Column::Status.eq(GoalStatus::Active.as_str()))
            .filter(saving_goals::Column::CompletionDate.lt(today))
            .all(&self.database)
            .await?;

        tracing::info!("starting cleanup for {} expired saving goal(s)", expired.len());

        let mut closed = 0;
        for goal in expired {
            match self.close_goal(&goal).await {
                Ok(()) => closed += 1,
                Err(err) => {
                    tracing::error!("failed to update status for goal {}: {err}", goal.id);
                }
            }
        }

        tracing::info!("finished updating expired saving goals");
        Ok(closed)
    }

    async fn close_goal(&self, goal: &saving_goals::Model) -> ResultEngine<()> {
        let domain = SavingGoal::try_from(goal.clone())?;
        let verdict = domain.close_status();

        with_tx!(self, |db_tx| {
            let goal_patch = saving_goals::ActiveModel {
                id: ActiveValue::Set(goal.id.clone()),
                status: ActiveValue::Set(verdict.as_str().to_string()),
                ..Default::default()
            };
            goal_patch.update(&db_tx).await?;

            let account = accounts::Entity::find()
                .filter(accounts::Column::OwnerId.eq(goal.owner_id.clone()))
                .one(&db_tx)
                .await?;
            if let Some(account) = account
                && account.active_goal_id.as_deref() == Some(goal.id.as_str())
            {
                let account_patch = accounts::ActiveModel {
                    id: ActiveValue::Set(account.id),
                    active_goal_id: ActiveValue::Set(None),
                    ..Default::default()
                };
                account_patch.update(&db_tx).await?;
            }

            match verdict {
                GoalStatus::Completed => {
                    tracing::info!("goal {} COMPLETED for {}", goal.id, goal.owner_id);
                }
                _ => {
                    tracing::warn!("goal {} ON_HOLD (expired, unfunded) for {}", goal.id, goal.owner_id);
                }
            }
            Ok(())
        })?;

        self.notifier().publish(Subsystem::Goals, &goal.owner_id);
        Ok(())
    }
}
