//! Read-only spending/income summaries over the transaction ledger.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{ResultEngine, categories, transactions};

use super::{Engine, with_tx};

/// Income plus the heaviest spending category over the trailing week.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastWeekSummary {
    pub income_minor: i64,
    pub category: String,
    pub spending_minor: i64,
}

const NO_CATEGORY: &str = "No Category Found";

impl Engine {
    /// Total expenses recorded after the first day of `today`'s month.
    pub async fn spending_per_month(&self, owner_id: &str, today: NaiveDate) -> ResultEngine<i64> {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let txs = self.owner_transactions(owner_id).await?;
        Ok(txs
            .iter()
            .filter(|tx| tx.is_expense && tx.date > first_of_month)
            .map(|tx| tx.amount_minor)
            .sum())
    }

    /// Total income recorded after the first day of `today`'s month.
    pub async fn income_per_month(&self, owner_id: &str, today: NaiveDate) -> ResultEngine<i64> {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let txs = self.owner_transactions(owner_id).await?;
        Ok(txs
            .iter()
            .filter(|tx| !tx.is_expense && tx.date > first_of_month)
            .map(|tx| tx.amount_minor)
            .sum())
    }

    /// Trailing-week digest: income plus the category with the most spending.
    pub async fn last_week_summary(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<LastWeekSummary> {
        let week_ago = today.checked_sub_days(Days::new(7)).unwrap_or(today);

        let recent: Vec<(transactions::Model, String)> = with_tx!(self, |db_tx| {
            self.require_account(&db_tx, owner_id).await?;
            let rows = transactions::Entity::find()
                .filter(transactions::Column::OwnerId.eq(owner_id))
                .filter(transactions::Column::Date.gt(week_ago))
                .find_also_related(categories::Entity)
                .all(&db_tx)
                .await?;
            Ok(rows
                .into_iter()
                .filter_map(|(tx, category)| category.map(|c| (tx, c.name)))
                .collect())
        })?;

        let income_minor = recent
            .iter()
            .filter(|(tx, _)| !tx.is_expense)
            .map(|(tx, _)| tx.amount_minor)
            .sum();

        let mut per_category: HashMap<&str, i64> = HashMap::new();
        for (tx, category) in recent.iter().filter(|(tx, _)| tx.is_expense) {
            *per_category.entry(category.as_str()).or_insert(0) += tx.amount_minor;
        }
        let top = per_category
            .into_iter()
            .max_by_key(|(_, spending)| *spending);

        let (category, spending_minor) = match top {
            Some((name, spending)) => (name.to_string(), spending),
            None => (NO_CATEGORY.to_string(), 0),
        };

        Ok(LastWeekSummary {
            income_minor,
            category,
            spending_minor,
        })
    }

    async fn owner_transactions(&self, owner_id: &str) -> ResultEngine<Vec<transactions::Model>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, owner_id).await?;
            let txs = transactions::Entity::find()
                .filter(transactions::Column::OwnerId.eq(owner_id))
                .all(&db_tx)
                .await?;
            Ok(txs)
        })
    }
}
