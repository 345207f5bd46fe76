//! The ledger–goal reconciliation path.
//!
//! `record_transaction` is the only writer of account balances. Within one DB
//! transaction it adjusts the balance, persists the transaction and its items,
//! and best-effort applies the goal linkage; the notification fan-out runs
//! after commit and never touches the outcome.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Product, ResultEngine, SavingRecord, Subsystem, Transaction, TransactionItem,
    accounts, categories, goal_categories, products, saving_goals, saving_records,
    transaction_items, transactions,
    util::is_next_month,
};

use super::{Engine, normalize_optional_text, with_tx};

/// Payload for recording one transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Externally supplied id (e.g. from a receipt scanner); trimmed, a fresh
    /// uuid is generated when empty or absent.
    pub transaction_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub payment_method: Option<String>,
    pub amount_minor: i64,
    pub is_expense: bool,
    pub items: Vec<NewTransactionItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTransactionItem {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_minor: i64,
    pub total_minor: i64,
}

/// How the goal bookkeeping went for one recorded transaction.
///
/// The transaction ledger is the source of truth; goal bookkeeping is a
/// derived, best-effort projection. A failed linkage therefore still leaves
/// the call successful, but the caller can see it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GoalLink {
    /// A goal-category matched and its saved amount moved by `saved_minor`.
    Applied { saved_minor: i64 },
    /// No goal-category qualified; a valid outcome, not an error.
    NoMatch,
    /// A goal-category matched but updating it failed; logged and skipped.
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub transaction_id: String,
    pub goal_link: GoalLink,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionItemView {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_minor: i64,
    pub total_minor: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub transaction: Transaction,
    pub category: String,
    pub items: Vec<TransactionItemView>,
}

impl Engine {
    /// Record a transaction for `owner_id` and reconcile it against the
    /// owner's goal bookkeeping.
    ///
    /// Ordering within the unit: account balance, then transaction + items,
    /// then goal-category/goal update, then the audit record. Everything
    /// commits atomically; a failure in the goal-linkage step alone is
    /// logged and reported via [`GoalLink::Failed`] without failing the call.
    pub async fn record_transaction(
        &self,
        owner_id: &str,
        payload: NewTransaction,
    ) -> ResultEngine<ReconcileOutcome> {
        if payload.amount_minor < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "payment amount {} is negative",
                payload.amount_minor
            )));
        }

        let outcome = with_tx!(self, |db_tx| {
            self.reconcile(&db_tx, owner_id, &payload).await
        })?;

        self.notifier().publish(Subsystem::FinancialSummary, owner_id);
        self.notifier().publish(Subsystem::Transactions, owner_id);

        Ok(outcome)
    }

    async fn reconcile(
        &self,
        db_tx: &DatabaseTransaction,
        owner_id: &str,
        payload: &NewTransaction,
    ) -> ResultEngine<ReconcileOutcome> {
        let account = self.require_account(db_tx, owner_id).await?;
        let category = self.resolve_category(db_tx, &payload.category).await?;
        let goal_match = self
            .find_goal_category(db_tx, &account, &category.id, payload.date)
            .await?;

        let new_balance = if payload.is_expense {
            account.balance_minor - payload.amount_minor
        } else {
            account.balance_minor + payload.amount_minor
        };
        let account_patch = accounts::ActiveModel {
            id: ActiveValue::Set(account.id.clone()),
            balance_minor: ActiveValue::Set(new_balance),
            ..Default::default()
        };
        account_patch.update(db_tx).await?;

        let transaction_id = Transaction::assign_id(payload.transaction_id.as_deref());
        let exists = transactions::Entity::find_by_id(transaction_id.clone())
            .one(db_tx)
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey(transaction_id));
        }

        let mut tx = Transaction::new(
            transaction_id,
            owner_id.to_string(),
            account.id.clone(),
            category.id.clone(),
            payload.date,
            payload.amount_minor,
            payload.is_expense,
        );
        tx.title = normalize_optional_text(payload.title.as_deref());
        tx.description = normalize_optional_text(payload.description.as_deref());
        tx.time = normalize_optional_text(payload.time.as_deref());
        tx.payment_method = normalize_optional_text(payload.payment_method.as_deref());
        transactions::ActiveModel::from(&tx).insert(db_tx).await?;
        tracing::info!("transaction {} recorded for {owner_id}", tx.id);

        let mut items_total_minor = 0_i64;
        for item in &payload.items {
            let product_id = self.resolve_product(db_tx, &item.product_name).await?;
            let line = TransactionItem::new(
                tx.id.clone(),
                product_id,
                item.quantity,
                item.unit_price_minor,
                item.total_minor,
            );
            transaction_items::ActiveModel::from(&line).insert(db_tx).await?;
            items_total_minor += item.total_minor;
        }

        let goal_link = match goal_match {
            Some((line, goal)) => {
                let saved_minor = items_total_minor - payload.amount_minor;
                match self
                    .apply_goal_linkage(db_tx, &tx, &line, &goal, saved_minor)
                    .await
                {
                    Ok(()) => GoalLink::Applied { saved_minor },
                    Err(err) => {
                        tracing::error!(
                            "failed to update goal category {} for goal {}: {err}",
                            line.id,
                            goal.id
                        );
                        GoalLink::Failed
                    }
                }
            }
            None => {
                tracing::info!("no goal category matched for {owner_id}");
                GoalLink::NoMatch
            }
        };

        Ok(ReconcileOutcome {
            transaction_id: tx.id,
            goal_link,
        })
    }

    /// Move the savings delta into the goal-category line, its parent goal,
    /// and the audit trail.
    async fn apply_goal_linkage(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
        line: &goal_categories::Model,
        goal: &saving_goals::Model,
        saved_minor: i64,
    ) -> ResultEngine<()> {
        let line_patch = goal_categories::ActiveModel {
            id: ActiveValue::Set(line.id.clone()),
            saved_minor: ActiveValue::Set(line.saved_minor + saved_minor),
            ..Default::default()
        };
        line_patch.update(db_tx).await?;

        let goal_patch = saving_goals::ActiveModel {
            id: ActiveValue::Set(goal.id.clone()),
            current_minor: ActiveValue::Set(goal.current_minor + saved_minor),
            ..Default::default()
        };
        goal_patch.update(db_tx).await?;

        let record = SavingRecord::new(
            tx.id.clone(),
            goal.id.clone(),
            line.id.clone(),
            saved_minor,
            tx.date,
        );
        saving_records::ActiveModel::from(&record).insert(db_tx).await?;
        tracing::info!("saving record {} created for transaction {}", record.id, tx.id);

        Ok(())
    }

    /// Full detail for one transaction, items included.
    pub async fn transaction_details(
        &self,
        transaction_id: &str,
    ) -> ResultEngine<TransactionDetails> {
        with_tx!(self, |db_tx| {
            self.transaction_details_in(&db_tx, transaction_id).await
        })
    }

    /// All transactions for one owner, newest first.
    pub async fn list_transactions(&self, owner_id: &str) -> ResultEngine<Vec<TransactionDetails>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, owner_id).await?;
            let models: Vec<transactions::Model> = transactions::Entity::find()
                .filter(transactions::Column::OwnerId.eq(owner_id))
                .order_by_desc(transactions::Column::Date)
                .all(&db_tx)
                .await?;

            let mut details = Vec::with_capacity(models.len());
            for model in models {
                details.push(self.transaction_details_in(&db_tx, &model.id).await?);
            }
            Ok(details)
        })
    }

    async fn transaction_details_in(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: &str,
    ) -> ResultEngine<TransactionDetails> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;

        let category = categories::Entity::find_by_id(model.category_id.clone())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

        let item_models = transaction_items::Entity::find()
            .filter(transaction_items::Column::TransactionId.eq(transaction_id))
            .find_also_related(products::Entity)
            .all(db_tx)
            .await?;

        let mut items = Vec::with_capacity(item_models.len());
        for (item, product) in item_models {
            let product =
                product.ok_or_else(|| EngineError::KeyNotFound("product not exists".to_string()))?;
            items.push(TransactionItemView {
                product_name: product.name,
                quantity: item.quantity,
                unit_price_minor: item.unit_price_minor,
                total_minor: item.total_minor,
            });
        }

        Ok(TransactionDetails {
            transaction: model.into(),
            category: category.name,
            items,
        })
    }

    pub(super) async fn require_account(
        &self,
        db_tx: &DatabaseTransaction,
        owner_id: &str,
    ) -> ResultEngine<accounts::Model> {
        accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("account for {owner_id}")))
    }

    /// Case-insensitive category lookup, falling back to the OTHER catch-all.
    pub(super) async fn resolve_category(
        &self,
        db_tx: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<categories::Model> {
        let wanted = name.trim().to_uppercase();
        let found = categories::Entity::find()
            .filter(Expr::cust("UPPER(name)").eq(wanted))
            .one(db_tx)
            .await?;
        match found {
            Some(model) => Ok(model),
            None => categories::Entity::find()
                .filter(categories::Column::Name.eq(categories::FALLBACK_CATEGORY))
                .one(db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("category catalog not seeded".to_string())
                }),
        }
    }

    /// Resolve the goal-category line a transaction on `date` draws against.
    ///
    /// The owner's ACTIVE goal (via `accounts.active_goal_id`) qualifies only
    /// when its completion date falls in the month after `date`; the matching
    /// line for the category is returned, or `None` when nothing qualifies.
    pub(super) async fn find_goal_category(
        &self,
        db_tx: &DatabaseTransaction,
        account: &accounts::Model,
        category_id: &str,
        date: NaiveDate,
    ) -> ResultEngine<Option<(goal_categories::Model, saving_goals::Model)>> {
        let Some(goal_id) = account.active_goal_id.as_deref() else {
            return Ok(None);
        };

        let Some(goal) = saving_goals::Entity::find_by_id(goal_id.to_string())
            .one(db_tx)
            .await?
        else {
            return Ok(None);
        };

        if goal.status != crate::GoalStatus::Active.as_str()
            || !is_next_month(date, goal.completion_date)
        {
            return Ok(None);
        }

        let line = goal_categories::Entity::find()
            .filter(goal_categories::Column::GoalId.eq(goal.id.clone()))
            .filter(goal_categories::Column::CategoryId.eq(category_id))
            .one(db_tx)
            .await?;

        Ok(line.map(|line| (line, goal)))
    }

    async fn resolve_product(
        &self,
        db_tx: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<String> {
        let existing = products::Entity::find()
            .filter(products::Column::Name.eq(name))
            .one(db_tx)
            .await?;
        if let Some(model) = existing {
            return Ok(model.id);
        }

        let product = Product::new(name.to_string());
        let id = product.id.to_string();
        products::ActiveModel::from(&product).insert(db_tx).await?;
        Ok(id)
    }
}
