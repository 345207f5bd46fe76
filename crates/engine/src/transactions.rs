//! Transaction primitives.
//!
//! A `Transaction` is the immutable record of one payment or income event.
//! The id is externally suppliable (receipt scanners pass their own), so the
//! primary key is a free-form string rather than a generated uuid. The
//! `version` column is an optimistic-concurrency counter; rows are otherwise
//! never updated after insert.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::time_group;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    /// Display bucket, "%B %Y" of `date` (e.g. "November 2025").
    pub time_group: String,
    pub payment_method: Option<String>,
    pub amount_minor: i64,
    pub is_expense: bool,
    pub version: i32,
}

impl Transaction {
    /// Picks the transaction id: the externally supplied one (trimmed) when
    /// non-empty, a fresh uuid otherwise.
    pub fn assign_id(supplied: Option<&str>) -> String {
        match supplied.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        owner_id: String,
        account_id: String,
        category_id: String,
        date: NaiveDate,
        amount_minor: i64,
        is_expense: bool,
    ) -> Self {
        Self {
            id,
            owner_id,
            account_id,
            title: None,
            description: None,
            category_id,
            date,
            time: None,
            time_group: time_group(date),
            payment_method: None,
            amount_minor,
            is_expense,
            version: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: String,
    pub date: Date,
    pub time: Option<String>,
    pub time_group: String,
    pub payment_method: Option<String>,
    pub amount_minor: i64,
    pub is_expense: bool,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
    #[sea_orm(has_many = "super::transaction_items::Entity")]
    TransactionItems,
    #[sea_orm(has_many = "super::saving_records::Entity")]
    SavingRecords,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::transaction_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionItems.def()
    }
}

impl Related<super::saving_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavingRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.clone()),
            owner_id: ActiveValue::Set(tx.owner_id.clone()),
            account_id: ActiveValue::Set(tx.account_id.clone()),
            title: ActiveValue::Set(tx.title.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            category_id: ActiveValue::Set(tx.category_id.clone()),
            date: ActiveValue::Set(tx.date),
            time: ActiveValue::Set(tx.time.clone()),
            time_group: ActiveValue::Set(tx.time_group.clone()),
            payment_method: ActiveValue::Set(tx.payment_method.clone()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            is_expense: ActiveValue::Set(tx.is_expense),
            version: ActiveValue::Set(tx.version),
        }
    }
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            account_id: model.account_id,
            title: model.title,
            description: model.description,
            category_id: model.category_id,
            date: model.date,
            time: model.time,
            time_group: model.time_group,
            payment_method: model.payment_method,
            amount_minor: model.amount_minor,
            is_expense: model.is_expense,
            version: model.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_id_prefers_supplied_trimmed() {
        assert_eq!(Transaction::assign_id(Some("  rcpt-42 ")), "rcpt-42");
    }

    #[test]
    fn assign_id_generates_when_empty() {
        let id = Transaction::assign_id(Some("   "));
        assert!(Uuid::parse_str(&id).is_ok());
        let id = Transaction::assign_id(None);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn time_group_follows_date() {
        let tx = Transaction::new(
            "t1".to_string(),
            "alice".to_string(),
            "acc".to_string(),
            "CAT-XXX4".to_string(),
            NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
            12_000,
            true,
        );
        assert_eq!(tx.time_group, "November 2025");
    }
}
