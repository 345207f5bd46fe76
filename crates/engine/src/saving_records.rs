//! Saving-record audit trail.
//!
//! One immutable row per reconciled transaction that matched a goal-category:
//! the link explaining why a line's saved amount moved. Never updated.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavingRecord {
    pub id: Uuid,
    pub transaction_id: String,
    pub goal_id: String,
    pub goal_category_id: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
}

impl SavingRecord {
    pub fn new(
        transaction_id: String,
        goal_id: String,
        goal_category_id: String,
        amount_minor: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            goal_id,
            goal_category_id,
            amount_minor,
            date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "saving_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub transaction_id: String,
    pub goal_id: String,
    pub goal_category_id: String,
    pub amount_minor: i64,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::saving_goals::Entity",
        from = "Column::GoalId",
        to = "super::saving_goals::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    SavingGoals,
    #[sea_orm(
        belongs_to = "super::goal_categories::Entity",
        from = "Column::GoalCategoryId",
        to = "super::goal_categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    GoalCategories,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::saving_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavingGoals.def()
    }
}

impl Related<super::goal_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SavingRecord> for ActiveModel {
    fn from(record: &SavingRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            transaction_id: ActiveValue::Set(record.transaction_id.clone()),
            goal_id: ActiveValue::Set(record.goal_id.clone()),
            goal_category_id: ActiveValue::Set(record.goal_category_id.clone()),
            amount_minor: ActiveValue::Set(record.amount_minor),
            date: ActiveValue::Set(record.date),
        }
    }
}

impl TryFrom<Model> for SavingRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("saving record not exists".to_string()))?,
            transaction_id: model.transaction_id,
            goal_id: model.goal_id,
            goal_category_id: model.goal_category_id,
            amount_minor: model.amount_minor,
            date: model.date,
        })
    }
}
