//! Per-category budget lines belonging to one saving goal.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// A budget line: how much the owner plans to keep aside for one category
/// within one goal period, and how much has been attributed so far.
///
/// Uniqueness is (goal, category): at most one line per category per goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalCategory {
    pub id: Uuid,
    pub goal_id: String,
    pub category_id: String,
    pub budgeted_minor: i64,
    pub saved_minor: i64,
}

impl GoalCategory {
    pub fn new(goal_id: String, category_id: String, budgeted_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            goal_id,
            category_id,
            budgeted_minor,
            saved_minor: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goal_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub goal_id: String,
    pub category_id: String,
    pub budgeted_minor: i64,
    pub saved_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::saving_goals::Entity",
        from = "Column::GoalId",
        to = "super::saving_goals::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    SavingGoals,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
    #[sea_orm(has_many = "super::saving_records::Entity")]
    SavingRecords,
}

impl Related<super::saving_goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavingGoals.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::saving_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavingRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&GoalCategory> for ActiveModel {
    fn from(line: &GoalCategory) -> Self {
        Self {
            id: ActiveValue::Set(line.id.to_string()),
            goal_id: ActiveValue::Set(line.goal_id.clone()),
            category_id: ActiveValue::Set(line.category_id.clone()),
            budgeted_minor: ActiveValue::Set(line.budgeted_minor),
            saved_minor: ActiveValue::Set(line.saved_minor),
        }
    }
}

impl TryFrom<Model> for GoalCategory {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("goal category not exists".to_string()))?,
            goal_id: model.goal_id,
            category_id: model.category_id,
            budgeted_minor: model.budgeted_minor,
            saved_minor: model.saved_minor,
        })
    }
}
