//! Saving-goal primitives.
//!
//! A `SavingGoal` is a per-owner monthly envelope: `target_minor` is the sum
//! of its category budget lines, `current_minor` the sum of their saved
//! amounts. A goal instance is opened ACTIVE at period start and closed at
//! period end; COMPLETED and ON_HOLD are terminal.

use chrono::NaiveDate;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    Active,
    Completed,
    OnHold,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::OnHold => "ON_HOLD",
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "ON_HOLD" => Ok(Self::OnHold),
            other => Err(EngineError::InvalidPayload(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavingGoal {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub completion_date: NaiveDate,
    pub status: GoalStatus,
}

impl SavingGoal {
    pub fn new(owner_id: String, name: String, completion_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            target_minor: 0,
            current_minor: 0,
            completion_date,
            status: GoalStatus::Active,
        }
    }

    /// Closing verdict for an expired goal.
    pub fn close_status(&self) -> GoalStatus {
        if self.target_minor <= self.current_minor {
            GoalStatus::Completed
        } else {
            GoalStatus::OnHold
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "saving_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub target_minor: i64,
    pub current_minor: i64,
    pub completion_date: Date,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::goal_categories::Entity")]
    GoalCategories,
    #[sea_orm(has_many = "super::saving_records::Entity")]
    SavingRecords,
}

impl Related<super::goal_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalCategories.def()
    }
}

impl Related<super::saving_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavingRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SavingGoal> for ActiveModel {
    fn from(goal: &SavingGoal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            owner_id: ActiveValue::Set(goal.owner_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_minor: ActiveValue::Set(goal.target_minor),
            current_minor: ActiveValue::Set(goal.current_minor),
            completion_date: ActiveValue::Set(goal.completion_date),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for SavingGoal {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("saving goal not exists".to_string()))?,
            owner_id: model.owner_id,
            name: model.name,
            target_minor: model.target_minor,
            current_minor: model.current_minor,
            completion_date: model.completion_date,
            status: GoalStatus::try_from(model.status.as_str())?,
        })
    }
}
