//! The module contains the `Account` struct and its persistence model.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

/// A user's single running-balance account.
///
/// The balance is denormalized: it always reflects the signed sum of all
/// transactions posted against it and is mutated only by the reconciliation
/// path. `active_goal_id` is an explicit reference to the owner's ACTIVE
/// saving goal; it is updated transactionally whenever a goal opens or closes
/// so there is never more than one ACTIVE goal per owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub owner_id: String,
    pub balance_minor: i64,
    pub active_goal_id: Option<String>,
}

impl Account {
    pub fn new(owner_id: String, balance_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            balance_minor,
            active_goal_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub balance_minor: i64,
    pub active_goal_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            owner_id: ActiveValue::Set(account.owner_id.clone()),
            balance_minor: ActiveValue::Set(account.balance_minor),
            active_goal_id: ActiveValue::Set(account.active_goal_id.clone()),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = super::EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| super::EngineError::KeyNotFound("account not exists".to_string()))?,
            owner_id: model.owner_id,
            balance_minor: model.balance_minor,
            active_goal_id: model.active_goal_id,
        })
    }
}
