//! Line items belonging to one transaction.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionItem {
    pub id: Uuid,
    pub transaction_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price_minor: i64,
    pub total_minor: i64,
}

impl TransactionItem {
    pub fn new(
        transaction_id: String,
        product_id: String,
        quantity: i32,
        unit_price_minor: i64,
        total_minor: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            product_id,
            quantity,
            unit_price_minor,
            total_minor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price_minor: i64,
    pub total_minor: i64,
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
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TransactionItem> for ActiveModel {
    fn from(item: &TransactionItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            transaction_id: ActiveValue::Set(item.transaction_id.clone()),
            product_id: ActiveValue::Set(item.product_id.clone()),
            quantity: ActiveValue::Set(item.quantity),
            unit_price_minor: ActiveValue::Set(item.unit_price_minor),
            total_minor: ActiveValue::Set(item.total_minor),
        }
    }
}

impl TryFrom<Model> for TransactionItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction item not exists".to_string()))?,
            transaction_id: model.transaction_id,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price_minor: model.unit_price_minor,
            total_minor: model.total_minor,
        })
    }
}
