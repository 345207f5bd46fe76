//! Product reference data.
//!
//! Products are mostly bulk-loaded elsewhere; the engine only creates them on
//! the fly when a transaction item references an unknown name, with the
//! default unit.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

/// Unit assigned to products created on the fly.
pub const DEFAULT_UNIT: &str = "pcs";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
}

impl Product {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            unit: DEFAULT_UNIT.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction_items::Entity")]
    TransactionItems,
}

impl Related<super::transaction_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.to_string()),
            name: ActiveValue::Set(product.name.clone()),
            unit: ActiveValue::Set(product.unit.clone()),
        }
    }
}
