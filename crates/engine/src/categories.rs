//! Spending-category reference data.
//!
//! The catalog is a fixed set seeded by the migration. Names resolve
//! case-insensitively and unknown names fall back to [`FALLBACK_CATEGORY`].

use sea_orm::entity::prelude::*;

/// Name of the catch-all category every unknown name resolves to.
pub const FALLBACK_CATEGORY: &str = "OTHER";

/// Canonical catalog seeded at migration time, `(id, name)`.
pub const CATALOG: &[(&str, &str)] = &[
    ("CAT-XXX1", "FOOD"),
    ("CAT-XXX2", "TRANSPORT"),
    ("CAT-XXX3", "MEDICINE"),
    ("CAT-XXX4", "GROCERIES"),
    ("CAT-XXX5", "RENT"),
    ("CAT-XXX6", "INSURANCE"),
    ("CAT-XXX7", "SUBSCRIPTIONS"),
    ("CAT-XXX8", "ENTERTAINMENT"),
    ("CAT-XXX0", "OTHER"),
];

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::goal_categories::Entity")]
    GoalCategories,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::goal_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalCategories.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
