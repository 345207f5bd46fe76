//! Seeds the fixed spending-category catalog.
//!
//! The set mirrors the reference data the rest of the system assumes:
//! unknown names resolve to OTHER, so OTHER must always exist.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
}

const CATALOG: &[(&str, &str)] = &[
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

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (id, name) in CATALOG {
            let insert = Query::insert()
                .into_table(Categories::Table)
                .columns([Categories::Id, Categories::Name])
                .values_panic([(*id).into(), (*name).into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete().from_table(Categories::Table).to_owned();
        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
