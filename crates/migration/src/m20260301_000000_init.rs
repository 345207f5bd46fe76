//! Initial schema migration - creates all tables from scratch.
//!
//! - `accounts`: one running balance per owner, plus the active-goal pointer
//! - `categories`: fixed spending-category catalog
//! - `saving_goals`: monthly per-owner envelopes
//! - `goal_categories`: per-category budget lines of a goal
//! - `transactions` / `transaction_items`: the ledger
//! - `products`: item reference data, created on the fly when unknown
//! - `saving_records`: immutable goal-attribution audit trail

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    OwnerId,
    BalanceMinor,
    ActiveGoalId,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum SavingGoals {
    Table,
    Id,
    OwnerId,
    Name,
    TargetMinor,
    CurrentMinor,
    CompletionDate,
    Status,
}

#[derive(Iden)]
enum GoalCategories {
    Table,
    Id,
    GoalId,
    CategoryId,
    BudgetedMinor,
    SavedMinor,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    OwnerId,
    AccountId,
    Title,
    Description,
    CategoryId,
    Date,
    Time,
    TimeGroup,
    PaymentMethod,
    AmountMinor,
    IsExpense,
    Version,
}

#[derive(Iden)]
enum TransactionItems {
    Table,
    Id,
    TransactionId,
    ProductId,
    Quantity,
    UnitPriceMinor,
    TotalMinor,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    Unit,
}

#[derive(Iden)]
enum SavingRecords {
    Table,
    Id,
    TransactionId,
    GoalId,
    GoalCategoryId,
    AmountMinor,
    Date,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::BalanceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Accounts::ActiveGoalId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-accounts-owner_id-unique")
                    .table(Accounts::Table)
                    .col(Accounts::OwnerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-name-unique")
                    .table(Categories::Table)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavingGoals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavingGoals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SavingGoals::OwnerId).string().not_null())
                    .col(ColumnDef::new(SavingGoals::Name).string().not_null())
                    .col(
                        ColumnDef::new(SavingGoals::TargetMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SavingGoals::CurrentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SavingGoals::CompletionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SavingGoals::Status).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-saving_goals-owner_id-status")
                    .table(SavingGoals::Table)
                    .col(SavingGoals::OwnerId)
                    .col(SavingGoals::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoalCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoalCategories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GoalCategories::GoalId).string().not_null())
                    .col(
                        ColumnDef::new(GoalCategories::CategoryId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoalCategories::BudgetedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GoalCategories::SavedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goal_categories-goal_id")
                            .from(GoalCategories::Table, GoalCategories::GoalId)
                            .to(SavingGoals::Table, SavingGoals::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goal_categories-category_id")
                            .from(GoalCategories::Table, GoalCategories::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-goal_categories-goal_id-category_id-unique")
                    .table(GoalCategories::Table)
                    .col(GoalCategories::GoalId)
                    .col(GoalCategories::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::OwnerId).string().not_null())
                    .col(ColumnDef::new(Transactions::AccountId).string().not_null())
                    .col(ColumnDef::new(Transactions::Title).string())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::CategoryId).string().not_null())
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Time).string())
                    .col(ColumnDef::new(Transactions::TimeGroup).string().not_null())
                    .col(ColumnDef::new(Transactions::PaymentMethod).string())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::IsExpense).boolean().not_null())
                    .col(
                        ColumnDef::new(Transactions::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-account_id")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-owner_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Unit).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-name-unique")
                    .table(Products::Table)
                    .col(Products::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::ProductId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::UnitPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::TotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_items-transaction_id")
                            .from(TransactionItems::Table, TransactionItems::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transaction_items-product_id")
                            .from(TransactionItems::Table, TransactionItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavingRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavingRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SavingRecords::TransactionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SavingRecords::GoalId).string().not_null())
                    .col(
                        ColumnDef::new(SavingRecords::GoalCategoryId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SavingRecords::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SavingRecords::Date).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-saving_records-transaction_id")
                            .from(SavingRecords::Table, SavingRecords::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-saving_records-goal_id")
                            .from(SavingRecords::Table, SavingRecords::GoalId)
                            .to(SavingGoals::Table, SavingGoals::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-saving_records-goal_category_id")
                            .from(SavingRecords::Table, SavingRecords::GoalCategoryId)
                            .to(GoalCategories::Table, GoalCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavingRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransactionItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GoalCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavingGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
