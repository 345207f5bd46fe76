use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod transaction {
    use super::*;

    /// Request body for recording a transaction.
    ///
    /// `transaction_id` is the externally supplied id (e.g. from a receipt
    /// scanner); the server trims it and generates a fresh uuid when it is
    /// empty or absent.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub transaction_id: Option<String>,
        pub title: Option<String>,
        pub description: Option<String>,
        pub category: String,
        pub date: NaiveDate,
        pub time: Option<String>,
        pub payment_method: Option<String>,
        pub amount_minor: i64,
        pub is_expense: bool,
        #[serde(default)]
        pub items: Vec<TransactionItemNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionItemNew {
        pub product_name: String,
        pub quantity: i32,
        pub unit_price_minor: i64,
        pub total_minor: i64,
    }

    /// How the goal bookkeeping went for the recorded transaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "state", rename_all = "snake_case")]
    pub enum GoalLinkView {
        Applied { saved_minor: i64 },
        NoMatch,
        Failed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionRecorded {
        pub transaction_id: String,
        pub goal_link: GoalLinkView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionItemView {
        pub product_name: String,
        pub quantity: i32,
        pub unit_price_minor: i64,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: String,
        pub title: Option<String>,
        pub description: Option<String>,
        pub category: String,
        pub date: NaiveDate,
        pub time: Option<String>,
        /// "%B %Y" label of the transaction's month, e.g. "March 2026".
        pub time_group: String,
        pub payment_method: Option<String>,
        pub amount_minor: i64,
        pub is_expense: bool,
        pub items: Vec<TransactionItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod goal {
    use super::*;

    /// Request body for replacing the ACTIVE goal's target.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalTargetUpdate {
        pub target_minor: i64,
    }

    /// Request body for creating or updating one category budget line.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryBudgetUpsert {
        pub category: String,
        pub budgeted_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryBudgetResponse {
        pub category: String,
        pub budgeted_minor: i64,
    }

    /// Progress figures for the ACTIVE goal or one of its category lines.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalSummaryView {
        pub percentage: f64,
        pub current_minor: i64,
        pub target_minor: i64,
    }

    /// Selects one category for the summary/details/records endpoints.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryGet {
        pub category: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrentGoalCategoryView {
        pub goal_category_id: String,
        pub category: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrentGoalCategoriesResponse {
        pub categories: Vec<CurrentGoalCategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryGoalDetailView {
        pub status: String,
        /// Label of the period the line funds, e.g. "February 2026".
        pub time_group: String,
        pub budgeted_minor: i64,
        pub saved_minor: i64,
        pub remaining_percentage: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryGoalDetailsResponse {
        pub details: Vec<CategoryGoalDetailView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SavingRecordView {
        pub transaction_id: String,
        pub date: NaiveDate,
        pub amount_minor: i64,
        pub time_group: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SavingRecordsResponse {
        pub records: Vec<SavingRecordView>,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        #[serde(default)]
        pub opening_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountCreated {
        pub account_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub balance_minor: i64,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTotal {
        pub total_minor: i64,
    }

    /// Trailing-week digest: income plus the category with the most spending.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LastWeekSummaryView {
        pub income_minor: i64,
        pub category: String,
        pub spending_minor: i64,
    }
}
