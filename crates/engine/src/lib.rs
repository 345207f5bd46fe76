pub use accounts::Account;
pub use error::EngineError;
pub use goal_categories::GoalCategory;
pub use notify::{Notifier, Subsystem};
pub use ops::{
    CategoryGoalDetails, CurrentGoalCategory, Engine, EngineBuilder, GoalLink, GoalSummary,
    LastWeekSummary, NewTransaction, NewTransactionItem, ReconcileOutcome, SavingRecordView,
    TransactionDetails, TransactionItemView,
};
pub use products::Product;
pub use saving_goals::{GoalStatus, SavingGoal};
pub use saving_records::SavingRecord;
pub use transaction_items::TransactionItem;
pub use transactions::Transaction;

pub mod accounts;
pub mod categories;
mod error;
pub mod goal_categories;
pub mod notify;
mod ops;
pub mod products;
pub mod saving_goals;
pub mod saving_records;
pub mod transaction_items;
pub mod transactions;
pub mod util;

type ResultEngine<T> = Result<T, EngineError>;
