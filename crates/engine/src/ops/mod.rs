use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{EngineError, Notifier, ResultEngine};

mod accounts;
mod goals;
mod lifecycle;
mod reconcile;
mod reports;

pub use goals::{CategoryGoalDetails, CurrentGoalCategory, GoalSummary, SavingRecordView};
pub use reconcile::{
    GoalLink, NewTransaction, NewTransactionItem, ReconcileOutcome, TransactionDetails,
    TransactionItemView,
};
pub use reports::LastWeekSummary;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Clones share the connection pool and the notification hub.
#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
    notifier: Arc<Notifier>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The notification hub, for subscribers (the websocket route).
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidPayload(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn require_non_negative(amount_minor: i64, label: &str) -> ResultEngine<()> {
    if amount_minor < 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} {amount_minor} is negative"
        )));
    }
    Ok(())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            notifier: Arc::new(Notifier::new()),
        })
    }
}
