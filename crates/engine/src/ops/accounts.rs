use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Account, EngineError, ResultEngine, Subsystem, accounts};

use super::{Engine, with_tx};

impl Engine {
    /// Open the single account for an owner.
    ///
    /// Identity management is external; this only provisions the ledger side.
    pub async fn open_account(
        &self,
        owner_id: &str,
        opening_balance_minor: i64,
    ) -> ResultEngine<Uuid> {
        let account_id = with_tx!(self, |db_tx| {
            let exists = accounts::Entity::find()
                .filter(accounts::Column::OwnerId.eq(owner_id))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(owner_id.to_string()));
            }

            let account = Account::new(owner_id.to_string(), opening_balance_minor);
            let account_id = account.id;
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            tracing::info!("account {account_id} opened for {owner_id}");
            Ok(account_id)
        })?;

        self.notifier().publish(Subsystem::Users, owner_id);
        Ok(account_id)
    }

    /// Current balance for an owner.
    pub async fn balance(&self, owner_id: &str) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, owner_id).await?;
            Ok(account.balance_minor)
        })
    }
}
