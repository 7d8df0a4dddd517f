use tracing::{info, warn};
use uuid::Uuid;

use lifeplan_domain::{Identifiable, Owned, Transaction};

use crate::{storage::FinanceStore, CoreError};

pub struct TransactionService;

impl TransactionService {
    /// Validates and records a transaction for `user_id`, returning its id.
    pub fn create(
        store: &dyn FinanceStore,
        user_id: Uuid,
        mut transaction: Transaction,
    ) -> Result<Uuid, CoreError> {
        transaction.user_id = user_id;
        transaction.validate().map_err(CoreError::Validation)?;

        let mut finances = store.load_user(user_id)?;
        if finances.transaction(transaction.id()).is_some() {
            return Err(CoreError::InvalidOperation(format!(
                "transaction {} already exists",
                transaction.id
            )));
        }
        let id = transaction.id();
        finances.transactions.push(transaction);
        finances.touch();
        store.save_user(&finances)?;
        info!(%user_id, transaction_id = %id, "recorded transaction");
        Ok(id)
    }

    /// Removes a transaction owned by `user_id`.
    pub fn delete(
        store: &dyn FinanceStore,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Transaction, CoreError> {
        let mut finances = store.load_user(user_id)?;
        let index = finances
            .transactions
            .iter()
            .position(|txn| txn.id() == transaction_id)
            .ok_or(CoreError::TransactionNotFound(transaction_id))?;
        if !finances.transactions[index].is_owned_by(user_id) {
            warn!(%transaction_id, %user_id, "transaction ownership check failed");
            return Err(CoreError::Forbidden(format!(
                "transaction {transaction_id} does not belong to user {user_id}"
            )));
        }

        let removed = finances.transactions.remove(index);
        finances.touch();
        store.save_user(&finances)?;
        info!(%user_id, %transaction_id, "deleted transaction");
        Ok(removed)
    }

    /// Transactions of `user_id`, newest first.
    pub fn list(store: &dyn FinanceStore, user_id: Uuid) -> Result<Vec<Transaction>, CoreError> {
        store.transactions(user_id)
    }
}
