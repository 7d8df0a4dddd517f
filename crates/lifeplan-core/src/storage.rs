use std::{collections::HashSet, path::PathBuf};

use uuid::Uuid;

use lifeplan_domain::{Frequency, Owned, RecurringTemplate, Transaction, UserFinances};

use crate::CoreError;

/// Describes a persisted backup artifact for a user's snapshot.
#[derive(Debug, Clone)]
pub struct FinanceBackupInfo {
    pub user_id: Uuid,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends that hold per-user finance snapshots.
pub trait FinanceStore: Send + Sync {
    /// Loads a user's snapshot; users without stored data get an empty one.
    fn load_user(&self, user_id: Uuid) -> Result<UserFinances, CoreError>;
    fn save_user(&self, finances: &UserFinances) -> Result<(), CoreError>;
    fn delete_user(&self, user_id: Uuid) -> Result<(), CoreError>;
    fn list_users(&self) -> Result<Vec<Uuid>, CoreError>;

    fn templates(&self, user_id: Uuid) -> Result<Vec<RecurringTemplate>, CoreError> {
        Ok(self.load_user(user_id)?.templates)
    }

    /// Recorded transactions, newest first.
    fn transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, CoreError> {
        Ok(self.load_user(user_id)?.transactions_by_date_desc())
    }
}

/// Detects anomalies within a snapshot that evaluation tolerates silently.
pub fn snapshot_warnings(finances: &UserFinances) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for tpl in &finances.templates {
        if !seen.insert(tpl.id) {
            warnings.push(format!("template {} appears more than once", tpl.id));
        }
        if !tpl.is_owned_by(finances.user_id) {
            warnings.push(format!(
                "template {} belongs to user {}, not {}",
                tpl.id, tpl.user_id, finances.user_id
            ));
        }
        if tpl.frequency == Frequency::Unrecognized {
            warnings.push(format!(
                "template {} has an unrecognized frequency and never occurs",
                tpl.id
            ));
        }
        if let Err(reason) = tpl.validate() {
            warnings.push(format!("template {} is invalid: {reason}", tpl.id));
        }
    }

    for txn in &finances.transactions {
        if !seen.insert(txn.id) {
            warnings.push(format!("transaction {} reuses an existing id", txn.id));
        }
        if !txn.is_owned_by(finances.user_id) {
            warnings.push(format!(
                "transaction {} belongs to user {}, not {}",
                txn.id, txn.user_id, finances.user_id
            ));
        }
    }

    if finances.settings.payday_config.uses_default() {
        warnings.push("payday configuration has no usable dates; using 15 and 30".into());
    }
    warnings
}
