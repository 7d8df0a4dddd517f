//! Per-user snapshot of everything the finance views need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{Identifiable, Owned},
    payday::UserSettings,
    template::RecurringTemplate,
    transaction::Transaction,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserFinances {
    pub user_id: Uuid,
    #[serde(default)]
    pub templates: Vec<RecurringTemplate>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl UserFinances {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            templates: Vec::new(),
            transactions: Vec::new(),
            settings: UserSettings::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn template(&self, id: Uuid) -> Option<&RecurringTemplate> {
        self.templates.iter().find(|tpl| tpl.id() == id)
    }

    pub fn template_mut(&mut self, id: Uuid) -> Option<&mut RecurringTemplate> {
        self.templates.iter_mut().find(|tpl| tpl.id() == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id() == id)
    }

    /// Transactions ordered newest first.
    pub fn transactions_by_date_desc(&self) -> Vec<Transaction> {
        let mut sorted = self.transactions.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Re-homes every entity onto this snapshot's user, returning how many were changed.
    pub fn claim_ownership(&mut self) -> usize {
        let user_id = self.user_id;
        let mut changed = 0;
        for tpl in self.templates.iter_mut().filter(|tpl| !tpl.is_owned_by(user_id)) {
            tpl.user_id = user_id;
            changed += 1;
        }
        for txn in self.transactions.iter_mut().filter(|txn| !txn.is_owned_by(user_id)) {
            txn.user_id = user_id;
            changed += 1;
        }
        changed
    }
}
