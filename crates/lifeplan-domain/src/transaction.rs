//! Actual (recorded) money movements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        kind: EntryKind,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            category: category.into(),
            date,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Returns `true` when the transaction falls inside `first..=last`.
    pub fn dated_within(&self, first: NaiveDate, last: NaiveDate) -> bool {
        self.date >= first && self.date <= last
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("amount must be a positive number, got {}", self.amount));
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".into());
        }
        Ok(())
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Transaction {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn kind(&self) -> EntryKind {
        self.kind
    }
}
