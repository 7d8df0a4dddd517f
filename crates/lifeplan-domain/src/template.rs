//! Recurring income/expense templates and their frequency rules.

use std::fmt;

use chrono::NaiveDate;
use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::common::*;

/// Fallback step for `everyN` templates stored without a day count.
pub const DEFAULT_EVERY_N_DAYS: u32 = 2;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
/// Closed set of cadences a recurring template can follow.
pub enum Frequency {
    #[serde(rename = "once")]
    Once,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "biweekly")]
    Biweekly,
    /// Fires on the 1st and the 15th.
    #[serde(rename = "semimonthly_1_15")]
    SemimonthlyFirstFifteenth,
    /// Fires on the 5th and the 20th.
    #[serde(rename = "semimonthly_5_20")]
    SemimonthlyFifthTwentieth,
    /// Fires on the 15th and the last day of the month.
    #[serde(rename = "semimonthly_15_eom")]
    SemimonthlyFifteenthEndOfMonth,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "everyN")]
    EveryNDays,
    /// Any stored tag this build does not know. Never occurs.
    #[serde(rename = "unrecognized")]
    Unrecognized,
}

impl Frequency {
    /// Maps a stored tag to a frequency; unknown tags become [`Frequency::Unrecognized`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "once" => Frequency::Once,
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            "semimonthly_1_15" => Frequency::SemimonthlyFirstFifteenth,
            "semimonthly_5_20" => Frequency::SemimonthlyFifthTwentieth,
            "semimonthly_15_eom" => Frequency::SemimonthlyFifteenthEndOfMonth,
            "monthly" => Frequency::Monthly,
            "everyN" => Frequency::EveryNDays,
            _ => Frequency::Unrecognized,
        }
    }

    pub fn uses_day_of_month(self) -> bool {
        matches!(self, Frequency::Monthly)
    }

    pub fn uses_every_n_days(self) -> bool {
        matches!(self, Frequency::EveryNDays)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::SemimonthlyFirstFifteenth => "semimonthly_1_15",
            Frequency::SemimonthlyFifthTwentieth => "semimonthly_5_20",
            Frequency::SemimonthlyFifteenthEndOfMonth => "semimonthly_15_eom",
            Frequency::Monthly => "monthly",
            Frequency::EveryNDays => "everyN",
            Frequency::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Once => "Once",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Every 2 weeks",
            Frequency::SemimonthlyFirstFifteenth => "1st & 15th",
            Frequency::SemimonthlyFifthTwentieth => "5th & 20th",
            Frequency::SemimonthlyFifteenthEndOfMonth => "15th & end of month",
            Frequency::Monthly => "Monthly",
            Frequency::EveryNDays => "Every N days",
            Frequency::Unrecognized => "Unrecognized",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(Frequency::from_tag)
            .unwrap_or(Frequency::Unrecognized))
    }
}

/// A user-defined rule projecting a repeating income or expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub every_n_days: Option<u32>,
}

impl RecurringTemplate {
    pub fn new(
        user_id: Uuid,
        kind: EntryKind,
        amount: f64,
        category: impl Into<String>,
        start_date: NaiveDate,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            category: category.into(),
            name: None,
            start_date,
            frequency,
            day_of_month: None,
            every_n_days: None,
        }
    }

    pub fn with_day_of_month(mut self, day: u32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    pub fn with_every_n_days(mut self, days: u32) -> Self {
        self.every_n_days = Some(days);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Step used by `everyN` templates; unset or zero falls back to every other day.
    pub fn effective_every_n_days(&self) -> u32 {
        self.every_n_days
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_EVERY_N_DAYS)
    }

    /// Checks the template parameters against its frequency.
    ///
    /// Evaluation never calls this; it guards writes coming from the outside.
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("amount must be a positive number, got {}", self.amount));
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".into());
        }
        if self.frequency == Frequency::Unrecognized {
            return Err("frequency is not recognized".into());
        }
        match (self.frequency.uses_day_of_month(), self.day_of_month) {
            (true, Some(day)) if !(1..=31).contains(&day) => {
                return Err(format!("dayOfMonth must be within 1..=31, got {day}"));
            }
            (false, Some(_)) => {
                return Err(format!(
                    "dayOfMonth is not used by `{}` templates",
                    self.frequency.tag()
                ));
            }
            _ => {}
        }
        match (self.frequency.uses_every_n_days(), self.every_n_days) {
            (true, Some(0)) => Err("everyNDays must be at least 1".into()),
            (false, Some(_)) => Err(format!(
                "everyNDays is not used by `{}` templates",
                self.frequency.tag()
            )),
            _ => Ok(()),
        }
    }
}

impl Identifiable for RecurringTemplate {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for RecurringTemplate {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Amounted for RecurringTemplate {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn kind(&self) -> EntryKind {
        self.kind
    }
}
