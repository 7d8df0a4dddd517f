//! Derived, never-persisted results of schedule evaluation.

use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A date on which a recurring template fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub template_id: Uuid,
    pub date: NaiveDate,
}

/// Income and expense summed over some range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RangeTotals {
    pub income: f64,
    pub expense: f64,
}

impl RangeTotals {
    pub fn record(&mut self, kind: EntryKind, amount: f64) {
        match kind {
            EntryKind::Income => self.income += amount,
            EntryKind::Expense => self.expense += amount,
        }
    }

    /// Records any entry carrying an amount and a direction.
    pub fn record_entry<T: Amounted + ?Sized>(&mut self, entry: &T) {
        self.record(entry.kind(), entry.amount());
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

impl Add for RangeTotals {
    type Output = RangeTotals;

    fn add(self, rhs: RangeTotals) -> RangeTotals {
        RangeTotals {
            income: self.income + rhs.income,
            expense: self.expense + rhs.expense,
        }
    }
}

impl AddAssign for RangeTotals {
    fn add_assign(&mut self, rhs: RangeTotals) {
        self.income += rhs.income;
        self.expense += rhs.expense;
    }
}

/// Span between two consecutive paydays, with progress and actual totals.
///
/// Covers `[start_date, end_date)`; `end_date` is the next payday and belongs to the
/// following period. `income` and `expense` therefore exclude transactions dated on
/// `end_date`, so consecutive periods partition the calendar and a payday's
/// transactions are counted exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub income: f64,
    pub expense: f64,
    pub days_in_period: i64,
    pub days_passed: i64,
    pub days_remaining: i64,
    pub spent: f64,
}

impl PayPeriod {
    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.window().contains(date)
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    /// Share of the period already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.days_in_period <= 0 {
            return 0.0;
        }
        (self.days_passed as f64 / self.days_in_period as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_record_by_kind_and_add() {
        let mut left = RangeTotals::default();
        left.record(EntryKind::Income, 100.0);
        left.record(EntryKind::Expense, 30.0);
        let mut right = RangeTotals::default();
        right.record(EntryKind::Expense, 20.0);
        let tips = crate::Transaction::new(
            Uuid::new_v4(),
            EntryKind::Income,
            15.0,
            "Tips",
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        right.record_entry(&tips);

        let sum = left + right;
        assert_eq!(sum.income, 115.0);
        assert_eq!(sum.expense, 50.0);
        assert_eq!(sum.net(), 65.0);
    }

    #[test]
    fn progress_is_bounded() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let period = PayPeriod {
            start_date: start,
            end_date: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
            income: 0.0,
            expense: 0.0,
            days_in_period: 15,
            days_passed: 5,
            days_remaining: 10,
            spent: 0.0,
        };
        assert!((period.progress() - 1.0 / 3.0).abs() < 1e-9);
        assert!(period.contains(start));
        assert!(!period.contains(period.end_date));
    }
}
