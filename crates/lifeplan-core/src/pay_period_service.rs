//! Derives pay periods from configured payday dates.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use lifeplan_domain::{
    clamp_to_month, days_between, month_bounds, sanitize_payday_dates, shift_year_month,
    DateWindow, EntryKind, PayPeriod, RangeTotals, Transaction,
};

pub struct PayPeriodService;

impl PayPeriodService {
    /// The pay period containing `today`.
    ///
    /// `payday_dates` are days of month; they are sanitized first, so an empty or
    /// malformed list behaves like `[15, 30]`. The period starts on the latest payday on
    /// or before `today` and ends on the next payday, wrapping into the neighbouring
    /// month when needed. Income and expense cover `[start, end)`; `spent` covers
    /// expenses from the start through `today`.
    pub fn current_pay_period(
        payday_dates: &[u32],
        today: NaiveDate,
        transactions: &[Transaction],
    ) -> PayPeriod {
        let dates = resolve(payday_dates);
        let boundaries = boundaries_around(&dates, today.year(), today.month());
        let latest = boundaries.iter().rposition(|payday| *payday <= today);
        let (start, end) = match latest {
            Some(idx) if idx + 1 < boundaries.len() => (boundaries[idx], boundaries[idx + 1]),
            _ => {
                // Only reachable at the ends of the representable calendar.
                let start = latest.map_or(today, |idx| boundaries[idx]);
                warn!(%today, %start, "no payday boundary after date; period closes after today");
                (start, today.succ_opt().unwrap_or(today))
            }
        };
        let period = build_period(start, end, today, transactions);
        debug!(
            start = %period.start_date,
            end = %period.end_date,
            days_remaining = period.days_remaining,
            spent = period.spent,
            "resolved current pay period"
        );
        period
    }

    /// Consecutive pay periods intersecting the given month, in order.
    ///
    /// The first period usually starts in the previous month and the last one ends in
    /// the next; consecutive periods share a boundary so they never overlap. Progress
    /// fields are measured against `today`, clamped to each period.
    pub fn pay_periods_for_month(
        payday_dates: &[u32],
        year: i32,
        month: u32,
        today: NaiveDate,
        transactions: &[Transaction],
    ) -> Vec<PayPeriod> {
        let Some(month_window) = month_bounds(year, month)
            .and_then(|(first, last)| DateWindow::inclusive(first, last).ok())
        else {
            warn!(year, month, "month out of range; no pay periods");
            return Vec::new();
        };
        let dates = resolve(payday_dates);
        boundaries_around(&dates, year, month)
            .windows(2)
            .map(|pair| DateWindow {
                start: pair[0],
                end: pair[1],
            })
            .filter(|window| window.overlaps(&month_window))
            .map(|window| build_period(window.start, window.end, today, transactions))
            .collect()
    }

    /// Payday dates of one month, clamped to its length, sorted and de-duplicated.
    pub fn paydays_in_month(payday_dates: &[u32], year: i32, month: u32) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = payday_dates
            .iter()
            .filter_map(|day| clamp_to_month(year, month, *day))
            .collect();
        days.sort();
        days.dedup();
        days
    }
}

fn resolve(payday_dates: &[u32]) -> Vec<u32> {
    let dates = sanitize_payday_dates(payday_dates);
    if !payday_dates.iter().any(|day| (1..=31).contains(day)) {
        debug!(?payday_dates, "payday dates unusable; falling back to defaults");
    }
    dates
}

/// Last payday of the previous month, all paydays of this month, first payday of the next.
fn boundaries_around(dates: &[u32], year: i32, month: u32) -> Vec<NaiveDate> {
    let (prev_year, prev_month) = shift_year_month(year, month, -1);
    let (next_year, next_month) = shift_year_month(year, month, 1);

    let mut boundaries = Vec::new();
    boundaries.extend(
        PayPeriodService::paydays_in_month(dates, prev_year, prev_month)
            .last()
            .copied(),
    );
    boundaries.extend(PayPeriodService::paydays_in_month(dates, year, month));
    boundaries.extend(
        PayPeriodService::paydays_in_month(dates, next_year, next_month)
            .first()
            .copied(),
    );
    boundaries
}

fn build_period(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    transactions: &[Transaction],
) -> PayPeriod {
    let window = DateWindow { start, end };
    let days_in_period = window.len_days();
    let days_passed = days_between(start, today).clamp(0, days_in_period);

    let mut totals = RangeTotals::default();
    let mut spent = 0.0;
    for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
        totals.record_entry(txn);
        if txn.kind == EntryKind::Expense && txn.date <= today {
            spent += txn.amount;
        }
    }

    PayPeriod {
        start_date: start,
        end_date: end,
        income: totals.income,
        expense: totals.expense,
        days_in_period,
        days_passed,
        days_remaining: days_in_period - days_passed,
        spent,
    }
}
