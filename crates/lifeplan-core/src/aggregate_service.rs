//! Sums recurring projections and recorded transactions over date ranges.

use chrono::NaiveDate;
use tracing::{debug, warn};

use lifeplan_domain::{days_inclusive, month_bounds, RangeTotals, RecurringTemplate, Transaction};

use crate::schedule_service::ScheduleService;

pub struct AggregateService;

impl AggregateService {
    /// Income and expense over `start..=end`.
    ///
    /// Every template occurrence in the range counts, and so does every recorded
    /// transaction dated in the range. The two are added independently: a recorded
    /// transaction does not cancel the projected occurrence it may correspond to.
    /// An inverted range yields zero totals.
    pub fn aggregate_over_range(
        templates: &[RecurringTemplate],
        transactions: &[Transaction],
        start: NaiveDate,
        end: NaiveDate,
    ) -> RangeTotals {
        let mut totals = RangeTotals::default();
        if end < start {
            return totals;
        }

        let mut projected = 0usize;
        for day in days_inclusive(start, end) {
            for tpl in templates
                .iter()
                .filter(|tpl| ScheduleService::template_occurs_on(tpl, day))
            {
                totals.record_entry(tpl);
                projected += 1;
            }
        }

        let mut recorded = 0usize;
        for txn in transactions.iter().filter(|txn| txn.dated_within(start, end)) {
            totals.record_entry(txn);
            recorded += 1;
        }

        debug!(
            %start,
            %end,
            projected,
            recorded,
            income = totals.income,
            expense = totals.expense,
            "aggregated range"
        );
        totals
    }

    /// Totals for a calendar month, recurring projections included.
    pub fn month_totals(
        templates: &[RecurringTemplate],
        transactions: &[Transaction],
        year: i32,
        month: u32,
    ) -> RangeTotals {
        match month_bounds(year, month) {
            Some((first, last)) => Self::aggregate_over_range(templates, transactions, first, last),
            None => {
                warn!(year, month, "month out of range; reporting zero totals");
                RangeTotals::default()
            }
        }
    }
}
