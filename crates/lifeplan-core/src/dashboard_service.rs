//! Composes the evaluator outputs a dashboard screen shows at once.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use lifeplan_domain::{Occurrence, PayPeriod, RangeTotals, UserFinances};

use crate::{
    aggregate_service::AggregateService, pay_period_service::PayPeriodService,
    schedule_service::ScheduleService, storage::FinanceStore, CoreError,
};

/// Days covered by [`DashboardSnapshot::upcoming`], today included.
pub const UPCOMING_DAYS: u64 = 7;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub today: NaiveDate,
    pub current_period: PayPeriod,
    pub month: RangeTotals,
    pub month_periods: Vec<PayPeriod>,
    pub upcoming: Vec<Occurrence>,
}

pub struct DashboardService;

impl DashboardService {
    /// Loads `user_id` from `store` and composes its dashboard.
    pub fn snapshot(
        store: &dyn FinanceStore,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<DashboardSnapshot, CoreError> {
        let finances = store.load_user(user_id)?;
        Ok(Self::compose(&finances, today))
    }

    /// Dashboard for an already loaded snapshot.
    pub fn compose(finances: &UserFinances, today: NaiveDate) -> DashboardSnapshot {
        let paydays = finances.settings.payday_config.resolved_dates();
        let templates = &finances.templates;
        let transactions = &finances.transactions;

        let current_period = PayPeriodService::current_pay_period(&paydays, today, transactions);
        let month = AggregateService::month_totals(templates, transactions, today.year(), today.month());
        let month_periods = PayPeriodService::pay_periods_for_month(
            &paydays,
            today.year(),
            today.month(),
            today,
            transactions,
        );
        let horizon = today
            .checked_add_days(Days::new(UPCOMING_DAYS - 1))
            .unwrap_or(NaiveDate::MAX);
        let upcoming = ScheduleService::occurrences_between(templates, today, horizon);

        debug!(
            user_id = %finances.user_id,
            %today,
            periods = month_periods.len(),
            upcoming = upcoming.len(),
            "built dashboard snapshot"
        );
        DashboardSnapshot {
            today,
            current_period,
            month,
            month_periods,
            upcoming,
        }
    }
}
