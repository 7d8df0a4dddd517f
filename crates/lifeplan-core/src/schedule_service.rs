//! Decides on which calendar days recurring templates fire.

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, warn};

use lifeplan_domain::{
    days_between, days_inclusive, is_last_day_of_month, last_day_of_month, Frequency, Occurrence,
    RecurringTemplate,
};

/// Default search horizon for [`ScheduleService::next_occurrence`].
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 366;

/// Pure evaluation of template frequency rules. Holds no state.
pub struct ScheduleService;

impl ScheduleService {
    /// Returns `true` when `template` fires on `day`, counting from `start_date`.
    ///
    /// Days before `start_date` never match, whatever the frequency. Unrecognized
    /// frequencies never match either, so a bad stored value cannot project phantom
    /// amounts.
    pub fn occurs_on(template: &RecurringTemplate, day: NaiveDate, start_date: NaiveDate) -> bool {
        if day < start_date {
            return false;
        }
        let elapsed = days_between(start_date, day);
        match template.frequency {
            Frequency::Once => day == start_date,
            Frequency::Daily => true,
            Frequency::Weekly => day.weekday() == start_date.weekday(),
            Frequency::Biweekly => {
                day.weekday() == start_date.weekday() && (elapsed / 7) % 2 == 0
            }
            Frequency::SemimonthlyFirstFifteenth => matches!(day.day(), 1 | 15),
            Frequency::SemimonthlyFifthTwentieth => matches!(day.day(), 5 | 20),
            Frequency::SemimonthlyFifteenthEndOfMonth => {
                day.day() == 15 || is_last_day_of_month(day)
            }
            Frequency::Monthly => {
                let target = template.day_of_month.unwrap_or_else(|| start_date.day());
                day.day() == target.min(last_day_of_month(day))
            }
            Frequency::EveryNDays => {
                elapsed % i64::from(template.effective_every_n_days()) == 0
            }
            Frequency::Unrecognized => false,
        }
    }

    /// Evaluates `template` against its own start date.
    pub fn template_occurs_on(template: &RecurringTemplate, day: NaiveDate) -> bool {
        Self::occurs_on(template, day, template.start_date)
    }

    /// Every occurrence of `templates` within `first..=last`, ordered by date and then by
    /// template order.
    pub fn occurrences_between(
        templates: &[RecurringTemplate],
        first: NaiveDate,
        last: NaiveDate,
    ) -> Vec<Occurrence> {
        if last < first {
            return Vec::new();
        }
        warn_unrecognized(templates);
        let occurrences: Vec<Occurrence> = days_inclusive(first, last)
            .flat_map(|day| {
                templates
                    .iter()
                    .filter(move |tpl| Self::template_occurs_on(tpl, day))
                    .map(move |tpl| Occurrence {
                        template_id: tpl.id,
                        date: day,
                    })
            })
            .collect();
        debug!(
            templates = templates.len(),
            %first,
            %last,
            occurrences = occurrences.len(),
            "expanded recurring templates"
        );
        occurrences
    }

    /// First day strictly after `after` on which `template` fires, looking at most
    /// `horizon_days` ahead.
    pub fn next_occurrence(
        template: &RecurringTemplate,
        after: NaiveDate,
        horizon_days: u32,
    ) -> Option<NaiveDate> {
        match template.frequency {
            Frequency::Unrecognized => return None,
            Frequency::Once if template.start_date <= after => return None,
            _ => {}
        }
        let first = after.succ_opt()?.max(template.start_date);
        let limit = after
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        days_inclusive(first, limit).find(|day| Self::template_occurs_on(template, *day))
    }
}

fn warn_unrecognized(templates: &[RecurringTemplate]) {
    for tpl in templates
        .iter()
        .filter(|tpl| tpl.frequency == Frequency::Unrecognized)
    {
        warn!(template_id = %tpl.id, "template has an unrecognized frequency and never occurs");
    }
}
