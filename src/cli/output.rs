//! Text rendering for command results. Amount masking happens here and nowhere else.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use colored::Colorize;
use uuid::Uuid;

use lifeplan_core::DashboardSnapshot;
use lifeplan_domain::{EntryKind, Occurrence, PayPeriod, RangeTotals, RecurringTemplate};

/// Placeholder shown instead of amounts while they are hidden.
pub const MASK: &str = "•••";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-invocation rendering preferences, taken from the persisted config.
#[derive(Debug, Clone)]
pub struct Formatter {
    pub currency: String,
    pub hide_amounts: bool,
}

impl Formatter {
    pub fn new(currency: impl Into<String>, hide_amounts: bool) -> Self {
        Self {
            currency: currency.into(),
            hide_amounts,
        }
    }

    pub fn amount(&self, value: f64) -> String {
        if self.hide_amounts {
            MASK.to_string()
        } else {
            format!("{value:.2} {}", self.currency)
        }
    }

    fn kind_amount(&self, kind: EntryKind, value: f64) -> String {
        let text = self.amount(value);
        match kind {
            EntryKind::Income => text.green().to_string(),
            EntryKind::Expense => text.red().to_string(),
        }
    }

    fn net(&self, value: f64) -> String {
        let text = self.amount(value);
        if self.hide_amounts || value >= 0.0 {
            text.green().to_string()
        } else {
            text.red().to_string()
        }
    }

    pub fn totals(&self, label: &str, totals: &RangeTotals) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", label.bold());
        let _ = writeln!(out, "  Income:  {}", self.kind_amount(EntryKind::Income, totals.income));
        let _ = writeln!(out, "  Expense: {}", self.kind_amount(EntryKind::Expense, totals.expense));
        let _ = write!(out, "  Net:     {}", self.net(totals.net()));
        out
    }

    pub fn pay_period(&self, period: &PayPeriod) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} to {}",
            "Pay period".bold(),
            date(period.start_date),
            date(period.end_date)
        );
        let _ = writeln!(
            out,
            "  Days:    {} of {} passed, {} remaining ({:.0}%)",
            period.days_passed,
            period.days_in_period,
            period.days_remaining,
            period.progress() * 100.0
        );
        let _ = writeln!(out, "  Income:  {}", self.kind_amount(EntryKind::Income, period.income));
        let _ = writeln!(out, "  Expense: {}", self.kind_amount(EntryKind::Expense, period.expense));
        let _ = write!(out, "  Spent:   {}", self.kind_amount(EntryKind::Expense, period.spent));
        out
    }

    /// One line per occurrence, labelled with the template name or category.
    pub fn occurrences(&self, occurrences: &[Occurrence], templates: &[RecurringTemplate]) -> String {
        if occurrences.is_empty() {
            return "No occurrences.".dimmed().to_string();
        }
        let by_id: HashMap<Uuid, &RecurringTemplate> =
            templates.iter().map(|tpl| (tpl.id, tpl)).collect();
        occurrences
            .iter()
            .map(|occ| match by_id.get(&occ.template_id) {
                Some(tpl) => format!(
                    "{}  {:<20} {}",
                    date(occ.date),
                    tpl.name.as_deref().unwrap_or(&tpl.category),
                    self.kind_amount(tpl.kind, tpl.amount)
                ),
                None => format!("{}  {}", date(occ.date), occ.template_id),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn dashboard(&self, snapshot: &DashboardSnapshot, templates: &[RecurringTemplate]) -> String {
        let mut sections = vec![
            format!("{} {}", "Dashboard for".bold(), date(snapshot.today)),
            self.pay_period(&snapshot.current_period),
            self.totals("This month", &snapshot.month),
        ];
        sections.push(self.period_table(&snapshot.month_periods));
        sections.push(format!(
            "{}\n{}",
            "Next 7 days".bold(),
            self.occurrences(&snapshot.upcoming, templates)
        ));
        sections.join("\n\n")
    }

    /// Compact listing of several pay periods, one per line.
    pub fn period_table(&self, periods: &[PayPeriod]) -> String {
        let mut out = format!("{}", "Pay periods".bold());
        for period in periods {
            let _ = write!(
                out,
                "\n  {} to {}  in {}  out {}",
                date(period.start_date),
                date(period.end_date),
                self.kind_amount(EntryKind::Income, period.income),
                self.kind_amount(EntryKind::Expense, period.expense)
            );
        }
        out
    }
}

fn date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}
