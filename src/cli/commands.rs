use std::{io::Write, path::PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::info;

use lifeplan_core::{
    storage::FinanceStore, AggregateService, CoreError, DashboardService, PayPeriodService,
    ScheduleService,
};
use lifeplan_domain::{month_bounds, PaydayConfig, PaydayKind};
use lifeplan_storage_json::load_from_path;

use crate::{
    cli::{output::Formatter, CliContext},
    errors::CliError,
    utils::build_info,
};

pub const USAGE: &str = "Usage: lifeplan_cli <command>\n\
Commands:\n  \
period [YYYY-MM-DD]            pay period containing the date (default today)\n  \
month [YYYY-MM]                month totals and pay periods\n  \
range <start> <end>            totals over an inclusive date range\n  \
occurrences <start> <end>      recurring occurrences in a date range\n  \
dashboard [YYYY-MM-DD]         period, month and upcoming items\n  \
paydays [day...]               show or set payday days of month\n  \
import <file.json>             replace stored data with a snapshot file\n  \
export                         print stored data as JSON\n  \
hide-amounts on|off            mask amounts in output\n  \
version                        print build information";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Period { date: Option<NaiveDate> },
    Month { year: Option<i32>, month: Option<u32> },
    Range { start: NaiveDate, end: NaiveDate },
    Occurrences { start: NaiveDate, end: NaiveDate },
    Dashboard { date: Option<NaiveDate> },
    Paydays { dates: Vec<u32> },
    Import { path: PathBuf },
    Export,
    HideAmounts { hidden: bool },
    Version,
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };
        let command = match name.as_str() {
            "period" => Command::Period {
                date: optional_date(rest)?,
            },
            "month" => match rest {
                [] => Command::Month {
                    year: None,
                    month: None,
                },
                [value] => {
                    let (year, month) = parse_month(value)?;
                    Command::Month {
                        year: Some(year),
                        month: Some(month),
                    }
                }
                _ => return Err(usage("month takes at most one argument")),
            },
            "range" | "occurrences" => {
                let [start, end] = rest else {
                    return Err(usage(&format!("{name} needs <start> <end>")));
                };
                let (start, end) = (parse_date(start)?, parse_date(end)?);
                if name == "range" {
                    Command::Range { start, end }
                } else {
                    Command::Occurrences { start, end }
                }
            }
            "dashboard" => Command::Dashboard {
                date: optional_date(rest)?,
            },
            "paydays" => Command::Paydays {
                dates: rest
                    .iter()
                    .map(|raw| match raw.parse::<u32>() {
                        Ok(day) if (1..=31).contains(&day) => Ok(day),
                        _ => Err(usage(&format!("payday `{raw}` must be a day between 1 and 31"))),
                    })
                    .collect::<Result<_, _>>()?,
            },
            "import" => match rest {
                [path] => Command::Import {
                    path: PathBuf::from(path),
                },
                _ => return Err(usage("import needs <file.json>")),
            },
            "export" => Command::Export,
            "hide-amounts" => match rest {
                [flag] if flag == "on" => Command::HideAmounts { hidden: true },
                [flag] if flag == "off" => Command::HideAmounts { hidden: false },
                _ => return Err(usage("hide-amounts needs on|off")),
            },
            "version" | "--version" => Command::Version,
            "help" | "--help" | "-h" => Command::Help,
            other => return Err(usage(&format!("unknown command `{other}`"))),
        };
        Ok(command)
    }

    /// Commands that need no config or storage.
    pub fn is_standalone(&self) -> bool {
        matches!(self, Command::Version | Command::Help)
    }

    pub fn execute(self, ctx: &mut CliContext, out: &mut dyn Write) -> Result<(), CliError> {
        let fmt = Formatter::new(ctx.config.currency.clone(), ctx.config.hide_amounts);
        let today = ctx.clock.today();

        match self {
            Command::Period { date } => {
                let finances = ctx.storage.load_user(ctx.user_id)?;
                let period = PayPeriodService::current_pay_period(
                    &finances.settings.payday_config.resolved_dates(),
                    date.unwrap_or(today),
                    &finances.transactions,
                );
                writeln!(out, "{}", fmt.pay_period(&period))?;
            }
            Command::Month { year, month } => {
                let year = year.unwrap_or_else(|| today.year());
                let month = month.unwrap_or_else(|| today.month());
                let finances = ctx.storage.load_user(ctx.user_id)?;
                let totals = AggregateService::month_totals(
                    &finances.templates,
                    &finances.transactions,
                    year,
                    month,
                );
                let periods = PayPeriodService::pay_periods_for_month(
                    &finances.settings.payday_config.resolved_dates(),
                    year,
                    month,
                    today,
                    &finances.transactions,
                );
                writeln!(out, "{}", fmt.totals(&format!("{year:04}-{month:02}"), &totals))?;
                writeln!(out, "{}", fmt.period_table(&periods))?;
            }
            Command::Range { start, end } => {
                let finances = ctx.storage.load_user(ctx.user_id)?;
                let totals = AggregateService::aggregate_over_range(
                    &finances.templates,
                    &finances.transactions,
                    start,
                    end,
                );
                writeln!(out, "{}", fmt.totals(&format!("{start} to {end}"), &totals))?;
            }
            Command::Occurrences { start, end } => {
                let templates = ctx.storage.templates(ctx.user_id)?;
                let found = ScheduleService::occurrences_between(&templates, start, end);
                writeln!(out, "{}", fmt.occurrences(&found, &templates))?;
            }
            Command::Dashboard { date } => {
                let day = date.unwrap_or(today);
                let finances = ctx.storage.load_user(ctx.user_id)?;
                let snapshot = DashboardService::compose(&finances, day);
                writeln!(out, "{}", fmt.dashboard(&snapshot, &finances.templates))?;
            }
            Command::Paydays { dates } => {
                let mut finances = ctx.storage.load_user(ctx.user_id)?;
                if !dates.is_empty() {
                    let kind = match dates.len() {
                        1 => PaydayKind::Monthly,
                        2 => PaydayKind::Semimonthly,
                        _ => PaydayKind::Custom,
                    };
                    finances.settings.payday_config = PaydayConfig::new(kind, dates);
                    finances.touch();
                    ctx.storage.save_user(&finances)?;
                    info!(user_id = %ctx.user_id, "updated payday configuration");
                }
                let config = &finances.settings.payday_config;
                let days: Vec<String> = config
                    .resolved_dates()
                    .iter()
                    .map(|day| day.to_string())
                    .collect();
                let note = if config.uses_default() { " (default)" } else { "" };
                writeln!(out, "Paydays: {}{note}", days.join(", "))?;
            }
            Command::Import { path } => {
                let mut finances = load_from_path(&path)?;
                finances.user_id = ctx.user_id;
                let reassigned = finances.claim_ownership();
                validate_import(&finances)?;
                finances.touch();
                ctx.storage.save_user(&finances)?;
                info!(
                    user_id = %ctx.user_id,
                    reassigned,
                    path = %path.display(),
                    "imported finance snapshot"
                );
                writeln!(
                    out,
                    "Imported {} templates and {} transactions.",
                    finances.templates.len(),
                    finances.transactions.len()
                )?;
            }
            Command::Export => {
                let finances = ctx.storage.load_user(ctx.user_id)?;
                writeln!(out, "{}", serde_json::to_string_pretty(&finances)?)?;
            }
            Command::HideAmounts { hidden } => {
                ctx.config = ctx.config_manager.update(|cfg| cfg.hide_amounts = hidden)?;
                let state = if hidden { "hidden" } else { "shown" };
                writeln!(out, "Amounts are now {state}.")?;
            }
            standalone @ (Command::Version | Command::Help) => standalone.write_standalone(out)?,
        }
        Ok(())
    }

    /// Output of [`Command::Version`] and [`Command::Help`]; other commands print nothing.
    pub fn write_standalone(&self, out: &mut dyn Write) -> Result<(), CliError> {
        match self {
            Command::Version => writeln!(out, "{}", build_info::current())?,
            Command::Help => writeln!(out, "{USAGE}")?,
            _ => {}
        }
        Ok(())
    }
}

fn validate_import(finances: &lifeplan_domain::UserFinances) -> Result<(), CoreError> {
    for tpl in &finances.templates {
        tpl.validate()
            .map_err(|reason| CoreError::Validation(format!("template {}: {reason}", tpl.id)))?;
    }
    for txn in &finances.transactions {
        txn.validate()
            .map_err(|reason| CoreError::Validation(format!("transaction {}: {reason}", txn.id)))?;
    }
    Ok(())
}

fn usage(message: &str) -> CliError {
    CliError::Usage(format!("{message}\n{USAGE}"))
}

fn optional_date(rest: &[String]) -> Result<Option<NaiveDate>, CliError> {
    match rest {
        [] => Ok(None),
        [value] => parse_date(value).map(Some),
        _ => Err(usage("expected at most one date")),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidDate(value.to_string()))
}

pub fn parse_month(value: &str) -> Result<(i32, u32), CliError> {
    let invalid = || CliError::InvalidMonth(value.to_string());
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    month_bounds(year, month).ok_or_else(invalid)?;
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_dated_commands() {
        assert_eq!(
            Command::parse(&args(&["period", "2024-01-20"])).unwrap(),
            Command::Period {
                date: Some(date(2024, 1, 20))
            }
        );
        assert_eq!(
            Command::parse(&args(&["range", "2024-01-01", "2024-01-31"])).unwrap(),
            Command::Range {
                start: date(2024, 1, 1),
                end: date(2024, 1, 31)
            }
        );
        assert_eq!(
            Command::parse(&args(&["month", "2024-02"])).unwrap(),
            Command::Month {
                year: Some(2024),
                month: Some(2)
            }
        );
        assert_eq!(Command::parse(&[]).unwrap(), Command::Help);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            Command::parse(&args(&["period", "20-01-2024"])),
            Err(CliError::InvalidDate(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["month", "2024-13"])),
            Err(CliError::InvalidMonth(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["paydays", "0"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["hide-amounts", "maybe"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            Command::parse(&args(&["frobnicate"])),
            Err(CliError::Usage(_))
        ));
    }
}
