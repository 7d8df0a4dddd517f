#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use lifeplan::cli::CliContext;
use lifeplan_core::time::FixedClock;
use lifeplan_domain::{
    EntryKind, Frequency, PaydayConfig, PaydayKind, RecurringTemplate, Transaction, UserFinances,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh base directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Builds an isolated CLI context pinned to `today`.
pub fn setup_test_env(today: NaiveDate) -> CliContext {
    CliContext::from_base_dir(temp_home(), Box::new(FixedClock(today))).expect("create cli context")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A household with semimonthly pay, rent, a daily coffee and two recorded expenses.
pub fn sample_finances(user_id: Uuid) -> UserFinances {
    let mut finances = UserFinances::new(user_id);
    finances.settings.payday_config = PaydayConfig::new(PaydayKind::Semimonthly, vec![15, 30]);
    finances.templates = vec![
        RecurringTemplate::new(
            user_id,
            EntryKind::Income,
            1500.0,
            "Salary",
            date(2024, 1, 1),
            Frequency::SemimonthlyFifteenthEndOfMonth,
        ),
        RecurringTemplate::new(
            user_id,
            EntryKind::Expense,
            900.0,
            "Housing",
            date(2024, 1, 1),
            Frequency::Monthly,
        )
        .with_day_of_month(1)
        .with_name("Rent"),
        RecurringTemplate::new(
            user_id,
            EntryKind::Expense,
            4.0,
            "Coffee",
            date(2024, 1, 1),
            Frequency::Daily,
        ),
    ];
    finances.transactions = vec![
        Transaction::new(user_id, EntryKind::Expense, 40.0, "Groceries", date(2024, 1, 16)),
        Transaction::new(user_id, EntryKind::Expense, 25.0, "Dining", date(2024, 1, 25)),
    ];
    finances
}
