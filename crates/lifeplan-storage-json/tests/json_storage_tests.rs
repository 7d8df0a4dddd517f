use chrono::NaiveDate;
use lifeplan_core::{storage::FinanceStore, CoreError, TemplateService};
use lifeplan_domain::{
    EntryKind, Frequency, PaydayConfig, PaydayKind, RecurringTemplate, Transaction, UserFinances,
};
use lifeplan_storage_json::{load_from_path, JsonFinanceStorage};
use std::fs;
use tempfile::tempdir;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_finances(user: Uuid) -> UserFinances {
    let mut finances = UserFinances::new(user);
    finances.settings.payday_config = PaydayConfig::new(PaydayKind::Custom, vec![5, 20]);
    finances.templates.push(
        RecurringTemplate::new(
            user,
            EntryKind::Expense,
            950.0,
            "Rent",
            date(2024, 1, 1),
            Frequency::Monthly,
        )
        .with_day_of_month(1)
        .with_name("Apartment"),
    );
    finances.transactions.push(
        Transaction::new(user, EntryKind::Expense, 42.5, "Groceries", date(2024, 1, 9))
            .with_description("Weekly shop"),
    );
    finances
}

#[test]
fn json_storage_can_save_and_load_snapshot() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(dir.path().to_path_buf()).expect("create storage");
    let user = Uuid::new_v4();
    let finances = sample_finances(user);

    storage.save_user(&finances).expect("save snapshot");
    let loaded = storage.load_user(user).expect("load snapshot");

    assert_eq!(loaded, finances);
    let path = storage.user_path(user);
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert_eq!(storage.list_users().expect("list users"), vec![user]);
}

#[test]
fn unknown_user_loads_empty_snapshot() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(dir.path().to_path_buf()).expect("create storage");
    let user = Uuid::new_v4();

    let finances = storage.load_user(user).expect("load");
    assert_eq!(finances.user_id, user);
    assert!(finances.templates.is_empty());
    assert!(finances.transactions.is_empty());
    assert!(matches!(
        storage.delete_user(user),
        Err(CoreError::UserNotFound(id)) if id == user
    ));
}

#[test]
fn wire_format_uses_camel_case_and_type_tags() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(dir.path().to_path_buf()).expect("create storage");
    let user = Uuid::new_v4();
    storage.save_user(&sample_finances(user)).expect("save");

    let raw = fs::read_to_string(storage.user_path(user)).expect("read file");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let template = &json["templates"][0];
    assert_eq!(template["type"], "expense");
    assert_eq!(template["frequency"], "monthly");
    assert_eq!(template["dayOfMonth"], 1);
    assert_eq!(template["startDate"], "2024-01-01");
    assert_eq!(json["settings"]["paydayConfig"]["dates"], serde_json::json!([5, 20]));
}

#[test]
fn unknown_frequency_in_stored_data_still_loads() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(dir.path().to_path_buf()).expect("create storage");
    let user = Uuid::new_v4();
    let tpl_id = Uuid::new_v4();
    let raw = format!(
        r#"{{
            "userId": "{user}",
            "templates": [{{
                "id": "{tpl_id}",
                "userId": "{user}",
                "type": "income",
                "amount": 10.0,
                "category": "Side gig",
                "startDate": "2024-01-01",
                "frequency": "quarterly"
            }}]
        }}"#
    );
    fs::write(storage.user_path(user), raw).expect("write raw snapshot");

    let loaded = storage.load_user(user).expect("load");
    assert_eq!(loaded.templates[0].frequency, Frequency::Unrecognized);
    assert_eq!(loaded.settings.payday_config.resolved_dates(), vec![15, 30]);
}

#[test]
fn malformed_payday_settings_and_frequency_still_load() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(dir.path().to_path_buf()).expect("create storage");
    let user = Uuid::new_v4();
    let tpl_id = Uuid::new_v4();
    let raw = format!(
        r#"{{
            "userId": "{user}",
            "templates": [{{
                "id": "{tpl_id}",
                "userId": "{user}",
                "type": "expense",
                "amount": 12.0,
                "category": "Gym",
                "startDate": "2024-01-01",
                "frequency": 7
            }}],
            "settings": {{ "paydayConfig": {{ "type": 2, "dates": [-1, 40] }} }}
        }}"#
    );
    fs::write(storage.user_path(user), raw).expect("write raw snapshot");

    let loaded = storage.load_user(user).expect("load");
    assert_eq!(loaded.templates[0].frequency, Frequency::Unrecognized);
    assert_eq!(loaded.settings.payday_config.kind, PaydayKind::Unspecified);
    assert_eq!(loaded.settings.payday_config.resolved_dates(), vec![15, 30]);
}

#[test]
fn overwriting_snapshot_keeps_pruned_backups() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonFinanceStorage::with_retention(dir.path().to_path_buf(), 3).expect("create storage");
    let user = Uuid::new_v4();
    let mut finances = sample_finances(user);

    for amount in 1..=6 {
        finances.transactions.push(Transaction::new(
            user,
            EntryKind::Income,
            f64::from(amount),
            "Tips",
            date(2024, 2, amount),
        ));
        storage.save_user(&finances).expect("save");
    }

    let backups = storage.list_backups(user).expect("list backups");
    assert_eq!(backups.len(), storage.retention());
    // The newest backup is the state before the last save.
    let newest = load_from_path(&backups[0].path).expect("read backup");
    assert_eq!(newest.transactions.len(), finances.transactions.len() - 1);
}

#[test]
fn json_storage_creates_and_restores_backups() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(dir.path().to_path_buf()).expect("create storage");
    let user = Uuid::new_v4();
    let finances = sample_finances(user);
    storage.save_user(&finances).expect("save snapshot");

    let info = storage
        .backup_user(user, Some("before cleanup"))
        .expect("create backup");
    assert!(info.id.ends_with("_before-cleanup.json"));
    let backups = storage.list_backups(user).expect("list backups");
    assert!(
        backups.iter().any(|entry| entry.id == info.id),
        "backup list should include created backup"
    );

    let template_id = finances.templates[0].id;
    TemplateService::delete(&storage, user, template_id).expect("delete template");
    assert!(storage.load_user(user).expect("load").templates.is_empty());

    let restored = storage.restore_backup(&info).expect("restore backup");
    assert_eq!(restored.templates.len(), 1);
    assert_eq!(storage.load_user(user).expect("reload"), finances);
}

#[test]
fn snapshot_under_wrong_file_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFinanceStorage::new(dir.path().to_path_buf()).expect("create storage");
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    storage.save_user(&sample_finances(owner)).expect("save");
    fs::copy(storage.user_path(owner), storage.user_path(other)).expect("copy snapshot");

    assert!(matches!(storage.load_user(other), Err(CoreError::Storage(_))));
}
