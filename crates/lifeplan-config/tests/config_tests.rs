use lifeplan_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.hide_amounts);
    assert!(cfg.user_id.is_none());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.currency = "EUR".to_string();
    cfg.hide_amounts = true;
    let (user_id, generated) = cfg.ensure_user_id();
    assert!(generated);

    manager.save(&cfg).expect("save config");
    let mut loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "EUR");
    assert!(loaded.hide_amounts);
    assert_eq!(loaded.ensure_user_id(), (user_id, false));
}

#[test]
fn update_applies_and_saves() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    manager
        .update(|cfg| cfg.hide_amounts = true)
        .expect("update config");
    assert!(manager.load().expect("load").hide_amounts);
}

#[test]
fn unknown_keys_are_ignored() {
    let cfg: Config = serde_json::from_str(
        r#"{"locale":"en-US","currency":"USD","weekStartsOn":"friday"}"#,
    )
    .expect("parse config");
    assert_eq!(cfg.currency, "USD");
    assert!(!cfg.hide_amounts);
    assert!(cfg.user_id.is_none());
}

#[test]
fn backups_restore_previous_values() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let original = Config::default();
    manager.save(&original).expect("save");
    let name = manager
        .backup(&original, Some("before change"))
        .expect("backup");
    assert!(name.ends_with("_before-change.json"));

    manager
        .update(|cfg| cfg.currency = "GBP".into())
        .expect("update");
    assert_eq!(manager.list_backups().expect("list"), vec![name.clone()]);

    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.currency, "USD");
    assert_eq!(manager.load().expect("reload").currency, "USD");

    let missing = manager.restore("config_19990101_0000.json");
    assert!(matches!(missing, Err(ConfigError::BackupNotFound(_))));
}
