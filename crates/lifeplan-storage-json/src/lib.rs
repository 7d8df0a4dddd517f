use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use lifeplan_core::{
    storage::{snapshot_warnings, FinanceBackupInfo, FinanceStore},
    CoreError,
};
use lifeplan_domain::UserFinances;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence: one snapshot file per user plus rolling backups.
///
/// Layout: `<root>/users/<uuid>.json` and `<root>/backups/<uuid>/<uuid>_<stamp>[_note][.n].json`.
#[derive(Debug, Clone)]
pub struct JsonFinanceStorage {
    users_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonFinanceStorage {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let users_dir = root.join("users");
        let backups_dir = root.join("backups");
        fs::create_dir_all(&users_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            users_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn user_path(&self, user_id: Uuid) -> PathBuf {
        self.users_dir
            .join(format!("{user_id}.{SNAPSHOT_EXTENSION}"))
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Writes a labelled copy of the user's current snapshot.
    pub fn backup_user(
        &self,
        user_id: Uuid,
        note: Option<&str>,
    ) -> Result<FinanceBackupInfo, CoreError> {
        let finances = self.load_user(user_id)?;
        let info = self.next_backup_slot(user_id, note)?;
        write_file(&info.path, &serialize(&finances)?)?;
        self.prune_backups(user_id)?;
        info!(%user_id, backup = %info.id, "created snapshot backup");
        Ok(info)
    }

    /// Backups for `user_id`, newest first.
    pub fn list_backups(&self, user_id: Uuid) -> Result<Vec<FinanceBackupInfo>, CoreError> {
        let dir = self.backup_dir(user_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let created_at = parse_backup_timestamp(user_id, file_name)
                .map(|stamp| stamp.to_rfc3339())
                .unwrap_or_default();
            entries.push(FinanceBackupInfo {
                user_id,
                id: file_name.to_string(),
                created_at,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| {
            Reverse((
                parse_backup_timestamp(user_id, &info.id),
                backup_sequence(&info.id),
            ))
        });
        Ok(entries)
    }

    /// Replaces the user's snapshot with the backup's content.
    pub fn restore_backup(&self, backup: &FinanceBackupInfo) -> Result<UserFinances, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let finances = load_from_path(&backup.path)?;
        if finances.user_id != backup.user_id {
            return Err(CoreError::Storage(format!(
                "backup `{}` holds user {}, expected {}",
                backup.id, finances.user_id, backup.user_id
            )));
        }
        self.save_user(&finances)?;
        info!(user_id = %backup.user_id, backup = %backup.id, "restored snapshot backup");
        Ok(finances)
    }

    fn backup_dir(&self, user_id: Uuid) -> PathBuf {
        self.backups_dir.join(user_id.to_string())
    }

    fn next_backup_slot(
        &self,
        user_id: Uuid,
        note: Option<&str>,
    ) -> Result<FinanceBackupInfo, CoreError> {
        self.backup_slot_at(user_id, note, Utc::now())
    }

    fn backup_slot_at(
        &self,
        user_id: Uuid,
        note: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<FinanceBackupInfo, CoreError> {
        let dir = self.backup_dir(user_id);
        fs::create_dir_all(&dir)?;
        let mut stem = format!("{user_id}_{}", now.format(BACKUP_TIMESTAMP_FORMAT));
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        // Backups taken within the same millisecond get an increasing sequence number.
        let mut taken: Option<u32> = None;
        for entry in fs::read_dir(&dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            let same_stem = name == format!("{stem}.{SNAPSHOT_EXTENSION}")
                || name.starts_with(&format!("{stem}."));
            if same_stem {
                taken = taken.max(Some(backup_sequence(name)));
            }
        }
        let file_name = match taken {
            None => format!("{stem}.{SNAPSHOT_EXTENSION}"),
            Some(last) => format!("{stem}.{}.{SNAPSHOT_EXTENSION}", last + 1),
        };
        Ok(FinanceBackupInfo {
            user_id,
            path: dir.join(&file_name),
            id: file_name,
            created_at: now.to_rfc3339(),
        })
    }

    fn backup_existing_file(&self, user_id: Uuid, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let info = self.next_backup_slot(user_id, None)?;
        fs::copy(path, &info.path)?;
        debug!(%user_id, backup = %info.id, "backed up previous snapshot");
        self.prune_backups(user_id)
    }

    fn prune_backups(&self, user_id: Uuid) -> Result<(), CoreError> {
        for entry in self.list_backups(user_id)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl FinanceStore for JsonFinanceStorage {
    fn load_user(&self, user_id: Uuid) -> Result<UserFinances, CoreError> {
        let path = self.user_path(user_id);
        if !path.exists() {
            debug!(%user_id, "no stored snapshot; starting empty");
            return Ok(UserFinances::new(user_id));
        }
        let finances = load_from_path(&path)?;
        if finances.user_id != user_id {
            return Err(CoreError::Storage(format!(
                "snapshot at {} belongs to user {}",
                path.display(),
                finances.user_id
            )));
        }
        let warnings = snapshot_warnings(&finances);
        if !warnings.is_empty() {
            warn!(%user_id, count = warnings.len(), first = %warnings[0], "snapshot has anomalies");
        }
        Ok(finances)
    }

    fn save_user(&self, finances: &UserFinances) -> Result<(), CoreError> {
        let path = self.user_path(finances.user_id);
        self.backup_existing_file(finances.user_id, &path)?;
        save_to_path(finances, &path)?;
        info!(
            user_id = %finances.user_id,
            templates = finances.templates.len(),
            transactions = finances.transactions.len(),
            "saved finance snapshot"
        );
        Ok(())
    }

    fn delete_user(&self, user_id: Uuid) -> Result<(), CoreError> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Err(CoreError::UserNotFound(user_id));
        }
        self.backup_existing_file(user_id, &path)?;
        fs::remove_file(path)?;
        info!(%user_id, "deleted finance snapshot");
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<Uuid>, CoreError> {
        let mut users = Vec::new();
        for entry in fs::read_dir(&self.users_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION)
            {
                continue;
            }
            match path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(Uuid::parse_str)
            {
                Some(Ok(id)) => users.push(id),
                _ => debug!(path = %path.display(), "skipping non-snapshot file"),
            }
        }
        users.sort();
        Ok(users)
    }
}

/// Saves a snapshot to an arbitrary path on disk, atomically.
pub fn save_to_path(finances: &UserFinances, path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_file(&tmp, &serialize(finances)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a snapshot from the provided filesystem path.
pub fn load_from_path(path: &Path) -> Result<UserFinances, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
        } else if !sanitized.is_empty() && !sanitized.ends_with('-') {
            sanitized.push('-');
        }
    }
    let trimmed = sanitized.trim_end_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Sequence number of `<stem>.<n>.json` backups; plain `<stem>.json` is 0.
fn backup_sequence(name: &str) -> u32 {
    name.strip_suffix(&format!(".{SNAPSHOT_EXTENSION}"))
        .and_then(|stem| stem.rsplit_once('.'))
        .and_then(|(_, seq)| seq.parse().ok())
        .unwrap_or(0)
}

/// Reads `<uuid>_YYYYMMDD_HHMMSSmmm...` backup names.
fn parse_backup_timestamp(user_id: Uuid, name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(&format!("{user_id}_"))?;
    let seconds = NaiveDateTime::parse_from_str(rest.get(..15)?, "%Y%m%d_%H%M%S").ok()?;
    let millis = rest.get(15..18)?;
    if !millis.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let millis: i64 = millis.parse().ok()?;
    Some((seconds + Duration::milliseconds(millis)).and_utc())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize(finances: &UserFinances) -> Result<String, CoreError> {
    serde_json::to_string_pretty(finances).map_err(|err| CoreError::Serde(err.to_string()))
}
