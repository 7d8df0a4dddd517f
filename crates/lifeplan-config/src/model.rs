use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// User preferences shared by the Lifeplan front ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub currency: String,
    /// Masks every amount in rendered output. Computations are unaffected.
    #[serde(default)]
    pub hide_amounts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for finance snapshots. Defaults to `<base>/data`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            hide_amounts: false,
            user_id: None,
            data_root: None,
        }
    }
}

impl Config {
    /// Data directory for finance snapshots, relative to the config base directory
    /// unless overridden.
    pub fn resolve_data_root(&self, base: &std::path::Path) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    /// Returns the configured user, generating one when absent.
    ///
    /// The second value is `true` when a new id was assigned and the config
    /// should be saved.
    pub fn ensure_user_id(&mut self) -> (Uuid, bool) {
        match self.user_id {
            Some(id) => (id, false),
            None => {
                let id = Uuid::new_v4();
                self.user_id = Some(id);
                (id, true)
            }
        }
    }
}
