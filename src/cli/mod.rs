pub mod commands;
pub mod output;

use std::{env, io, path::PathBuf};

use tracing::info;
use uuid::Uuid;

use lifeplan_config::{default_base_dir, Config, ConfigManager};
use lifeplan_core::time::{Clock, SystemClock};
use lifeplan_storage_json::JsonFinanceStorage;

use crate::errors::CliError;

pub use commands::Command;

/// Everything a command needs: preferences, the active user and their storage.
pub struct CliContext {
    pub config_manager: ConfigManager,
    pub config: Config,
    pub user_id: Uuid,
    pub storage: JsonFinanceStorage,
    pub clock: Box<dyn Clock>,
}

impl CliContext {
    /// Loads config under `base`, assigning and persisting a user id on first use.
    pub fn from_base_dir(base: PathBuf, clock: Box<dyn Clock>) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        let mut config = config_manager.load()?;
        let (user_id, generated) = config.ensure_user_id();
        if generated {
            config_manager.save(&config)?;
            info!(%user_id, "assigned new user id");
        }
        let data_root = config.resolve_data_root(config_manager.base_dir());
        let storage = JsonFinanceStorage::new(data_root)?;
        Ok(Self {
            config_manager,
            config,
            user_id,
            storage,
            clock,
        })
    }

    pub fn from_env() -> Result<Self, CliError> {
        Self::from_base_dir(default_base_dir(), Box::new(SystemClock))
    }
}

/// Parses process arguments and runs the command against `$LIFEPLAN_HOME`.
pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if command.is_standalone() {
        // Help and version never touch the data directory.
        return command.write_standalone(&mut out);
    }
    let mut ctx = CliContext::from_env()?;
    command.execute(&mut ctx, &mut out)
}
