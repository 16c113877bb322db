//! Planner settings.
//!
//! Sources are layered, later ones winning: built-in defaults, the user file
//! `<config dir>/cram/config.toml`, an explicit `--config` file, and finally
//! `CRAM_*` environment variables (e.g. `CRAM_DATABASE_PATH`).

use std::fmt;
use std::path::{Path, PathBuf};

use cram_core::ActivityType;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "CRAM_";
const DATABASE_FILE: &str = "cram.db";

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file holding the activities.
    pub database_path: PathBuf,

    /// Type for `cram add` when `--type` is omitted.
    pub default_type: ActivityType,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path.display())
            .field("default_type", &self.default_type.as_str())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let store_dir = planner_data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: store_dir.join(DATABASE_FILE),
            default_type: ActivityType::default(),
        }
    }
}

impl Config {
    /// Resolves settings from every layer, with `explicit` as the `--config` file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only surfaces once at startup"
    )]
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, figment::Error> {
        let user_file = planner_config_dir().map(|dir| dir.join("config.toml"));

        [user_file.as_deref(), explicit]
            .into_iter()
            .flatten()
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, file| figment.merge(Toml::file(file)),
            )
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }
}

fn planner_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cram"))
}

/// Where the planner keeps its data, e.g. `~/.local/share/cram` on Linux.
pub fn planner_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("cram"))
}
