use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_admin_port() -> u16 {
    8090
}

fn default_data_file() -> PathBuf {
    PathBuf::from("ledger-data.json")
}

/// Runtime settings for the allocation engine, layered from an optional
/// TOML file and `LEDGER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,

    /// Snapshot file the engine loads at startup and saves after every
    /// mutating operation.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default)]
    pub payout: PayoutSettings,
}

/// Pacing knobs for payout batches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayoutSettings {
    /// Maximum allocations settled per batch run; unset means unbounded.
    /// Deferred items are picked up by the next run, which re-derives
    /// eligibility from the transaction history.
    #[serde(default)]
    pub max_batch_size: Option<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            admin_port: default_admin_port(),
            data_file: default_data_file(),
            payout: PayoutSettings::default(),
        }
    }
}

impl EngineSettings {
    /// Loads settings from the given file (or `./ledger.toml` when present)
    /// with `LEDGER_*` environment variables layered on top, e.g.
    /// `LEDGER_ADMIN_PORT=9000`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        builder = match path {
            Some(p) => builder.add_source(File::from(p.to_path_buf())),
            None => builder.add_source(File::with_name("ledger").required(false)),
        };
        builder
            .add_source(Environment::with_prefix("LEDGER").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_a_file() {
        let settings = EngineSettings::load(None).unwrap();
        assert_eq!(settings.admin_port, 8090);
        assert_eq!(settings.data_file, PathBuf::from("ledger-data.json"));
        assert!(settings.payout.max_batch_size.is_none());
    }
}
