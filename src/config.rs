use std::collections::HashSet;
use std::time::Duration;

use tracing::trace;

use crate::Target;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Endpoints to monitor (must be non-empty with unique ids)
    pub targets: Vec<Target>,

    /// Seconds between cycle starts
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Hard bound on a single probe attempt
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject configurations the engine cannot run with.
    ///
    /// An empty registry or a zero timeout is a startup error, not something
    /// to paper over at scan time.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.targets.is_empty() {
            anyhow::bail!("target registry must not be empty");
        }

        if self.timeout_ms == 0 {
            anyhow::bail!("probe timeout must be greater than zero");
        }

        if self.interval_secs == 0 {
            anyhow::bail!("scan interval must be greater than zero");
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.id.is_empty() {
                anyhow::bail!("target id must not be empty");
            }
            if !seen.insert(target.id.as_str()) {
                anyhow::bail!("duplicate target id: {}", target.id);
            }
        }

        Ok(())
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))?;
    config.validate()?;
    trace!("loaded config: {config:?}");
    Ok(config)
}
