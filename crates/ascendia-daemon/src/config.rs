//! Configuration file management.
//!
//! `$ASCENDIA_DATA_DIR/config.toml` (TOML) with environment overrides applied
//! on top. Missing file or sections fall back to defaults.

use std::path::PathBuf;

use anyhow::Context;
use ascendia_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
}

/// IPC server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket file name inside the data directory.
    #[serde(default = "default_socket_name")]
    pub socket_name: String,
}

/// Progression and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Successful days per level. Must be positive.
    #[serde(default = "default_level_up_every_days")]
    pub level_up_every_days: u32,
    /// Missions per day, clamped to 3..=5 by the generator.
    #[serde(default = "default_missions_per_day")]
    pub missions_per_day: usize,
}

/// Periodic reconciliation sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Shared secret for admin RPC methods. Unset disables them.
    #[serde(default)]
    pub admin_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_socket_name() -> String {
    "ascendia.sock".to_string()
}

fn default_level_up_every_days() -> u32 {
    ascendia_types::DEFAULT_LEVEL_UP_EVERY_DAYS
}

fn default_missions_per_day() -> usize {
    ascendia_engine::generator::DEFAULT_MISSION_COUNT
}

fn default_true() -> bool {
    true
}

fn default_interval_minutes() -> u64 {
    60
}

fn default_page_size() -> u64 {
    ascendia_engine::sweep::DEFAULT_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket_name: default_socket_name(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            level_up_every_days: default_level_up_every_days(),
            missions_per_day: default_missions_per_day(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_interval_minutes(),
            page_size: default_page_size(),
            admin_secret: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from the default config file location, then apply
    /// environment overrides.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `LEVEL_UP_EVERY_DAYS` and `ASCENDIA_ADMIN_SECRET`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(raw) = lookup("LEVEL_UP_EVERY_DAYS") {
            self.engine.level_up_every_days = raw
                .trim()
                .parse()
                .with_context(|| format!("LEVEL_UP_EVERY_DAYS is not an integer: {raw:?}"))?;
        }
        if let Some(secret) = lookup("ASCENDIA_ADMIN_SECRET") {
            if !secret.is_empty() {
                self.sweep.admin_secret = Some(secret);
            }
        }
        Ok(())
    }

    /// Immutable engine settings derived once at startup.
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let base = EngineConfig::with_level_up_every_days(self.engine.level_up_every_days)?;
        Ok(EngineConfig {
            missions_per_day: self.engine.missions_per_day,
            sweep_page_size: self.sweep.page_size.max(1),
            ..base
        })
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    pub fn socket_path(&self) -> PathBuf {
        self.data_dir().join(&self.server.socket_name)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join("ascendia.db")
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("ASCENDIA_DATA_DIR") {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Ascendia")
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs_fallback(".ascendia")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/ascendia"))
}
