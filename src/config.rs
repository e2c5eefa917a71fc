//! Configuration management for flatdet

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::resample::ResampleOptions;

/// Kernel execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampleConfig {
    /// Worker threads for the global pool (0 = rayon default)
    #[serde(default)]
    pub threads: usize,

    /// Split output rows across workers
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Run sequentially below this many output rows
    #[serde(default = "default_min_parallel_rows")]
    pub min_parallel_rows: usize,
}

fn default_parallel() -> bool {
    true
}

fn default_min_parallel_rows() -> usize {
    64
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            parallel: true,
            min_parallel_rows: 64,
        }
    }
}

impl ResampleConfig {
    pub fn to_options(&self) -> ResampleOptions {
        ResampleOptions {
            parallel: self.parallel,
            min_parallel_rows: self.min_parallel_rows,
        }
    }

    /// Size the global rayon pool. Must run once, before any parallel work.
    pub fn install_global_pool(&self) -> Result<()> {
        if self.threads == 0 {
            return Ok(());
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build_global()
            .with_context(|| format!("Failed to start {} worker threads", self.threads))?;
        tracing::info!("Using {} worker threads", self.threads);
        Ok(())
    }
}

/// Input/output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IoConfig {
    /// Write a JSON run report next to the output volume
    #[serde(default)]
    pub write_report: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub resample: ResampleConfig,

    #[serde(default)]
    pub io: IoConfig,
}

impl Config {
    /// Load configuration from a file, or create default if it doesn't exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            tracing::info!("Created default configuration at {:?}", path);
            Ok(config)
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory {:?}", parent))?;
            }
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ResampleConfig::default().to_options();
        assert!(options.parallel);
        assert_eq!(options.min_parallel_rows, 64);
    }

    #[test]
    fn test_options_mapping() {
        let cfg = ResampleConfig {
            threads: 4,
            parallel: false,
            min_parallel_rows: 8,
        };
        assert_eq!(
            cfg.to_options(),
            ResampleOptions {
                parallel: false,
                min_parallel_rows: 8
            }
        );
    }

    #[test]
    fn test_default_threads_leave_global_pool_alone() {
        assert!(ResampleConfig::default().install_global_pool().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[resample]\nthreads = 2\n").unwrap();
        assert_eq!(config.resample.threads, 2);
        assert!(config.resample.parallel);
        assert_eq!(config.resample.min_parallel_rows, 64);
        assert!(!config.io.write_report);
    }

    #[test]
    fn test_load_or_create_round_trip() {
        let dir = std::env::temp_dir().join(format!("flatdet-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_file(&path);

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.resample.threads, 0);

        let mut changed = created.clone();
        changed.resample.parallel = false;
        changed.io.write_report = true;
        changed.save(&path).unwrap();

        let loaded = Config::load_or_create(&path).unwrap();
        assert!(!loaded.resample.parallel);
        assert!(loaded.io.write_report);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
