use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Every field has a default, so `Config::default()` is always valid and the
/// library works with no configuration file on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Cache sizing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Capacity of the (person, filter, flag) -> edges neighbor cache.
    #[serde(default = "default_neighbor_capacity")]
    pub neighbor_capacity: usize,
    /// Capacity of the person -> relationships record cache.
    #[serde(default = "default_relationship_capacity")]
    pub relationship_capacity: usize,
}

/// Search limit configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Hard ceiling applied to any requested max_distance. Searches beyond
    /// this are effectively unbounded and never finish on dense graphs.
    #[serde(default = "default_max_distance_ceiling")]
    pub max_distance_ceiling: u32,
    /// Wall-clock ceiling per shortest-path search, in seconds. Exceeding it
    /// is treated as probable disconnection.
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u64,
    /// Node budget for the connectivity pre-check that runs before the
    /// weighted search.
    #[serde(default = "default_precheck_node_budget")]
    pub precheck_node_budget: usize,
}

fn default_neighbor_capacity() -> usize {
    100_000
}

fn default_relationship_capacity() -> usize {
    100_000
}

fn default_max_distance_ceiling() -> u32 {
    100
}

fn default_time_limit_secs() -> u64 {
    120
}

fn default_precheck_node_budget() -> usize {
    50
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            neighbor_capacity: default_neighbor_capacity(),
            relationship_capacity: default_relationship_capacity(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_distance_ceiling: default_max_distance_ceiling(),
            time_limit_secs: default_time_limit_secs(),
            precheck_node_budget: default_precheck_node_budget(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration, falling back to defaults when no file is present.
    ///
    /// Looks for a config file in this order:
    /// 1. Path specified in KINPATH_CONFIG environment variable
    /// 2. ./kinpath.toml in current directory
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("KINPATH_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }
        let default_path = Path::new("kinpath.toml");
        if default_path.exists() {
            return Self::from_file(default_path);
        }
        Ok(Self::default())
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.cache.neighbor_capacity == 0 {
            anyhow::bail!("cache.neighbor_capacity must be greater than 0");
        }

        if self.cache.relationship_capacity == 0 {
            anyhow::bail!("cache.relationship_capacity must be greater than 0");
        }

        if self.search.max_distance_ceiling == 0 {
            anyhow::bail!("search.max_distance_ceiling must be greater than 0");
        }

        if self.search.time_limit_secs == 0 {
            anyhow::bail!("search.time_limit_secs must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.max_distance_ceiling, 100);
        assert_eq!(config.search.time_limit_secs, 120);
        assert_eq!(config.search.precheck_node_budget, 50);
    }

    #[test]
    fn test_from_file_full() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("kinpath.toml");
        fs::write(
            &config_path,
            r#"
[cache]
neighbor_capacity = 512
relationship_capacity = 256

[search]
max_distance_ceiling = 40
time_limit_secs = 10
precheck_node_budget = 25
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.cache.neighbor_capacity, 512);
        assert_eq!(config.cache.relationship_capacity, 256);
        assert_eq!(config.search.max_distance_ceiling, 40);
        assert_eq!(config.search.time_limit_secs, 10);
        assert_eq!(config.search.precheck_node_budget, 25);
    }

    #[test]
    fn test_from_file_partial_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("kinpath.toml");
        fs::write(&config_path, "[search]\ntime_limit_secs = 5\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.search.time_limit_secs, 5);
        assert_eq!(config.search.max_distance_ceiling, 100);
        assert_eq!(config.cache.neighbor_capacity, 100_000);
    }

    #[test]
    fn test_from_file_rejects_zero_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("kinpath.toml");
        fs::write(&config_path, "[cache]\nneighbor_capacity = 0\n").unwrap();

        let err = Config::from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("neighbor_capacity"));
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(temp_dir.path().join("nope.toml"));
        assert!(config.is_err());
    }

    #[test]
    fn test_load_honors_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "[search]\nmax_distance_ceiling = 42\n").unwrap();

        let original = std::env::var("KINPATH_CONFIG").ok();
        std::env::set_var("KINPATH_CONFIG", config_path.to_str().unwrap());
        let config = Config::load();
        std::env::remove_var("KINPATH_CONFIG");
        if let Some(val) = original {
            std::env::set_var("KINPATH_CONFIG", val);
        }

        assert_eq!(config.unwrap().search.max_distance_ceiling, 42);
    }
}
