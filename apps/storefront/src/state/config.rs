//! # Cart Configuration
//!
//! Settings the cart store reads once at mount time.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GOMARKET_STORAGE_KEY=@GoMarketPlace:products                       │
//! │     GOMARKET_DB_PATH=/data/cart.db                                     │
//! │     GOMARKET_ON_CORRUPT=reset | propagate                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/gomarket-storefront/cart.toml (Linux)                    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! storage_key = "@GoMarketPlace:products"
//! database_path = "/data/cart.db"
//! on_corrupt_state = "reset"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult};
use gomarket_core::DEFAULT_STORAGE_KEY;

// =============================================================================
// Corrupt State Policy
// =============================================================================

/// What loading does when the stored cart can't be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptStatePolicy {
    /// Log a warning and start from an empty cart.
    #[default]
    Reset,

    /// Fail the load with `CoreError::CorruptState`.
    Propagate,
}

impl std::fmt::Display for CorruptStatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptStatePolicy::Reset => write!(f, "reset"),
            CorruptStatePolicy::Propagate => write!(f, "propagate"),
        }
    }
}

impl std::str::FromStr for CorruptStatePolicy {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reset" => Ok(CorruptStatePolicy::Reset),
            "propagate" | "error" => Ok(CorruptStatePolicy::Propagate),
            other => Err(CartError::InvalidConfig(format!(
                "Unknown corrupt state policy: '{}'. Valid options: reset, propagate",
                other
            ))),
        }
    }
}

// =============================================================================
// Cart Configuration
// =============================================================================

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Durable storage key holding the whole cart.
    pub storage_key: String,

    /// SQLite file for the cart. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Behavior when the stored cart is corrupt.
    pub on_corrupt_state: CorruptStatePolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            database_path: None,
            on_corrupt_state: CorruptStatePolicy::default(),
        }
    }
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        Self::load_with(
            config_path.or_else(Self::default_config_path),
            |name| std::env::var(name).ok(),
        )
    }

    /// Loads from exactly `config_path` (no platform default) with overrides
    /// read through `lookup` instead of the process environment.
    pub fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(CartError::InvalidConfig(
                "storage_key must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `GOMARKET_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GOMARKET_STORAGE_KEY") {
            debug!(key = %key, "Overriding storage key from environment");
            self.storage_key = key;
        }

        if let Some(path) = lookup("GOMARKET_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(policy) = lookup("GOMARKET_ON_CORRUPT") {
            match policy.parse() {
                Ok(parsed) => self.on_corrupt_state = parsed,
                Err(_) => warn!(policy = %policy, "Unknown corrupt state policy in environment"),
            }
        }
    }

    /// Returns the configured database path, or `cart.db` in the platform
    /// data directory (created if missing).
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.gomarket.storefront/cart.db`
    /// - **Linux**: `~/.local/share/storefront/cart.db`
    pub fn database_path_or_default(&self) -> CartResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs().ok_or_else(|| {
            CartError::InvalidConfig("Could not determine app data directory".into())
        })?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("cart.db"))
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "gomarket", "storefront")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "@GoMarketPlace:products");
        assert_eq!(config.on_corrupt_state, CorruptStatePolicy::Reset);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("reset".parse::<CorruptStatePolicy>().unwrap(), CorruptStatePolicy::Reset);
        assert_eq!(
            "PROPAGATE".parse::<CorruptStatePolicy>().unwrap(),
            CorruptStatePolicy::Propagate
        );
        assert!("explode".parse::<CorruptStatePolicy>().is_err());
        assert_eq!(CorruptStatePolicy::Propagate.to_string(), "propagate");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(
            &path,
            "storage_key = \"@Test:cart\"\non_corrupt_state = \"propagate\"\n",
        )
        .unwrap();

        let config = CartConfig::load_with(Some(path), no_env).unwrap();
        assert_eq!(config.storage_key, "@Test:cart");
        assert_eq!(config.on_corrupt_state, CorruptStatePolicy::Propagate);
        // Unset keys fall back to defaults
        assert_eq!(config.database_path, None);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "on_corrupt_state = \"sometimes\"\n").unwrap();

        assert!(matches!(
            CartConfig::load_with(Some(path.clone()), no_env),
            Err(CartError::ConfigLoadFailed(_))
        ));
        assert_eq!(CartConfig::load_or_default(Some(path)).storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_environment_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "storage_key = \"@File:cart\"\n").unwrap();

        let config = CartConfig::load_with(Some(path), |name| {
            (name == "GOMARKET_STORAGE_KEY").then(|| "@Env:cart".to_string())
        })
        .unwrap();

        assert_eq!(config.storage_key, "@Env:cart");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = CartConfig::load_with(None, no_env).unwrap();
        assert_eq!(config, CartConfig::default());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GOMARKET_STORAGE_KEY", "@Other:cart"),
            ("GOMARKET_DB_PATH", "/tmp/other.db"),
            ("GOMARKET_ON_CORRUPT", "propagate"),
        ]);

        let mut config = CartConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage_key, "@Other:cart");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/other.db")));
        assert_eq!(config.on_corrupt_state, CorruptStatePolicy::Propagate);
    }

    #[test]
    fn test_unknown_policy_override_is_ignored() {
        let mut config = CartConfig::default();
        config.apply_overrides(|name| (name == "GOMARKET_ON_CORRUPT").then(|| "maybe".to_string()));

        assert_eq!(config.on_corrupt_state, CorruptStatePolicy::Reset);
    }

    #[test]
    fn test_empty_storage_key_is_invalid() {
        let config = CartConfig {
            storage_key: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CartError::InvalidConfig(_))));
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let config = CartConfig {
            database_path: Some(PathBuf::from("/tmp/explicit.db")),
            ..Default::default()
        };
        assert_eq!(
            config.database_path_or_default().unwrap(),
            PathBuf::from("/tmp/explicit.db")
        );
    }
}
