// Runtime configuration.
// Global CLI flags with environment fallbacks, resolved into a Config.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::cache::{LocalStore, paths};
use crate::error::{BuddyError, Result};
use crate::tte::TTE_BASE_URL;

const API_KEY_KIND: &str = "apikey";
const API_KEY_ID: &str = "client";

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// tabletop.events API key (stored for later runs once given)
    #[arg(long, env = "TTE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "TTE_BASE_URL", default_value = TTE_BASE_URL, global = true)]
    pub base_url: String,

    /// Cache directory (defaults to the platform cache dir)
    #[arg(long, env = "CONBUDDY_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: Option<String>,
    pub cache_dir: PathBuf,
    pub timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let cache_dir = match &args.cache_dir {
            Some(dir) => dir.clone(),
            None => paths::default_cache_dir().ok_or_else(|| {
                BuddyError::Other("could not locate a cache directory".to_string())
            })?,
        };

        let log_level = if args.verbose {
            "debug".to_string()
        } else {
            args.log_level.clone()
        };

        Ok(Self {
            base_url: args.base_url.trim_end_matches('/').to_string(),
            api_key: args.api_key.clone().filter(|k| !k.trim().is_empty()),
            cache_dir,
            timeout: Duration::from_secs(args.timeout_secs),
            log_level,
        })
    }

    pub fn store(&self) -> LocalStore {
        LocalStore::new(&self.cache_dir)
    }
}

/// Use the given API key (and remember it), or fall back to the stored one.
pub fn resolve_api_key(store: &LocalStore, provided: Option<&str>) -> Result<String> {
    if let Some(key) = provided {
        let key = key.trim();
        if let Err(e) = store.store_text(API_KEY_ID, API_KEY_KIND, key) {
            tracing::warn!(error = %e, "failed to store api key");
        }
        return Ok(key.to_string());
    }

    match store.read_text(API_KEY_ID, API_KEY_KIND)? {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(BuddyError::MissingApiKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args() -> GlobalArgs {
        GlobalArgs {
            api_key: None,
            base_url: "https://tabletop.events/".to_string(),
            cache_dir: Some(PathBuf::from("/tmp/conbuddy-test")),
            timeout_secs: 10,
            log_level: "warn".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn test_config_from_args() {
        let config = Config::from_args(&args()).unwrap();
        assert_eq!(config.base_url, "https://tabletop.events");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/conbuddy-test"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.log_level, "warn");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_verbose_overrides_level() {
        let mut a = args();
        a.verbose = true;
        a.api_key = Some("  ".to_string());
        let config = Config::from_args(&a).unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_api_key_is_remembered() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        assert!(matches!(
            resolve_api_key(&store, None),
            Err(BuddyError::MissingApiKey)
        ));
        assert_eq!(resolve_api_key(&store, Some("KEY-9")).unwrap(), "KEY-9");
        assert_eq!(resolve_api_key(&store, None).unwrap(), "KEY-9");
        assert!(temp_dir.path().join("apikey/client.txt").exists());
    }
}
