//! Process configuration (spec.md §6: "Process flags: storage access URL,
//! storage JWT secret, controller worker count, default cluster version").
//!
//! Flag parsing itself is a Non-goal (spec.md §1), so this reads
//! `NEUTREE_*` environment variables directly rather than through a CLI
//! framework — the struct is still part of the ambient stack and is
//! unit-tested like the rest of it.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the PostgREST-style storage access façade.
    pub store_base_url: String,
    /// Shared secret used to sign the service-role JWT (spec.md §6).
    pub store_jwt_secret: String,
    /// Worker pool size per resource kind (spec.md §4.1: "typically 5").
    pub worker_count: usize,
    /// Resync sweep interval (spec.md §6: "Resync interval 10 seconds").
    pub resync_interval: Duration,
    /// Default `spec.version` for clusters created without one specified.
    /// Carried for parity with spec.md's flag list; consumed by the create
    /// path of the storage façade's API surface, which is out of scope here.
    pub default_cluster_version: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),
}

const DEFAULT_WORKER_COUNT: usize = 5;
const DEFAULT_RESYNC_SECS: u64 = 10;
const DEFAULT_CLUSTER_VERSION: &str = "latest";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let store_base_url = required_var("NEUTREE_STORE_BASE_URL")?;
        let store_jwt_secret = required_var("NEUTREE_STORE_JWT_SECRET")?;

        let worker_count = match std::env::var("NEUTREE_WORKER_COUNT") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("NEUTREE_WORKER_COUNT", raw))?,
            Err(_) => DEFAULT_WORKER_COUNT,
        };

        let resync_interval = match std::env::var("NEUTREE_RESYNC_INTERVAL_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|_| ConfigError::Invalid("NEUTREE_RESYNC_INTERVAL_SECS", raw))?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_RESYNC_SECS),
        };

        let default_cluster_version = std::env::var("NEUTREE_DEFAULT_CLUSTER_VERSION")
            .unwrap_or_else(|_| DEFAULT_CLUSTER_VERSION.to_string());

        Ok(Self {
            store_base_url,
            store_jwt_secret,
            worker_count,
            resync_interval,
            default_cluster_version,
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize the tests that
    // touch them so they don't race each other's set_var/remove_var calls.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_vars() {
        for var in [
            "NEUTREE_STORE_BASE_URL",
            "NEUTREE_STORE_JWT_SECRET",
            "NEUTREE_WORKER_COUNT",
            "NEUTREE_RESYNC_INTERVAL_SECS",
            "NEUTREE_DEFAULT_CLUSTER_VERSION",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn missing_required_var_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("NEUTREE_STORE_BASE_URL")));
    }

    #[test]
    fn applies_defaults_for_optional_vars() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        std::env::set_var("NEUTREE_STORE_BASE_URL", "https://store.internal");
        std::env::set_var("NEUTREE_STORE_JWT_SECRET", "s3cr3t");
        let config = Config::from_env().unwrap();
        assert_eq!(config.worker_count, DEFAULT_WORKER_COUNT);
        assert_eq!(config.resync_interval, Duration::from_secs(DEFAULT_RESYNC_SECS));
        assert_eq!(config.default_cluster_version, DEFAULT_CLUSTER_VERSION);
        clear_vars();
    }

    #[test]
    fn rejects_unparseable_worker_count() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();
        std::env::set_var("NEUTREE_STORE_BASE_URL", "https://store.internal");
        std::env::set_var("NEUTREE_STORE_JWT_SECRET", "s3cr3t");
        std::env::set_var("NEUTREE_WORKER_COUNT", "not-a-number");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("NEUTREE_WORKER_COUNT", _)));
        clear_vars();
    }
}
