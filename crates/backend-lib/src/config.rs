// ============================
// campus-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use figment::{Figment, providers::{Env, Format, Serialized, Toml}};
use anyhow::{bail, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `CAMPUS_BIND_ADDR`
pub const ENV_PREFIX: &str = "CAMPUS_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Directory holding the collection files
    pub data_dir: PathBuf,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Session TTL in seconds, also the cookie max-age
    pub session_ttl_secs: u64,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Production mode marks the session cookie `Secure`
    pub production: bool,
    /// Where browser clients are sent when they lack a session
    pub login_path: String,
    /// scrypt cost as log2(N); fixed for the lifetime of a deployment
    pub password_cost: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            session_ttl_secs: 60 * 60 * 24, // 24 hours
            cookie_name: "campus.sid".to_string(),
            production: false,
            login_path: "/login".to_string(),
            password_cost: 15,
        }
    }
}

impl Settings {
    /// Load settings from defaults, then the given TOML file (if present),
    /// then `CAMPUS_*` environment variables
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("unknown log level `{}`", self.log_level);
        }
        if self.session_ttl_secs == 0 {
            bail!("session_ttl_secs must be positive");
        }
        if self.cookie_name.trim().is_empty() {
            bail!("cookie_name must not be empty");
        }
        if !(1..=20).contains(&self.password_cost) {
            bail!("password_cost must be within 1..=20, got {}", self.password_cost);
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
