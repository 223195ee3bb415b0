use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Runtime configuration, sourced from `PORTAL_*` environment variables on
/// top of the defaults below. `.env` files are honored via dotenvy in `main`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Optional directory of JSON roster seed files loaded at startup.
    pub seed_path: Option<PathBuf>,
    /// When both are set and the users table is empty, an admin account is
    /// created at startup.
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
    pub bootstrap_admin_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:portal.sqlite".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            seed_path: None,
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
            bootstrap_admin_name: "Administrator".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("PORTAL_"))
            .extract()
            .expect("FATAL: invalid PORTAL_* environment configuration")
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_env);
