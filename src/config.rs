use clap::Parser;
use once_cell::sync::{Lazy, OnceCell};

/// Prefix of auto-assigned training codes, e.g. `TRN-0007`
pub const TRAINING_CODE_PREFIX: &str = "TRN";

/// Attempts at assigning a fresh training code before giving up
pub const TRAINING_CODE_MAX_ATTEMPTS: u32 = 3;

static LOADED_CONFIG: OnceCell<Config> = OnceCell::new();

/// Process configuration. Binaries fill it from their command line with
/// [`load_from_args`]; otherwise it is read from the environment alone.
pub static APP_CONFIG: Lazy<&'static Config> =
    Lazy::new(|| LOADED_CONFIG.get_or_init(Config::from_env));

/// Parses flags and environment. Must run before the first `APP_CONFIG` access.
pub fn load_from_args() -> &'static Config {
    LOADED_CONFIG.get_or_init(Config::parse)
}

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env, default_value_t = 10)]
    pub db_max_connections: u32,

    #[clap(long, env, default_value_t = 8)]
    pub db_acquire_timeout_secs: u64,

    #[clap(long, env, default_value_t = true)]
    pub run_migrations: bool,

    /// Shared HS256 secret of the identity provider that signs bearer tokens
    #[clap(long, env)]
    pub jwt_secret: String,

    /// Employee provisioned with the administrator flag at boot
    #[clap(long, env)]
    pub admin_email: Option<String>,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}

impl Config {
    /// Environment-only parse; the process arguments are ignored.
    pub fn from_env() -> Self {
        Self::parse_from([env!("CARGO_PKG_NAME")])
    }
}
