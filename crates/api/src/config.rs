//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use chrono_tz::Tz;
use push_client::{PushPayload, VapidConfig};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Web Push signing keys. `None` means pushes are only logged.
    pub vapid: Option<VapidConfig>,
    /// Identity provider base URL.
    pub auth_url: Option<String>,
    /// `apikey` header sent to the identity provider.
    pub auth_api_key: Option<String>,
    /// Fixed token to user id pairs.
    pub static_tokens: Vec<(String, String)>,
    /// Time zone that decides "today" and the current reminder hour.
    pub reminder_timezone: Tz,
    /// Bearer token required for scheduled sweeps.
    pub scheduler_token: Option<String>,
    /// Run the hourly sweep inside this process.
    pub run_scheduler: bool,
    /// Reminder notification content.
    pub reminder_payload: PushPayload,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:morning-light.db?mode=rwc` |
    /// | `VAPID_PUBLIC_KEY` | Web Push public key | (unset: log only) |
    /// | `VAPID_PRIVATE_KEY` | Web Push private key | (unset: log only) |
    /// | `VAPID_SUBJECT` | Contact address for push services | (unset: log only) |
    /// | `AUTH_URL` | Identity provider base URL | (unset) |
    /// | `AUTH_API_KEY` | Identity provider `apikey` header | (unset) |
    /// | `AUTH_STATIC_TOKENS` | `token:user,token:user` | (unset) |
    /// | `REMINDER_TIMEZONE` | IANA time zone | `Asia/Taipei` |
    /// | `SCHEDULER_TOKEN` | Bearer token for `?hour=` sweeps | (unset) |
    /// | `REMINDER_SCHEDULER` | Run the hourly sweep in-process | `false` |
    /// | `REMINDER_TITLE` / `REMINDER_BODY` | Notification text | built-in reminder |
    ///
    /// At least one of `AUTH_URL` or `AUTH_STATIC_TOKENS` is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = var("API_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            var("SQLITE_PATH").unwrap_or_else(|| "sqlite:morning-light.db?mode=rwc".to_string());

        let vapid = match (
            var("VAPID_PUBLIC_KEY"),
            var("VAPID_PRIVATE_KEY"),
            var("VAPID_SUBJECT"),
        ) {
            (None, None, None) => None,
            (Some(public_key), Some(private_key), Some(subject)) => Some(
                VapidConfig::new(public_key, private_key, subject)
                    .map_err(|e| ConfigError::InvalidVapid(e.to_string()))?,
            ),
            _ => return Err(ConfigError::IncompleteVapid),
        };

        let auth_url = var("AUTH_URL").map(|url| url.trim_end_matches('/').to_string());
        let auth_api_key = var("AUTH_API_KEY");
        let static_tokens = match var("AUTH_STATIC_TOKENS") {
            Some(pairs) => parse_static_tokens(&pairs)?,
            None => Vec::new(),
        };
        if auth_url.is_none() && static_tokens.is_empty() {
            return Err(ConfigError::MissingIdentity);
        }

        let reminder_timezone = match var("REMINDER_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            None => chrono_tz::Asia::Taipei,
        };

        let scheduler_token = var("SCHEDULER_TOKEN");
        let run_scheduler = match var("REMINDER_SCHEDULER") {
            Some(value) => parse_flag(&value)
                .ok_or_else(|| ConfigError::InvalidFlag("REMINDER_SCHEDULER", value))?,
            None => false,
        };

        let default_payload = PushPayload::weight_reminder();
        let reminder_payload = PushPayload::new(
            var("REMINDER_TITLE").unwrap_or(default_payload.title),
            var("REMINDER_BODY").unwrap_or(default_payload.body),
        );

        Ok(Self {
            addr,
            database_url,
            vapid,
            auth_url,
            auth_api_key,
            static_tokens,
            reminder_timezone,
            scheduler_token,
            run_scheduler,
            reminder_payload,
        })
    }
}

fn parse_static_tokens(pairs: &str) -> Result<Vec<(String, String)>, ConfigError> {
    pairs.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once(':') {
            Some((token, user)) if !token.trim().is_empty() && !user.trim().is_empty() => {
                Ok((token.trim().to_string(), user.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidStaticTokens),
        })
        .collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("VAPID_PUBLIC_KEY, VAPID_PRIVATE_KEY and VAPID_SUBJECT must be set together")]
    IncompleteVapid,

    #[error("Invalid VAPID configuration: {0}")]
    InvalidVapid(String),

    #[error("AUTH_STATIC_TOKENS must look like token:user,token:user")]
    InvalidStaticTokens,

    #[error("AUTH_URL or AUTH_STATIC_TOKENS is required")]
    MissingIdentity,

    #[error("Unknown REMINDER_TIMEZONE: {0}")]
    InvalidTimezone(String),

    #[error("{0} must be true or false, got {1:?}")]
    InvalidFlag(&'static str, String),
}
