use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use shorten_client::{ClientSettings, DEFAULT_API_BASE_URL};
use shorten_core::Hosts;
use shorten_logging::LogDestination;

const API_URL_VAR: &str = "SHORTEN_API_URL";
const REDIRECT_HOST_VAR: &str = "SHORTEN_REDIRECT_HOST";
const REQUEST_TIMEOUT_VAR: &str = "SHORTEN_REQUEST_TIMEOUT_SECS";
const LOG_VAR: &str = "SHORTEN_LOG";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings read once at startup. Nothing here is fatal: bad values fall back
/// to defaults and are reported through `notes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub redirect_host: Option<String>,
    pub request_timeout: Duration,
    pub log_destination: LogDestination,
    /// Messages about defaults and rejected values, logged once the logger exists.
    pub notes: Vec<String>,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Self {
        let dotenv = dotenvy::dotenv();
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        if let Ok(path) = dotenv {
            config.notes.push(format!("loaded environment from {}", path.display()));
        }
        config
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut notes = Vec::new();

        let api_base_url = lookup(API_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| {
                notes.push(format!("{API_URL_VAR} not set, using default: {DEFAULT_API_BASE_URL}"));
                DEFAULT_API_BASE_URL.to_string()
            });

        let redirect_host = lookup(REDIRECT_HOST_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let timeout_secs: u64 = try_parse(
            &lookup,
            REQUEST_TIMEOUT_VAR,
            DEFAULT_REQUEST_TIMEOUT_SECS,
            &mut notes,
        );
        let log_destination = try_parse(&lookup, LOG_VAR, LogDestination::File, &mut notes);

        Self {
            api_base_url,
            redirect_host,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            log_destination,
            notes,
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            request_timeout: self.request_timeout,
            ..ClientSettings::default()
        }
    }

    pub fn hosts(&self) -> Hosts {
        Hosts::from_redirect_host(self.redirect_host.as_deref())
    }
}

fn try_parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    notes: &mut Vec<String>,
) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
            notes.push(format!("Invalid {key} value '{raw}': {err}; using {default}"));
            default
        }),
        None => default,
    }
}

impl Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hosts = self.hosts();
        write!(
            f,
            "api={} short_link_host={} decode_host={} timeout={:?}",
            self.api_base_url, hosts.short_link_host, hosts.decode_host, self.request_timeout
        )
    }
}
