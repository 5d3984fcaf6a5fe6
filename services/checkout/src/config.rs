//! Centralized configuration for `ps-checkout`.
//!
//! Connection settings are loaded from environment variables (a `.env` file
//! is honoured) and validated before any call is made. Per-call settings come
//! from the command line.

use password_safe_client::{CheckoutError, PasswordSafeConfig};
use rust_common::{HttpConfig, TracingConfig};
use std::{env, str::FromStr, time::Duration};
use url::Url;

/// `ps-checkout` configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Password Safe connection settings
    pub password_safe: PasswordSafeConfig,
    /// Log output settings
    pub tracing: TracingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CheckoutError> {
        let api_key = required(&lookup, "PS_API_KEY")?;
        let api_user = required(&lookup, "PS_API_USER")?;
        let base_url = lookup("PS_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                Url::parse(value.trim()).map_err(|e| {
                    CheckoutError::invalid_config(format!("Invalid PS_BASE_URL: {e}"))
                })
            })
            .transpose()?;
        let api_domain = match base_url {
            Some(_) => lookup("PS_API_DOMAIN").unwrap_or_default(),
            None => required(&lookup, "PS_API_DOMAIN")?,
        };

        let http = HttpConfig::default()
            .with_timeout(Duration::from_secs(parse_var(&lookup, "PS_TIMEOUT_SECS", 30)?))
            .with_connect_timeout(Duration::from_secs(parse_var(
                &lookup,
                "PS_CONNECT_TIMEOUT_SECS",
                10,
            )?))
            .with_accept_invalid_certs(parse_var(&lookup, "PS_ACCEPT_INVALID_CERTS", false)?);

        let mut password_safe = PasswordSafeConfig::new(api_domain, api_key, api_user).with_http(http);
        if let Some(url) = base_url {
            password_safe = password_safe.with_base_url(url);
        }
        if let Some(reason) = lookup("PS_REASON") {
            password_safe = password_safe.with_reason(reason);
        }
        password_safe.validate()?;

        let mut tracing = TracingConfig::default()
            .with_service_name("ps-checkout")
            .with_log_level(lookup("LOG_LEVEL").unwrap_or_else(|| "warn".to_string()));
        if parse_var(&lookup, "LOG_JSON", false)? {
            tracing = tracing.with_json_output();
        }

        Ok(Self {
            password_safe,
            tracing,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, CheckoutError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| CheckoutError::invalid_config(format!("{name} is not set")))
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, CheckoutError>
where
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| CheckoutError::invalid_config(format!("Invalid {name}: {e}"))),
        None => Ok(default),
    }
}
