//! Password Safe client configuration.

use crate::{
    error::{CheckoutError, CheckoutResult},
    matching::MatchPolicy,
};
use rust_common::HttpConfig;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Path of the public v3 API below the appliance host.
pub const API_BASE_PATH: &str = "BeyondTrust/api/public/v3/";

/// Reason attached to checkout requests unless overridden.
pub const DEFAULT_REASON: &str = "Automated credential checkout";

/// Password Safe client configuration.
#[derive(Debug, Clone)]
pub struct PasswordSafeConfig {
    /// Appliance host name, e.g. `pam.example.com`
    pub api_domain: String,
    /// Registered API key
    pub api_key: SecretString,
    /// User the API key runs as
    pub api_user: String,
    /// Full API base URL; overrides the one derived from `api_domain`
    pub base_url: Option<Url>,
    /// HTTP client settings, including request timeouts
    pub http: HttpConfig,
    /// How outstanding requests are matched to the target account
    pub match_policy: MatchPolicy,
    /// Reason recorded on new checkout requests
    pub reason: String,
}

impl PasswordSafeConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(
        api_domain: impl Into<String>,
        api_key: impl Into<String>,
        api_user: impl Into<String>,
    ) -> Self {
        Self {
            api_domain: api_domain.into(),
            api_key: SecretString::from(api_key.into()),
            api_user: api_user.into(),
            base_url: None,
            http: HttpConfig::default(),
            match_policy: MatchPolicy::default(),
            reason: DEFAULT_REASON.to_string(),
        }
    }

    /// Point the client at an explicit API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Replace the HTTP settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Set the request matching policy.
    #[must_use]
    pub const fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Set the reason recorded on new checkout requests.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidConfig`] naming the first empty field.
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(CheckoutError::invalid_config("API key is empty"));
        }
        if self.api_user.trim().is_empty() {
            return Err(CheckoutError::invalid_config("API user is empty"));
        }
        if self.base_url.is_none() && self.api_domain.trim().is_empty() {
            return Err(CheckoutError::invalid_config("API domain is empty"));
        }
        if self.reason.trim().is_empty() {
            return Err(CheckoutError::invalid_config("Checkout reason is empty"));
        }
        Ok(())
    }

    /// The API base URL, always ending in `/`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidConfig`] if the domain does not form a valid URL.
    pub fn api_base_url(&self) -> CheckoutResult<Url> {
        let mut url = match &self.base_url {
            Some(url) => url.clone(),
            None => {
                let domain = self.api_domain.trim().trim_end_matches('/');
                Url::parse(&format!("https://{domain}/{API_BASE_PATH}")).map_err(|e| {
                    CheckoutError::invalid_config(format!("Invalid API domain {domain}: {e}"))
                })?
            }
        };

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Value of the `Authorization` header used to sign in.
    pub(crate) fn sign_in_header(&self) -> SecretString {
        SecretString::from(format!(
            "PS-Auth key={}; runas={}",
            self.api_key.expose_secret(),
            self.api_user
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = PasswordSafeConfig::new("pam.example.com", "key", "svc-runner");
        let url = config.api_base_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://pam.example.com/BeyondTrust/api/public/v3/"
        );
        assert_eq!(
            url.join("Auth/SignAppin").unwrap().as_str(),
            "https://pam.example.com/BeyondTrust/api/public/v3/Auth/SignAppin"
        );
    }

    #[test]
    fn test_base_url_override_gets_trailing_slash() {
        let config = PasswordSafeConfig::new("", "key", "svc-runner")
            .with_base_url(Url::parse("http://127.0.0.1:8080/BeyondTrust/api/public/v3").unwrap());
        assert!(config.validate().is_ok());
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "http://127.0.0.1:8080/BeyondTrust/api/public/v3/"
        );
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        assert!(matches!(
            PasswordSafeConfig::new("pam.example.com", "  ", "u").validate(),
            Err(CheckoutError::InvalidConfig(_))
        ));
        assert!(matches!(
            PasswordSafeConfig::new("pam.example.com", "key", "").validate(),
            Err(CheckoutError::InvalidConfig(_))
        ));
        assert!(matches!(
            PasswordSafeConfig::new("", "key", "u").validate(),
            Err(CheckoutError::InvalidConfig(_))
        ));
        assert!(matches!(
            PasswordSafeConfig::new("pam.example.com", "key", "u")
                .with_reason("")
                .validate(),
            Err(CheckoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sign_in_header_format() {
        let config = PasswordSafeConfig::new("pam.example.com", "abc123", "svc-runner");
        assert_eq!(
            config.sign_in_header().expose_secret(),
            "PS-Auth key=abc123; runas=svc-runner"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = PasswordSafeConfig::new("pam.example.com", "very-secret-key", "u");
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret-key"));
    }

    #[test]
    fn test_defaults() {
        let config = PasswordSafeConfig::new("pam.example.com", "key", "u")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.reason, DEFAULT_REASON);
        assert_eq!(config.match_policy, MatchPolicy::ExactThenPrefix);
        assert_eq!(config.http.timeout, Duration::from_secs(5));
    }
}
