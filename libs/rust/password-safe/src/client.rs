//! Credential checkout against Password Safe.

use crate::{
    config::PasswordSafeConfig,
    credential::Credential,
    error::{CheckoutError, CheckoutResult},
    guard::CheckoutGuard,
    matching::find_existing_request,
    models::CreateRequestBody,
    session::Session,
};
use tracing::{info, instrument};

/// Checkout length used when none is given.
pub const DEFAULT_DURATION_MINUTES: u32 = 5;

/// What to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutParams {
    /// Account name as known to the vault (AccountName or UPN)
    pub account_name: String,
    /// Managed system the account belongs to
    pub system_name: String,
    /// Requested checkout length; the vault enforces its own maximum
    pub duration_minutes: u32,
    /// Rotate the secret when the checkout ends
    pub rotate_on_checkin: bool,
}

impl CheckoutParams {
    /// Check out `account_name` on `system_name` with default options.
    #[must_use]
    pub fn new(account_name: impl Into<String>, system_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            system_name: system_name.into(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            rotate_on_checkin: false,
        }
    }

    /// Set the requested checkout length.
    #[must_use]
    pub const fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Ask the vault to rotate the secret on check-in.
    #[must_use]
    pub const fn with_rotate_on_checkin(mut self, rotate: bool) -> Self {
        self.rotate_on_checkin = rotate;
        self
    }

    /// Reject empty names and a zero duration.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidInput`].
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.account_name.trim().is_empty() {
            return Err(CheckoutError::invalid_input("account name is empty"));
        }
        if self.system_name.trim().is_empty() {
            return Err(CheckoutError::invalid_input("system name is empty"));
        }
        if self.duration_minutes == 0 {
            return Err(CheckoutError::invalid_input(
                "duration must be at least one minute",
            ));
        }
        Ok(())
    }
}

/// Password Safe client.
///
/// Every [`checkout`](Self::checkout) signs in afresh; nothing but the
/// per-account lock table is shared between calls.
#[derive(Debug, Clone)]
pub struct PasswordSafeClient {
    config: PasswordSafeConfig,
    guard: CheckoutGuard,
}

impl PasswordSafeClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidConfig`] if the configuration is incomplete.
    pub fn new(config: PasswordSafeConfig) -> CheckoutResult<Self> {
        config.validate()?;
        config.api_base_url()?;
        Ok(Self {
            config,
            guard: CheckoutGuard::new(),
        })
    }

    /// Share a lock table with other clients in this process.
    #[must_use]
    pub fn with_guard(mut self, guard: CheckoutGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Check out a credential for the given account.
    ///
    /// Signs in, reuses an outstanding request for the account if one
    /// matches, otherwise resolves the account and creates a request, then
    /// fetches the released secret. The first failing step aborts the call.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidInput`] before any HTTP call if
    /// `params` is invalid, or the step-tagged error of the failing call.
    #[instrument(skip(self, params), fields(
        account = %params.account_name,
        system = %params.system_name,
    ))]
    pub async fn checkout(&self, params: &CheckoutParams) -> CheckoutResult<Credential> {
        params.validate()?;

        let _lock = self
            .guard
            .lock(&params.system_name, &params.account_name)
            .await;

        let session = Session::sign_in(&self.config).await?;
        let requests = session.list_requests().await?;

        let existing = find_existing_request(
            &requests,
            &params.account_name,
            &params.system_name,
            self.config.match_policy,
        );

        let request_id = if let Some((request, kind)) = existing {
            info!(request_id = %request.request_id, match_kind = ?kind, "Reusing checkout request");
            request.request_id.clone()
        } else {
            let account = session
                .lookup_account(&params.system_name, &params.account_name)
                .await?;
            let body = CreateRequestBody::view(
                account,
                params.duration_minutes,
                &self.config.reason,
                params.rotate_on_checkin,
            );
            session.create_request(&body).await?
        };

        let secret = session.fetch_credential(&request_id).await?;
        info!(request_id = %request_id, "Credential checked out");

        Ok(Credential::new(params.account_name.clone(), secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = CheckoutParams::new("svc1@corp.example.com", "db01");
        assert_eq!(params.duration_minutes, DEFAULT_DURATION_MINUTES);
        assert!(!params.rotate_on_checkin);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_validation() {
        assert!(matches!(
            CheckoutParams::new("", "db01").validate(),
            Err(CheckoutError::InvalidInput(_))
        ));
        assert!(matches!(
            CheckoutParams::new("svc1", " ").validate(),
            Err(CheckoutError::InvalidInput(_))
        ));
        assert!(matches!(
            CheckoutParams::new("svc1", "db01")
                .with_duration_minutes(0)
                .validate(),
            Err(CheckoutError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_client_rejects_incomplete_config() {
        let config = PasswordSafeConfig::new("pam.example.com", "", "svc-runner");
        assert!(matches!(
            PasswordSafeClient::new(config),
            Err(CheckoutError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_client_rejects_unparseable_domain() {
        let config = PasswordSafeConfig::new("bad host name", "key", "svc-runner");
        assert!(matches!(
            PasswordSafeClient::new(config),
            Err(CheckoutError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_params_fail_before_any_call() {
        let config = PasswordSafeConfig::new("unreachable.invalid", "key", "svc-runner");
        let client = PasswordSafeClient::new(config).unwrap();
        let err = client
            .checkout(&CheckoutParams::new("svc1", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidInput(_)));
    }
}
