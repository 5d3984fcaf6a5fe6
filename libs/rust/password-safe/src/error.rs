//! Checkout error types using thiserror 2.0.
//!
//! Every failure that comes back from the vault is tagged with the
//! [`CheckoutStep`] that produced it. No error is retried.

use std::fmt;
use thiserror::Error;

/// The HTTP steps of a checkout, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStep {
    /// `POST Auth/SignAppin`
    Authenticate,
    /// `GET Requests`
    ListRequests,
    /// `GET ManagedAccounts`
    LookupAccount,
    /// `POST Requests`
    CreateRequest,
    /// `GET Credentials/{id}`
    FetchCredential,
}

impl CheckoutStep {
    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::ListRequests => "list-requests",
            Self::LookupAccount => "lookup-account",
            Self::CreateRequest => "create-request",
            Self::FetchCredential => "fetch-credential",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout errors.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Sign-in was rejected or could not be sent
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Listing outstanding requests failed
    #[error("Listing checkout requests failed: {0}")]
    RequestListFailed(String),

    /// Managed account lookup failed
    #[error("Managed account lookup failed: {0}")]
    AccountLookupFailed(String),

    /// Managed account lookup returned no record
    #[error("Managed account {account} not found on system {system}")]
    AccountNotFound {
        /// Managed system name
        system: String,
        /// Managed account name
        account: String,
    },

    /// Managed account lookup returned more than one record
    #[error("Managed account lookup for {account} on system {system} is ambiguous: {count} records")]
    AmbiguousAccount {
        /// Managed system name
        system: String,
        /// Managed account name
        account: String,
        /// Number of records returned
        count: usize,
    },

    /// Submitting the checkout request failed
    #[error("Checkout request creation failed: {0}")]
    RequestCreationFailed(String),

    /// Fetching the released secret failed
    #[error("Credential fetch failed: {0}")]
    CredentialFetchFailed(String),

    /// Caller-supplied checkout parameters are invalid
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

impl CheckoutError {
    /// Create the error for a failed step carrying the upstream message.
    #[must_use]
    pub fn for_step(step: CheckoutStep, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match step {
            CheckoutStep::Authenticate => Self::AuthenticationFailed(msg),
            CheckoutStep::ListRequests => Self::RequestListFailed(msg),
            CheckoutStep::LookupAccount => Self::AccountLookupFailed(msg),
            CheckoutStep::CreateRequest => Self::RequestCreationFailed(msg),
            CheckoutStep::FetchCredential => Self::CredentialFetchFailed(msg),
        }
    }

    /// The step that failed, if the error came from one.
    #[must_use]
    pub const fn step(&self) -> Option<CheckoutStep> {
        match self {
            Self::AuthenticationFailed(_) => Some(CheckoutStep::Authenticate),
            Self::RequestListFailed(_) => Some(CheckoutStep::ListRequests),
            Self::AccountLookupFailed(_)
            | Self::AccountNotFound { .. }
            | Self::AmbiguousAccount { .. } => Some(CheckoutStep::LookupAccount),
            Self::RequestCreationFailed(_) => Some(CheckoutStep::CreateRequest),
            Self::CredentialFetchFailed(_) => Some(CheckoutStep::FetchCredential),
            Self::InvalidInput(_) | Self::InvalidConfig(_) | Self::Http(_) => None,
        }
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
