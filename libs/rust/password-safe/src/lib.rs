//! BeyondTrust Password Safe checkout client.
//!
//! Signs in with an API key, reuses or creates a time-boxed checkout request
//! for a managed account, and returns the released password as a
//! [`Credential`] whose secret never leaves [`secrecy::SecretString`].
//!
//! ```no_run
//! use password_safe_client::{CheckoutParams, PasswordSafeClient, PasswordSafeConfig};
//!
//! # async fn run() -> Result<(), password_safe_client::CheckoutError> {
//! let config = PasswordSafeConfig::new("pam.example.com", "api-key", "svc-runner");
//! let client = PasswordSafeClient::new(config)?;
//! let credential = client
//!     .checkout(&CheckoutParams::new("svc1@corp.example.com", "db01"))
//!     .await?;
//! println!("checked out {}", credential.username());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod guard;
pub mod matching;
pub mod models;
pub mod session;

pub use client::{CheckoutParams, DEFAULT_DURATION_MINUTES, PasswordSafeClient};
pub use config::PasswordSafeConfig;
pub use credential::Credential;
pub use error::{CheckoutError, CheckoutResult, CheckoutStep};
pub use guard::CheckoutGuard;
pub use matching::{MatchKind, MatchPolicy};
