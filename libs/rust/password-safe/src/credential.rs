//! Username/password pair released by a checkout.

use secrecy::SecretString;
use std::fmt;

/// A released credential.
///
/// The secret stays wrapped in [`SecretString`]: it is zeroized on drop and
/// only readable through [`secrecy::ExposeSecret`]. `Debug` never prints it.
#[derive(Clone)]
pub struct Credential {
    username: String,
    secret: SecretString,
}

impl Credential {
    /// Pair a username with its secret.
    #[must_use]
    pub fn new(username: impl Into<String>, secret: SecretString) -> Self {
        Self {
            username: username.into(),
            secret,
        }
    }

    /// Account name exactly as the caller asked for it.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The released secret.
    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new("svc1@corp.example.com", SecretString::from("hunter2"));
        let debug = format!("{credential:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("svc1@corp.example.com"));
        assert!(debug.contains("[REDACTED]"));
    }
}
