//! Matching outstanding checkout requests to a target account.
//!
//! The vault may report a bare account name (`svc1`) while callers pass the
//! UPN form (`svc1@corp.example.com`). An exact name match always wins; with
//! [`MatchPolicy::ExactThenPrefix`] the first entry whose account name is a
//! prefix of the caller's name is used when no exact match exists. System
//! names are always compared exactly.

use crate::models::CheckoutRequest;

/// Policy for reusing an outstanding checkout request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Account name must equal the caller's name.
    Exact,
    /// Prefer an exact match, else accept a stored name that prefixes the caller's name.
    #[default]
    ExactThenPrefix,
}

/// How a request matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Account names are equal
    Exact,
    /// Stored account name is a prefix of the requested one
    Prefix,
}

impl MatchPolicy {
    /// Compare a stored account name with the requested one.
    #[must_use]
    pub fn compare(self, stored: &str, requested: &str) -> Option<MatchKind> {
        if stored.is_empty() {
            return None;
        }
        if stored == requested {
            return Some(MatchKind::Exact);
        }
        match self {
            Self::ExactThenPrefix if requested.starts_with(stored) => Some(MatchKind::Prefix),
            _ => None,
        }
    }
}

/// Find the request to reuse for `account_name` on `system_name`.
///
/// Entries are scanned in list order; the first exact match wins, then the
/// first prefix match if the policy allows one.
#[must_use]
pub fn find_existing_request<'a>(
    requests: &'a [CheckoutRequest],
    account_name: &str,
    system_name: &str,
    policy: MatchPolicy,
) -> Option<(&'a CheckoutRequest, MatchKind)> {
    let mut fallback = None;

    for request in requests {
        if request.managed_system_name != system_name {
            continue;
        }
        match policy.compare(&request.account_name, account_name) {
            Some(MatchKind::Exact) => return Some((request, MatchKind::Exact)),
            Some(MatchKind::Prefix) if fallback.is_none() => {
                fallback = Some((request, MatchKind::Prefix));
            }
            _ => {}
        }
    }

    fallback
}
