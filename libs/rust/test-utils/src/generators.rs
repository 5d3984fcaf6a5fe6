//! Shared proptest generators.

use proptest::prelude::*;

/// Generate bare account names as the vault stores them.
pub fn account_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{2,15}"
}

/// Generate a bare account name together with its UPN form.
pub fn upn_strategy() -> impl Strategy<Value = (String, String)> {
    (account_name_strategy(), "[a-z]{3,10}", "[a-z]{2,4}").prop_map(|(account, domain, tld)| {
        let upn = format!("{account}@{domain}.{tld}");
        (account, upn)
    })
}

/// Generate managed system names.
pub fn system_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("db01".to_string()),
        Just("win-app-02".to_string()),
        Just("linux-bastion".to_string()),
        "[a-z][a-z0-9-]{2,20}",
    ]
}

/// Generate secret values.
pub fn secret_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#$%^&*]{8,64}"
}

/// Generate server-assigned request identifiers.
pub fn request_id_strategy() -> impl Strategy<Value = u64> {
    1u64..10_000_000
}

/// Generate checkout durations in minutes.
pub fn duration_minutes_strategy() -> impl Strategy<Value = u32> {
    1u32..=10_080
}
