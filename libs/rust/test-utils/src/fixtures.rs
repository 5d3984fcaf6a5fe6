//! Test fixtures shaped like Password Safe v3 responses.

use serde_json::{Value, json};

/// API key accepted by the fake appliance.
pub const API_KEY: &str = "test-api-key";

/// Run-as user accepted by the fake appliance.
pub const API_USER: &str = "svc-runner";

/// Account name as callers pass it.
pub const ACCOUNT_UPN: &str = "svc1@corp.example.com";

/// The same account as the vault lists it.
pub const ACCOUNT_BARE: &str = "svc1";

/// Managed system holding the account.
pub const SYSTEM: &str = "db01";

/// Released secret.
pub const SECRET: &str = "Tr0ub4dor&3";

/// One entry of a `GET Requests` response.
#[must_use]
pub fn request_entry(request_id: u64, account_name: &str, system_name: &str) -> Value {
    json!({
        "RequestID": request_id,
        "SystemID": 12,
        "SystemName": system_name,
        "AccountID": 34,
        "AccountName": account_name,
        "DomainName": null,
        "AccessType": "View",
        "Status": "Active",
        "Reason": "fixture"
    })
}

/// A full `GET Requests` response.
#[must_use]
pub fn requests_list(entries: &[(u64, &str, &str)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(id, account, system)| request_entry(*id, account, system))
            .collect(),
    )
}

/// A `GET ManagedAccounts` record.
#[must_use]
pub fn managed_account(system_id: i64, account_id: i64) -> Value {
    json!({
        "PlatformID": 4,
        "SystemId": system_id,
        "SystemName": SYSTEM,
        "AccountId": account_id,
        "AccountName": ACCOUNT_BARE,
        "DomainName": "corp.example.com",
        "MaximumReleaseDuration": 120,
        "DefaultReleaseDuration": 5
    })
}

/// Body of a successful `POST Auth/SignAppin`.
#[must_use]
pub fn sign_in_response() -> Value {
    json!({
        "UserId": 7,
        "SID": null,
        "EmailAddress": "svc-runner@corp.example.com",
        "UserName": API_USER,
        "Name": "Service Runner"
    })
}
