//! Wire types for the Password Safe v3 API.
//!
//! The appliance answers in PascalCase JSON, but field casing has drifted
//! between releases, so record fields are looked up case-insensitively.
//! Identifiers may arrive as JSON numbers or strings.

use crate::error::{CheckoutError, CheckoutResult, CheckoutStep};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use zeroize::Zeroize;

/// Access type requested for every checkout.
pub const ACCESS_TYPE_VIEW: &str = "View";

/// Server-assigned checkout request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent in URLs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An outstanding checkout request as listed by `GET Requests`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Request identifier
    pub request_id: RequestId,
    /// Account name as stored by the vault
    pub account_name: String,
    /// Managed system the account belongs to
    pub managed_system_name: String,
}

impl CheckoutRequest {
    /// Build from one list entry. Entries missing a field yield `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            request_id: RequestId::from_json(field(object, &["RequestID"])?)?,
            account_name: field(object, &["AccountName"])?.as_str()?.to_string(),
            managed_system_name: field(object, &["ManagedSystemName", "SystemName"])?
                .as_str()?
                .to_string(),
        })
    }
}

/// Parse the body of `GET Requests`.
///
/// # Errors
///
/// Returns [`CheckoutError::RequestListFailed`] if the body is not a JSON array.
pub fn parse_request_list(body: &Value) -> CheckoutResult<Vec<CheckoutRequest>> {
    let entries = body.as_array().ok_or_else(|| {
        CheckoutError::for_step(
            CheckoutStep::ListRequests,
            format!("expected a JSON array, got {}", json_kind(body)),
        )
    })?;

    let requests: Vec<_> = entries.iter().filter_map(CheckoutRequest::from_json).collect();
    if requests.len() < entries.len() {
        tracing::debug!(
            skipped = entries.len() - requests.len(),
            "Ignoring request entries without id, account or system"
        );
    }
    Ok(requests)
}

/// Identifiers of a managed account, resolved by `GET ManagedAccounts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedAccountRef {
    /// Managed system identifier
    pub system_id: i64,
    /// Managed account identifier
    pub account_id: i64,
}

impl ManagedAccountRef {
    /// Resolve the lookup body to exactly one account.
    ///
    /// The appliance answers with a single object when both query parameters
    /// are given, and with an array otherwise; both shapes are accepted.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AccountNotFound`] when no record is returned
    /// - [`CheckoutError::AmbiguousAccount`] when more than one is returned
    /// - [`CheckoutError::AccountLookupFailed`] when the record lacks its ids
    pub fn from_lookup(body: &Value, system_name: &str, account_name: &str) -> CheckoutResult<Self> {
        let record = match body {
            Value::Object(object) => object,
            Value::Array(items) => match items.as_slice() {
                [] => return Err(not_found(system_name, account_name)),
                [Value::Object(object)] => object,
                [other] => {
                    return Err(lookup_failed(format!(
                        "expected an account object, got {}",
                        json_kind(other)
                    )));
                }
                many => {
                    return Err(CheckoutError::AmbiguousAccount {
                        system: system_name.to_string(),
                        account: account_name.to_string(),
                        count: many.len(),
                    });
                }
            },
            Value::Null => return Err(not_found(system_name, account_name)),
            other => {
                return Err(lookup_failed(format!(
                    "expected an account object, got {}",
                    json_kind(other)
                )));
            }
        };

        Ok(Self {
            system_id: id_field(record, "SystemId")?,
            account_id: id_field(record, "AccountId")?,
        })
    }
}

/// Body of `POST Requests`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRequestBody<'a> {
    /// Always [`ACCESS_TYPE_VIEW`]
    pub access_type: &'static str,
    /// Managed system identifier
    #[serde(rename = "SystemID")]
    pub system_id: i64,
    /// Managed account identifier
    #[serde(rename = "AccountID")]
    pub account_id: i64,
    /// Requested checkout length
    pub duration_minutes: u32,
    /// Reason shown to approvers
    pub reason: &'a str,
    /// Always null: no access policy schedule
    #[serde(rename = "AccessPolicyScheduleID")]
    pub access_policy_schedule_id: Option<i64>,
    /// Rotate the secret once the checkout ends
    pub rotate_on_checkin: bool,
}

impl<'a> CreateRequestBody<'a> {
    /// Build a view request for `account`.
    #[must_use]
    pub const fn view(
        account: ManagedAccountRef,
        duration_minutes: u32,
        reason: &'a str,
        rotate_on_checkin: bool,
    ) -> Self {
        Self {
            access_type: ACCESS_TYPE_VIEW,
            system_id: account.system_id,
            account_id: account.account_id,
            duration_minutes,
            reason,
            access_policy_schedule_id: None,
            rotate_on_checkin,
        }
    }
}

/// Parse the body of `POST Requests`, which is the new request id.
///
/// # Errors
///
/// Returns [`CheckoutError::RequestCreationFailed`] if the body is empty.
pub fn parse_created_request_id(body: &str) -> CheckoutResult<RequestId> {
    let trimmed = body.trim();
    let id = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => RequestId::from_json(&value),
        Err(_) if !trimmed.is_empty() => Some(RequestId::new(trimmed)),
        Err(_) => None,
    };
    id.ok_or_else(|| {
        CheckoutError::for_step(
            CheckoutStep::CreateRequest,
            "response did not contain a request id",
        )
    })
}

/// Turn the body of `GET Credentials/{id}` into a secret.
///
/// A JSON string literal is unwrapped only when the appliance labelled the
/// body `application/json`; any other body is the secret byte for byte.
/// Buffers that are not moved into the secret are wiped.
///
/// # Errors
///
/// Returns [`CheckoutError::CredentialFetchFailed`] if the body is not UTF-8.
pub fn decode_secret(body: Vec<u8>, is_json: bool) -> CheckoutResult<SecretString> {
    let mut text = String::from_utf8(body).map_err(|e| {
        e.into_bytes().zeroize();
        CheckoutError::for_step(
            CheckoutStep::FetchCredential,
            "credential body is not valid UTF-8",
        )
    })?;

    if is_json {
        if let Ok(secret) = serde_json::from_str::<String>(&text) {
            text.zeroize();
            return Ok(exact_secret(secret));
        }
    }
    Ok(exact_secret(text))
}

/// Wrap `value` without leaving a reallocated copy behind.
///
/// `into_boxed_str` reallocates when capacity exceeds length, so surplus
/// capacity is handled by copying into an exact allocation and wiping the
/// original.
fn exact_secret(mut value: String) -> SecretString {
    if value.capacity() == value.len() {
        return SecretString::from(value);
    }
    let mut exact = String::with_capacity(value.len());
    exact.push_str(&value);
    value.zeroize();
    SecretString::from(exact)
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn id_field(object: &Map<String, Value>, name: &str) -> CheckoutResult<i64> {
    let value = field(object, &[name])
        .ok_or_else(|| lookup_failed(format!("account record has no {name}")))?;
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| lookup_failed(format!("account record has a non-numeric {name}")))
}

fn not_found(system_name: &str, account_name: &str) -> CheckoutError {
    CheckoutError::AccountNotFound {
        system: system_name.to_string(),
        account: account_name.to_string(),
    }
}

fn lookup_failed(msg: String) -> CheckoutError {
    CheckoutError::for_step(CheckoutStep::LookupAccount, msg)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
