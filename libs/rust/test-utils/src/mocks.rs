//! A fake Password Safe appliance backed by wiremock.
//!
//! The functions below build one [`Mock`] per endpoint; tests add
//! expectations (`expect`, `up_to_n_times`) and mount them on a
//! [`FakePasswordSafe`].

use crate::fixtures;
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

/// Path of the v3 API on the fake appliance.
pub const API_PATH: &str = "/BeyondTrust/api/public/v3";

/// Session cookie set on sign-in.
pub const SESSION_COOKIE: &str = "ASP.NET_SessionId=fake-session";

/// Full path of an API endpoint, e.g. `endpoint("Requests")`.
#[must_use]
pub fn endpoint(relative: &str) -> String {
    format!("{API_PATH}/{relative}")
}

/// A running fake appliance.
pub struct FakePasswordSafe {
    server: MockServer,
}

impl FakePasswordSafe {
    /// Start a fake appliance on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// API base URL to configure clients with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}{API_PATH}/", self.server.uri())
    }

    /// Mount a mock.
    pub async fn mount(&self, mock: Mock) {
        mock.mount(&self.server).await;
    }

    /// Every received call as `"METHOD /path"`, in arrival order.
    pub async fn received_calls(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| format!("{} {}", request.method, request.url.path()))
            .collect()
    }

    /// Number of received calls matching `"METHOD /path"`.
    pub async fn count_calls(&self, call: &str) -> usize {
        self.received_calls()
            .await
            .iter()
            .filter(|received| received.as_str() == call)
            .count()
    }
}

/// `POST Auth/SignAppin` accepting the fixture API key and user.
#[must_use]
pub fn sign_in() -> Mock {
    Mock::given(method("POST"))
        .and(path(endpoint("Auth/SignAppin")))
        .and(header(
            "authorization",
            format!(
                "PS-Auth key={}; runas={}",
                fixtures::API_KEY,
                fixtures::API_USER
            )
            .as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; path=/; HttpOnly").as_str())
                .set_body_json(fixtures::sign_in_response()),
        )
        .named("sign in")
}

/// `GET Requests` answering with `body`.
#[must_use]
pub fn list_requests(body: Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(endpoint("Requests")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .named("list requests")
}

/// `GET ManagedAccounts` for `system`/`account`, answering with `body`.
#[must_use]
pub fn lookup_account(system: &str, account: &str, body: Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(endpoint("ManagedAccounts")))
        .and(query_param("systemName", system))
        .and(query_param("accountName", account))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .named("lookup account")
}

/// `POST Requests` expecting `expected_body`, answering with `request_id`.
#[must_use]
pub fn create_request(expected_body: Value, request_id: u64) -> Mock {
    Mock::given(method("POST"))
        .and(path(endpoint("Requests")))
        .and(body_json(expected_body))
        .respond_with(
            ResponseTemplate::new(201).set_body_raw(request_id.to_string(), "application/json"),
        )
        .named("create request")
}

/// `GET Credentials/{id}` answering with `secret` as a JSON string.
#[must_use]
pub fn fetch_credential(request_id: u64, secret: &str) -> Mock {
    let body = Value::String(secret.to_string()).to_string();
    Mock::given(method("GET"))
        .and(path(endpoint(&format!("Credentials/{request_id}"))))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .named("fetch credential")
}

/// `GET Credentials/{id}` answering with `secret` as plain text.
#[must_use]
pub fn fetch_credential_plain(request_id: u64, secret: &str) -> Mock {
    Mock::given(method("GET"))
        .and(path(endpoint(&format!("Credentials/{request_id}"))))
        .respond_with(ResponseTemplate::new(200).set_body_string(secret))
        .named("fetch credential (plain)")
}

/// `GET Credentials/{id}` answering with raw `body` bytes labelled `text/plain`.
#[must_use]
pub fn fetch_credential_bytes(request_id: u64, body: Vec<u8>) -> Mock {
    Mock::given(method("GET"))
        .and(path(endpoint(&format!("Credentials/{request_id}"))))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .named("fetch credential (bytes)")
}

/// Any call to `relative` with `http_method`, failing with `status` and `message`.
#[must_use]
pub fn failing(http_method: &str, relative: &str, status: u16, message: &str) -> Mock {
    Mock::given(method(http_method))
        .and(path(endpoint(relative)))
        .respond_with(ResponseTemplate::new(status).set_body_string(message))
        .named("failing call")
}
