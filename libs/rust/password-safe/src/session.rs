//! An authenticated Password Safe session.
//!
//! A session owns its own HTTP client, so the cookie set by `Auth/SignAppin`
//! lives exactly as long as the session value. Each step method issues one
//! HTTP call and maps every failure to that step's error.

use crate::{
    config::PasswordSafeConfig,
    error::{CheckoutError, CheckoutResult, CheckoutStep},
    models::{
        self, CheckoutRequest, CreateRequestBody, ManagedAccountRef, RequestId,
    },
};
use reqwest::{
    Client, RequestBuilder, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use rust_common::build_http_client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Authenticated session bound to one API base URL.
#[derive(Debug)]
pub struct Session {
    http: Client,
    base_url: Url,
}

impl Session {
    /// Sign in with the configured API key and run-as user.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AuthenticationFailed`] on a transport error or
    /// a non-success status, [`CheckoutError::InvalidConfig`] for a bad base
    /// URL, and [`CheckoutError::Http`] if the HTTP client cannot be built.
    #[instrument(skip(config), fields(api_user = %config.api_user))]
    pub async fn sign_in(config: &PasswordSafeConfig) -> CheckoutResult<Self> {
        let session = Self {
            http: build_http_client(&config.http)?,
            base_url: config.api_base_url()?,
        };

        let step = CheckoutStep::Authenticate;
        let url = session.endpoint(&["Auth", "SignAppin"])?;
        let authorization = authorization_header(&config.sign_in_header())?;

        session
            .send(step, session.http.post(url).header(AUTHORIZATION, authorization))
            .await?;

        info!("Signed in to Password Safe");
        Ok(session)
    }

    /// List every outstanding checkout request visible to the API user.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::RequestListFailed`].
    #[instrument(skip(self))]
    pub async fn list_requests(&self) -> CheckoutResult<Vec<CheckoutRequest>> {
        let step = CheckoutStep::ListRequests;
        let url = self.endpoint(&["Requests"])?;
        let response = self.send(step, self.http.get(url)).await?;
        let body = read_json(step, response).await?;

        let requests = models::parse_request_list(&body)?;
        debug!(count = requests.len(), "Listed outstanding requests");
        Ok(requests)
    }

    /// Resolve a managed account to its system and account identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::AccountLookupFailed`],
    /// [`CheckoutError::AccountNotFound`] or [`CheckoutError::AmbiguousAccount`].
    #[instrument(skip(self))]
    pub async fn lookup_account(
        &self,
        system_name: &str,
        account_name: &str,
    ) -> CheckoutResult<ManagedAccountRef> {
        let step = CheckoutStep::LookupAccount;
        let mut url = self.endpoint(&["ManagedAccounts"])?;
        url.query_pairs_mut()
            .append_pair("systemName", system_name)
            .append_pair("accountName", account_name);

        let response = self.send(step, self.http.get(url)).await?;
        let body = read_json(step, response).await?;

        let account = ManagedAccountRef::from_lookup(&body, system_name, account_name)?;
        debug!(
            system_id = account.system_id,
            account_id = account.account_id,
            "Resolved managed account"
        );
        Ok(account)
    }

    /// Submit a checkout request and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::RequestCreationFailed`].
    #[instrument(skip(self, body), fields(
        system_id = body.system_id,
        account_id = body.account_id,
        duration_minutes = body.duration_minutes,
        rotate_on_checkin = body.rotate_on_checkin,
    ))]
    pub async fn create_request(&self, body: &CreateRequestBody<'_>) -> CheckoutResult<RequestId> {
        let step = CheckoutStep::CreateRequest;
        let url = self.endpoint(&["Requests"])?;
        let response = self.send(step, self.http.post(url).json(body)).await?;
        let text = read_text(step, response).await?;

        let request_id = models::parse_created_request_id(&text)?;
        info!(request_id = %request_id, "Created checkout request");
        Ok(request_id)
    }

    /// Fetch the secret released for `request_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::CredentialFetchFailed`].
    #[instrument(skip(self, request_id), fields(request_id = %request_id))]
    pub async fn fetch_credential(&self, request_id: &RequestId) -> CheckoutResult<SecretString> {
        let step = CheckoutStep::FetchCredential;
        let url = self.endpoint(&["Credentials", request_id.as_str()])?;
        let response = self.send(step, self.http.get(url)).await?;
        let is_json = is_json_body(&response);
        let body = read_bytes(step, response).await?;

        let secret = models::decode_secret(body, is_json)?;
        debug!("Fetched released credential");
        Ok(secret)
    }

    fn endpoint(&self, segments: &[&str]) -> CheckoutResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CheckoutError::invalid_config(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, step: CheckoutStep, request: RequestBuilder) -> CheckoutResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(step = %step, error = %e, "Password Safe call failed");
            CheckoutError::for_step(step, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(step = %step, status = status.as_u16(), "Password Safe rejected call");
            return Err(CheckoutError::for_step(step, format!("Status {status}: {text}")));
        }

        debug!(step = %step, status = status.as_u16(), "Password Safe call succeeded");
        Ok(response)
    }
}

fn authorization_header(value: &SecretString) -> CheckoutResult<HeaderValue> {
    let mut header = HeaderValue::from_str(value.expose_secret()).map_err(|_| {
        CheckoutError::for_step(
            CheckoutStep::Authenticate,
            "API key or run-as user contains characters not allowed in a header",
        )
    })?;
    header.set_sensitive(true);
    Ok(header)
}

fn is_json_body(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

async fn read_bytes(step: CheckoutStep, response: Response) -> CheckoutResult<Vec<u8>> {
    response
        .bytes()
        .await
        .map(Vec::from)
        .map_err(|e| CheckoutError::for_step(step, format!("Failed to read response body: {e}")))
}

async fn read_text(step: CheckoutStep, response: Response) -> CheckoutResult<String> {
    response
        .text()
        .await
        .map_err(|e| CheckoutError::for_step(step, format!("Failed to read response body: {e}")))
}

async fn read_json(step: CheckoutStep, response: Response) -> CheckoutResult<Value> {
    let text = read_text(step, response).await?;
    serde_json::from_str(&text)
        .map_err(|e| CheckoutError::for_step(step, format!("Invalid JSON response: {e}")))
}
