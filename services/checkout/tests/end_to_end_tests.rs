//! End-to-end: environment configuration to JSON output against a fake appliance.

use checkout_cli::{Config, write_credential};
use password_safe_client::{CheckoutParams, CheckoutStep, PasswordSafeClient};
use serde_json::{Value, json};
use std::collections::HashMap;
use test_utils::{
    fixtures::{self, ACCOUNT_BARE, ACCOUNT_UPN, SECRET, SYSTEM},
    mocks::{self, FakePasswordSafe},
};

fn env_for(fake: &FakePasswordSafe) -> HashMap<String, String> {
    HashMap::from([
        ("PS_API_KEY".to_string(), fixtures::API_KEY.to_string()),
        ("PS_API_USER".to_string(), fixtures::API_USER.to_string()),
        ("PS_BASE_URL".to_string(), fake.base_url()),
        ("PS_TIMEOUT_SECS".to_string(), "5".to_string()),
    ])
}

#[tokio::test]
async fn checkout_writes_username_and_password() {
    let fake = FakePasswordSafe::start().await;
    fake.mount(mocks::sign_in()).await;
    fake.mount(mocks::list_requests(fixtures::requests_list(&[(21, ACCOUNT_BARE, SYSTEM)])))
        .await;
    fake.mount(mocks::fetch_credential(21, SECRET).expect(1)).await;

    let env = env_for(&fake);
    let config = Config::from_lookup(|name| env.get(name).cloned()).unwrap();
    let client = PasswordSafeClient::new(config.password_safe).unwrap();

    let credential = client
        .checkout(&CheckoutParams::new(ACCOUNT_UPN, SYSTEM))
        .await
        .unwrap();

    let mut stdout = Vec::new();
    write_credential(&mut stdout, &credential).unwrap();
    let value: Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(value, json!({"username": ACCOUNT_UPN, "password": SECRET}));
}

#[tokio::test]
async fn failed_checkout_reports_step() {
    let fake = FakePasswordSafe::start().await;
    fake.mount(mocks::failing("POST", "Auth/SignAppin", 401, "API key expired"))
        .await;

    let env = env_for(&fake);
    let config = Config::from_lookup(|name| env.get(name).cloned()).unwrap();
    let client = PasswordSafeClient::new(config.password_safe).unwrap();

    let err = client
        .checkout(&CheckoutParams::new(ACCOUNT_UPN, SYSTEM))
        .await
        .unwrap_err();
    assert_eq!(err.step(), Some(CheckoutStep::Authenticate));
    assert!(err.to_string().contains("API key expired"));
}
