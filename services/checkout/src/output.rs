//! Credential output for the consuming process.

use password_safe_client::Credential;
use secrecy::ExposeSecret;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct CredentialOutput<'a> {
    username: &'a str,
    password: &'a str,
}

/// Write `credential` as one line of JSON: `{"username":..,"password":..}`.
///
/// The secret is serialized straight from its protected buffer; no
/// intermediate copy is kept.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_credential<W: Write>(writer: &mut W, credential: &Credential) -> io::Result<()> {
    let output = CredentialOutput {
        username: credential.username(),
        password: credential.secret().expose_secret(),
    };
    serde_json::to_writer(&mut *writer, &output)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_writes_single_json_line() {
        let credential = Credential::new("svc1@corp.example.com", SecretString::from("p\"w"));
        let mut buffer = Vec::new();
        write_credential(&mut buffer, &credential).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["username"], "svc1@corp.example.com");
        assert_eq!(value["password"], "p\"w");
    }
}
