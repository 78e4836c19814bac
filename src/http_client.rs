use crate::gateway::Failure;
use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Create the HTTP client used to talk to the hosted backend
///
/// The timeout bounds every request so that an unresponsive backend shows up
/// as a failure instead of a page that never finishes loading.
pub fn backend_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create backend HTTP client")
}

/// Error payloads of the REST (`message`/`code`) and auth
/// (`msg`/`error_description`/`error`, `error_code`) endpoints.
#[derive(Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    code: Option<Value>,
    error_code: Option<String>,
}

/// Build a [`Failure`] out of an unsuccessful response body
pub fn failure_from_body(context_msg: &str, status: StatusCode, body: &str) -> Failure {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return Failure::with_code(
            format!("{context_msg} failed with status {status}: {}", body.trim()),
            status.as_u16().to_string(),
        );
    };

    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or_else(|| parsed.error.clone())
        .unwrap_or_else(|| format!("{context_msg} failed with status {status}"));

    let code = parsed
        .error_code
        .or_else(|| {
            parsed.code.map(|code| match code {
                Value::String(code) => code,
                other => other.to_string(),
            })
        })
        .or(parsed.error)
        .unwrap_or_else(|| status.as_u16().to_string());

    Failure::with_code(message, code)
}

pub fn transport_failure(context_msg: &str, e: reqwest::Error) -> Failure {
    if e.is_timeout() {
        return Failure::new(format!("{context_msg} timed out"));
    }

    Failure::new(format!("{context_msg} failed: {e}"))
}

/// Handle HTTP response by checking status and extracting body
///
/// # Arguments
/// * `res` - The HTTP response to handle
/// * `context_msg` - Context message describing the request (e.g., "GET songs")
///
/// # Returns
/// * `Ok(String)` - The response body if the status is successful
/// * `Err(Failure)` - The decoded remote error otherwise
pub async fn handle_http_response(res: Response, context_msg: &str) -> Result<String, Failure> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| transport_failure(context_msg, e))?;

    if !status.is_success() {
        return Err(failure_from_body(context_msg, status, &body));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgrest_error_keeps_message_and_code() {
        let body = r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value violates unique constraint"}"#;
        let failure = failure_from_body("POST playlist_songs", StatusCode::CONFLICT, body);

        assert_eq!(failure.code.as_deref(), Some("23505"));
        assert!(failure.message.starts_with("duplicate key"));
    }

    #[test]
    fn auth_error_uses_msg_and_error_code() {
        let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        let failure = failure_from_body("sign in", StatusCode::BAD_REQUEST, body);

        assert_eq!(failure.message, "Invalid login credentials");
        assert_eq!(failure.code.as_deref(), Some("invalid_credentials"));
    }

    #[test]
    fn oauth_style_error_is_understood() {
        let body = r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
        let failure = failure_from_body("sign in", StatusCode::BAD_REQUEST, body);

        assert_eq!(failure.message, "Email not confirmed");
        assert_eq!(failure.code.as_deref(), Some("invalid_grant"));
    }

    #[test]
    fn non_json_body_falls_back_to_status() {
        let failure = failure_from_body("GET songs", StatusCode::BAD_GATEWAY, "upstream down\n");

        assert_eq!(failure.code.as_deref(), Some("502"));
        assert!(failure.message.contains("upstream down"));
    }
}
