// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token acquisition for each [`AuthType`].
//!
//! The grant strategies POST to the connection's login path and read
//! `access_token` from the JSON reply. A static key is used as-is, and a
//! static-key envelope without `api_key` yields no token.

use hearth_core::{AuthType, HearthError};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

fn auth_error(message: impl Into<String>) -> HearthError {
    HearthError::Authentication {
        message: message.into(),
    }
}

fn credential<'a>(credentials: &'a Value, field: &str) -> Result<&'a str, HearthError> {
    credentials
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| auth_error(format!("credentials missing `{field}`")))
}

/// Obtains a bearer token for `auth_type`, or `None` when the service is unauthenticated.
pub(crate) async fn acquire_token(
    http: &reqwest::Client,
    login_url: &str,
    auth_type: AuthType,
    credentials: &Value,
) -> Result<Option<String>, HearthError> {
    let request = match auth_type {
        // A missing key means the service is called without a bearer token.
        AuthType::StaticKey => {
            return Ok(credentials
                .get("api_key")
                .and_then(Value::as_str)
                .map(str::to_string));
        }
        AuthType::None => return Ok(None),
        AuthType::FormGrant => {
            let username = credential(credentials, "username")?;
            let password = credential(credentials, "password")?;
            http.post(login_url)
                .form(&[("username", username), ("password", password)])
        }
        AuthType::JsonGrant => http.post(login_url).json(credentials),
    };

    debug!(%auth_type, url = login_url, "requesting access token");
    let response = request
        .send()
        .await
        .map_err(|e| auth_error(format!("login request to {login_url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(auth_error(format!("login returned HTTP {}", status.as_u16())));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| auth_error(format!("login response is not JSON: {e}")))?;

    match body.access_token {
        Some(token) if !token.is_empty() => Ok(Some(token)),
        _ => Err(auth_error("login response has no access_token")),
    }
}
