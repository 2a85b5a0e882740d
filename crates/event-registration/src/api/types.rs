//! API request and response types.

use crate::auth::AdminClaims;
use serde::{Deserialize, Deserializer, Serialize};

/// Registration form submission.
///
/// Unknown fields (including any client-sent `registrationTime`) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationRequest {
    #[serde(deserialize_with = "coerce_string")]
    pub table_number: String,

    #[serde(deserialize_with = "coerce_string")]
    pub name: String,

    #[serde(deserialize_with = "coerce_string")]
    pub phone_number: String,
}

/// Accept any scalar and store its textual form; `null` becomes empty.
fn coerce_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// `?date=` query parameter shared by the admin and download endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Admin login request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

/// Token verification request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenVerifyRequest {
    pub present_token: String,
}

/// Successful token verification. The admin page reads the claims from `date`.
#[derive(Debug, Serialize)]
pub struct TokenVerifyResponse {
    pub success: bool,
    pub date: AdminClaims,
}
