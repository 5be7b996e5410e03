//! Identity models: sessions, admin user rows, provider author personas.

use serde::{Deserialize, Serialize};

/// The signed-in identity with its derived flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub is_admin: bool,
    pub is_blocked: bool,
}

/// One row of the admin user table: a registered identity plus its flags
/// and a marker for the viewer's own row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub email: String,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub is_current_user: bool,
}

/// Request body for logging in. First sight of an email registers it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
}

/// Response body for the flag-toggling admin operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagChangeResponse {
    pub email: String,
    /// False when the account was already in the requested state.
    pub changed: bool,
}

/// An author persona from the content provider. Local posts reference one
/// by id; personas are held in memory only and vanish on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
}
