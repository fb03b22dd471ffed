use serde::{Deserialize, Serialize};

/// A submitter account. The password hash never serializes, so any `User`
/// written to a response body is already the sanitized profile.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub number: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub created_at: String,
}

/// Sign-up payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub number: String,
    pub password: String,
}

/// Sign-in payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}
