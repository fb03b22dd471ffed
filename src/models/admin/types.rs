use serde::{Deserialize, Serialize};

/// A reviewer account; signs in by username rather than email.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub number: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAdmin {
    pub name: String,
    pub username: String,
    pub email: String,
    pub number: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}
