use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The two credential namespaces share one token scheme; the role rides in
/// the session next to the record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// The authenticated caller: record id plus namespace.
#[derive(Debug, Clone, Copy)]
pub struct Subject {
    pub id: i64,
    pub role: Role,
}

/// Write the subject into the session cookie after sign-up/sign-in.
pub fn establish(session: &Session, id: i64, role: Role) -> Result<(), AppError> {
    session
        .insert("subject_id", id)
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert("role", role)
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(())
}

/// Read the subject back out of the session, or 401.
pub fn subject(session: &Session) -> Result<Subject, AppError> {
    let id = session
        .get::<i64>("subject_id")
        .unwrap_or(None)
        .ok_or_else(|| AppError::Unauthorized("Token not found".to_string()))?;
    let role = session
        .get::<Role>("role")
        .unwrap_or(None)
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
    Ok(Subject { id, role })
}

/// Role gate consulted at the top of role-restricted handlers; 403 on
/// mismatch regardless of valid authentication.
pub fn require_role(session: &Session, role: Role) -> Result<Subject, AppError> {
    let subject = subject(session)?;
    if subject.role != role {
        return Err(AppError::Forbidden(format!(
            "Resource restricted to {} accounts",
            role.as_str()
        )));
    }
    Ok(subject)
}
