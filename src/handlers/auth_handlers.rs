use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

use crate::auth::session::{self, Role};
use crate::auth::{password, validate};
use crate::errors::AppError;
use crate::models::{admin, user};
use crate::models::user::{NewUser, UserCredentials};

/// POST /api/v1/auth/user/sign-up
pub async fn sign_up(
    pool: web::Data<SqlitePool>,
    session: Session,
    body: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
    if let Some(msg) = validate::validate_email(&body.email) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_required(&body.name, "Name", 100) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_number(&body.number) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_password(&body.password) {
        return Err(AppError::Validation(msg));
    }

    if user::email_or_number_exists(&pool, &body.email, &body.number).await? {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let hash = password::hash_password(&body.password)?;
    let created = user::create(&pool, &body, &hash).await?;
    session::establish(&session, created.id, Role::User)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "user": created,
    })))
}

/// POST /api/v1/auth/user/sign-in
pub async fn sign_in(
    pool: web::Data<SqlitePool>,
    session: Session,
    body: web::Json<UserCredentials>,
) -> Result<HttpResponse, AppError> {
    if let Some(msg) = validate::validate_email(&body.email) {
        return Err(AppError::Validation(msg));
    }

    let found = user::find_by_email(&pool, &body.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !password::verify_password(&body.password, &found.password)? {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    session::establish(&session, found.id, Role::User)?;

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "success": true,
        "user": found,
    })))
}

/// GET /api/v1/auth/verify
///
/// The "am I logged in" probe: reloads the record behind the session
/// subject and returns the sanitized profile. Shared by both namespaces.
pub async fn verify(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let subject = session::subject(&session)?;

    let profile = match subject.role {
        Role::User => {
            let found = user::find_by_id(&pool, subject.id)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
            serde_json::to_value(found)?
        }
        Role::Admin => {
            let found = admin::find_by_id(&pool, subject.id)
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
            serde_json::to_value(found)?
        }
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": profile,
    })))
}

/// GET /api/v1/auth/logout
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Logout",
    })))
}
