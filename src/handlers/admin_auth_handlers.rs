use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

use crate::auth::session::{self, Role};
use crate::auth::{password, validate};
use crate::errors::AppError;
use crate::models::admin;
use crate::models::admin::{AdminCredentials, NewAdmin};

/// POST /api/v1/auth/admin/sign-up
pub async fn sign_up(
    pool: web::Data<SqlitePool>,
    session: Session,
    body: web::Json<NewAdmin>,
) -> Result<HttpResponse, AppError> {
    if let Some(msg) = validate::validate_email(&body.email) {
        return Err(AppError::Validation(msg));
    }
    if let Some(msg) = validate::validate_username(&body.username) {
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

    if admin::exists(&pool, &body.username, &body.email, &body.number).await? {
        return Err(AppError::Validation("Username already exists".to_string()));
    }

    let hash = password::hash_password(&body.password)?;
    let created = admin::create(&pool, &body, &hash).await?;
    session::establish(&session, created.id, Role::Admin)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "user": created,
    })))
}

/// POST /api/v1/auth/admin/sign-in
pub async fn sign_in(
    pool: web::Data<SqlitePool>,
    session: Session,
    body: web::Json<AdminCredentials>,
) -> Result<HttpResponse, AppError> {
    let found = admin::find_by_username(&pool, &body.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    if !password::verify_password(&body.password, &found.password)? {
        return Err(AppError::Unauthorized("Invalid username or password".to_string()));
    }

    session::establish(&session, found.id, Role::Admin)?;

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "success": true,
        "user": found,
    })))
}
