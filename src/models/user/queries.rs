use sqlx::SqlitePool;

use super::types::{NewUser, User};
use crate::errors::AppError;

const COLUMNS: &str = "id, name, email, number, password, role, created_at";

/// Insert a new user and return the stored row. The role is always USER.
pub async fn create(pool: &SqlitePool, new_user: &NewUser, password_hash: &str) -> Result<User, AppError> {
    let result = sqlx::query(
        "INSERT INTO users (name, email, number, password) VALUES (?, ?, ?, ?)",
    )
    .bind(new_user.name.trim())
    .bind(new_user.email.trim())
    .bind(new_user.number.trim())
    .bind(password_hash)
    .execute(pool)
    .await?;

    let user = find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Duplicate-registration probe: true if any account already holds the
/// email or the phone number.
pub async fn email_or_number_exists(
    pool: &SqlitePool,
    email: &str,
    number: &str,
) -> Result<bool, AppError> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ? OR number = ?")
            .bind(email.trim())
            .bind(number.trim())
            .fetch_one(pool)
            .await?;
    Ok(row.0 > 0)
}

pub async fn count(pool: &SqlitePool) -> Result<i64, AppError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    let users =
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC"))
            .fetch_all(pool)
            .await?;
    Ok(users)
}
