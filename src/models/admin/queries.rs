use sqlx::SqlitePool;

use super::types::{Admin, NewAdmin};
use crate::errors::AppError;

const COLUMNS: &str = "id, name, username, email, number, password, created_at";

pub async fn create(pool: &SqlitePool, new_admin: &NewAdmin, password_hash: &str) -> Result<Admin, AppError> {
    let result = sqlx::query(
        "INSERT INTO admins (name, username, email, number, password) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(new_admin.name.trim())
    .bind(new_admin.username.trim())
    .bind(new_admin.email.trim())
    .bind(new_admin.number.trim())
    .bind(password_hash)
    .execute(pool)
    .await?;

    let admin = find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;
    Ok(admin)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Admin>, AppError> {
    let admin = sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(admin)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<Admin>, AppError> {
    let admin =
        sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins WHERE username = ?"))
            .bind(username.trim())
            .fetch_optional(pool)
            .await?;
    Ok(admin)
}

/// Duplicate-registration probe across the admin identifying fields.
pub async fn exists(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    number: &str,
) -> Result<bool, AppError> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM admins WHERE username = ? OR email = ? OR number = ?",
    )
    .bind(username.trim())
    .bind(email.trim())
    .bind(number.trim())
    .fetch_one(pool)
    .await?;
    Ok(row.0 > 0)
}
