use sqlx::SqlitePool;

use super::types::*;
use crate::errors::AppError;

const COLUMNS: &str = "id, title, description, objective, duration, budget, \
                       address, bank_details, income_details, land_details, \
                       documents, status, highlighted_fields, remarks, \
                       user_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProposalRow {
    id: i64,
    title: String,
    description: String,
    objective: String,
    duration: String,
    budget: String,
    address: String,
    bank_details: String,
    income_details: String,
    land_details: String,
    documents: String,
    status: String,
    highlighted_fields: String,
    remarks: String,
    user_id: i64,
    created_at: String,
    updated_at: String,
}

impl From<ProposalRow> for Proposal {
    fn from(row: ProposalRow) -> Proposal {
        Proposal {
            id: row.id,
            title: row.title,
            description: row.description,
            objective: row.objective,
            duration: row.duration,
            budget: row.budget,
            address: serde_json::from_str(&row.address).unwrap_or_default(),
            bank_details: serde_json::from_str(&row.bank_details).unwrap_or_default(),
            income_details: serde_json::from_str(&row.income_details).unwrap_or_default(),
            land_details: serde_json::from_str(&row.land_details).unwrap_or_default(),
            documents: serde_json::from_str(&row.documents).unwrap_or_default(),
            status: ProposalStatus::parse(&row.status),
            highlighted_fields: serde_json::from_str(&row.highlighted_fields).unwrap_or_default(),
            edit_enable: false,
            delete_enable: false,
            remarks: row.remarks,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create a proposal in one write, with its final document references.
/// Status starts as PENDING.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    input: &ProposalInput,
    documents: &Documents,
) -> Result<Proposal, AppError> {
    let result = sqlx::query(
        "INSERT INTO proposals \
         (title, description, objective, duration, budget, \
          address, bank_details, income_details, land_details, \
          documents, remarks, user_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.objective)
    .bind(&input.duration)
    .bind(&input.budget)
    .bind(serde_json::to_string(&input.address())?)
    .bind(serde_json::to_string(&input.bank_details())?)
    .bind(serde_json::to_string(&input.income_details())?)
    .bind(serde_json::to_string(&input.land_details())?)
    .bind(serde_json::to_string(documents)?)
    .bind(&input.remarks)
    .bind(user_id)
    .execute(pool)
    .await?;

    let proposal = find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;
    Ok(proposal)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Proposal>, AppError> {
    let row =
        sqlx::query_as::<_, ProposalRow>(&format!("SELECT {COLUMNS} FROM proposals WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(Proposal::from))
}

/// Owner-scoped lookup; a miss on someone else's proposal is
/// indistinguishable from a miss on a nonexistent one.
pub async fn find_owned(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<Option<Proposal>, AppError> {
    let row = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {COLUMNS} FROM proposals WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Proposal::from))
}

pub async fn find_all_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Proposal>, AppError> {
    let rows = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {COLUMNS} FROM proposals WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Proposal::from).collect())
}

pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Proposal>, AppError> {
    let rows = sqlx::query_as::<_, ProposalRow>(&format!(
        "SELECT {COLUMNS} FROM proposals ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Proposal::from).collect())
}

/// Owner-scoped edit-resubmission. Rewrites the text fields and
/// sub-objects, clears the highlighted fields, and leaves the status
/// untouched for re-review. Returns false when no owned row matched.
pub async fn update_fields(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    input: &ProposalInput,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE proposals SET \
         title = ?, description = ?, objective = ?, duration = ?, budget = ?, \
         address = ?, bank_details = ?, income_details = ?, land_details = ?, \
         remarks = ?, highlighted_fields = '[]', updated_at = datetime('now') \
         WHERE id = ? AND user_id = ?",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.objective)
    .bind(&input.duration)
    .bind(&input.budget)
    .bind(serde_json::to_string(&input.address())?)
    .bind(serde_json::to_string(&input.bank_details())?)
    .bind(serde_json::to_string(&input.income_details())?)
    .bind(serde_json::to_string(&input.land_details())?)
    .bind(&input.remarks)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Admin status change. REJECTED stores the highlighted fields; any other
/// status clears them. Remarks are always stored.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: ProposalStatus,
    highlighted_fields: &[String],
    remarks: &str,
) -> Result<(), AppError> {
    let highlighted = if status == ProposalStatus::Rejected {
        serde_json::to_string(highlighted_fields)?
    } else {
        "[]".to_string()
    };

    sqlx::query(
        "UPDATE proposals SET status = ?, highlighted_fields = ?, remarks = ?, \
         updated_at = datetime('now') WHERE id = ?",
    )
    .bind(status.as_str())
    .bind(highlighted)
    .bind(remarks)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Owner-scoped delete. Returns false when no owned row matched.
pub async fn delete_owned(pool: &SqlitePool, id: i64, user_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM proposals WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
