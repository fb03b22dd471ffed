use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

use crate::auth::policy::{self, Action};
use crate::auth::session::{self, Role};
use crate::errors::AppError;
use crate::models::proposal;
use crate::models::proposal::types::{ProposalStatus, StatusChange};

/// PATCH /api/v1/proposal/{id} — the single admin status-change action.
///
/// REJECTED stores the flagged fields and remarks and thereby re-opens the
/// proposal for the owner; any other status clears the flags. An empty
/// `rejectedFields` list on REJECTED is accepted here — requiring at least
/// one flagged field is the admin client's invariant, not the server's.
pub async fn change_status(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<StatusChange>,
) -> Result<HttpResponse, AppError> {
    session::require_role(&session, Role::Admin)?;
    let id = path.into_inner();

    let existing = proposal::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

    // Approval is terminal: the policy table denies admin edit afterwards.
    if !policy::permits(Role::Admin, existing.status, Action::Edit) {
        return Err(AppError::Forbidden(
            "Approved proposals can no longer be reviewed".to_string(),
        ));
    }

    if body.status == ProposalStatus::Rejected && body.rejected_fields.is_empty() {
        log::warn!("Proposal {id} rejected without any highlighted fields");
    }

    proposal::update_status(&pool, id, body.status, &body.rejected_fields, &body.remarks).await?;

    let updated = proposal::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Proposal Status Updated",
        "proposal": updated.for_role(Role::Admin),
    })))
}
