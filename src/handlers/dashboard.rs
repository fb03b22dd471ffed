use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::auth::session::{self, Role};
use crate::errors::AppError;
use crate::models::proposal::types::{Proposal, ProposalStatus};
use crate::models::{proposal, user};

/// In-process partition of proposals by status. No SQL aggregation; the
/// proposal volume per deployment is small.
pub fn partition_by_status(proposals: Vec<Proposal>) -> (Vec<Proposal>, Vec<Proposal>, Vec<Proposal>) {
    let mut pending = Vec::new();
    let mut approved = Vec::new();
    let mut rejected = Vec::new();
    for p in proposals {
        match p.status {
            ProposalStatus::Pending => pending.push(p),
            ProposalStatus::Approved => approved.push(p),
            ProposalStatus::Rejected => rejected.push(p),
        }
    }
    (pending, approved, rejected)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminDashboard {
    success: bool,
    total_users: i64,
    total_proposals: usize,
    pending_proposals: Vec<Proposal>,
    approved_proposals: Vec<Proposal>,
    rejected_proposals: Vec<Proposal>,
}

/// GET /api/v1/admin/dashboard
pub async fn admin_dashboard(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    session::require_role(&session, Role::Admin)?;

    let total_users = user::count(&pool).await?;
    let proposals: Vec<_> = proposal::find_all(&pool)
        .await?
        .into_iter()
        .map(|p| p.for_role(Role::Admin))
        .collect();
    let total_proposals = proposals.len();
    let (pending, approved, rejected) = partition_by_status(proposals);

    Ok(HttpResponse::Ok().json(AdminDashboard {
        success: true,
        total_users,
        total_proposals,
        pending_proposals: pending,
        approved_proposals: approved,
        rejected_proposals: rejected,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDashboard {
    success: bool,
    total_proposals: usize,
    proposals: Vec<Proposal>,
    pending_proposals: usize,
    approved_proposals: usize,
    rejected_proposals: usize,
}

/// GET /api/v1/user/dashboard
pub async fn user_dashboard(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let subject = session::require_role(&session, Role::User)?;

    let proposals: Vec<_> = proposal::find_all_for_user(&pool, subject.id)
        .await?
        .into_iter()
        .map(|p| p.for_role(Role::User))
        .collect();

    let pending = proposals.iter().filter(|p| p.status == ProposalStatus::Pending).count();
    let approved = proposals.iter().filter(|p| p.status == ProposalStatus::Approved).count();
    let rejected = proposals.iter().filter(|p| p.status == ProposalStatus::Rejected).count();

    Ok(HttpResponse::Ok().json(UserDashboard {
        success: true,
        total_proposals: proposals.len(),
        proposals,
        pending_proposals: pending,
        approved_proposals: approved,
        rejected_proposals: rejected,
    }))
}

/// GET /api/v1/users — all submitter accounts, sanitized; admin only.
pub async fn list_users(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    session::require_role(&session, Role::Admin)?;

    let users = user::find_all(&pool).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "users": users,
    })))
}
