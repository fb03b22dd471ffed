use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

use crate::auth::policy::{self, Action};
use crate::auth::session::{self, Role};
use crate::auth::validate;
use crate::errors::AppError;
use crate::models::proposal;
use crate::models::proposal::types::{Documents, ProposalInput};
use crate::storage::{self, ObjectStore, StagedFile};

/// Multipart submission: the flat proposal fields as text parts plus a
/// `files` array of exactly three attachments in order photo, address
/// proof, income proof. The multipart middleware stages the files to temp
/// disk; they are removed when the form is dropped.
#[derive(Debug, MultipartForm)]
pub struct ProposalUpload {
    #[multipart(rename = "files", limit = "10MiB")]
    pub files: Vec<TempFile>,

    pub title: Text<String>,
    pub description: Text<String>,
    pub objective: Text<String>,
    pub duration: Text<String>,
    pub budget: Text<String>,
    pub state: Text<String>,
    pub district: Text<String>,
    pub pincode: Text<String>,
    #[multipart(rename = "postOffice")]
    pub post_office: Text<String>,
    #[multipart(rename = "policeStation")]
    pub police_station: Text<String>,
    pub address: Text<String>,
    #[multipart(rename = "bankName")]
    pub bank_name: Text<String>,
    pub ifsc: Text<String>,
    #[multipart(rename = "accountNumber")]
    pub account_number: Text<String>,
    #[multipart(rename = "bankBranch")]
    pub bank_branch: Text<String>,
    #[multipart(rename = "incomeSource")]
    pub income_source: Text<String>,
    #[multipart(rename = "incomeAmount")]
    pub income_amount: Text<String>,
    #[multipart(rename = "ownerName")]
    pub owner_name: Text<String>,
    #[multipart(rename = "ownerNumber")]
    pub owner_number: Text<String>,
    #[multipart(rename = "ownerEmail")]
    pub owner_email: Text<String>,
    #[multipart(rename = "landLocation")]
    pub land_location: Text<String>,
    #[multipart(rename = "landArea")]
    pub land_area: Text<String>,
    #[multipart(rename = "landType")]
    pub land_type: Text<String>,
    pub usage: Text<String>,
    #[multipart(rename = "ownershipStatus")]
    pub ownership_status: Text<String>,
    #[multipart(rename = "landDescription")]
    pub land_description: Text<String>,
    pub remarks: Option<Text<String>>,
}

impl ProposalUpload {
    fn input(&self) -> ProposalInput {
        ProposalInput {
            title: self.title.0.clone(),
            description: self.description.0.clone(),
            objective: self.objective.0.clone(),
            duration: self.duration.0.clone(),
            budget: self.budget.0.clone(),
            state: self.state.0.clone(),
            district: self.district.0.clone(),
            pincode: self.pincode.0.clone(),
            post_office: self.post_office.0.clone(),
            police_station: self.police_station.0.clone(),
            address: self.address.0.clone(),
            bank_name: self.bank_name.0.clone(),
            ifsc: self.ifsc.0.clone(),
            account_number: self.account_number.0.clone(),
            bank_branch: self.bank_branch.0.clone(),
            income_source: self.income_source.0.clone(),
            income_amount: self.income_amount.0.clone(),
            owner_name: self.owner_name.0.clone(),
            owner_number: self.owner_number.0.clone(),
            owner_email: self.owner_email.0.clone(),
            land_location: self.land_location.0.clone(),
            land_area: self.land_area.0.clone(),
            land_type: self.land_type.0.clone(),
            usage: self.usage.0.clone(),
            ownership_status: self.ownership_status.0.clone(),
            land_description: self.land_description.0.clone(),
            remarks: self.remarks.as_ref().map(|t| t.0.clone()).unwrap_or_default(),
        }
    }
}

/// POST /api/v1/proposal
///
/// Uploads are staged first; the proposal row is written once, with its
/// final document references, only after all three uploads succeeded.
pub async fn create(
    pool: web::Data<SqlitePool>,
    store: web::Data<ObjectStore>,
    session: Session,
    MultipartForm(form): MultipartForm<ProposalUpload>,
) -> Result<HttpResponse, AppError> {
    let subject = session::require_role(&session, Role::User)?;

    if form.files.len() != 3 {
        return Err(AppError::Validation(
            "Exactly three documents are required: photo, address proof, income proof".to_string(),
        ));
    }
    if let Some(msg) = validate::validate_required(&form.title.0, "Title", 200) {
        return Err(AppError::Validation(msg));
    }

    let staged: Vec<StagedFile> = form
        .files
        .iter()
        .enumerate()
        .map(|(i, f)| StagedFile {
            path: f.file.path().to_path_buf(),
            name: f.file_name.clone().unwrap_or_else(|| format!("document-{i}")),
        })
        .collect();

    let folder = format!("pms/{}", subject.id);
    let uploaded = storage::upload_all(&store, &staged, &folder).await?;

    let documents = Documents {
        photo: uploaded[0].clone(),
        address_proof: uploaded[1].clone(),
        income_proof: uploaded[2].clone(),
    };

    let input = form.input();
    let created = proposal::create(&pool, subject.id, &input, &documents).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Proposal Added",
        "proposal": created.for_role(Role::User),
    })))
}

/// GET /api/v1/proposal — the caller's own proposals.
pub async fn list(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let subject = session::require_role(&session, Role::User)?;

    let proposals: Vec<_> = proposal::find_all_for_user(&pool, subject.id)
        .await?
        .into_iter()
        .map(|p| p.for_role(Role::User))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "proposals": proposals,
    })))
}

/// GET /api/v1/proposal/all — every proposal, admin only.
pub async fn list_all(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    session::require_role(&session, Role::Admin)?;

    let proposals: Vec<_> = proposal::find_all(&pool)
        .await?
        .into_iter()
        .map(|p| p.for_role(Role::Admin))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "proposals": proposals,
    })))
}

/// GET /api/v1/proposal/{id}
///
/// Users see only their own proposal (a foreign id is a plain 404);
/// admins see any. The permission flags are computed for the caller.
pub async fn detail(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let subject = session::subject(&session)?;
    let id = path.into_inner();

    let found = match subject.role {
        Role::Admin => proposal::find_by_id(&pool, id).await?,
        Role::User => proposal::find_owned(&pool, id, subject.id).await?,
    };
    let found = found.ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "proposal": found.for_role(subject.role),
    })))
}

/// PUT /api/v1/proposal/{id}
///
/// Edit-resubmission by the owner, permitted only while the policy grants
/// edit (status REJECTED). Clears the highlighted fields; the status stays
/// REJECTED until the admin re-reviews. Last write wins.
pub async fn update(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<ProposalInput>,
) -> Result<HttpResponse, AppError> {
    let subject = session::require_role(&session, Role::User)?;
    let id = path.into_inner();

    let existing = proposal::find_owned(&pool, id, subject.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

    if !policy::permits(Role::User, existing.status, Action::Edit) {
        return Err(AppError::Forbidden(
            "Proposal can only be edited after rejection".to_string(),
        ));
    }

    proposal::update_fields(&pool, id, subject.id, &body).await?;
    let updated = proposal::find_owned(&pool, id, subject.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Proposal not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Proposal Updated",
        "proposal": updated.for_role(Role::User),
    })))
}

/// DELETE /api/v1/proposal/{id} — owner-scoped; a foreign id is a 404.
pub async fn delete(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let subject = session::require_role(&session, Role::User)?;

    let deleted = proposal::delete_owned(&pool, path.into_inner(), subject.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Proposal not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Proposal Deleted",
    })))
}
