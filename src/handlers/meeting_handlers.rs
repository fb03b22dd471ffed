use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::auth::session::{self, Role};
use crate::errors::AppError;
use crate::mail::Mailer;
use crate::meeting_api::MeetingApiClient;
use crate::models::meeting::{NewMeeting, ScheduleMeeting};
use crate::models::{admin, meeting, user};

const MEETING_DURATION_MINUTES: i64 = 40;

/// POST /api/v1/meeting — admin schedules a review meeting with a user.
///
/// Remote meeting first, then the local record, then the invitation email.
/// Any downstream failure surfaces as-is; there is no retry and no
/// idempotency guard, so a client retry schedules a second meeting.
pub async fn create(
    pool: web::Data<SqlitePool>,
    api: web::Data<MeetingApiClient>,
    mailer: web::Data<Mailer>,
    session: Session,
    body: web::Json<ScheduleMeeting>,
) -> Result<HttpResponse, AppError> {
    let subject = session::require_role(&session, Role::Admin)?;

    let sender = admin::find_by_id(&pool, subject.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
    let invitee = user::find_by_id(&pool, body.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let start = NaiveDateTime::parse_from_str(
        &format!("{} {}", body.date, body.time),
        "%Y-%m-%d %H:%M",
    )
    .map_err(|_| AppError::Validation("Invalid meeting date or time".to_string()))?;
    let start_time = start.format("%Y-%m-%dT%H:%M:%S").to_string();

    let remote = api
        .create_meeting(&body.topic, &start_time, MEETING_DURATION_MINUTES)
        .await?;

    let record = meeting::create(
        &pool,
        &NewMeeting {
            meeting_date: start_time,
            meeting_duration: MEETING_DURATION_MINUTES,
            meeting_topic: body.topic.clone(),
            meeting_link: remote.join_url,
            meeting_start_url: remote.start_url,
            sender_email: sender.email,
            reciever_email: body.email.clone(),
        },
    )
    .await?;

    mailer
        .send_meeting_invite(
            &invitee.name,
            &body.email,
            &record.meeting_topic,
            &record.meeting_date,
            &record.meeting_link,
        )
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Meeting scheduled successfully",
        "meeting": record,
    })))
}
