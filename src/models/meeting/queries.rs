use sqlx::SqlitePool;

use super::types::{Meeting, NewMeeting};
use crate::errors::AppError;

const COLUMNS: &str = "id, meeting_date, meeting_duration, meeting_topic, meeting_link, \
                       meeting_start_url, sender_email, reciever_email, created_at";

pub async fn create(pool: &SqlitePool, new_meeting: &NewMeeting) -> Result<Meeting, AppError> {
    let result = sqlx::query(
        "INSERT INTO meetings \
         (meeting_date, meeting_duration, meeting_topic, meeting_link, \
          meeting_start_url, sender_email, reciever_email) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&new_meeting.meeting_date)
    .bind(new_meeting.meeting_duration)
    .bind(&new_meeting.meeting_topic)
    .bind(&new_meeting.meeting_link)
    .bind(&new_meeting.meeting_start_url)
    .bind(&new_meeting.sender_email)
    .bind(&new_meeting.reciever_email)
    .execute(pool)
    .await?;

    let meeting = find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| AppError::NotFound("Meeting not found".to_string()))?;
    Ok(meeting)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Meeting>, AppError> {
    let meeting =
        sqlx::query_as::<_, Meeting>(&format!("SELECT {COLUMNS} FROM meetings WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(meeting)
}
