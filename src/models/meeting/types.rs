use serde::{Deserialize, Serialize};

/// A scheduled meeting, recorded after the remote meeting resource was
/// created. The `recieverEmail` spelling is the original wire contract.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: i64,
    pub meeting_date: String,
    pub meeting_duration: i64,
    pub meeting_topic: String,
    pub meeting_link: String,
    pub meeting_start_url: String,
    pub sender_email: String,
    pub reciever_email: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub meeting_date: String,
    pub meeting_duration: i64,
    pub meeting_topic: String,
    pub meeting_link: String,
    pub meeting_start_url: String,
    pub sender_email: String,
    pub reciever_email: String,
}

/// Scheduling request: `id` is the invitee's user id.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleMeeting {
    pub topic: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub id: i64,
}
