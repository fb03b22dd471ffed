use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::errors::AppError;

/// SMTP mailer for meeting invitations. When SMTP is not configured the
/// service still runs; sending fails with an upstream error.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let transport = match &config.smtp_host {
            Some(host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                    .map_err(|e| AppError::Upstream(format!("Bad SMTP configuration: {e}")))?
                    .port(config.smtp_port);
                if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_pass) {
                    builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
                }
                Some(builder.build())
            }
            None => {
                log::warn!("No SMTP_HOST set — notification email disabled");
                None
            }
        };

        Ok(Mailer {
            transport,
            from: config.smtp_from.clone(),
        })
    }

    pub async fn send_meeting_invite(
        &self,
        recipient_name: &str,
        recipient_email: &str,
        topic: &str,
        meeting_date: &str,
        meeting_link: &str,
    ) -> Result<(), AppError> {
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| AppError::Upstream("Email is not configured".to_string()))?;

        let html = format!(
            "<p>Hello {recipient_name},</p>\
             <p>A meeting has been scheduled to discuss your proposal.</p>\
             <p><strong>Topic:</strong> {topic}<br>\
             <strong>When:</strong> {meeting_date}</p>\
             <p><a href=\"{meeting_link}\">Join the meeting</a></p>"
        );

        let message = Message::builder()
            .from(self
                .from
                .parse()
                .map_err(|e| AppError::Upstream(format!("Bad sender address: {e}")))?)
            .to(recipient_email
                .parse()
                .map_err(|e| AppError::Upstream(format!("Bad recipient address: {e}")))?)
            .subject(format!("Meeting scheduled: {topic}"))
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::Upstream(format!("Failed to build email: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to send email: {e}")))?;
        Ok(())
    }
}
