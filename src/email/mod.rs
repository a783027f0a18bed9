pub mod templates;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

pub struct SystemMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SystemMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("System SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    pub async fn send_ticket_assigned(
        &self,
        to_email: &str,
        to_name: &str,
        ticket_title: &str,
        base_url: &str,
    ) -> Result<(), String> {
        let html = templates::render_ticket_assigned(to_name, ticket_title, base_url);
        self.send(
            to_email,
            &format!("Ticket assigned to you: {ticket_title}"),
            &html,
        )
        .await
    }

    pub async fn send_equipment_assigned(
        &self,
        to_email: &str,
        to_name: &str,
        equipment_summary: &str,
        base_url: &str,
    ) -> Result<(), String> {
        let html = templates::render_equipment_assigned(to_name, equipment_summary, base_url);
        self.send(
            to_email,
            &format!("Equipment assigned to you: {equipment_summary}"),
            &html,
        )
        .await
    }

    pub async fn send_backup_result(
        &self,
        to_email: &str,
        archive_name: &str,
        success: bool,
    ) -> Result<(), String> {
        let html = templates::render_backup_result(archive_name, success);
        let status = if success { "completed" } else { "failed" };
        self.send(to_email, &format!("Backup {status}: {archive_name}"), &html)
            .await
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}
