use anyhow::{Result, anyhow};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::{EmailMessage, MailClient};
use crate::config::MailConfig;

pub struct SmtpMailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: String,
}

impl SmtpMailClient {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }
}

#[async_trait::async_trait]
impl MailClient for SmtpMailClient {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let from_address = format!("{} <{}>", self.from_name, self.from_email);

        let email_builder = Message::builder()
            .from(
                from_address
                    .parse()
                    .map_err(|e| anyhow!("Invalid from address: {}", e))?,
            )
            .to(message
                .to
                .parse()
                .map_err(|e| anyhow!("Invalid to address: {}", e))?)
            .subject(&message.subject);

        let email = match (&message.body_html, &message.body_text) {
            (Some(html), Some(text)) => email_builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(text.clone()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(html.clone()),
                        ),
                )
                .map_err(|e| anyhow!("Failed to build email: {}", e))?,
            (Some(html), None) => email_builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .map_err(|e| anyhow!("Failed to build email: {}", e))?,
            (None, Some(text)) => email_builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.clone())
                .map_err(|e| anyhow!("Failed to build email: {}", e))?,
            (None, None) => {
                return Err(anyhow!("Email must have either HTML or text body"));
            }
        };

        self.transport
            .send(email)
            .await
            .map_err(|e| anyhow!("Failed to send email via SMTP: {}", e))?;

        Ok(())
    }
}
