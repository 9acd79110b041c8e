use std::sync::Arc;

use anyhow::Result;

use crate::config::MailConfig;

mod smtp;
pub mod templates;

pub use smtp::SmtpMailClient;

#[derive(Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_html: Option<String>,
    pub body_text: Option<String>,
}

#[async_trait::async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

pub type DynMailClient = Arc<dyn MailClient>;

pub async fn create_mail_client(config: &MailConfig) -> Result<DynMailClient> {
    let client = SmtpMailClient::new(config)?;
    Ok(Arc::new(client))
}
