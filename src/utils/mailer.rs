// Envoi des emails de vérification
//
// Deux implémentations derrière le trait Mailer:
//   - LogMailer : écrit le message dans les logs (dev, tests)
//   - BrevoMailer : API HTTP transactionnelle de Brevo

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::BrevoConfig;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub to_email: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub text: String,
}

impl MailMessage {
    /// Email contenant le lien de vérification du compte
    pub fn verification(to_email: &str, to_name: &str, public_base_url: &str, token: &str) -> Self {
        let link = format!("{}/verify-email?token={}", public_base_url, token);
        Self {
            to_email: to_email.to_string(),
            to_name: Some(to_name.to_string()),
            subject: "Verify your email".to_string(),
            text: format!(
                "Hello {},\n\nPlease verify your email address by opening this link:\n{}\n\nThe link expires in 24 hours.",
                to_name, link
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(to = %message.to_email, subject = %message.subject, body = %message.text, "📧 mail (log only)");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody {
    sender: BrevoEmailAddress,
    to: Vec<BrevoEmailAddress>,
    subject: String,
    text_content: String,
}

pub struct BrevoMailer {
    client: reqwest::Client,
    config: BrevoConfig,
}

impl BrevoMailer {
    pub fn new(config: BrevoConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn body(&self, message: &MailMessage) -> BrevoSendEmailBody {
        BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: self.config.sender_email.clone(),
                name: self.config.sender_name.clone(),
            },
            to: vec![BrevoEmailAddress {
                email: message.to_email.clone(),
                name: message.to_name.clone(),
            }],
            subject: message.subject.clone(),
            text_content: message.text.clone(),
        }
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.config.api_key)
            .header("Accept", "application/json")
            .json(&self.body(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status: status.as_u16(), body });
        }

        tracing::info!(to = %message.to_email, "📧 mail sent through Brevo");
        Ok(())
    }
}
