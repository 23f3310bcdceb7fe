use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Mail API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail API rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Sends transactional email through an HTTP mail API. Without a configured
/// endpoint messages are logged and dropped.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
    dashboard_url: String,
}

impl Mailer {
    pub fn new(
        api_url: Option<String>,
        api_key: Option<String>,
        from: String,
        public_base_url: &str,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.map(|url| url.trim_end_matches('/').to_string()),
            api_key,
            from,
            dashboard_url: format!("{}/dashboard", public_base_url.trim_end_matches('/')),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_url.is_some()
    }

    pub fn policy_nudge(&self, to: &str, business_name: &str, message: &str) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject: format!("Action needed on your {business_name} page"),
            text: format!(
                "Hello {business_name},\n\n{message}\n\nReview your page: {}\n",
                self.dashboard_url
            ),
        }
    }

    pub fn status_notice(&self, to: &str, business_name: &str, status: &str, message: &str) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject: format!("Your {business_name} account is now {status}"),
            text: format!(
                "Hello {business_name},\n\n{message}\n\nDashboard: {}\n",
                self.dashboard_url
            ),
        }
    }

    pub async fn send(&self, message: EmailMessage) -> Result<(), MailerError> {
        let Some(api_url) = &self.api_url else {
            log::info!(
                "Mail delivery disabled, dropping '{}' to {}",
                message.subject,
                message.to
            );
            return Ok(());
        };

        let mut request = self.client.post(api_url).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected { status, body });
        }

        log::info!("Sent '{}' to {}", message.subject, message.to);
        Ok(())
    }

    /// Fires the message on a background task; failures are only logged.
    pub fn send_in_background(&self, message: EmailMessage) {
        let mailer = self.clone();
        actix_web::rt::spawn(async move {
            if let Err(err) = mailer.send(message).await {
                log::error!("Failed to deliver email: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> Mailer {
        Mailer::new(None, None, "pages@example.com".into(), "https://links.example.com/")
    }

    #[test]
    fn nudge_links_to_dashboard() {
        let message = mailer().policy_nudge("owner@bluedoor.test", "Blue Door", "Fix your link");
        assert_eq!(message.from, "pages@example.com");
        assert!(message.subject.contains("Blue Door"));
        assert!(message.text.contains("Fix your link"));
        assert!(message.text.contains("https://links.example.com/dashboard"));
    }

    #[actix_rt::test]
    async fn unconfigured_mailer_drops_silently() {
        let mailer = mailer();
        assert!(!mailer.is_enabled());
        let message = mailer.status_notice("owner@bluedoor.test", "Blue Door", "suspended", "Bye");
        assert!(mailer.send(message).await.is_ok());
    }
}
