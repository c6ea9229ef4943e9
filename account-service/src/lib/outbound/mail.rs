use async_trait::async_trait;
use serde::Serialize;

use crate::config::MailConfig;
use crate::domain::auth::errors::MailError;
use crate::domain::auth::models::SharePuzzleCommand;
use crate::domain::auth::ports::MailGateway;
use crate::domain::user::models::Identity;

/// Body accepted by the mailer's send endpoint.
#[derive(Debug, Serialize)]
struct SendMailRequest {
    to: String,
    template: String,
    link: String,
}

/// Delivers mail through the separate mailer service over HTTP.
pub struct HttpMailGateway {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailGateway {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn send(&self, request: SendMailRequest) -> Result<(), MailError> {
        let url = format!("{}/send", self.config.service_url);

        tracing::debug!(template = %request.template, "Dispatching mail");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(MailError::Delivery(format!("HTTP {status}: {body}")))
        }
    }
}

#[async_trait]
impl MailGateway for HttpMailGateway {
    async fn send_account_activation(
        &self,
        identity: &Identity,
        token: &str,
    ) -> Result<(), MailError> {
        self.send(SendMailRequest {
            to: identity.email.clone(),
            template: "active".to_string(),
            link: format!(
                "{}/auth/valid-mail?token={}",
                self.config.backend_url, token
            ),
        })
        .await
    }

    async fn send_password_reset(
        &self,
        identity: &Identity,
        token: &str,
    ) -> Result<(), MailError> {
        self.send(SendMailRequest {
            to: identity.email.clone(),
            template: "forgot".to_string(),
            link: format!(
                "{}/changePassword?token={}&userName={}",
                self.config.frontend_url, token, identity.user_name
            ),
        })
        .await
    }

    async fn send_puzzle_invite(
        &self,
        command: &SharePuzzleCommand,
        token: &str,
    ) -> Result<(), MailError> {
        self.send(SendMailRequest {
            to: command.recipient.as_str().to_string(),
            template: "puzzleTest".to_string(),
            link: format!("{}/loadGame?token={}", self.config.frontend_url, token),
        })
        .await
    }
}
