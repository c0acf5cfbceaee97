//! Contact form relay.
//!
//! Submissions are forwarded once, form-encoded, to a third-party form
//! service. Nothing is stored and nothing is retried; the caller only learns
//! whether the service accepted the message.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A business inquiry from the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// All fields are required; the email must at least look like one.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("message", &self.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{} is required", field)));
            }
        }

        if !self.email.contains('@') {
            return Err(AppError::Validation(
                "email must be a valid address".to_string(),
            ));
        }

        Ok(())
    }
}

/// Forwards contact messages to the configured endpoint.
#[derive(Clone)]
pub struct ContactRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl ContactRelay {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub async fn forward(&self, message: &ContactMessage) -> Result<(), AppError> {
        message.validate()?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .form(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = status.as_u16(), "Contact message delivered");
            Ok(())
        } else {
            tracing::warn!(status = status.as_u16(), "Contact service rejected message");
            Err(AppError::ContactRejected(format!(
                "Contact service answered {}",
                status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "홍길동".to_string(),
            phone: "010-0000-0000".to_string(),
            email: "hong@example.com".to_string(),
            message: "대량 공급 문의드립니다.".to_string(),
        }
    }

    #[test]
    fn test_valid_message() {
        assert!(message().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut blank_name = message();
        blank_name.name = "  ".to_string();
        assert!(matches!(
            blank_name.validate(),
            Err(AppError::Validation(msg)) if msg.starts_with("name")
        ));

        let mut blank_message = message();
        blank_message.message.clear();
        assert!(blank_message.validate().is_err());
    }

    #[test]
    fn test_email_needs_at_sign() {
        let mut bad = message();
        bad.email = "hong.example.com".to_string();
        assert!(bad.validate().is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Grab a free port, then release it so nothing is listening there
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = format!("http://{}/f/test", addr);
        let relay = ContactRelay::new(endpoint, Duration::from_secs(2)).unwrap();
        let err = relay.forward(&message()).await.unwrap_err();
        assert!(matches!(err, AppError::ContactUnreachable(_)));
    }
}
