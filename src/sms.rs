use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::config::SmsProviderConfig;
use crate::error::{redact_query, AlertError, Result};

#[derive(Deserialize)]
struct MessageResource {
    sid: Option<String>,
}

#[derive(Deserialize)]
struct RestError {
    code: Option<u32>,
    message: Option<String>,
}

fn provider_error(body: &str) -> Option<String> {
    let error: RestError = serde_json::from_str(body).ok()?;
    let message = error.message?;
    Some(match error.code {
        Some(code) => format!("{message} (code {code})"),
        None => message,
    })
}

/// Sends texts through the Twilio Messages API.
pub struct SmsClient {
    http: reqwest::Client,
    messages_url: Url,
    account_sid: String,
    auth_token: String,
    from_number: String,
    to_number: String,
}

impl SmsClient {
    pub fn new(http: reqwest::Client, config: &SmsProviderConfig) -> Result<Self> {
        let messages_url = config.endpoint.join(&format!(
            "2010-04-01/Accounts/{}/Messages.json",
            config.account_sid
        ))?;

        Ok(Self {
            http,
            messages_url,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            to_number: config.to_number.clone(),
        })
    }

    /// Sends one message to the configured recipient and returns its message sid.
    pub async fn send(&self, body: &str) -> Result<String> {
        let resp = self
            .http
            .post(self.messages_url.clone())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("Body", body),
                ("From", self.from_number.as_str()),
                ("To", self.to_number.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let url = redact_query(resp.url());
        let text = resp.text().await?;

        // Error bodies carry a readable message; prefer it over the bare status.
        if !status.is_success() {
            return Err(match provider_error(&text) {
                Some(message) => AlertError::Data(format!("SMS provider error: {message}")),
                None => AlertError::Status {
                    status: status.as_u16(),
                    url,
                },
            });
        }

        let resource: MessageResource = serde_json::from_str(&text)
            .map_err(|e| AlertError::Data(format!("message resource is not valid JSON: {e}")))?;

        let sid = resource
            .sid
            .ok_or_else(|| AlertError::Data("message resource without sid".to_string()))?;
        info!(%sid, chars = body.chars().count(), "Sent SMS");
        Ok(sid)
    }
}
