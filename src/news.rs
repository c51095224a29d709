use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::NewsProviderConfig;
use crate::error::{redact_query, AlertError, Result};

/// A headline returned by the news provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsArticle {
    pub title: String,
    /// Empty when the provider sent no description.
    pub description: String,
}

#[derive(Deserialize)]
struct NewsEnvelope {
    status: Option<String>,
    message: Option<String>,
    articles: Option<Vec<RawArticle>>,
}

#[derive(Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
}

fn provider_error(body: &str) -> Option<String> {
    let envelope: NewsEnvelope = serde_json::from_str(body).ok()?;
    match envelope.status.as_deref() {
        Some("error") => Some(envelope.message.unwrap_or_default()),
        _ => None,
    }
}

/// Parses an article listing, keeping at most `limit` in provider order.
pub fn parse_articles(body: &str, limit: usize) -> Result<Vec<NewsArticle>> {
    let envelope: NewsEnvelope = serde_json::from_str(body)
        .map_err(|e| AlertError::Data(format!("news listing is not valid JSON: {e}")))?;

    if envelope.status.as_deref() == Some("error") {
        return Err(AlertError::Data(format!(
            "news provider error: {}",
            envelope.message.unwrap_or_default()
        )));
    }

    let articles = envelope
        .articles
        .ok_or_else(|| AlertError::Data("missing \"articles\"".to_string()))?;

    Ok(articles
        .into_iter()
        .take(limit)
        .map(|raw| NewsArticle {
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
        })
        .collect())
}

pub struct NewsClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    max_articles: usize,
}

impl NewsClient {
    pub fn new(http: reqwest::Client, config: &NewsProviderConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            max_articles: config.max_articles,
        }
    }

    /// Articles whose title mentions `company_name`, first `max_articles` only.
    pub async fn headlines(&self, company_name: &str) -> Result<Vec<NewsArticle>> {
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("qInTitle", company_name),
            ])
            .send()
            .await?;

        let status = resp.status();
        let url = redact_query(resp.url());
        let body = resp.text().await?;

        // Error bodies carry a readable message; prefer it over the bare status.
        if !status.is_success() {
            return Err(match provider_error(&body) {
                Some(message) => AlertError::Data(format!("news provider error: {message}")),
                None => AlertError::Status {
                    status: status.as_u16(),
                    url,
                },
            });
        }

        let articles = parse_articles(&body, self.max_articles)?;
        debug!(company_name, count = articles.len(), "Fetched headlines");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(n: usize) -> String {
        let articles: Vec<_> = (0..n)
            .map(|i| serde_json::json!({"title": format!("t{i}"), "description": format!("d{i}")}))
            .collect();
        serde_json::json!({"status": "ok", "totalResults": n, "articles": articles}).to_string()
    }

    #[test]
    fn keeps_at_most_three() {
        for (available, kept) in [(0, 0), (1, 1), (3, 3), (10, 3)] {
            let articles = parse_articles(&listing(available), 3).unwrap();
            assert_eq!(articles.len(), kept, "{available} available");
        }
    }

    #[test]
    fn keeps_provider_order() {
        let articles = parse_articles(&listing(10), 3).unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["t0", "t1", "t2"]);
    }

    #[test]
    fn null_description_becomes_empty() {
        let body = r#"{"status": "ok", "articles": [{"title": "Tesla rallies", "description": null}]}"#;

        let articles = parse_articles(body, 3).unwrap();
        assert_eq!(articles[0].title, "Tesla rallies");
        assert_eq!(articles[0].description, "");
    }

    #[test]
    fn provider_error_message_is_kept() {
        let body = r#"{"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}"#;

        let err = parse_articles(body, 3).unwrap_err();
        assert!(matches!(err, AlertError::Data(ref msg) if msg.contains("API key is invalid")));
    }

    #[test]
    fn missing_articles_is_an_error() {
        assert!(matches!(
            parse_articles(r#"{"status": "ok"}"#, 3),
            Err(AlertError::Data(_))
        ));
    }
}
