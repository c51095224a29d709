use thiserror::Error;

/// Every way a run of the alert pipeline can fail.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The request never got a usable response (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A provider answered with a non-2xx status.
    #[error("Unexpected response status: {status} at {url}")]
    Status { status: u16, url: String },

    /// The provider answered, but not with what we asked for.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = AlertError> = std::result::Result<T, E>;

/// Turns a non-2xx response into `AlertError::Status`, passing the rest through.
pub(crate) fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(AlertError::Status {
            status: resp.status().as_u16(),
            url: redact_query(resp.url()),
        })
    }
}

// Provider keys travel in the query string; keep them out of error messages.
pub(crate) fn redact_query(url: &url::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_url_drops_query() {
        let url = url::Url::parse("https://www.alphavantage.co/query?symbol=IBM&apikey=secret").unwrap();
        let shown = redact_query(&url);
        assert_eq!(shown, "https://www.alphavantage.co/query");
        assert!(!shown.contains("secret"));
    }
}
