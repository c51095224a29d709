//! Run configuration, read once from the environment at startup.

use std::env;
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{AlertError, Result};

pub const DEFAULT_STOCK_ENDPOINT: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_NEWS_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_TWILIO_ENDPOINT: &str = "https://api.twilio.com";

pub const DEFAULT_DIRECTION_THRESHOLD: f64 = 5.0;
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 5.0;
pub const DEFAULT_MAX_ARTICLES: usize = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Ticker symbol, e.g. `TSLA`.
    pub symbol: String,
    /// Name matched against article titles, e.g. `Tesla Inc`.
    pub company_name: String,
    pub stock: StockProviderConfig,
    pub news: NewsProviderConfig,
    pub sms: SmsProviderConfig,
    pub thresholds: Thresholds,
}

#[derive(Clone)]
pub struct StockProviderConfig {
    pub api_key: String,
    pub endpoint: Url,
}

#[derive(Clone)]
pub struct NewsProviderConfig {
    pub api_key: String,
    pub endpoint: Url,
    pub max_articles: usize,
}

#[derive(Clone)]
pub struct SmsProviderConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
    pub endpoint: Url,
}

const REDACTED: &str = "***";

impl fmt::Debug for StockProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StockProviderConfig")
            .field("api_key", &REDACTED)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl fmt::Debug for NewsProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsProviderConfig")
            .field("api_key", &REDACTED)
            .field("endpoint", &self.endpoint.as_str())
            .field("max_articles", &self.max_articles)
            .finish()
    }
}

impl fmt::Debug for SmsProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsProviderConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &REDACTED)
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Absolute close-to-close difference above which the move is labelled up.
    pub direction: f64,
    /// Percent change above which news is fetched and alerts are sent.
    pub significance: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            direction: DEFAULT_DIRECTION_THRESHOLD,
            significance: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        Ok(Self {
            symbol: vars.required("STOCK_NAME")?,
            company_name: vars.required("COMPANY_NAME")?,
            stock: StockProviderConfig {
                api_key: vars.required("STOCK_API_KEY")?,
                endpoint: vars.url_or("STOCK_ENDPOINT", DEFAULT_STOCK_ENDPOINT)?,
            },
            news: NewsProviderConfig {
                api_key: vars.required("NEWS_API_KEY")?,
                endpoint: vars.url_or("NEWS_ENDPOINT", DEFAULT_NEWS_ENDPOINT)?,
                max_articles: vars.parsed_or("MAX_ARTICLES", DEFAULT_MAX_ARTICLES)?,
            },
            sms: SmsProviderConfig {
                account_sid: vars.required("TWILIO_SID")?,
                auth_token: vars.required("TWILIO_AUTH_TOKEN")?,
                from_number: vars.required("VIRTUAL_TWILIO_NUMBER")?,
                to_number: vars.required("VERIFIED_PHONE_NUMBER")?,
                endpoint: vars.url_or("TWILIO_ENDPOINT", DEFAULT_TWILIO_ENDPOINT)?,
            },
            thresholds: Thresholds {
                direction: vars.threshold_or("DIRECTION_THRESHOLD", DEFAULT_DIRECTION_THRESHOLD)?,
                significance: vars
                    .threshold_or("SIGNIFICANCE_THRESHOLD", DEFAULT_SIGNIFICANCE_THRESHOLD)?,
            },
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    // Blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| AlertError::Config(format!("{key} is not set")))
    }

    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .parse()
                .map_err(|e| AlertError::Config(format!("{key}={raw:?}: {e}"))),
            None => Ok(default),
        }
    }

    // NaN and infinities parse as f64 but would never compare true.
    fn threshold_or(&self, key: &str, default: f64) -> Result<f64> {
        let value: f64 = self.parsed_or(key, default)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(AlertError::Config(format!("{key}={value}: not a finite number")))
        }
    }

    fn url_or(&self, key: &str, default: &str) -> Result<Url> {
        let raw = self.get(key).unwrap_or_else(|| default.to_string());
        Url::parse(&raw).map_err(|e| AlertError::Config(format!("{key}={raw:?}: {e}")))
    }
}
