use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::StockProviderConfig;
use crate::error::{check_status, AlertError, Result};

const SERIES_FUNCTION: &str = "TIME_SERIES_DAILY";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "🔺",
            Direction::Down => "🔻",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Day-over-day movement between the two most recent closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMove {
    pub latest: DailyQuote,
    pub previous: DailyQuote,
    /// `|latest.close - previous.close|`
    pub difference: f64,
    pub direction: Direction,
    /// Difference as a whole percentage of the latest close.
    pub percent_change: i64,
}

impl PriceMove {
    pub fn between(latest: DailyQuote, previous: DailyQuote, direction_threshold: f64) -> Self {
        let difference = (latest.close - previous.close).abs();
        let direction = if difference > direction_threshold {
            Direction::Up
        } else {
            Direction::Down
        };
        // Ties go to the even neighbour.
        let percent_change = (difference / latest.close * 100.0).round_ties_even() as i64;

        Self {
            latest,
            previous,
            difference,
            direction,
            percent_change,
        }
    }

    pub fn is_significant(&self, threshold: f64) -> bool {
        self.percent_change.abs() as f64 > threshold
    }
}

#[derive(Deserialize)]
struct DailySeriesEnvelope {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, DailyRecord>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct DailyRecord {
    #[serde(rename = "4. close")]
    close: Option<String>,
}

/// Parses a daily time-series body into quotes, most recent first.
pub fn parse_daily_series(body: &str) -> Result<Vec<DailyQuote>> {
    let envelope: DailySeriesEnvelope = serde_json::from_str(body)
        .map_err(|e| AlertError::Data(format!("daily series is not valid JSON: {e}")))?;

    let series = match envelope.series {
        Some(series) => series,
        None => {
            let reason = envelope
                .error_message
                .or(envelope.note)
                .or(envelope.information)
                .unwrap_or_else(|| "no provider message".to_string());
            return Err(AlertError::Data(format!(
                "missing \"Time Series (Daily)\": {reason}"
            )));
        }
    };

    let mut quotes = series
        .into_iter()
        .map(|(day, record)| {
            let date = NaiveDate::parse_from_str(&day, DATE_FORMAT)
                .map_err(|e| AlertError::Data(format!("bad trading day {day:?}: {e}")))?;
            let raw = record
                .close
                .ok_or_else(|| AlertError::Data(format!("no close for {day}")))?;
            let close: f64 = raw
                .trim()
                .parse()
                .map_err(|e| AlertError::Data(format!("bad close {raw:?} for {day}: {e}")))?;
            if !close.is_finite() || close <= 0.0 {
                return Err(AlertError::Data(format!("non-positive close {close} for {day}")));
            }
            Ok(DailyQuote { date, close })
        })
        .collect::<Result<Vec<_>>>()?;

    quotes.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(quotes)
}

pub struct StockClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl StockClient {
    pub fn new(http: reqwest::Client, config: &StockProviderConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// All daily closes the provider returned for `symbol`, most recent first.
    pub async fn daily_quotes(&self, symbol: &str) -> Result<Vec<DailyQuote>> {
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("function", SERIES_FUNCTION),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let body = check_status(resp)?.text().await?;

        let quotes = parse_daily_series(&body)?;
        debug!(symbol, days = quotes.len(), "Fetched daily series");
        Ok(quotes)
    }

    /// The two most recent closes as `(latest, previous)`.
    pub async fn latest_pair(&self, symbol: &str) -> Result<(DailyQuote, DailyQuote)> {
        let quotes = self.daily_quotes(symbol).await?;

        match quotes.as_slice() {
            [latest, previous, ..] => Ok((*latest, *previous)),
            _ => Err(AlertError::Data(format!(
                "need two trading days for {symbol}, got {}",
                quotes.len()
            ))),
        }
    }
}
