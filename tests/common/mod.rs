#![allow(dead_code)]

use httpmock::{
    Method::{GET, POST},
    Mock, MockServer,
};
use serde_json::{json, Value};
use stock_news_alert::config::{
    Config, NewsProviderConfig, SmsProviderConfig, StockProviderConfig, Thresholds,
};
use url::Url;

pub const SYMBOL: &str = "TSLA";
pub const COMPANY: &str = "Tesla Inc";
pub const ACCOUNT_SID: &str = "AC123";
pub const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC123/Messages.json";

/// A config with every provider pointed at `server`.
pub fn config_for(server: &MockServer) -> Config {
    let url = |path: &str| Url::parse(&server.url(path)).unwrap();

    Config {
        symbol: SYMBOL.to_string(),
        company_name: COMPANY.to_string(),
        stock: StockProviderConfig {
            api_key: "stock-key".to_string(),
            endpoint: url("/query"),
        },
        news: NewsProviderConfig {
            api_key: "news-key".to_string(),
            endpoint: url("/v2/everything"),
            max_articles: 3,
        },
        sms: SmsProviderConfig {
            account_sid: ACCOUNT_SID.to_string(),
            auth_token: "token".to_string(),
            from_number: FROM_NUMBER.to_string(),
            to_number: TO_NUMBER.to_string(),
            endpoint: Url::parse(&server.base_url()).unwrap(),
        },
        thresholds: Thresholds::default(),
    }
}

/// A daily series whose two most recent closes are `latest` and `previous`.
pub fn daily_series(latest: f64, previous: f64) -> Value {
    json!({
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": SYMBOL,
            "3. Last Refreshed": "2024-03-08"
        },
        "Time Series (Daily)": {
            "2024-03-08": {"1. open": "1.0", "4. close": format!("{latest:.4}"), "5. volume": "100"},
            "2024-03-07": {"1. open": "1.0", "4. close": format!("{previous:.4}"), "5. volume": "100"},
            "2024-03-06": {"1. open": "1.0", "4. close": "1.0000", "5. volume": "100"}
        }
    })
}

pub fn articles(n: usize) -> Value {
    let articles: Vec<_> = (0..n)
        .map(|i| {
            json!({
                "source": {"id": null, "name": "Wire"},
                "title": format!("Headline {i}"),
                "description": format!("Brief {i}"),
                "url": format!("https://news.example/{i}")
            })
        })
        .collect();
    json!({"status": "ok", "totalResults": n, "articles": articles})
}

pub fn mock_stock<'a>(server: &'a MockServer, body: Value) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/query")
            .query_param("function", "TIME_SERIES_DAILY")
            .query_param("symbol", SYMBOL)
            .query_param("apikey", "stock-key");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(body);
    })
}

pub fn mock_news<'a>(server: &'a MockServer, body: Value) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/everything")
            .query_param("apiKey", "news-key")
            .query_param("qInTitle", COMPANY);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(body);
    })
}

pub const FROM_NUMBER: &str = "+15550001111";
pub const TO_NUMBER: &str = "+15552223333";

pub fn mock_sms(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path(MESSAGES_PATH)
            .header_exists("authorization")
            .form_urlencoded_tuple("From", FROM_NUMBER)
            .form_urlencoded_tuple("To", TO_NUMBER);
        then.status(201)
            .header("content-type", "application/json")
            .json_body(json!({"sid": "SM0001", "status": "queued"}));
    })
}

/// Accepts only the text with exactly `body` and answers with `sid`.
pub fn mock_sms_body<'a>(server: &'a MockServer, body: &str, sid: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST)
            .path(MESSAGES_PATH)
            .form_urlencoded_tuple("Body", body)
            .form_urlencoded_tuple("From", FROM_NUMBER)
            .form_urlencoded_tuple("To", TO_NUMBER);
        then.status(201)
            .header("content-type", "application/json")
            .json_body(json!({"sid": sid, "status": "queued"}));
    })
}
