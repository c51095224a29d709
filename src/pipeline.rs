use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::news::{NewsArticle, NewsClient};
use crate::sms::SmsClient;
use crate::stocks::{PriceMove, StockClient};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    /// The move stayed within the significance threshold; nothing was sent.
    Quiet { movement: PriceMove },
    /// News was fetched and one SMS went out per article.
    Alerted {
        movement: PriceMove,
        /// Message sids, in send order.
        receipts: Vec<String>,
    },
}

impl AlertOutcome {
    pub fn movement(&self) -> &PriceMove {
        match self {
            AlertOutcome::Quiet { movement } | AlertOutcome::Alerted { movement, .. } => movement,
        }
    }
}

/// Renders the text for one article.
pub fn format_message(symbol: &str, movement: &PriceMove, article: &NewsArticle) -> String {
    format!(
        "{symbol}: {}{}%\nHeadline: {}. \nBrief: {}",
        movement.direction, movement.percent_change, article.title, article.description
    )
}

pub fn format_messages(symbol: &str, movement: &PriceMove, articles: &[NewsArticle]) -> Vec<String> {
    articles
        .iter()
        .map(|article| format_message(symbol, movement, article))
        .collect()
}

/// The check-and-notify job for one ticker.
pub struct AlertPipeline {
    config: Config,
    stocks: StockClient,
    news: NewsClient,
    sms: SmsClient,
}

impl AlertPipeline {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            stocks: StockClient::new(http.clone(), &config.stock),
            news: NewsClient::new(http.clone(), &config.news),
            sms: SmsClient::new(http, &config.sms)?,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches the two latest closes and measures the move between them.
    pub async fn measure(&self) -> Result<PriceMove> {
        let symbol = &self.config.symbol;
        let (latest, previous) = self.stocks.latest_pair(symbol).await?;
        let movement = PriceMove::between(latest, previous, self.config.thresholds.direction);

        info!(
            symbol = %symbol,
            latest = %latest.date,
            latest_close = latest.close,
            previous = %previous.date,
            previous_close = previous.close,
            percent = movement.percent_change,
            "Measured daily move"
        );
        Ok(movement)
    }

    /// Runs the whole job. Stops at the first provider failure; texts already sent stay sent.
    pub async fn run(&self) -> Result<AlertOutcome> {
        let movement = self.measure().await?;

        if !movement.is_significant(self.config.thresholds.significance) {
            info!(
                percent = movement.percent_change,
                threshold = self.config.thresholds.significance,
                "Move below significance threshold, nothing to send"
            );
            return Ok(AlertOutcome::Quiet { movement });
        }

        let articles = self.news.headlines(&self.config.company_name).await?;
        info!(count = articles.len(), company = %self.config.company_name, "Fetched news");

        let messages = format_messages(&self.config.symbol, &movement, &articles);
        let mut receipts = Vec::with_capacity(messages.len());
        for message in &messages {
            receipts.push(self.sms.send(message).await?);
        }

        Ok(AlertOutcome::Alerted { movement, receipts })
    }
}
