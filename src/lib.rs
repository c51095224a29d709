//! Checks a stock's latest daily move and, when it is large enough, texts the
//! top headlines about the company.

pub mod config;
pub mod error;
pub mod news;
pub mod pipeline;
pub mod sms;
pub mod stocks;

pub use config::{Config, Thresholds};
pub use error::{AlertError, Result};
pub use news::NewsArticle;
pub use pipeline::{AlertOutcome, AlertPipeline};
pub use stocks::{DailyQuote, Direction, PriceMove};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
