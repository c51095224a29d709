use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::info;

use stock_news_alert::{AlertOutcome, AlertPipeline, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    stock_news_alert::init_logging();

    let config = Config::from_env().wrap_err("Couldn't load configuration")?;
    let pipeline = AlertPipeline::new(config).wrap_err("Couldn't build provider clients")?;

    match pipeline.run().await.wrap_err("Alert run failed")? {
        AlertOutcome::Quiet { movement } => {
            info!(percent = movement.percent_change, "No alert sent");
        }
        AlertOutcome::Alerted { receipts, .. } => {
            info!(sent = receipts.len(), "Alerts sent");
        }
    }

    Ok(())
}
