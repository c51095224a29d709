use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;

use stock_news_alert::{AlertPipeline, Config};

// Measures the move and reports whether a real run would alert. Sends nothing.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    stock_news_alert::init_logging();

    let config = Config::from_env().wrap_err("Couldn't load configuration")?;
    let pipeline = AlertPipeline::new(config).wrap_err("Couldn't build provider clients")?;

    let movement = pipeline
        .measure()
        .await
        .wrap_err("Couldn't measure the move")?;
    let config = pipeline.config();
    let would_alert = movement.is_significant(config.thresholds.significance);

    println!(
        "{} {} -> {}: {} -> {} ({}{}%)",
        config.symbol,
        movement.previous.date,
        movement.latest.date,
        movement.previous.close,
        movement.latest.close,
        movement.direction,
        movement.percent_change
    );
    println!(
        "{} (threshold {}%)",
        if would_alert { "would alert" } else { "would stay quiet" },
        config.thresholds.significance
    );

    Ok(())
}
