mod extract;
mod fetch;

use anyhow::Context;
use clap::Parser;

use crate::extract::CarListing;

#[derive(Parser)]
#[command(name = "car_scraper", about = "Scrape car listings from Autotrader search results")]
struct Cli {
    #[command(flatten)]
    query: fetch::SearchQuery,

    /// Output filename
    #[arg(long, default_value = "car_info.json")]
    output_filename: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let cars = fetch::scrape_all(&client, &cli.query).await;
    println!("parsed info on {} cars", cars.len());

    write_output(&cli.output_filename, &cars)
}

fn write_output(path: &str, cars: &[CarListing]) -> anyhow::Result<()> {
    let data = serde_json::to_vec(cars).context("while serializing listings")?;
    std::fs::write(path, data).with_context(|| format!("while writing {path}"))
}
