//! Page retrieval: build search URLs, fetch result pages over HTTP and
//! hand back parsed document trees. The extraction engine never does
//! I/O itself; everything it sees comes through here.

use anyhow::{bail, Context, Result};
use scraper::Html;
use tracing::{info, warn};
use url::Url;

use crate::extract::{self, CarListing};

const BASE_URL: &str = "https://www.autotrader.co.uk/car-search";

/// Result pages are numbered from 0; the site stops serving results
/// well before this cap.
const MAX_PAGES: u64 = 100;

/// Search filters forwarded to the site as query parameters.
#[derive(Debug, clap::Args)]
pub struct SearchQuery {
    /// Postcode for search
    #[arg(long, default_value = "E144AD")]
    pub postcode: String,

    /// Make of car
    #[arg(long, default_value = "FORD")]
    pub make: String,

    /// Model of car
    #[arg(long, default_value = "FOCUS")]
    pub model: String,

    /// Price upper limit
    #[arg(long, default_value_t = 25000)]
    pub price_to: u64,

    /// Body type
    #[arg(long, default_value = "Hatchback")]
    pub body_type: String,

    /// Transmission type
    #[arg(long, default_value = "Manual")]
    pub transmission: String,

    /// Earliest year of manufacture
    #[arg(long, default_value_t = 2015)]
    pub year_from: u64,
}

/// Walk every result page in order, collecting parsed listings. A page
/// that fails to fetch or parse is logged and skipped; the walk always
/// continues to the next page.
pub async fn scrape_all(client: &reqwest::Client, query: &SearchQuery) -> Vec<CarListing> {
    let mut all = Vec::new();

    for page_num in 0..MAX_PAGES {
        match fetch_page(client, query, page_num).await {
            Ok(page) => {
                let listings = extract::extract_listings(&page, page_num);
                info!("page {page_num}: {} listings", listings.len());
                all.extend(listings);
            }
            Err(e) => warn!("skipping page {page_num}: {e:#}"),
        }
    }

    all
}

/// Fetch one result page and parse it into a document tree.
async fn fetch_page(
    client: &reqwest::Client,
    query: &SearchQuery,
    page_num: u64,
) -> Result<Html> {
    let url = page_url(query, page_num)?;

    let rsp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("while requesting {url}"))?;

    if rsp.status() != reqwest::StatusCode::OK {
        bail!("unexpected status {} from {url}", rsp.status());
    }

    let body = rsp.text().await.context("while reading response body")?;
    Ok(Html::parse_document(&body))
}

fn page_url(query: &SearchQuery, page_num: u64) -> Result<Url> {
    let mut url = Url::parse(BASE_URL).context("while parsing base URL")?;
    url.query_pairs_mut()
        .append_pair("postcode", &query.postcode)
        .append_pair("make", &query.make)
        .append_pair("model", &query.model)
        .append_pair("price-to", &query.price_to.to_string())
        .append_pair("include-delivery-option", "on")
        .append_pair("body-type", &query.body_type)
        .append_pair("transmission", &query.transmission)
        .append_pair("year-from", &query.year_from.to_string())
        .append_pair("onesearchad", "Used,Nearly New,New")
        .append_pair("advertising-location", "at-cars")
        .append_pair("page", &page_num.to_string());
    Ok(url)
}
