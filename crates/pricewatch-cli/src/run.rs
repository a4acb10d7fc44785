//! The linear scrape → normalize → filter → render pipeline.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use pricewatch_core::{AppConfig, PriceRow};
use pricewatch_report::{render_report, write_report};
use pricewatch_scraper::client::page_origin;
use pricewatch_scraper::{load, locator, manifest, normalize, tidy, PriceListClient};

/// Runs one end-to-end collection for a single store and date.
///
/// Fatal failures abort before the output file is touched; row-local
/// problems have already been degraded to nulls by the tidy transform.
pub(crate) async fn run(
    config: &AppConfig,
    store_id: u16,
    date: NaiveDate,
    output: &Path,
) -> anyhow::Result<()> {
    let watchlist = pricewatch_core::load_watchlist(&config.watchlist_path)
        .with_context(|| format!("load watch-list {}", config.watchlist_path.display()))?;

    if let Some(store) = pricewatch_core::store_by_id(store_id) {
        tracing::info!(store_id, address = store.address, city = store.city, %date, "starting run");
    } else {
        tracing::info!(store_id, %date, "starting run for unregistered store id");
    }

    let client = PriceListClient::new(
        config.http_timeout_secs,
        config.http_connect_timeout_secs,
        &config.user_agent,
    )?;
    let origin = page_origin(&config.page_url)?;

    let asset_list_id = locator::find_asset_list_id(&client, &config.page_url).await?;
    tracing::info!(%asset_list_id, "located asset list");

    let entries = manifest::fetch_manifest(&client, &origin, &asset_list_id).await?;
    let entry = manifest::select_entry(&entries, store_id, date)?;
    tracing::info!(
        city = %entry.city,
        address = %entry.address,
        url = %entry.download_url,
        "selected price file"
    );

    let mut table = load::fetch_price_table(&client, &entry.download_url).await?;
    normalize::normalize_headers(&mut table);
    let rows = tidy::tidy(&table);
    tracing::info!(rows = rows.len(), "tidied price table");

    let selected: Vec<PriceRow> = rows.into_iter().filter(|r| watchlist.selects(r)).collect();
    tracing::info!(matches = selected.len(), "applied watch-list");

    let html = render_report(&selected, chrono::Local::now().naive_local());
    write_report(output, &html)?;
    tracing::info!(path = %output.display(), "report written");

    Ok(())
}

/// Parses a `--date` argument, defaulting to today's local date.
pub(crate) fn resolve_date(arg: Option<&str>) -> anyhow::Result<NaiveDate> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --date \"{s}\", expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
