//! Distributor daily view.

#![allow(clippy::print_stdout)]

use chrono::{NaiveDate, Utc};

use bakeline_client::Bakeline;
use bakeline_client::error::Result;
use bakeline_core::PriceChannel;

/// Per-product roll-up of a day's orders: quantities ordered, produced, and
/// delivered, with the as-fulfilled amount.
pub async fn daily(app: &Bakeline, date: Option<NaiveDate>, channel: PriceChannel) -> Result<()> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let summaries = app.daily_summary(date, channel).await?;

    println!("daily summary for {date}");
    println!(
        "{:<30} {:>8} {:>9} {:>10} {:>12}",
        "PRODUCT", "ORDERED", "PRODUCED", "DELIVERED", "AMOUNT"
    );
    for summary in &summaries {
        println!(
            "{:<30} {:>8} {:>9} {:>10} {:>12}",
            summary.product_name,
            summary.ordered,
            summary.produced,
            summary.delivered,
            summary.final_amount,
        );
    }
    Ok(())
}
