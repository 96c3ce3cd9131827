//! Practice statistics handler.

use anyhow::{Context, Result};
use chrono::Local;
use prepchat_core::api::ApiClient;
use prepchat_core::stats::session_stats;

pub async fn run(base_url: &str, token: &str) -> Result<()> {
    let client = ApiClient::with_token(base_url, token);
    let conversations = client.conversations().await.context("list sessions")?;

    let stats = session_stats(&conversations, Local::now().date_naive());

    println!("Total sessions:  {}", stats.total);
    println!("Today:           {}", stats.today);
    println!(
        "This week:       {}  ({:.0}% of goal)",
        stats.this_week, stats.weekly_progress
    );
    println!(
        "This month:      {}  ({:.0}% of goal)",
        stats.this_month, stats.monthly_progress
    );

    if !stats.domains.is_empty() {
        println!();
        println!("By domain:");
        for (domain, count) in &stats.domains {
            println!("  {domain}: {count}");
        }
    }
    Ok(())
}
