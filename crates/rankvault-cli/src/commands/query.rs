//! Leaderboard query command

use clap::Args;
use rankvault_core::model::PartitionKey;
use rankvault_core::session::{Filters, LeaderboardRequest};
use rankvault_core::Config;
use rankvault_engine::{query_leaderboard, LeaderboardPage};

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(long, default_value = "EU")]
    pub region: String,

    /// standard or duos
    #[arg(long, default_value = "standard")]
    pub mode: String,

    /// Exact rank to show
    #[arg(long)]
    pub rank: Option<u32>,

    /// Case-insensitive substring of the account name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page (default from configuration)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: QueryArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let partition = PartitionKey::new(args.region.parse()?, args.mode.parse()?);
    let request = LeaderboardRequest::new(partition)
        .with_filters(Filters {
            rank: args.rank,
            name_contains: args.name,
        })
        .with_page(args.page)
        .with_page_size(args.page_size.unwrap_or(config.page_size));

    let conn = rankvault_store::db::open_and_migrate(&config.database_path)?;
    let page = query_leaderboard(&conn, &request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page);
    }
    Ok(())
}

fn print_page(page: &LeaderboardPage) {
    let Some(snapshot_at) = page.snapshot_at else {
        println!("No snapshot available for {}", page.partition);
        return;
    };

    println!(
        "{} @ {} ({} players, top rating {})",
        page.partition,
        snapshot_at.to_rfc3339(),
        page.total_count,
        page.max_rating.unwrap_or_default()
    );
    if page.filtered {
        println!("{} matching", page.rows.len());
    } else {
        println!("Page {}/{}", page.page, page.total_pages);
    }

    println!("{:>6}  {:<24}  {:>6}", "RANK", "ACCOUNT", "RATING");
    for row in &page.rows {
        println!("{:>6}  {:<24}  {:>6}", row.rank, row.account_id, row.rating);
    }
}
