use anyhow::Result;

use mlb_hr_sheets::config::ReportConfig;
use mlb_hr_sheets::http_client::HttpFetcher;
use mlb_hr_sheets::pipeline::run_season_backfill;
use mlb_hr_sheets::{init_logging, load_dotenv};

fn main() -> Result<()> {
    load_dotenv();
    let cfg = ReportConfig::from_env()?;
    init_logging(&cfg.log_level);

    let fetcher = HttpFetcher::from_config(&cfg)?;
    let report = run_season_backfill(&cfg, &fetcher)?;

    println!("Season backfill complete");
    println!("Workbook: {}", report.snapshot.path.display());
    println!("Window: {} .. {}", cfg.season_start, cfg.season_end);
    for name in &report.snapshot.written {
        println!("  wrote {name}");
    }
    for date in &report.days_skipped {
        println!("no homers on {date}, skipping");
    }
    let homers: usize = report.days_written.iter().map(|(_, n)| n).sum();
    println!(
        "Days with home runs: {} ({} home runs)",
        report.days_written.len(),
        homers
    );
    Ok(())
}
