use std::path::PathBuf;

use anyhow::Result;

use mlb_hr_sheets::config::ReportConfig;
use mlb_hr_sheets::http_client::HttpFetcher;
use mlb_hr_sheets::pipeline::run_daily_report;
use mlb_hr_sheets::{init_logging, load_dotenv};

fn main() -> Result<()> {
    load_dotenv();
    let cfg = ReportConfig::from_env()?;
    init_logging(&cfg.log_level);

    let output = std::env::args().nth(1).map(PathBuf::from);
    let fetcher = HttpFetcher::from_config(&cfg)?;
    let summary = run_daily_report(&cfg, &fetcher, output.as_deref())?;

    println!("Daily report for {}", cfg.yesterday());
    println!("Workbook: {}", summary.path.display());
    if summary.written.is_empty() {
        println!("No sheets had rows; workbook left untouched");
    }
    for name in &summary.written {
        println!("  wrote {name}");
    }
    for name in &summary.skipped {
        println!("  skipped {name} (no rows)");
    }
    if !summary.preserved.is_empty() {
        println!("Preserved sheets: {}", summary.preserved.len());
    }
    Ok(())
}
