use anyhow::Result;

use mlb_hr_sheets::config::ReportConfig;
use mlb_hr_sheets::http_client::HttpFetcher;
use mlb_hr_sheets::pipeline::run_soft_matchups;
use mlb_hr_sheets::softness::render_soft_matchups;
use mlb_hr_sheets::{init_logging, load_dotenv};

fn main() -> Result<()> {
    load_dotenv();
    let cfg = ReportConfig::from_env()?;
    init_logging(&cfg.log_level);

    let fetcher = HttpFetcher::from_config(&cfg)?;
    let rows = run_soft_matchups(&cfg, &fetcher)?;
    println!("{}", render_soft_matchups(&rows));
    Ok(())
}
