//! The three batch runs, composed from the fetchers, the enrichment join and
//! the workbook writer. Every run is a single pass with no saved state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::config::ReportConfig;
use crate::enrich::{EnrichedPlayerStatRow, aggregate_samples, enrich_leaderboard};
use crate::home_runs::{fetch_daily_feed, fetch_home_runs_range};
use crate::http_client::Fetcher;
use crate::leaderboard::{LeaderboardQuery, fetch_hitting_leaders, fetch_pitching_leaders};
use crate::matchups::fetch_matchups_with_pitchers;
use crate::sheets::{
    SEASON_SNAPSHOT_SHEET, SheetKind, home_run_sheet, matchups_sheet, top_batters_sheet,
    top_pitchers_sheet,
};
use crate::softness::{SoftMatchupRow, fetch_soft_matchups};
use crate::statcast::fetch_samples;
use crate::workbook::{WriteMode, WriteSummary, write_sheets};

#[derive(Debug, Clone)]
pub struct BackfillReport {
    pub snapshot: WriteSummary,
    pub days_written: Vec<(NaiveDate, usize)>,
    pub days_skipped: Vec<NaiveDate>,
}

/// Leaderboard enriched with batted-ball aggregates over `start..=end`.
pub fn enriched_home_run_leaders(
    cfg: &ReportConfig,
    fetcher: &dyn Fetcher,
    limit: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<EnrichedPlayerStatRow>> {
    let query = LeaderboardQuery::home_run_leaders(cfg.season, limit);
    let leaders = fetch_hitting_leaders(fetcher, &cfg.stats_api_base, &query)?;
    if leaders.is_empty() {
        return Ok(Vec::new());
    }
    let samples = fetch_samples(fetcher, &cfg.savant_base, start, end)?;
    let aggregates = aggregate_samples(&samples);
    info!(
        leaders = leaders.len(),
        batters_with_samples = aggregates.len(),
        "joining batted-ball aggregates"
    );
    Ok(enrich_leaderboard(leaders, &aggregates))
}

/// Fresh season workbook: the enriched snapshot sheet, then one sheet per day
/// with at least one home run.
pub fn run_season_backfill(cfg: &ReportConfig, fetcher: &dyn Fetcher) -> Result<BackfillReport> {
    let path = cfg.backfill_workbook_path.as_path();
    let top = enriched_home_run_leaders(
        cfg,
        fetcher,
        cfg.backfill_limit,
        cfg.season_start,
        cfg.season_end,
    )?;
    let snapshot = write_sheets(
        path,
        vec![top_batters_sheet(SEASON_SNAPSHOT_SHEET, &top)],
        WriteMode::Create,
    )
    .context("writing season snapshot")?;

    let mut days_written = Vec::new();
    let mut days_skipped = Vec::new();
    fetch_home_runs_range(
        fetcher,
        &cfg.stats_api_base,
        cfg.season_start,
        cfg.season_end,
        |date, events| {
            if events.is_empty() {
                info!(%date, "no home runs, skipping day");
                days_skipped.push(date);
                return Ok(());
            }
            let name = SheetKind::HomeRunHitters.sheet_name(date);
            write_sheets(path, vec![home_run_sheet(name, &events)], WriteMode::Upsert)
                .with_context(|| format!("writing home runs for {date}"))?;
            days_written.push((date, events.len()));
            Ok(())
        },
    )?;

    Ok(BackfillReport {
        snapshot,
        days_written,
        days_skipped,
    })
}

/// Yesterday's home runs, the enriched leaderboard, the strikeout leaders and
/// today's matchups, upserted into one workbook under yesterday's date.
pub fn run_daily_report(
    cfg: &ReportConfig,
    fetcher: &dyn Fetcher,
    output: Option<&Path>,
) -> Result<WriteSummary> {
    let date = cfg.yesterday();
    let path: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cfg.workbook_path.clone());

    let daily = fetch_daily_feed(fetcher, &cfg.daily_feed_url, date)?;
    let top = enriched_home_run_leaders(cfg, fetcher, cfg.daily_limit, cfg.season_start, date)?;
    let pitcher_query = LeaderboardQuery::strikeout_leaders(cfg.season, cfg.pitcher_limit);
    let pitchers = fetch_pitching_leaders(fetcher, &cfg.stats_api_base, &pitcher_query)?;
    let matchups =
        fetch_matchups_with_pitchers(fetcher, &cfg.stats_api_base, cfg.today, &pitchers)?;

    let sheets = vec![
        home_run_sheet(SheetKind::HomeRunHitters.sheet_name(date), &daily),
        top_batters_sheet(SheetKind::TopHomeRunBatters.sheet_name(date), &top),
        top_pitchers_sheet(SheetKind::TopPitchers.sheet_name(date), &pitchers),
        matchups_sheet(SheetKind::Matchups.sheet_name(date), &matchups),
    ];
    write_sheets(&path, sheets, WriteMode::Upsert).context("writing daily report")
}

pub fn run_soft_matchups(cfg: &ReportConfig, fetcher: &dyn Fetcher) -> Result<Vec<SoftMatchupRow>> {
    fetch_soft_matchups(fetcher, &cfg.stats_api_base, cfg.today, cfg.season)
}
