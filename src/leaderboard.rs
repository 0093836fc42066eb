use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::info;

use crate::http_client::Fetcher;
use crate::statsapi::{SortOrder, StatGroup, leaderboard_url};

#[derive(Debug, Clone)]
pub struct LeaderboardQuery {
    pub season: i32,
    pub group: StatGroup,
    pub sort_stat: String,
    pub order: SortOrder,
    pub limit: u32,
}

impl LeaderboardQuery {
    pub fn home_run_leaders(season: i32, limit: u32) -> Self {
        Self {
            season,
            group: StatGroup::Hitting,
            sort_stat: "homeRuns".to_string(),
            order: SortOrder::Desc,
            limit,
        }
    }

    pub fn strikeout_leaders(season: i32, limit: u32) -> Self {
        Self {
            season,
            group: StatGroup::Pitching,
            sort_stat: "strikeOuts".to_string(),
            order: SortOrder::Desc,
            limit,
        }
    }

    pub fn url(&self, base: &str) -> String {
        leaderboard_url(
            base,
            self.season,
            self.group,
            &self.sort_stat,
            self.order,
            self.limit,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatRow {
    pub player_id: u64,
    pub name: String,
    pub home_runs: u32,
    pub games: u32,
    pub at_bats: u32,
    pub avg: Option<String>,
    pub slg: Option<String>,
    /// `home_runs / at_bats` to four places; `None` without at-bats.
    pub hr_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitcherStatRow {
    pub player_id: u64,
    pub name: String,
    pub strikeouts: u32,
    pub era: Option<f64>,
    pub games: u32,
    pub innings_pitched: Option<String>,
    pub wins: u32,
    pub losses: u32,
}

pub fn fetch_hitting_leaders(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    query: &LeaderboardQuery,
) -> Result<Vec<PlayerStatRow>> {
    let url = query.url(stats_api_base);
    let body = fetcher
        .get_text(&url)
        .context("hitting leaderboard request failed")?;
    let rows = parse_hitting_leaders_json(&body)?;
    info!(
        sort = %query.sort_stat,
        rows = rows.len(),
        "fetched hitting leaderboard"
    );
    Ok(rows)
}

pub fn fetch_pitching_leaders(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    query: &LeaderboardQuery,
) -> Result<Vec<PitcherStatRow>> {
    let url = query.url(stats_api_base);
    let body = fetcher
        .get_text(&url)
        .context("pitching leaderboard request failed")?;
    let rows = parse_pitching_leaders_json(&body)?;
    info!(
        sort = %query.sort_stat,
        rows = rows.len(),
        "fetched pitching leaderboard"
    );
    Ok(rows)
}

pub fn parse_hitting_leaders_json(raw: &str) -> Result<Vec<PlayerStatRow>> {
    let splits: Vec<Split<HittingStat>> = parse_splits(raw)?;
    Ok(splits.into_iter().map(hitting_row).collect())
}

pub fn parse_pitching_leaders_json(raw: &str) -> Result<Vec<PitcherStatRow>> {
    let splits: Vec<Split<PitchingStat>> = parse_splits(raw)?;
    Ok(splits.into_iter().map(pitching_row).collect())
}

pub fn home_run_pct(home_runs: u32, at_bats: u32) -> Option<f64> {
    if at_bats == 0 {
        return None;
    }
    let pct = f64::from(home_runs) / f64::from(at_bats);
    Some((pct * 10_000.0).round() / 10_000.0)
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse<S> {
    stats: Option<Vec<StatsGrouping<S>>>,
}

#[derive(Debug, Deserialize)]
struct StatsGrouping<S> {
    #[serde(default = "Vec::new")]
    splits: Vec<Split<S>>,
}

#[derive(Debug, Deserialize)]
struct Split<S> {
    player: SplitPlayer,
    stat: S,
}

#[derive(Debug, Deserialize)]
struct SplitPlayer {
    id: u64,
    #[serde(rename = "fullName", default)]
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct HittingStat {
    #[serde(rename = "homeRuns", default)]
    home_runs: Option<u32>,
    #[serde(rename = "gamesPlayed", default)]
    games_played: Option<u32>,
    #[serde(rename = "atBats", default)]
    at_bats: Option<u32>,
    #[serde(default)]
    avg: Option<String>,
    #[serde(default)]
    slg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PitchingStat {
    #[serde(rename = "strikeOuts", default)]
    strike_outs: Option<u32>,
    #[serde(default)]
    era: Option<String>,
    #[serde(rename = "gamesPlayed", default)]
    games_played: Option<u32>,
    #[serde(rename = "inningsPitched", default)]
    innings_pitched: Option<String>,
    #[serde(default)]
    wins: Option<u32>,
    #[serde(default)]
    losses: Option<u32>,
}

fn parse_splits<S>(raw: &str) -> Result<Vec<Split<S>>>
where
    S: for<'de> Deserialize<'de>,
{
    let resp: LeaderboardResponse<S> =
        serde_json::from_str(raw.trim()).context("invalid leaderboard json")?;
    let Some(groups) = resp.stats else {
        return Err(anyhow!("leaderboard response has no top-level stats list"));
    };
    // An empty `stats` list is a legitimate "nobody qualifies yet" answer.
    Ok(groups
        .into_iter()
        .next()
        .map(|group| group.splits)
        .unwrap_or_default())
}

fn hitting_row(split: Split<HittingStat>) -> PlayerStatRow {
    let Split { player, stat } = split;
    let home_runs = stat.home_runs.unwrap_or(0);
    let at_bats = stat.at_bats.unwrap_or(0);
    PlayerStatRow {
        player_id: player.id,
        name: player.full_name,
        home_runs,
        games: stat.games_played.unwrap_or(0),
        at_bats,
        avg: stat.avg,
        slg: stat.slg,
        hr_pct: home_run_pct(home_runs, at_bats),
    }
}

fn pitching_row(split: Split<PitchingStat>) -> PitcherStatRow {
    let Split { player, stat } = split;
    PitcherStatRow {
        player_id: player.id,
        name: player.full_name,
        strikeouts: stat.strike_outs.unwrap_or(0),
        era: stat.era.as_deref().and_then(parse_era),
        games: stat.games_played.unwrap_or(0),
        innings_pitched: stat.innings_pitched,
        wins: stat.wins.unwrap_or(0),
        losses: stat.losses.unwrap_or(0),
    }
}

/// The API reports an undefined ERA as `"-.--"` or `"*.**"`.
pub fn parse_era(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
