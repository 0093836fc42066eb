use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::http_client::Fetcher;
use crate::leaderboard::{LeaderboardQuery, PitcherStatRow, fetch_pitching_leaders};
use crate::statsapi::{first_date_games, schedule_url, value_string, value_u64};

pub const MATCHUP_HYDRATE: &str = "team,linescore,probablePitcher";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbableStarter {
    /// Empty until the club announces a starter.
    pub name: String,
    pub id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRow {
    pub home_team: String,
    pub away_team: String,
    pub home_starter: ProbableStarter,
    pub away_starter: ProbableStarter,
    pub home_era: Option<f64>,
    pub home_strikeouts: Option<u32>,
    pub away_era: Option<f64>,
    pub away_strikeouts: Option<u32>,
}

/// The day's games with each starter's season ERA and strikeouts attached.
///
/// The pitcher leaderboard is fetched once, and only when a starter has been
/// announced; nothing is requested per pitcher.
pub fn fetch_matchups(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    date: NaiveDate,
    pitchers: &LeaderboardQuery,
) -> Result<Vec<MatchupRow>> {
    let mut rows = fetch_schedule_matchups(fetcher, stats_api_base, date)?;
    if has_announced_starter(&rows) {
        let stats = fetch_pitching_leaders(fetcher, stats_api_base, pitchers)?;
        attach_pitcher_stats(&mut rows, &stats);
    }
    info!(%date, games = rows.len(), "built matchups");
    Ok(rows)
}

/// Same as [`fetch_matchups`], joined against a leaderboard the caller already holds.
pub fn fetch_matchups_with_pitchers(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    date: NaiveDate,
    pitchers: &[PitcherStatRow],
) -> Result<Vec<MatchupRow>> {
    let mut rows = fetch_schedule_matchups(fetcher, stats_api_base, date)?;
    attach_pitcher_stats(&mut rows, pitchers);
    info!(%date, games = rows.len(), "built matchups");
    Ok(rows)
}

fn fetch_schedule_matchups(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    date: NaiveDate,
) -> Result<Vec<MatchupRow>> {
    let url = schedule_url(stats_api_base, date, Some(MATCHUP_HYDRATE));
    let body = fetcher
        .get_text(&url)
        .with_context(|| format!("schedule request failed for {date}"))?;
    parse_schedule_matchups_json(&body)
}

fn has_announced_starter(rows: &[MatchupRow]) -> bool {
    rows.iter()
        .any(|row| row.home_starter.id.is_some() || row.away_starter.id.is_some())
}

pub fn parse_schedule_matchups_json(raw: &str) -> Result<Vec<MatchupRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid schedule json")?;
    Ok(first_date_games(&root).iter().map(matchup_row).collect())
}

pub fn attach_pitcher_stats(rows: &mut [MatchupRow], stats: &[PitcherStatRow]) {
    let by_id: HashMap<u64, &PitcherStatRow> = stats.iter().map(|s| (s.player_id, s)).collect();
    let lookup = |starter: &ProbableStarter| starter.id.and_then(|id| by_id.get(&id).copied());

    for row in rows.iter_mut() {
        let home = lookup(&row.home_starter);
        let away = lookup(&row.away_starter);
        row.home_era = home.and_then(|s| s.era);
        row.home_strikeouts = home.map(|s| s.strikeouts);
        row.away_era = away.and_then(|s| s.era);
        row.away_strikeouts = away.map(|s| s.strikeouts);
    }
}

fn matchup_row(game: &Value) -> MatchupRow {
    let home = game.pointer("/teams/home").unwrap_or(&Value::Null);
    let away = game.pointer("/teams/away").unwrap_or(&Value::Null);
    MatchupRow {
        home_team: team_name(home),
        away_team: team_name(away),
        home_starter: probable_starter(home),
        away_starter: probable_starter(away),
        home_era: None,
        home_strikeouts: None,
        away_era: None,
        away_strikeouts: None,
    }
}

pub(crate) fn team_name(side: &Value) -> String {
    value_string(side.pointer("/team/name")).unwrap_or_default()
}

pub(crate) fn probable_starter(side: &Value) -> ProbableStarter {
    let Some(pitcher) = side.get("probablePitcher") else {
        return ProbableStarter::default();
    };
    ProbableStarter {
        name: value_string(pitcher.get("fullName")).unwrap_or_default(),
        id: value_u64(pitcher.get("id")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitcher(id: u64, era: Option<f64>, so: u32) -> PitcherStatRow {
        PitcherStatRow {
            player_id: id,
            name: format!("P{id}"),
            strikeouts: so,
            era,
            games: 10,
            innings_pitched: Some("60.0".to_string()),
            wins: 4,
            losses: 3,
        }
    }

    fn row(home_id: Option<u64>, away_id: Option<u64>) -> MatchupRow {
        MatchupRow {
            home_team: "H".to_string(),
            away_team: "A".to_string(),
            home_starter: ProbableStarter {
                name: String::new(),
                id: home_id,
            },
            away_starter: ProbableStarter {
                name: String::new(),
                id: away_id,
            },
            home_era: None,
            home_strikeouts: None,
            away_era: None,
            away_strikeouts: None,
        }
    }

    #[test]
    fn lookup_miss_and_absent_id_stay_empty() {
        let mut rows = vec![row(Some(1), Some(99)), row(None, Some(2))];
        attach_pitcher_stats(&mut rows, &[pitcher(1, Some(2.5), 120), pitcher(2, None, 80)]);

        assert_eq!(rows[0].home_era, Some(2.5));
        assert_eq!(rows[0].home_strikeouts, Some(120));
        assert_eq!(rows[0].away_era, None);
        assert_eq!(rows[0].away_strikeouts, None);

        assert_eq!(rows[1].home_era, None);
        assert_eq!(rows[1].home_strikeouts, None);
        assert_eq!(rows[1].away_era, None);
        assert_eq!(rows[1].away_strikeouts, Some(80));
    }
}
