use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use crate::http_client::Fetcher;
use crate::leaderboard::parse_era;
use crate::matchups::{probable_starter, team_name};
use crate::statsapi::{first_date_games, pitcher_season_url, schedule_url, value_f64};

pub const SOFTNESS_HYDRATE: &str = "team,probablePitcher";
pub const NO_GAMES_MESSAGE: &str = "No games found for today.";

#[derive(Debug, Clone, PartialEq)]
pub struct SoftMatchupRow {
    pub away_team: String,
    pub home_team: String,
    pub away_starter: String,
    pub away_era: Option<f64>,
    pub home_starter: String,
    pub home_era: Option<f64>,
    pub softness: Option<f64>,
}

/// The higher of the two starters' ERAs; unknown only when both are unknown.
pub fn softness(home_era: Option<f64>, away_era: Option<f64>) -> Option<f64> {
    match (home_era, away_era) {
        (Some(h), Some(a)) => Some(h.max(a)),
        (Some(h), None) => Some(h),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// Softest first. Rows with unknown softness keep their relative order and sort last.
pub fn rank_by_softness(rows: &mut [SoftMatchupRow]) {
    rows.sort_by(|a, b| match (a.softness, b.softness) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Today's games ranked by softness, one ERA lookup per distinct starter.
pub fn fetch_soft_matchups(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    date: NaiveDate,
    season: i32,
) -> Result<Vec<SoftMatchupRow>> {
    let url = schedule_url(stats_api_base, date, Some(SOFTNESS_HYDRATE));
    let body = fetcher
        .get_text(&url)
        .with_context(|| format!("schedule request failed for {date}"))?;
    let root: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body.trim()).context("invalid schedule json")?
    };

    let mut eras: HashMap<u64, Option<f64>> = HashMap::new();
    let mut era_for = |id: Option<u64>| -> Result<Option<f64>> {
        let Some(id) = id else {
            return Ok(None);
        };
        if let Some(era) = eras.get(&id) {
            return Ok(*era);
        }
        let era = fetch_pitcher_era(fetcher, stats_api_base, id, season)?;
        eras.insert(id, era);
        Ok(era)
    };

    let mut rows = Vec::new();
    for game in first_date_games(&root) {
        let home = game.pointer("/teams/home").unwrap_or(&Value::Null);
        let away = game.pointer("/teams/away").unwrap_or(&Value::Null);
        let home_starter = probable_starter(home);
        let away_starter = probable_starter(away);
        let home_era = era_for(home_starter.id)?;
        let away_era = era_for(away_starter.id)?;
        rows.push(SoftMatchupRow {
            away_team: team_name(away),
            home_team: team_name(home),
            away_starter: away_starter.name,
            away_era,
            home_starter: home_starter.name,
            home_era,
            softness: softness(home_era, away_era),
        });
    }

    rank_by_softness(&mut rows);
    info!(%date, games = rows.len(), pitchers = eras.len(), "ranked soft matchups");
    Ok(rows)
}

pub fn fetch_pitcher_era(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    player_id: u64,
    season: i32,
) -> Result<Option<f64>> {
    let url = pitcher_season_url(stats_api_base, player_id, season);
    let body = fetcher
        .get_text(&url)
        .with_context(|| format!("pitcher stats request failed for {player_id}"))?;
    let era = parse_pitcher_era_json(&body)?;
    debug!(player_id, ?era, "pitcher era");
    Ok(era)
}

pub fn parse_pitcher_era_json(raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid people json")?;
    let era = root.pointer("/people/0/stats/0/splits/0/stat/era");
    Ok(match era {
        Some(Value::String(s)) => parse_era(s),
        other => value_f64(other),
    })
}

pub fn render_soft_matchups(rows: &[SoftMatchupRow]) -> String {
    if rows.is_empty() {
        return NO_GAMES_MESSAGE.to_string();
    }

    let header = [
        "Away",
        "Home",
        "Away_Starter",
        "Away_ERA",
        "Home_Starter",
        "Home_ERA",
        "Softness",
    ];
    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|r| {
            [
                r.away_team.clone(),
                r.home_team.clone(),
                r.away_starter.clone(),
                fmt_era(r.away_era),
                r.home_starter.clone(),
                fmt_era(r.home_era),
                fmt_era(r.softness),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells = header.map(str::to_string);
    for line in std::iter::once(&header_cells).chain(cells.iter()) {
        let mut parts = Vec::with_capacity(line.len());
        for (idx, cell) in line.iter().enumerate() {
            // Text columns left-aligned, numbers right-aligned.
            if matches!(idx, 3 | 5 | 6) {
                parts.push(format!("{cell:>width$}", width = widths[idx]));
            } else {
                parts.push(format!("{cell:<width$}", width = widths[idx]));
            }
        }
        let _ = writeln!(out, "{}", parts.join("  ").trim_end());
    }
    out.trim_end().to_string()
}

fn fmt_era(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}
