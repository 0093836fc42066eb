use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use crate::http_client::Fetcher;
use crate::statsapi::{
    first_date_games, live_feed_url, schedule_url, value_f64, value_string, value_u64,
};

const HOME_RUN_EVENT: &str = "home_run";

#[derive(Debug, Clone, PartialEq)]
pub struct HomeRunEvent {
    pub date: NaiveDate,
    pub batter: String,
    pub pitcher: String,
    pub pitch_type: Option<String>,
    pub exit_velocity: Option<f64>,
    pub distance: Option<f64>,
}

/// Every home run hit on `date`, walking the schedule and each game's live feed.
pub fn fetch_home_runs_for_day(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    date: NaiveDate,
) -> Result<Vec<HomeRunEvent>> {
    let url = schedule_url(stats_api_base, date, None);
    let body = fetcher
        .get_text(&url)
        .with_context(|| format!("schedule request failed for {date}"))?;
    let game_pks = parse_schedule_game_pks_json(&body)?;
    debug!(%date, games = game_pks.len(), "schedule loaded");

    let mut events = Vec::new();
    for game_pk in game_pks {
        let url = live_feed_url(stats_api_base, game_pk);
        let body = fetcher
            .get_text(&url)
            .with_context(|| format!("live feed request failed for game {game_pk}"))?;
        let game_events = parse_live_feed_home_runs_json(&body, date)
            .with_context(|| format!("live feed for game {game_pk}"))?;
        events.extend(game_events);
    }
    Ok(events)
}

/// Walks the inclusive `start..=end` window one day at a time, handing each
/// day's events to `on_day` as soon as they are fetched.
///
/// Days without games still reach `on_day` with an empty list so callers can
/// report the skip. Returns the number of days visited.
pub fn fetch_home_runs_range(
    fetcher: &dyn Fetcher,
    stats_api_base: &str,
    start: NaiveDate,
    end: NaiveDate,
    mut on_day: impl FnMut(NaiveDate, Vec<HomeRunEvent>) -> Result<()>,
) -> Result<usize> {
    let mut days = 0usize;
    for date in start.iter_days().take_while(|d| *d <= end) {
        let events = fetch_home_runs_for_day(fetcher, stats_api_base, date)?;
        on_day(date, events)?;
        days += 1;
    }
    Ok(days)
}

/// Yesterday's home runs from the pre-aggregated daily feed.
pub fn fetch_daily_feed(
    fetcher: &dyn Fetcher,
    feed_url: &str,
    date: NaiveDate,
) -> Result<Vec<HomeRunEvent>> {
    let body = fetcher
        .get_text(feed_url)
        .context("daily home run feed request failed")?;
    let events = parse_daily_feed_json(&body, date)?;
    info!(%date, rows = events.len(), "fetched daily home run feed");
    Ok(events)
}

pub fn parse_schedule_game_pks_json(raw: &str) -> Result<Vec<u64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid schedule json")?;
    Ok(first_date_games(&root)
        .iter()
        .filter_map(|game| value_u64(game.get("gamePk")))
        .collect())
}

pub fn parse_live_feed_home_runs_json(raw: &str, date: NaiveDate) -> Result<Vec<HomeRunEvent>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid live feed json")?;
    let Some(plays) = root
        .pointer("/liveData/plays/allPlays")
        .and_then(|v| v.as_array())
    else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for play in plays {
        let event_type = play.pointer("/result/eventType").and_then(|v| v.as_str());
        if event_type != Some(HOME_RUN_EVENT) {
            continue;
        }
        let matchup = play.get("matchup").unwrap_or(&Value::Null);
        let hit_data = home_run_hit_data(play);
        out.push(HomeRunEvent {
            date,
            batter: person_name(matchup.get("batter")),
            pitcher: person_name(matchup.get("pitcher")),
            pitch_type: pitch_type(matchup.get("pitchType")),
            exit_velocity: hit_data.and_then(|hd| value_f64(hd.get("launchSpeed"))),
            distance: hit_data.and_then(|hd| value_f64(hd.get("totalDistance"))),
        });
    }
    Ok(out)
}

pub fn parse_daily_feed_json(raw: &str, date: NaiveDate) -> Result<Vec<HomeRunEvent>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid daily feed json")?;
    let Some(records) = root.as_array() else {
        return Ok(Vec::new());
    };
    Ok(records
        .iter()
        .map(|rec| HomeRunEvent {
            date,
            batter: value_string(rec.get("batter_name")).unwrap_or_default(),
            pitcher: value_string(rec.get("pitcher_name")).unwrap_or_default(),
            pitch_type: value_string(rec.get("pitch_name")),
            exit_velocity: value_f64(rec.get("hit_speed")),
            distance: value_f64(rec.get("hit_distance")),
        })
        .collect())
}

/// Hit data of the first sub-event typed as a home run. A play may bundle
/// several sub-events; only the first match is used.
fn home_run_hit_data(play: &Value) -> Option<&Value> {
    let events = play.get("playEvents")?.as_array()?;
    let event = events.iter().find(|ev| {
        ev.pointer("/details/type/description")
            .and_then(|v| v.as_str())
            == Some(HOME_RUN_EVENT)
    })?;
    event.get("hitData").filter(|hd| hd.is_object())
}

fn person_name(value: Option<&Value>) -> String {
    value
        .and_then(|person| value_string(person.get("fullName")))
        .unwrap_or_default()
}

fn pitch_type(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if let Some(text) = value_string(Some(value)) {
        return Some(text);
    }
    value_string(value.get("description")).or_else(|| value_string(value.get("code")))
}
