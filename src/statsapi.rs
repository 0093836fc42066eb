//! URL construction and small JSON accessors for the MLB Stats API.

use chrono::NaiveDate;
use serde_json::Value;

pub const SPORT_ID_MLB: u32 = 1;
pub const REGULAR_SEASON: &str = "R";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatGroup {
    Hitting,
    Pitching,
}

impl StatGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            StatGroup::Hitting => "hitting",
            StatGroup::Pitching => "pitching",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

pub fn leaderboard_url(
    base: &str,
    season: i32,
    group: StatGroup,
    sort_stat: &str,
    order: SortOrder,
    limit: u32,
) -> String {
    format!(
        "{base}/api/v1/stats?stats=season&sportIds={SPORT_ID_MLB}&season={season}\
         &group={group}&gameType={REGULAR_SEASON}&playerPool=all\
         &sortStat={sort_stat}&order={order}&limit={limit}",
        group = group.as_str(),
        order = order.as_str(),
    )
}

pub fn schedule_url(base: &str, date: NaiveDate, hydrate: Option<&str>) -> String {
    let mut url = format!(
        "{base}/api/v1/schedule?sportId={SPORT_ID_MLB}&date={}",
        date.format("%Y-%m-%d")
    );
    if let Some(hydrate) = hydrate {
        url.push_str("&hydrate=");
        url.push_str(hydrate);
    }
    url
}

pub fn live_feed_url(base: &str, game_pk: u64) -> String {
    format!("{base}/api/v1.1/game/{game_pk}/feed/live")
}

pub fn pitcher_season_url(base: &str, player_id: u64, season: i32) -> String {
    format!(
        "{base}/api/v1/people/{player_id}\
         ?hydrate=stats(group=pitching,type=season,season={season},gameType={REGULAR_SEASON})"
    )
}

/// Games of the first date grouping in a schedule response.
///
/// A schedule query for a single day carries at most one grouping; a missing
/// `dates` or `games` list means "no games" rather than a malformed body.
pub fn first_date_games(root: &Value) -> &[Value] {
    root.get("dates")
        .and_then(|v| v.as_array())
        .and_then(|dates| dates.first())
        .and_then(|day| day.get("games"))
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn value_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

pub fn value_u32(value: Option<&Value>) -> Option<u32> {
    value_u64(value).and_then(|v| u32::try_from(v).ok())
}

/// Numbers arrive either as JSON numbers or as strings such as `"3.45"` or `"-.--"`.
pub fn value_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn value_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
