use chrono::NaiveDate;

use crate::enrich::EnrichedPlayerStatRow;
use crate::home_runs::HomeRunEvent;
use crate::leaderboard::PitcherStatRow;
use crate::matchups::MatchupRow;
use crate::workbook::{Cell, Sheet};

pub const SEASON_SNAPSHOT_SHEET: &str = "data_Top_HR_Batters";

const HOME_RUN_HEADER: &[&str] = &["Date", "Batter", "Exit_Vel", "Distance", "Pitch", "Pitcher"];
const TOP_BATTERS_HEADER: &[&str] = &[
    "Player_ID",
    "Batter",
    "HRs",
    "Games",
    "AVG",
    "SLG",
    "HR%",
    "AB",
    "Barrel%",
    "Avg_Exit_Vel",
];
const TOP_PITCHERS_HEADER: &[&str] = &[
    "Pitcher", "Player_ID", "SO", "ERA", "Games", "IP", "Wins", "Losses",
];
const MATCHUPS_HEADER: &[&str] = &[
    "Home_Team",
    "Away_Team",
    "Home_Starter",
    "Home_Starter_ID",
    "Away_Starter",
    "Away_Starter_ID",
    "Home_ERA",
    "Home_SO",
    "Away_ERA",
    "Away_SO",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    HomeRunHitters,
    TopHomeRunBatters,
    TopPitchers,
    Matchups,
}

impl SheetKind {
    fn suffix(self) -> &'static str {
        match self {
            SheetKind::HomeRunHitters => "HR_Hitters",
            SheetKind::TopHomeRunBatters => "Top_HR_Batters",
            SheetKind::TopPitchers => "Top_Pitchers",
            SheetKind::Matchups => "Matchups",
        }
    }

    /// `{YYYY-MM-DD}_{suffix}`, e.g. `2025-06-10_HR_Hitters`.
    pub fn sheet_name(self, date: NaiveDate) -> String {
        format!("{}_{}", date.format("%Y-%m-%d"), self.suffix())
    }
}

pub fn home_run_sheet(name: impl Into<String>, events: &[HomeRunEvent]) -> Sheet {
    Sheet::new(name, HOME_RUN_HEADER, events.iter().map(home_run_row).collect())
}

pub fn top_batters_sheet(name: impl Into<String>, rows: &[EnrichedPlayerStatRow]) -> Sheet {
    Sheet::new(name, TOP_BATTERS_HEADER, rows.iter().map(top_batter_row).collect())
}

pub fn top_pitchers_sheet(name: impl Into<String>, rows: &[PitcherStatRow]) -> Sheet {
    Sheet::new(name, TOP_PITCHERS_HEADER, rows.iter().map(pitcher_row).collect())
}

pub fn matchups_sheet(name: impl Into<String>, rows: &[MatchupRow]) -> Sheet {
    Sheet::new(name, MATCHUPS_HEADER, rows.iter().map(matchup_row).collect())
}

fn home_run_row(event: &HomeRunEvent) -> Vec<Cell> {
    vec![
        Cell::text(event.date.format("%Y-%m-%d").to_string()),
        Cell::text(event.batter.as_str()),
        Cell::opt_number(event.exit_velocity),
        Cell::opt_number(event.distance),
        Cell::opt_text(event.pitch_type.as_deref()),
        Cell::text(event.pitcher.as_str()),
    ]
}

fn top_batter_row(row: &EnrichedPlayerStatRow) -> Vec<Cell> {
    let base = &row.base;
    vec![
        id_cell(Some(base.player_id)),
        Cell::text(base.name.as_str()),
        Cell::number(base.home_runs),
        Cell::number(base.games),
        Cell::opt_text(base.avg.as_deref()),
        Cell::opt_text(base.slg.as_deref()),
        Cell::opt_number(base.hr_pct),
        Cell::number(base.at_bats),
        Cell::opt_number(row.barrel_rate),
        Cell::opt_number(row.avg_exit_velocity),
    ]
}

fn pitcher_row(row: &PitcherStatRow) -> Vec<Cell> {
    vec![
        Cell::text(row.name.as_str()),
        id_cell(Some(row.player_id)),
        Cell::number(row.strikeouts),
        Cell::opt_number(row.era),
        Cell::number(row.games),
        Cell::opt_text(row.innings_pitched.as_deref()),
        Cell::number(row.wins),
        Cell::number(row.losses),
    ]
}

fn matchup_row(row: &MatchupRow) -> Vec<Cell> {
    vec![
        Cell::text(row.home_team.as_str()),
        Cell::text(row.away_team.as_str()),
        Cell::text(row.home_starter.name.as_str()),
        id_cell(row.home_starter.id),
        Cell::text(row.away_starter.name.as_str()),
        id_cell(row.away_starter.id),
        Cell::opt_number(row.home_era),
        Cell::opt_number(row.home_strikeouts.map(f64::from)),
        Cell::opt_number(row.away_era),
        Cell::opt_number(row.away_strikeouts.map(f64::from)),
    ]
}

// MLBAM ids stay well inside f64's exact integer range.
fn id_cell(id: Option<u64>) -> Cell {
    Cell::opt_number(id.map(|id| id as f64))
}
