//! Pitch-level batted-ball samples from the Baseball Savant search export.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::http_client::Fetcher;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattedBallSample {
    pub batter_id: u64,
    pub launch_speed: Option<f64>,
    pub launch_angle: Option<f64>,
}

pub fn savant_day_url(base: &str, date: NaiveDate) -> String {
    let day = date.format("%Y-%m-%d");
    format!(
        "{base}/statcast_search/csv?all=true&type=details&player_type=batter\
         &hfGT=R%7C&game_date_gt={day}&game_date_lt={day}"
    )
}

/// All samples for the inclusive `start..=end` window, one request per day.
///
/// Savant silently truncates large exports, so the window is never requested in one go.
pub fn fetch_samples(
    fetcher: &dyn Fetcher,
    savant_base: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<BattedBallSample>> {
    let mut samples = Vec::new();
    for date in start.iter_days().take_while(|d| *d <= end) {
        let url = savant_day_url(savant_base, date);
        let body = fetcher
            .get_text(&url)
            .with_context(|| format!("statcast export failed for {date}"))?;
        let day_samples = parse_samples_csv(body.as_bytes())
            .with_context(|| format!("statcast csv for {date}"))?;
        debug!(%date, rows = day_samples.len(), "statcast day loaded");
        samples.extend(day_samples);
    }
    info!(%start, %end, rows = samples.len(), "fetched statcast samples");
    Ok(samples)
}

#[derive(Debug, Deserialize)]
struct RawSample {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    batter: Option<u64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    launch_speed: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    launch_angle: Option<f64>,
}

pub fn parse_samples_csv<R: Read>(rdr: R) -> Result<Vec<BattedBallSample>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let mut out = Vec::new();
    for record in reader.deserialize::<RawSample>() {
        let raw = record.context("malformed statcast row")?;
        let Some(batter_id) = raw.batter else {
            continue;
        };
        out.push(BattedBallSample {
            batter_id,
            launch_speed: raw.launch_speed.filter(|v| v.is_finite()),
            launch_angle: raw.launch_angle.filter(|v| v.is_finite()),
        });
    }
    Ok(out)
}
