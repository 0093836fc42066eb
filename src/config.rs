use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{Duration, Local, NaiveDate};

const DEFAULT_STATS_API_BASE: &str = "https://statsapi.mlb.com";
const DEFAULT_SAVANT_BASE: &str = "https://baseballsavant.mlb.com";
const DEFAULT_DAILY_FEED_URL: &str =
    "https://zuriteapi.com/homers/api/dailyhomeruns?days=1&format=json";
const DEFAULT_SEASON: i32 = 2025;
const DEFAULT_SEASON_START: &str = "2025-03-28";
const DEFAULT_SEASON_END: &str = "2025-06-11";
const DEFAULT_WORKBOOK: &str = "mlb_homer_data.xlsx";
const DEFAULT_BACKFILL_WORKBOOK: &str = "mlb_full_data.xlsx";
const DEFAULT_BACKFILL_LIMIT: u32 = 75;
const DEFAULT_DAILY_LIMIT: u32 = 100;
const DEFAULT_PITCHER_LIMIT: u32 = 50;

/// Everything a pipeline run needs to know about the outside world.
///
/// Built once per process and passed down explicitly, so tests can point the
/// same pipelines at fake endpoints and fixed dates.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub stats_api_base: String,
    pub savant_base: String,
    pub daily_feed_url: String,
    pub season: i32,
    pub season_start: NaiveDate,
    pub season_end: NaiveDate,
    pub workbook_path: PathBuf,
    pub backfill_workbook_path: PathBuf,
    pub backfill_limit: u32,
    pub daily_limit: u32,
    pub pitcher_limit: u32,
    pub http_timeout_secs: Option<u64>,
    pub log_level: String,
    pub today: NaiveDate,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(opt_env, Local::now().date_naive())
    }

    /// Defaults without consulting the environment. `today` is left to the caller.
    pub fn with_defaults(today: NaiveDate) -> Result<Self> {
        Self::from_lookup(|_| None, today)
    }

    /// Resolve every setting through `lookup`, falling back to the defaults
    /// when a key is unset. A value that is set but unparsable is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, today: NaiveDate) -> Result<Self> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            stats_api_base: trim_url(&text("HR_STATS_API_BASE", DEFAULT_STATS_API_BASE)),
            savant_base: trim_url(&text("HR_SAVANT_BASE", DEFAULT_SAVANT_BASE)),
            daily_feed_url: text("HR_DAILY_FEED_URL", DEFAULT_DAILY_FEED_URL),
            season: parse_setting("HR_SEASON", lookup("HR_SEASON"), DEFAULT_SEASON)?,
            season_start: date_setting(
                "HR_SEASON_START",
                &text("HR_SEASON_START", DEFAULT_SEASON_START),
            )?,
            season_end: date_setting("HR_SEASON_END", &text("HR_SEASON_END", DEFAULT_SEASON_END))?,
            workbook_path: PathBuf::from(text("HR_WORKBOOK", DEFAULT_WORKBOOK)),
            backfill_workbook_path: PathBuf::from(text(
                "HR_BACKFILL_WORKBOOK",
                DEFAULT_BACKFILL_WORKBOOK,
            )),
            backfill_limit: limit_setting(
                "HR_BACKFILL_LIMIT",
                lookup("HR_BACKFILL_LIMIT"),
                DEFAULT_BACKFILL_LIMIT,
            )?,
            daily_limit: limit_setting(
                "HR_DAILY_LIMIT",
                lookup("HR_DAILY_LIMIT"),
                DEFAULT_DAILY_LIMIT,
            )?,
            pitcher_limit: limit_setting(
                "HR_PITCHER_LIMIT",
                lookup("HR_PITCHER_LIMIT"),
                DEFAULT_PITCHER_LIMIT,
            )?,
            // 0 means no timeout, same as unset.
            http_timeout_secs: lookup("HR_HTTP_TIMEOUT_SECS")
                .map(|raw| parse_setting::<u64>("HR_HTTP_TIMEOUT_SECS", Some(raw), 0))
                .transpose()?
                .filter(|secs| *secs > 0),
            log_level: text("HR_LOG_LEVEL", "info"),
            today,
        })
    }

    pub fn yesterday(&self) -> NaiveDate {
        self.today - Duration::days(1)
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val)
        }
    })
}

fn trim_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_setting<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
    }
}

fn limit_setting(key: &str, raw: Option<String>, default: u32) -> Result<u32> {
    let limit = parse_setting(key, raw, default)?;
    if limit == 0 {
        return Err(anyhow!("{key} must be at least 1"));
    }
    Ok(limit)
}

fn date_setting(key: &str, raw: &str) -> Result<NaiveDate> {
    parse_iso_date(raw).with_context(|| format!("{key} must be YYYY-MM-DD, got {raw:?}"))
}

pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").context("invalid date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| {
            owned
                .iter()
                .find(|(k, _)| k.as_str() == key)
                .map(|(_, v)| v.clone())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    #[test]
    fn yesterday_crosses_month_boundary() {
        let cfg = ReportConfig::with_defaults(today()).unwrap();
        assert_eq!(cfg.yesterday(), NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
    }

    #[test]
    fn defaults_use_the_declared_season_window() {
        let cfg = ReportConfig::with_defaults(today()).unwrap();
        assert_eq!(cfg.season_start, parse_iso_date(DEFAULT_SEASON_START).unwrap());
        assert_eq!(cfg.season_end, parse_iso_date(DEFAULT_SEASON_END).unwrap());
        assert_eq!(cfg.season, DEFAULT_SEASON);
        assert_eq!(cfg.backfill_limit, 75);
        assert_eq!(cfg.daily_limit, 100);
        assert_eq!(cfg.pitcher_limit, 50);
        assert_eq!(cfg.http_timeout_secs, None);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = ReportConfig::from_lookup(
            lookup_from(&[
                ("HR_SEASON", " 2026 "),
                ("HR_DAILY_LIMIT", "25"),
                ("HR_HTTP_TIMEOUT_SECS", "30"),
                ("HR_STATS_API_BASE", "http://localhost:9000/"),
            ]),
            today(),
        )
        .unwrap();
        assert_eq!(cfg.season, 2026);
        assert_eq!(cfg.daily_limit, 25);
        assert_eq!(cfg.http_timeout_secs, Some(30));
        assert_eq!(cfg.stats_api_base, "http://localhost:9000");
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg =
            ReportConfig::from_lookup(lookup_from(&[("HR_HTTP_TIMEOUT_SECS", "0")]), today())
                .unwrap();
        assert_eq!(cfg.http_timeout_secs, None);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        for (key, value) in [
            ("HR_SEASON", "2O26"),
            ("HR_BACKFILL_LIMIT", "lots"),
            ("HR_DAILY_LIMIT", "0"),
            ("HR_PITCHER_LIMIT", "-5"),
            ("HR_HTTP_TIMEOUT_SECS", "10s"),
            ("HR_SEASON_START", "03/28/2025"),
        ] {
            let err = ReportConfig::from_lookup(lookup_from(&[(key, value)]), today())
                .expect_err("bad value should fail");
            assert!(format!("{err:#}").contains(key), "{key}: {err:#}");
        }
    }

    #[test]
    fn iso_dates_parse_with_whitespace() {
        assert_eq!(
            parse_iso_date(" 2025-03-28 ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 28).unwrap()
        );
        assert!(parse_iso_date("03/28/2025").is_err());
    }
}
