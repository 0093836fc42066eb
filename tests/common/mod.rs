#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

use mlb_hr_sheets::config::ReportConfig;
use mlb_hr_sheets::http_client::Fetcher;

pub const BASE: &str = "http://statsapi.test";
pub const SAVANT: &str = "http://savant.test";
pub const DAILY_FEED: &str = "http://feed.test/dailyhomeruns";

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Canned responses keyed by URL. Unknown URLs fail like a dead endpoint.
#[derive(Default)]
pub struct MapFetcher {
    responses: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count_calls(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|u| u.as_str() == url).count()
    }
}

impl Fetcher for MapFetcher {
    fn get_text(&self, url: &str) -> Result<String> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("http 404 Not Found: {url}"))
    }
}

pub fn test_config(today: NaiveDate, workdir: &Path) -> ReportConfig {
    let mut cfg = ReportConfig::with_defaults(today).expect("defaults should parse");
    cfg.stats_api_base = BASE.to_string();
    cfg.savant_base = SAVANT.to_string();
    cfg.daily_feed_url = DAILY_FEED.to_string();
    cfg.workbook_path = workdir.join("daily.xlsx");
    cfg.backfill_workbook_path = workdir.join("season.xlsx");
    cfg
}

/// Fresh scratch directory per test name.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mlb_hr_sheets_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}
