mod common;

use mlb_hr_sheets::home_runs::{
    fetch_home_runs_for_day, fetch_home_runs_range, parse_daily_feed_json,
    parse_schedule_game_pks_json,
};
use mlb_hr_sheets::leaderboard::{
    LeaderboardQuery, fetch_hitting_leaders, parse_hitting_leaders_json,
    parse_pitching_leaders_json,
};
use mlb_hr_sheets::statcast::{fetch_samples, parse_samples_csv, savant_day_url};
use mlb_hr_sheets::statsapi::{live_feed_url, schedule_url};

use common::{BASE, MapFetcher, SAVANT, date, read_fixture};

#[test]
fn parses_hitting_leaders_fixture() {
    let rows = parse_hitting_leaders_json(&read_fixture("hitting_leaders.json"))
        .expect("fixture should parse");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].player_id, 592450);
    assert_eq!(rows[0].name, "Aaron Judge");
    assert_eq!(rows[0].home_runs, 24);
    assert_eq!(rows[0].games, 60);
    assert_eq!(rows[0].at_bats, 220);
    assert_eq!(rows[0].avg.as_deref(), Some(".314"));
    assert_eq!(rows[0].hr_pct, Some(0.1091));
    assert_eq!(rows[1].hr_pct, Some(0.1));
    assert_eq!(rows[2].hr_pct, None);
}

#[test]
fn missing_stats_key_is_an_error() {
    let err = parse_hitting_leaders_json(r#"{"copyright": "x"}"#);
    assert!(err.is_err());
}

#[test]
fn empty_stats_list_is_an_empty_leaderboard() {
    let rows = parse_hitting_leaders_json(r#"{"stats": []}"#).expect("empty list parses");
    assert!(rows.is_empty());
}

#[test]
fn grouping_without_splits_is_an_empty_leaderboard() {
    let hitters = parse_hitting_leaders_json(r#"{"stats": [{}]}"#).expect("grouping parses");
    assert!(hitters.is_empty());
    let pitchers = parse_pitching_leaders_json(r#"{"stats": [{}]}"#).expect("grouping parses");
    assert!(pitchers.is_empty());
}

#[test]
fn empty_pitching_stats_list_is_an_empty_leaderboard() {
    let rows = parse_pitching_leaders_json(r#"{"stats": []}"#).expect("empty list parses");
    assert!(rows.is_empty());
    assert!(parse_pitching_leaders_json(r#"{"copyright": "x"}"#).is_err());
}

#[test]
fn parses_pitching_leaders_with_placeholder_era() {
    let rows = parse_pitching_leaders_json(&read_fixture("pitching_leaders.json"))
        .expect("fixture should parse");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].strikeouts, 110);
    assert_eq!(rows[0].era, Some(2.31));
    assert_eq!(rows[0].innings_pitched.as_deref(), Some("81.2"));
    assert_eq!(rows[2].era, None);
}

#[test]
fn leaderboard_fetch_uses_query_url() {
    let query = LeaderboardQuery::home_run_leaders(2025, 75);
    let url = query.url(BASE);
    assert!(url.contains("sortStat=homeRuns"));
    assert!(url.contains("limit=75"));
    assert!(url.contains("group=hitting"));

    let fetcher = MapFetcher::new().with(url.clone(), read_fixture("hitting_leaders.json"));
    let rows = fetch_hitting_leaders(&fetcher, BASE, &query).expect("fetch should succeed");
    assert_eq!(rows.len(), 3);
    assert_eq!(fetcher.calls(), vec![url]);
}

#[test]
fn doubleheader_yields_home_runs_from_both_games() {
    let day = date(2025, 5, 4);
    let fetcher = MapFetcher::new()
        .with(schedule_url(BASE, day, None), read_fixture("schedule_doubleheader.json"))
        .with(live_feed_url(BASE, 777001), read_fixture("live_feed_777001.json"))
        .with(live_feed_url(BASE, 777002), read_fixture("live_feed_777002.json"));

    let events = fetch_home_runs_for_day(&fetcher, BASE, day).expect("day should load");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].batter, "Aaron Judge");
    assert_eq!(events[0].pitcher, "Aaron Nola");
    assert_eq!(events[0].pitch_type.as_deref(), Some("Slider"));
    assert_eq!(events[0].exit_velocity, Some(112.4));
    assert_eq!(events[0].distance, Some(441.0));
    assert_eq!(events[1].batter, "Cal Raleigh");
    assert_eq!(events[1].pitch_type, None);
    assert!(events.iter().all(|e| e.date == day));
}

#[test]
fn date_without_games_has_no_events() {
    let day = date(2025, 5, 3);
    assert!(parse_schedule_game_pks_json(r#"{"dates": []}"#).unwrap().is_empty());

    let fetcher = MapFetcher::new().with(schedule_url(BASE, day, None), r#"{"dates": []}"#);
    let events = fetch_home_runs_for_day(&fetcher, BASE, day).expect("empty day loads");
    assert!(events.is_empty());
    assert_eq!(fetcher.calls().len(), 1);
}

#[test]
fn range_visits_each_day_once_in_order() {
    let fetcher = MapFetcher::new()
        .with(schedule_url(BASE, date(2025, 5, 3), None), r#"{"dates": []}"#)
        .with(
            schedule_url(BASE, date(2025, 5, 4), None),
            read_fixture("schedule_doubleheader.json"),
        )
        .with(live_feed_url(BASE, 777001), read_fixture("live_feed_777001.json"))
        .with(live_feed_url(BASE, 777002), read_fixture("live_feed_777002.json"));

    let mut seen = Vec::new();
    let days = fetch_home_runs_range(&fetcher, BASE, date(2025, 5, 3), date(2025, 5, 4), |d, ev| {
        seen.push((d, ev.len()));
        Ok(())
    })
    .expect("range should load");
    assert_eq!(days, 2);
    assert_eq!(seen, vec![(date(2025, 5, 3), 0), (date(2025, 5, 4), 2)]);
}

#[test]
fn failed_live_feed_aborts_the_day() {
    let day = date(2025, 5, 4);
    let fetcher = MapFetcher::new()
        .with(schedule_url(BASE, day, None), read_fixture("schedule_doubleheader.json"))
        .with(live_feed_url(BASE, 777001), read_fixture("live_feed_777001.json"));
    assert!(fetch_home_runs_for_day(&fetcher, BASE, day).is_err());
}

#[test]
fn parses_daily_feed_fixture() {
    let day = date(2025, 5, 4);
    let events = parse_daily_feed_json(&read_fixture("daily_feed.json"), day)
        .expect("fixture should parse");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].batter, "Aaron Judge");
    assert_eq!(events[0].distance, Some(441.0));
    assert_eq!(events[1].pitch_type, None);
    assert_eq!(events[1].exit_velocity, Some(104.0));
    assert_eq!(events[1].distance, None);
}

#[test]
fn parses_savant_csv_with_blank_metrics() {
    let samples = parse_samples_csv(read_fixture("savant_day.csv").as_bytes())
        .expect("fixture should parse");
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0].batter_id, 592450);
    assert_eq!(samples[0].launch_speed, Some(112.4));
    assert_eq!(samples[2].launch_speed, None);
    assert_eq!(samples[2].launch_angle, None);
}

#[test]
fn savant_window_is_fetched_one_day_per_request() {
    let fetcher = MapFetcher::new()
        .with(savant_day_url(SAVANT, date(2025, 5, 3)), "batter,launch_speed,launch_angle\n")
        .with(savant_day_url(SAVANT, date(2025, 5, 4)), read_fixture("savant_day.csv"));
    let samples =
        fetch_samples(&fetcher, SAVANT, date(2025, 5, 3), date(2025, 5, 4)).expect("window loads");
    assert_eq!(samples.len(), 4);
    assert_eq!(fetcher.calls().len(), 2);
    assert!(fetcher.calls()[1].contains("game_date_gt=2025-05-04&game_date_lt=2025-05-04"));
}
