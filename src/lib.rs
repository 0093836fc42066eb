pub mod config;
pub mod enrich;
pub mod home_runs;
pub mod http_client;
pub mod leaderboard;
pub mod matchups;
pub mod pipeline;
pub mod sheets;
pub mod softness;
pub mod statcast;
pub mod statsapi;
pub mod workbook;

use tracing_subscriber::EnvFilter;

/// Compact stderr logging. `RUST_LOG` wins over the configured level.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `.env.local` overrides `.env`; both are optional.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}
