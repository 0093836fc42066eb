use std::collections::HashMap;

use crate::leaderboard::PlayerStatRow;
use crate::statcast::BattedBallSample;

/// Minimum launch speed (mph) and inclusive launch-angle window (degrees).
#[derive(Debug, Clone, Copy)]
pub struct BarrelBand {
    pub min_speed: f64,
    pub min_angle: f64,
    pub max_angle: f64,
}

pub const BARREL_BANDS: [BarrelBand; 3] = [
    BarrelBand {
        min_speed: 98.0,
        min_angle: 26.0,
        max_angle: 30.0,
    },
    BarrelBand {
        min_speed: 105.0,
        min_angle: 19.0,
        max_angle: 26.0,
    },
    BarrelBand {
        min_speed: 109.0,
        min_angle: 13.0,
        max_angle: 19.0,
    },
];

impl BarrelBand {
    fn contains(&self, speed: f64, angle: f64) -> bool {
        speed >= self.min_speed && angle >= self.min_angle && angle <= self.max_angle
    }
}

/// Missing speed or angle counts as zero, which can never land in a band.
pub fn is_barrel(launch_speed: Option<f64>, launch_angle: Option<f64>) -> bool {
    let speed = launch_speed.unwrap_or(0.0);
    let angle = launch_angle.unwrap_or(0.0);
    BARREL_BANDS.iter().any(|band| band.contains(speed, angle))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattedBallAggregate {
    pub samples: usize,
    /// Share of all samples that were barrels.
    pub barrel_rate: f64,
    /// Mean over samples that carried a launch speed.
    pub avg_exit_velocity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPlayerStatRow {
    pub base: PlayerStatRow,
    pub barrel_rate: Option<f64>,
    pub avg_exit_velocity: Option<f64>,
}

#[derive(Default)]
struct Accumulator {
    samples: usize,
    barrels: usize,
    speed_sum: f64,
    speed_count: usize,
}

pub fn aggregate_samples(samples: &[BattedBallSample]) -> HashMap<u64, BattedBallAggregate> {
    let mut acc: HashMap<u64, Accumulator> = HashMap::new();
    for sample in samples {
        let entry = acc.entry(sample.batter_id).or_default();
        entry.samples += 1;
        if is_barrel(sample.launch_speed, sample.launch_angle) {
            entry.barrels += 1;
        }
        if let Some(speed) = sample.launch_speed {
            entry.speed_sum += speed;
            entry.speed_count += 1;
        }
    }

    acc.into_iter()
        .map(|(batter_id, a)| {
            let avg_exit_velocity = if a.speed_count > 0 {
                Some(a.speed_sum / a.speed_count as f64)
            } else {
                None
            };
            (
                batter_id,
                BattedBallAggregate {
                    samples: a.samples,
                    barrel_rate: a.barrels as f64 / a.samples as f64,
                    avg_exit_velocity,
                },
            )
        })
        .collect()
}

/// Left join of per-batter aggregates onto a leaderboard.
///
/// Output has the same rows in the same order; players without samples get
/// `None` in both new columns.
pub fn enrich_leaderboard(
    rows: Vec<PlayerStatRow>,
    aggregates: &HashMap<u64, BattedBallAggregate>,
) -> Vec<EnrichedPlayerStatRow> {
    rows.into_iter()
        .map(|base| {
            let agg = aggregates.get(&base.player_id);
            EnrichedPlayerStatRow {
                barrel_rate: agg.map(|a| a.barrel_rate),
                avg_exit_velocity: agg.and_then(|a| a.avg_exit_velocity),
                base,
            }
        })
        .collect()
}
