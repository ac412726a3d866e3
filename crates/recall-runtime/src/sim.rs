use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;

use recall_core::content::{ContentDeck, ContentItem};
use recall_core::cursor::{LandmarkName, RawLandmark};

use crate::config::SimTrackerConfig;
use crate::error::RuntimeError;
use crate::tracker_bus::TrackerBus;

/// Multiplication facts used when no content file is configured.
pub fn builtin_deck() -> Vec<ContentItem> {
    vec![
        ContentItem::new("mul-3x4", "3 x 4", "12", &["7", "14", "16"]),
        ContentItem::new("mul-6x7", "6 x 7", "42", &["36", "48", "13"]),
        ContentItem::new("mul-8x8", "8 x 8", "64", &["56", "16", "72"]),
        ContentItem::new("mul-9x3", "9 x 3", "27", &["12", "24", "39"]),
        ContentItem::new("mul-5x6", "5 x 6", "30", &["11", "35", "25"]),
        ContentItem::new("mul-7x8", "7 x 8", "56", &["54", "63", "15"]),
        ContentItem::new("mul-4x9", "4 x 9", "36", &["32", "13", "45"]),
        ContentItem::new("mul-2x11", "2 x 11", "22", &["13", "24", "21"]),
    ]
}

/// Read a JSON array of content items from `path`.
pub fn load_content(path: &str) -> Result<Vec<ContentItem>, RuntimeError> {
    let json = std::fs::read_to_string(path).map_err(|error| RuntimeError::ContentIo {
        path: path.to_string(),
        error,
    })?;
    let items = ContentDeck::parse_items(&json)?;
    tracing::info!(path, items = items.len(), "Loaded content");
    Ok(items)
}

/// Points reported by the simulated tracker `elapsed_secs` into the run.
///
/// The right hand sweeps left-right-left across the camera image at the
/// configured height; the nose follows it higher up. Empty before the
/// startup delay, like a player still walking into frame.
pub fn sweep_sample<R: Rng>(
    config: &SimTrackerConfig,
    elapsed_secs: f32,
    rng: &mut R,
) -> Vec<(LandmarkName, RawLandmark)> {
    if elapsed_secs < config.startup_delay_secs {
        return Vec::new();
    }
    let period = config.sweep_period_secs.max(0.1);
    let phase = ((elapsed_secs - config.startup_delay_secs) / period).fract();
    // Triangle wave over 0.1..0.9.
    let x = 0.1 + 0.8 * (1.0 - (2.0 * phase - 1.0).abs());

    let mut jitter = || {
        if config.jitter > 0.0 {
            rng.random_range(-config.jitter..=config.jitter)
        } else {
            0.0
        }
    };
    let hand = RawLandmark::new((x + jitter()).clamp(0.0, 1.0), (config.height + jitter()).clamp(0.0, 1.0));
    let nose = RawLandmark::new(
        (x + jitter()).clamp(0.0, 1.0),
        (config.height - 0.3 + jitter()).clamp(0.0, 1.0),
    );
    vec![(LandmarkName::RightHand, hand), (LandmarkName::Nose, nose)]
}

/// Publish sweep samples to `bus` at `config.rate_hz` until every reader is
/// gone.
pub fn spawn_sim_tracker(bus: TrackerBus, config: SimTrackerConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let period = Duration::from_secs_f32(1.0 / config.rate_hz.max(1.0));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let started = tokio::time::Instant::now();

        tracing::debug!(rate_hz = config.rate_hz, "Simulated tracker running");
        loop {
            interval.tick().await;
            if !bus.has_readers() {
                break;
            }
            let elapsed = started.elapsed().as_secs_f32();
            bus.publish(sweep_sample(&config, elapsed, &mut rng));
        }
        tracing::debug!(seq = bus.seq(), "Simulated tracker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady() -> SimTrackerConfig {
        SimTrackerConfig {
            jitter: 0.0,
            ..SimTrackerConfig::default()
        }
    }

    #[test]
    fn builtin_deck_is_playable() {
        assert!(ContentDeck::new(builtin_deck()).is_ok());
    }

    #[test]
    fn missing_content_file_is_an_io_error() {
        let err = load_content("does/not/exist.json").unwrap_err();
        assert!(matches!(err, RuntimeError::ContentIo { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn nothing_before_startup_delay() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sweep_sample(&steady(), 0.1, &mut rng).is_empty());
    }

    #[test]
    fn sweep_reaches_both_edges() {
        let config = steady();
        let mut rng = StdRng::seed_from_u64(1);
        let start = config.startup_delay_secs;
        let left = sweep_sample(&config, start, &mut rng);
        let right = sweep_sample(&config, start + config.sweep_period_secs / 2.0, &mut rng);
        assert!((left[0].1.x - 0.1).abs() < 1e-4);
        assert!((right[0].1.x - 0.9).abs() < 1e-4);
        assert_eq!(left[0].0, LandmarkName::RightHand);
        assert!(left[1].1.y < left[0].1.y, "nose sits above the hand");
    }

    #[test]
    fn jitter_stays_in_camera_space() {
        let config = SimTrackerConfig {
            jitter: 0.5,
            ..SimTrackerConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for step in 0..200 {
            for (_, p) in sweep_sample(&config, 1.0 + step as f32 * 0.05, &mut rng) {
                assert!((0.0..=1.0).contains(&p.x));
                assert!((0.0..=1.0).contains(&p.y));
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn tracker_stops_without_readers() {
        let bus = TrackerBus::new();
        let mut reader = bus.subscribe();
        let task = spawn_sim_tracker(bus.clone(), steady());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(reader.latest().seq > 0);
        drop(reader);
        task.await.expect("tracker task should exit cleanly");
    }
}
