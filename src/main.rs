//! Lane Hopper entry point
//!
//! Headless lockstep demo: a population of jittery hoppers plays one seeded
//! level until everyone is dead, then the leader's final frame is printed.
//!
//! Usage: `lane-hopper [population] [seed] [preset]`

use std::sync::Arc;

use lane_hopper::sim::{Action, DEFAULT_START, FEATURE_COUNT};
use lane_hopper::{Population, Preset, SimConfig};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Frame cap for one generation (10 minutes at 60 FPS)
const MAX_FRAMES: u64 = 36_000;

type BoxedPolicy = Box<dyn FnMut(&[f32]) -> Action>;

/// Hops forward most of the time, sidesteps away from edges, otherwise random
fn jittery_hopper(seed: u64, eagerness: f64) -> BoxedPolicy {
    let mut rng = Pcg32::seed_from_u64(seed);
    Box::new(move |features: &[f32]| {
        debug_assert_eq!(features.len(), FEATURE_COUNT);
        let edge = features[1];
        if edge < 0.0 {
            return Action::Right;
        }
        if edge > 0.0 {
            return Action::Left;
        }
        if rng.random_bool(eagerness) {
            Action::Forward
        } else {
            Action::ALL[rng.random_range(1..Action::ALL.len())]
        }
    })
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let size: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(64);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let preset = args
        .next()
        .and_then(|s| Preset::from_str(&s))
        .unwrap_or_default();

    log::info!(
        "Lane Hopper starting: {} contestants, seed {}, {} rules",
        size,
        seed,
        preset.as_str()
    );

    let config = Arc::new(SimConfig::from_preset(preset));
    let mut population = match Population::new(size, seed, &DEFAULT_START, config) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut policies: Vec<BoxedPolicy> = (0..size as u64)
        .map(|i| {
            let eagerness = 0.02 + (i % 8) as f64 * 0.01;
            jittery_hopper(seed.wrapping_mul(1000).wrapping_add(i), eagerness)
        })
        .collect();

    let outcomes = population.run(&mut policies, MAX_FRAMES);

    let ranking = population.ranking();
    for (rank, &idx) in ranking.iter().take(5).enumerate() {
        let o = &outcomes[idx];
        log::info!(
            "#{} contestant {}: distance {}, fitness {:.2}, {} frames, {:?}",
            rank + 1,
            idx,
            o.distance,
            o.fitness(),
            o.frames,
            o.death
        );
    }

    if let Some(&best) = ranking.first() {
        let snapshot = population.contestants()[best].sim.snapshot();
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Snapshot serialization failed: {e}"),
        }
    }
}
