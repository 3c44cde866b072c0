//! Procedural lane generation
//!
//! Textures follow a three-state Markov chain weighted by progress: grass gets
//! rarer the further the agent goes (but never below 1/8), never repeats, and
//! roads and rivers tend to come in streaks.

use super::lane::{Lane, Texture};
use super::rng::SimRng;
use crate::consts::LANE_COUNT;

/// Branch probabilities for the next texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOdds {
    pub grass: f64,
    pub asphalt: f64,
    pub water: f64,
}

impl TextureOdds {
    /// Odds of the lane following `prev` at a given progress
    pub fn after(prev: Texture, progress: u32) -> Self {
        let grass = if prev == Texture::Grass {
            0.0
        } else {
            // Capped at 1: progress 0 would otherwise give 1.3
            (1.3 / (progress as f64 + 2.0).log2()).clamp(1.0 / 8.0, 1.0)
        };
        let rest = 1.0 - grass;

        let (asphalt, water) = match prev {
            Texture::Grass => (rest / 2.0, rest / 2.0),
            Texture::Asphalt => (rest * 5.0 / 6.0, rest / 6.0),
            Texture::Water => (rest / 4.0, rest * 3.0 / 4.0),
        };

        Self {
            grass,
            asphalt,
            water,
        }
    }

    pub fn total(&self) -> f64 {
        self.grass + self.asphalt + self.water
    }

    /// Weights in draw order: grass, asphalt, water
    pub fn weights(&self) -> [(Texture, f64); 3] {
        [
            (Texture::Grass, self.grass),
            (Texture::Asphalt, self.asphalt),
            (Texture::Water, self.water),
        ]
    }
}

/// Draw the texture of the lane after `prev`
pub fn next_texture(progress: u32, prev: Texture, rng: &mut SimRng) -> Texture {
    let odds = TextureOdds::after(prev, progress);
    assert!(
        (odds.total() - 1.0).abs() <= 1e-9,
        "texture odds sum to {} (progress {progress}, after {prev:?})",
        odds.total()
    );
    rng.choice_weighted(&odds.weights())
}

/// The active window of lanes, nearest first
#[derive(Debug, Clone)]
pub struct LaneSequence {
    pub(crate) lanes: [Lane; LANE_COUNT],
    /// Lanes generated so far this episode
    progress: u32,
}

impl LaneSequence {
    /// Lay out the initial window, already settled at its targets
    pub fn new(textures: [Texture; LANE_COUNT], rng: &mut SimRng) -> Self {
        let mut lanes = textures.map(|t| Lane::new(t, 0, rng));
        for (level, lane) in lanes.iter_mut().enumerate() {
            lane.goto_level(level);
            lane.snap_to_target();
        }
        Self { lanes, progress: 0 }
    }

    pub fn lanes(&self) -> &[Lane; LANE_COUNT] {
        &self.lanes
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Lane beneath the agent
    pub fn current(&self) -> &Lane {
        &self.lanes[0]
    }

    /// Drop the nearest lane, generate one at the far end, re-target all lanes
    pub fn advance(&mut self, rng: &mut SimRng) {
        self.progress += 1;
        let prev = self.lanes[LANE_COUNT - 1].texture;
        let texture = next_texture(self.progress, prev, rng);
        log::debug!("Lane {} generated: {:?} after {:?}", self.progress, texture, prev);

        self.lanes.rotate_left(1);
        self.lanes[LANE_COUNT - 1] = Lane::new(texture, self.progress, rng);
        self.reorder();
    }

    /// Advance every lane by one frame, nearest first
    pub fn update(&mut self, rng: &mut SimRng) {
        for lane in &mut self.lanes {
            lane.update(rng);
        }
    }

    fn reorder(&mut self) {
        for (level, lane) in self.lanes.iter_mut().enumerate() {
            lane.goto_level(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn start() -> [Texture; LANE_COUNT] {
        [
            Texture::Grass,
            Texture::Asphalt,
            Texture::Asphalt,
            Texture::Grass,
            Texture::Water,
        ]
    }

    #[test]
    fn test_grass_floor() {
        let odds = TextureOdds::after(Texture::Water, 1_000_000);
        assert_eq!(odds.grass, 1.0 / 8.0);
    }

    #[test]
    fn test_early_grass_odds() {
        // progress 1: 1.3 / log2(3)
        let odds = TextureOdds::after(Texture::Asphalt, 1);
        assert!((odds.grass - 1.3 / 3f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn test_streak_bias() {
        let road = TextureOdds::after(Texture::Asphalt, 50);
        assert!((road.asphalt - 5.0 * road.water).abs() < 1e-12);
        let river = TextureOdds::after(Texture::Water, 50);
        assert!((river.water - 3.0 * river.asphalt).abs() < 1e-12);
        let grass = TextureOdds::after(Texture::Grass, 50);
        assert_eq!(grass.grass, 0.0);
        assert_eq!(grass.asphalt, 0.5);
        assert_eq!(grass.water, 0.5);
    }

    #[test]
    fn test_weights_follow_draw_order() {
        let odds = TextureOdds::after(Texture::Asphalt, 3);
        let weights = odds.weights();
        assert_eq!(weights[0], (Texture::Grass, odds.grass));
        assert_eq!(weights[1], (Texture::Asphalt, odds.asphalt));
        assert_eq!(weights[2], (Texture::Water, odds.water));
    }

    #[test]
    fn test_initial_window_is_settled() {
        let mut rng = SimRng::new(1);
        let seq = LaneSequence::new(start(), &mut rng);
        for (level, lane) in seq.lanes().iter().enumerate() {
            assert_eq!(lane.target_y, crate::lane_target_y(level));
            assert_eq!(lane.current_y, lane.target_y);
        }
        assert_eq!(seq.progress(), 0);
    }

    #[test]
    fn test_advance_shifts_window() {
        let mut rng = SimRng::new(1);
        let mut seq = LaneSequence::new(start(), &mut rng);
        seq.advance(&mut rng);

        let textures: Vec<Texture> = seq.lanes().iter().map(|l| l.texture).collect();
        assert_eq!(
            &textures[..4],
            &[Texture::Asphalt, Texture::Asphalt, Texture::Grass, Texture::Water]
        );
        assert_eq!(seq.progress(), 1);

        // Window targets strictly rise up the screen
        for pair in seq.lanes().windows(2) {
            assert!(pair[0].target_y > pair[1].target_y);
        }
        // Old lanes keep their height until they slide
        assert_eq!(seq.current().current_y, crate::lane_target_y(1));
        assert_eq!(seq.current().target_y, crate::lane_target_y(0));
    }

    #[test]
    fn test_long_run_has_no_grass_pairs() {
        let mut rng = SimRng::new(77);
        let mut seq = LaneSequence::new(start(), &mut rng);
        let mut generated = Vec::new();
        for _ in 0..2000 {
            seq.advance(&mut rng);
            generated.push(seq.lanes()[LANE_COUNT - 1].texture);
        }
        for pair in generated.windows(2) {
            assert!(!(pair[0] == Texture::Grass && pair[1] == Texture::Grass));
        }
        // All three textures show up over a long run
        for t in [Texture::Grass, Texture::Asphalt, Texture::Water] {
            assert!(generated.contains(&t));
        }
    }

    fn any_texture() -> impl Strategy<Value = Texture> {
        prop_oneof![
            Just(Texture::Grass),
            Just(Texture::Asphalt),
            Just(Texture::Water),
        ]
    }

    proptest! {
        #[test]
        fn prop_odds_sum_to_one(progress in 0u32..1_000_000, prev in any_texture()) {
            let odds = TextureOdds::after(prev, progress);
            prop_assert!((odds.total() - 1.0).abs() <= 1e-9);
            prop_assert!(odds.grass >= 0.0 && odds.asphalt >= 0.0 && odds.water >= 0.0);
        }

        #[test]
        fn prop_grass_never_follows_grass(seed in any::<u64>(), progress in 0u32..10_000) {
            let mut rng = SimRng::new(seed);
            prop_assert_ne!(next_texture(progress, Texture::Grass, &mut rng), Texture::Grass);
        }
    }
}
