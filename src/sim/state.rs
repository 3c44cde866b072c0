//! Simulation state and its render-agnostic views
//!
//! One `Simulation` is one episode: it owns its random stream, its lane
//! window and its agent. Nothing inside is shared with other instances, so
//! any number of them can be stepped side by side from their own seeds.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::generator::LaneSequence;
use super::lane::{Obstacle, Texture};
use super::rng::SimRng;
use super::tick::{Action, StepOutcome, tick};
use crate::consts::LANE_COUNT;
use crate::settings::{ConfigError, Rules, SimConfig};

/// Opening window used by both the interactive game and the evaluator
pub const DEFAULT_START: [Texture; LANE_COUNT] = [
    Texture::Grass,
    Texture::Asphalt,
    Texture::Asphalt,
    Texture::Grass,
    Texture::Water,
];

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Death {
    /// Agent center left the screen
    FellOffSide,
    /// Stood on water with no log underneath
    Drowned,
    /// Hit by a vehicle
    Smashed,
    /// Too long without advancing
    Stagnation,
    /// Running score fell below the configured floor
    Exhausted,
}

impl Death {
    /// One-off penalty charged on the tick of death
    pub fn penalty(&self, rules: &Rules) -> f32 {
        match self {
            Death::FellOffSide => rules.side_penalty,
            Death::Drowned => rules.drown_penalty,
            Death::Smashed => rules.smash_penalty,
            Death::Stagnation | Death::Exhausted => 0.0,
        }
    }
}

/// One independent episode
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: Arc<SimConfig>,
    pub(crate) rng: SimRng,
    pub(crate) lanes: LaneSequence,
    pub(crate) agent: Agent,
    pub(crate) alive: bool,
    pub(crate) death: Option<Death>,
    /// Frames simulated
    pub(crate) frame: u64,
    /// Successful forward hops
    pub(crate) distance: u32,
    /// Frames since the last successful forward hop
    pub(crate) stagnation: u32,
    /// Running episode score (rewards minus penalties)
    pub(crate) score: f32,
}

impl Simulation {
    /// Create an episode from a seed and the opening lane window.
    ///
    /// The window must hold exactly `LANE_COUNT` textures and the config must
    /// validate; both are caller contract checks.
    pub fn new(
        seed: u64,
        initial: &[Texture],
        config: Arc<SimConfig>,
    ) -> Result<Self, ConfigError> {
        let textures: [Texture; LANE_COUNT] = initial
            .try_into()
            .map_err(|_| ConfigError::WindowSize { got: initial.len() })?;
        config.validate()?;

        let mut rng = SimRng::new(seed);
        let lanes = LaneSequence::new(textures, &mut rng);

        Ok(Self {
            config,
            rng,
            lanes,
            agent: Agent::default(),
            alive: true,
            death: None,
            frame: 0,
            distance: 0,
            stagnation: 0,
            score: 0.0,
        })
    }

    /// Advance one frame with the given action
    pub fn step(&mut self, action: Action) -> StepOutcome {
        tick(self, action)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn death(&self) -> Option<Death> {
        self.death
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn stagnation(&self) -> u32 {
        self.stagnation
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn lanes(&self) -> &LaneSequence {
        &self.lanes
    }

    /// Fixed-length input vector for a decision function
    pub fn feature_vector(&self) -> Vec<f32> {
        super::features::feature_vector(self)
    }

    /// Positions and textures for an external renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            alive: self.alive,
            death: self.death,
            distance: self.distance,
            stagnation: self.stagnation,
            score: self.score,
            agent: self.agent.clone(),
            lanes: self
                .lanes
                .lanes()
                .iter()
                .map(|lane| LaneView {
                    texture: lane.texture,
                    y: lane.current_y,
                    target_y: lane.target_y,
                    speed: lane.speed,
                    obstacles: lane.obstacles.clone(),
                })
                .collect(),
        }
    }
}

/// A lane as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneView {
    pub texture: Texture,
    pub y: f32,
    pub target_y: f32,
    pub speed: f32,
    pub obstacles: Vec<Obstacle>,
}

/// Render-agnostic copy of an episode, nearest lane first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub frame: u64,
    pub alive: bool,
    pub death: Option<Death>,
    pub distance: u32,
    pub stagnation: u32,
    pub score: f32,
    pub agent: Agent,
    pub lanes: Vec<LaneView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Arc<SimConfig> {
        Arc::new(SimConfig::default())
    }

    #[test]
    fn test_new_rejects_short_window() {
        let err = Simulation::new(1, &DEFAULT_START[..4], config()).unwrap_err();
        assert_eq!(err, ConfigError::WindowSize { got: 4 });
    }

    #[test]
    fn test_new_rejects_long_window() {
        let mut textures = DEFAULT_START.to_vec();
        textures.push(Texture::Grass);
        let err = Simulation::new(1, &textures, config()).unwrap_err();
        assert_eq!(err, ConfigError::WindowSize { got: 6 });
    }

    #[test]
    fn test_new_rejects_invalid_rules() {
        let mut cfg = SimConfig::default();
        cfg.rules.advance_reward = f32::NAN;
        assert!(Simulation::new(1, &DEFAULT_START, Arc::new(cfg)).is_err());
    }

    #[test]
    fn test_fresh_episode() {
        let sim = Simulation::new(42, &DEFAULT_START, config()).unwrap();
        assert!(sim.is_alive());
        assert_eq!(sim.seed(), 42);
        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.distance(), 0);
        assert!(sim.agent().can_act());

        let snap = sim.snapshot();
        assert_eq!(snap.lanes.len(), LANE_COUNT);
        let textures: Vec<Texture> = snap.lanes.iter().map(|l| l.texture).collect();
        assert_eq!(textures, DEFAULT_START.to_vec());
        assert!(snap.lanes.iter().all(|l| l.obstacles.is_empty()));
    }

    #[test]
    fn test_snapshot_serializes() {
        let sim = Simulation::new(3, &DEFAULT_START, config()).unwrap();
        let json = serde_json::to_string(&sim.snapshot()).unwrap();
        assert!(json.contains("\"Asphalt\""));
        assert!(json.contains("\"agent\""));
    }
}
