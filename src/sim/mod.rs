//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One simulated frame per `step`
//! - Instance-owned seeded RNG only
//! - Stable iteration order (lanes nearest first, obstacles by spawn order)
//! - No rendering or platform dependencies

pub mod agent;
pub mod collision;
pub mod features;
pub mod generator;
pub mod lane;
pub mod rng;
pub mod state;
pub mod tick;

pub use agent::{Agent, Facing, Side};
pub use collision::Rect;
pub use features::{FEATURE_COUNT, feature_vector};
pub use generator::{LaneSequence, TextureOdds, next_texture};
pub use lane::{Lane, Obstacle, ObstacleKind, Texture};
pub use rng::SimRng;
pub use state::{DEFAULT_START, Death, LaneView, Simulation, Snapshot};
pub use tick::{Action, StepOutcome, tick};
