//! Lane Hopper - A lane-crossing arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, obstacles, agent, collisions)
//! - `eval`: Lockstep driver for many independent simulations
//! - `settings`: Episode rules and presets

pub mod eval;
pub mod settings;
pub mod sim;

pub use eval::{Contestant, Outcome, Policy, Population};
pub use settings::{ConfigError, Preset, Rules, SimConfig};
pub use sim::{Action, Death, Simulation, Snapshot, StepOutcome, Texture};

/// Game configuration constants
pub mod consts {
    /// Simulated frames per second (one `step` = one frame)
    pub const FPS: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 500.0;

    /// Number of lanes in the active window
    pub const LANE_COUNT: usize = 5;
    pub const LANE_HEIGHT: f32 = SCREEN_HEIGHT / LANE_COUNT as f32;

    /// Lane slide easing: fraction of remaining distance covered per frame
    pub const LANE_EASE: f32 = 0.2;
    /// Lanes snap to their target once this close
    pub const LANE_SNAP_DISTANCE: f32 = 1.0;
    /// Hazards on the current lane are checked only once it is this close to its target
    pub const LANE_SETTLE_TOLERANCE: f32 = 5.0;

    /// Agent body and hitbox (hitbox is the forgiving collision area)
    pub const AGENT_SIZE: f32 = 32.0;
    pub const AGENT_HITBOX: f32 = 16.0;
    /// Agent center height; it never moves vertically, the lanes do
    pub const AGENT_Y: f32 = SCREEN_HEIGHT - 42.0;
    /// Horizontal hop distance
    pub const AGENT_STEP: f32 = SCREEN_WIDTH / 16.0;
    /// How far past an edge the body may drift before being put back
    pub const EDGE_RECOVERY_MARGIN: f32 = 64.0;
    /// Frames between forward hops
    pub const JUMP_COOLDOWN: u32 = 15;

    /// Obstacles spawn this far beyond the leading edge
    pub const SPAWN_OFFSET: f32 = 100.0;
    pub const VEHICLE_WIDTH: f32 = 64.0;
    pub const VEHICLE_HEIGHT: f32 = 0.6 * LANE_HEIGHT;
    pub const SHORT_LOG_WIDTH: f32 = 72.0;
    pub const LONG_LOG_WIDTH: f32 = 108.0;
    pub const LOG_HEIGHT: f32 = 36.0;
}

/// Vertical position a lane slides to for a window level
/// (0 = bottom, nearest the agent; `LANE_COUNT - 1` = top).
///
/// Panics on an out-of-range level: the window has a fixed size.
#[inline]
pub fn lane_target_y(level: usize) -> f32 {
    use consts::*;
    assert!(
        level < LANE_COUNT,
        "lane level {level} out of range (window holds {LANE_COUNT} lanes)"
    );
    SCREEN_HEIGHT - (level as f32 + 1.0) * LANE_HEIGHT
}
