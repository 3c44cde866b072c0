//! Decision-function inputs
//!
//! Layout (20 floats):
//! - stagnation, log-normalized to [-1, 1] over the configured horizon
//! - edge proximity (-1 left, +1 right, 0 clear)
//! - per lane, nearest first: is_asphalt, is_water, then speed/5 for the three
//!   nearest lanes, then horizontal gaps to the `[2, 2, 1, 0, 0]` closest
//!   obstacles (or `-speed` when a lane has fewer)

use super::agent::Agent;
use super::lane::{Lane, Texture};
use super::state::Simulation;
use crate::consts::{LANE_COUNT, SCREEN_WIDTH};

pub const FEATURE_COUNT: usize = 20;

/// Lanes whose speed is reported
const SPEED_LANES: usize = 3;
/// Obstacles reported per lane, nearest first
const OBSTACLES_SEEN: [usize; LANE_COUNT] = [2, 2, 1, 0, 0];
/// Lane speed normalization
const SPEED_SCALE: f32 = 5.0;

pub fn feature_vector(sim: &Simulation) -> Vec<f32> {
    let agent = sim.agent();
    let horizon = sim.config().stagnation_horizon() as f32;

    let mut inputs = Vec::with_capacity(FEATURE_COUNT);
    inputs.push(-1.0 + 2.0 * (sim.stagnation() as f32 + 1.0).log2() / horizon.log2());
    inputs.push(agent.edge_proximity());

    for (level, lane) in sim.lanes().lanes().iter().enumerate() {
        inputs.push(if lane.texture == Texture::Asphalt { 1.0 } else { 0.0 });
        inputs.push(if lane.texture == Texture::Water { 1.0 } else { 0.0 });
        if level < SPEED_LANES {
            inputs.push(lane.speed / SPEED_SCALE);
        }
        push_gaps(&mut inputs, lane, agent, OBSTACLES_SEEN[level]);
    }

    debug_assert_eq!(inputs.len(), FEATURE_COUNT);
    inputs
}

/// Signed edge-to-edge gaps to the `count` horizontally closest obstacles
fn push_gaps(inputs: &mut Vec<f32>, lane: &Lane, agent: &Agent, count: usize) {
    if count == 0 {
        return;
    }

    let ax = agent.pos.x;
    let body = agent.body();
    let mut nearest: Vec<_> = lane.obstacles.iter().collect();
    nearest.sort_by(|a, b| (a.center.x - ax).abs().total_cmp(&(b.center.x - ax).abs()));

    for i in 0..count {
        match nearest.get(i) {
            Some(o) => {
                let rect = o.rect();
                let gap = if o.center.x < ax {
                    rect.right() - body.left()
                } else {
                    rect.left() - body.right()
                };
                inputs.push(gap / SCREEN_WIDTH);
            }
            None => inputs.push(-lane.speed),
        }
    }
}
