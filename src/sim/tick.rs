//! Fixed-frame simulation tick
//!
//! Order within a frame: cooldown, action, lane/obstacle advancement, hazard
//! resolution on the nearest lane, then edge/stagnation/score checks.

use serde::{Deserialize, Serialize};

use super::agent::{Agent, Side};
use super::collision::hits;
use super::generator::LaneSequence;
use super::lane::{ObstacleKind, Texture};
use super::state::{Death, Simulation};

/// Discrete input for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Left,
    Right,
    /// Do nothing this frame
    #[default]
    Rest,
}

impl Action {
    /// Output order of a decision function's score vector
    pub const ALL: [Action; 4] = [Action::Forward, Action::Left, Action::Right, Action::Rest];

    /// Pick the action with the highest score (first wins on ties).
    /// Missing or NaN scores never win; an empty slice rests.
    pub fn from_scores(scores: &[f32]) -> Self {
        let mut best: Option<(usize, f32)> = None;
        for (i, &s) in scores.iter().take(Self::ALL.len()).enumerate() {
            if s.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, b)| s > b) {
                best = Some((i, s));
            }
        }
        best.map(|(i, _)| Self::ALL[i]).unwrap_or_default()
    }
}

/// What one frame changed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepOutcome {
    /// A forward hop happened (and the lane window moved)
    pub advanced: bool,
    pub reward: f32,
    pub penalty: f32,
    /// Set on the frame the episode ends
    pub terminal: Option<Death>,
}

/// Advance an episode by one frame. Dead episodes are left untouched.
pub fn tick(state: &mut Simulation, action: Action) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    if !state.alive {
        return outcome;
    }

    let rules = &state.config.rules;

    state.frame += 1;
    state.stagnation = state.stagnation.saturating_add(1);
    state.agent.tick();

    match action {
        Action::Forward => {
            if state.agent.jump() {
                state.lanes.advance(&mut state.rng);
                state.distance += 1;
                state.stagnation = 0;
                outcome.advanced = true;
                outcome.reward += rules.advance_reward;
            }
        }
        Action::Left => state.agent.hop(Side::Left),
        Action::Right => state.agent.hop(Side::Right),
        Action::Rest => {}
    }

    state.lanes.update(&mut state.rng);

    let mut death = resolve_hazards(&state.lanes, &mut state.agent);

    if death.is_none() && state.agent.is_off_screen() {
        death = Some(Death::FellOffSide);
    }

    if let Some(stagnation) = rules.stagnation {
        if state.stagnation > stagnation.soft_limit {
            outcome.penalty += stagnation.drain_per_frame;
        }
        if state.stagnation > stagnation.hard_limit {
            death.get_or_insert(Death::Stagnation);
        }
    }

    if let Some(d) = death {
        outcome.penalty += d.penalty(rules);
    }
    state.score += outcome.reward - outcome.penalty;

    if death.is_none() {
        if let Some(floor) = rules.score_floor {
            if state.score < floor {
                death = Some(Death::Exhausted);
            }
        }
    }

    if let Some(d) = death {
        state.alive = false;
        state.death = Some(d);
        outcome.terminal = Some(d);
        log::debug!(
            "Seed {} died ({:?}) at frame {}, distance {}, score {:.2}",
            state.rng.seed(),
            d,
            state.frame,
            state.distance,
            state.score
        );
    }

    outcome
}

/// Apply the nearest lane's hazard policy to the agent.
///
/// Only lane 0 is checked, and only once it has slid into place.
fn resolve_hazards(lanes: &LaneSequence, agent: &mut Agent) -> Option<Death> {
    let lane = lanes.current();
    if lane.texture == Texture::Grass || !lane.is_settled() {
        return None;
    }

    let hitbox = agent.hitbox();
    let rects: Vec<_> = lane.obstacles.iter().map(|o| o.rect()).collect();
    let touched = hits(&hitbox, &rects);

    match lane.texture {
        Texture::Water => {
            let on_log = touched
                .iter()
                .any(|&i| lane.obstacles[i].kind == ObstacleKind::Log);
            if on_log {
                agent.ride(lane.speed);
                None
            } else {
                Some(Death::Drowned)
            }
        }
        Texture::Asphalt => {
            let smashed = touched
                .iter()
                .any(|&i| lane.obstacles[i].kind == ObstacleKind::Vehicle);
            smashed.then_some(Death::Smashed)
        }
        Texture::Grass => None,
    }
}
