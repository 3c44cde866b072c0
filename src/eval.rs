//! Lockstep driver for many independent episodes
//!
//! Each contestant owns its simulation and its running outcome. One call to
//! [`Population::step`] advances every live contestant by exactly one frame,
//! in index order. Nothing is shared between contestants except the
//! read-only config.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::settings::{ConfigError, SimConfig};
use crate::sim::{Action, Death, Simulation, StepOutcome, Texture};

/// Maps a feature vector to an action (a trained network, a heuristic, a keyboard)
pub trait Policy {
    fn decide(&mut self, features: &[f32]) -> Action;
}

impl<F> Policy for F
where
    F: FnMut(&[f32]) -> Action,
{
    fn decide(&mut self, features: &[f32]) -> Action {
        self(features)
    }
}

/// Caller-side accumulation of step outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub alive: bool,
    pub distance: u32,
    pub frames: u64,
    pub reward: f32,
    pub penalty: f32,
    pub death: Option<Death>,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            alive: true,
            distance: 0,
            frames: 0,
            reward: 0.0,
            penalty: 0.0,
            death: None,
        }
    }
}

impl Outcome {
    /// Fold one frame's outcome in
    pub fn absorb(&mut self, delta: &StepOutcome) {
        self.frames += 1;
        if delta.advanced {
            self.distance += 1;
        }
        self.reward += delta.reward;
        self.penalty += delta.penalty;
        if let Some(death) = delta.terminal {
            self.alive = false;
            self.death = Some(death);
        }
    }

    pub fn fitness(&self) -> f32 {
        self.reward - self.penalty
    }
}

/// One simulation plus its outcome
#[derive(Debug, Clone)]
pub struct Contestant {
    pub sim: Simulation,
    pub outcome: Outcome,
}

impl Contestant {
    /// Ask the policy for an action and step once. No-op once dead.
    pub fn step<P: Policy + ?Sized>(&mut self, policy: &mut P) -> StepOutcome {
        if !self.outcome.alive {
            return StepOutcome::default();
        }
        let action = policy.decide(&self.sim.feature_vector());
        let delta = self.sim.step(action);
        self.outcome.absorb(&delta);
        delta
    }
}

/// A generation of contestants stepped in lockstep
#[derive(Debug, Clone)]
pub struct Population {
    contestants: Vec<Contestant>,
    frame: u64,
}

impl Population {
    /// `size` contestants, all seeded with `seed` so they face the same level
    pub fn new(
        size: usize,
        seed: u64,
        initial: &[Texture],
        config: Arc<SimConfig>,
    ) -> Result<Self, ConfigError> {
        let contestants = (0..size)
            .map(|_| {
                Simulation::new(seed, initial, Arc::clone(&config)).map(|sim| Contestant {
                    sim,
                    outcome: Outcome::default(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            contestants,
            frame: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.contestants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contestants.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn contestants(&self) -> &[Contestant] {
        &self.contestants
    }

    pub fn alive_count(&self) -> usize {
        self.contestants.iter().filter(|c| c.outcome.alive).count()
    }

    /// Step every live contestant once. Returns how many are still alive.
    ///
    /// Panics unless there is exactly one policy per contestant.
    pub fn step<P: Policy>(&mut self, policies: &mut [P]) -> usize {
        assert_eq!(
            policies.len(),
            self.contestants.len(),
            "one policy per contestant"
        );
        self.frame += 1;
        for (contestant, policy) in self.contestants.iter_mut().zip(policies.iter_mut()) {
            contestant.step(policy);
        }
        self.alive_count()
    }

    /// Step until everyone is dead or `max_frames` have passed
    pub fn run<P: Policy>(&mut self, policies: &mut [P], max_frames: u64) -> Vec<Outcome> {
        while self.frame < max_frames && self.step(policies) > 0 {}

        let best = self
            .contestants
            .iter()
            .map(|c| c.outcome.distance)
            .max()
            .unwrap_or(0);
        log::info!(
            "Population of {} finished after {} frames ({} alive, best distance {})",
            self.len(),
            self.frame,
            self.alive_count(),
            best
        );

        self.contestants.iter().map(|c| c.outcome.clone()).collect()
    }

    /// Live contestant with the best fitness (earliest index on ties)
    pub fn leader(&self) -> Option<(usize, &Contestant)> {
        self.contestants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.outcome.alive)
            .rev()
            .max_by(|(_, a), (_, b)| a.outcome.fitness().total_cmp(&b.outcome.fitness()))
    }

    /// Contestant indices, best fitness first (stable on ties)
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.contestants.len()).collect();
        order.sort_by(|&a, &b| {
            self.contestants[b]
                .outcome
                .fitness()
                .total_cmp(&self.contestants[a].outcome.fitness())
        });
        order
    }
}
