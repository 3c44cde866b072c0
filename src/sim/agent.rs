//! The player agent (the frog)
//!
//! The agent never moves vertically: forward hops scroll the lanes instead.
//! Horizontal position changes through lateral hops and platform riding.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Which way the agent is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    North,
    Left,
    Right,
}

/// Lateral hop direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Body center
    pub pos: Vec2,
    /// Frames until the next forward hop is allowed
    pub cooldown: u32,
    pub facing: Facing,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0, AGENT_Y),
            cooldown: 0,
            facing: Facing::North,
        }
    }
}

impl Agent {
    /// Full sprite rectangle
    pub fn body(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(AGENT_SIZE))
    }

    /// Collision rectangle, smaller than the body
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(AGENT_HITBOX))
    }

    pub fn can_act(&self) -> bool {
        self.cooldown == 0
    }

    /// Count the cooldown down by one frame
    pub fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Start a forward hop. Returns false (and changes nothing) while cooling down.
    pub fn jump(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        self.cooldown = JUMP_COOLDOWN;
        self.facing = Facing::North;
        true
    }

    /// Hop sideways by one step; allowed during cooldown
    pub fn hop(&mut self, side: Side) {
        self.pos.x += side.sign() * AGENT_STEP;
        self.facing = match side {
            Side::Left => Facing::Left,
            Side::Right => Facing::Right,
        };
        self.recover_edges();
    }

    /// Drift with a log
    pub fn ride(&mut self, speed: f32) {
        self.pos.x += speed;
        self.recover_edges();
    }

    /// Center has left the screen
    pub fn is_off_screen(&self) -> bool {
        self.pos.x < 0.0 || self.pos.x > SCREEN_WIDTH
    }

    /// Near an edge: one more hop would take the center off screen
    pub fn edge_proximity(&self) -> f32 {
        if self.pos.x - AGENT_STEP < 0.0 {
            -1.0
        } else if self.pos.x + AGENT_STEP > SCREEN_WIDTH {
            1.0
        } else {
            0.0
        }
    }

    /// Put the body back on screen once it drifts a full margin past an edge
    fn recover_edges(&mut self) {
        let half = AGENT_SIZE / 2.0;
        if self.pos.x - half < -EDGE_RECOVERY_MARGIN {
            self.pos.x = half;
        } else if self.pos.x + half > SCREEN_WIDTH + EDGE_RECOVERY_MARGIN {
            self.pos.x = SCREEN_WIDTH - half;
        }
    }
}
