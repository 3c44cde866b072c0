//! Episode rules and presets
//!
//! Scoring and stagnation constants differ between the interactive game and
//! the evaluation loop, so they are configuration rather than core constants.
//! Screen geometry stays in [`crate::consts`].

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{FPS, LANE_COUNT};

/// Stagnation horizon used to normalize features when no hard limit is set
pub const DEFAULT_STAGNATION_HORIZON: u32 = 480;

/// Rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Frame-count rules used by the fitness evaluator
    #[default]
    Evaluation,
    /// Time-based rules (3s grace, 7s limit)
    Classic,
    /// Human play: no stagnation rules, no score floor
    Casual,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Evaluation => "Evaluation",
            Preset::Classic => "Classic",
            Preset::Casual => "Casual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "evaluation" | "eval" => Some(Preset::Evaluation),
            "classic" => Some(Preset::Classic),
            "casual" => Some(Preset::Casual),
            _ => None,
        }
    }

    /// Rules for this preset
    pub fn rules(&self) -> Rules {
        match self {
            Preset::Evaluation => Rules {
                stagnation: Some(Stagnation {
                    soft_limit: 180,
                    hard_limit: 480,
                    drain_per_frame: 0.05,
                }),
                score_floor: Some(-5.0),
                ..Rules::default()
            },
            Preset::Classic => Rules {
                stagnation: Some(Stagnation {
                    soft_limit: 3 * FPS,
                    hard_limit: 7 * FPS,
                    drain_per_frame: 4.0 / FPS as f32,
                }),
                score_floor: Some(-10.0),
                ..Rules::default()
            },
            Preset::Casual => Rules {
                stagnation: None,
                score_floor: None,
                ..Rules::default()
            },
        }
    }
}

/// Idle-agent rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stagnation {
    /// Frames without advancing before the per-frame drain starts
    pub soft_limit: u32,
    /// Frames without advancing before the agent dies
    pub hard_limit: u32,
    /// Score drained every frame past the soft limit
    pub drain_per_frame: f32,
}

/// Scoring and termination rules for one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Reward for each successful forward hop
    pub advance_reward: f32,
    /// Penalty for drifting off the side of the screen
    pub side_penalty: f32,
    /// Penalty for missing every log on a water lane
    pub drown_penalty: f32,
    /// Penalty for being hit by a vehicle
    pub smash_penalty: f32,
    /// Idle rules (None disables stagnation entirely)
    #[serde(default)]
    pub stagnation: Option<Stagnation>,
    /// Episode ends once the running score drops below this
    #[serde(default)]
    pub score_floor: Option<f32>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            advance_reward: 20.0,
            side_penalty: 5.0,
            drown_penalty: 15.0,
            smash_penalty: 15.0,
            stagnation: None,
            score_floor: None,
        }
    }
}

/// Simulation configuration shared read-only by every instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Preset the rules were derived from
    pub preset: Preset,
    pub rules: Rules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl SimConfig {
    /// Create a config from a preset (applies preset rules)
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            rules: preset.rules(),
        }
    }

    /// Frames used to normalize the stagnation feature
    pub fn stagnation_horizon(&self) -> u32 {
        self.rules
            .stagnation
            .map(|s| s.hard_limit)
            .unwrap_or(DEFAULT_STAGNATION_HORIZON)
    }

    /// Check the rules for contract violations
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.rules;
        for (name, value) in [
            ("advance_reward", r.advance_reward),
            ("side_penalty", r.side_penalty),
            ("drown_penalty", r.drown_penalty),
            ("smash_penalty", r.smash_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidAmount { name, value });
            }
        }

        if let Some(s) = r.stagnation {
            if s.hard_limit < 2 || s.soft_limit >= s.hard_limit {
                return Err(ConfigError::StagnationLimits {
                    soft: s.soft_limit,
                    hard: s.hard_limit,
                });
            }
            if !s.drain_per_frame.is_finite() || s.drain_per_frame < 0.0 {
                return Err(ConfigError::InvalidAmount {
                    name: "drain_per_frame",
                    value: s.drain_per_frame,
                });
            }
        }

        if let Some(floor) = r.score_floor {
            if !floor.is_finite() {
                return Err(ConfigError::InvalidAmount {
                    name: "score_floor",
                    value: floor,
                });
            }
        }

        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        log::info!("Loaded {} config", config.preset.as_str());
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Caller contract violations detected when building a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The initial lane window must hold exactly `LANE_COUNT` lanes
    WindowSize { got: usize },
    /// Soft stagnation limit must be below the hard limit
    StagnationLimits { soft: u32, hard: u32 },
    /// A reward/penalty amount is negative or not finite
    InvalidAmount { name: &'static str, value: f32 },
    /// JSON config could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowSize { got } => {
                write!(f, "lane window needs {LANE_COUNT} lanes, got {got}")
            }
            Self::StagnationLimits { soft, hard } => write!(
                f,
                "stagnation soft limit {soft} must be below hard limit {hard}"
            ),
            Self::InvalidAmount { name, value } => write!(f, "invalid {name}: {value}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
        }
    }
}

impl Error for ConfigError {}
