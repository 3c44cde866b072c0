//! Lanes and the obstacles they own
//!
//! A lane is a horizontal strip that slides toward its target height and, for
//! hazardous textures, spawns obstacles at a jittered interval. Obstacles are
//! locked to their lane's current height so they ride along while it slides.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::rng::SimRng;
use crate::consts::*;

/// Ground type of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Texture {
    /// Safe ground, never spawns
    Grass,
    /// Road with vehicles
    Asphalt,
    /// River; only logs are safe
    Water,
}

impl Texture {
    /// Possible lane speeds (pixels per frame, sign = direction)
    pub fn speed_choices(&self) -> &'static [f32] {
        match self {
            Texture::Grass => &[],
            Texture::Asphalt => &[-3.0, -2.0, 2.0, 3.0],
            Texture::Water => &[-1.75, -1.5, -1.25, 1.25, 1.5, 1.75],
        }
    }

    /// Frames between spawns at a given progress (0 = never spawns)
    pub fn spawn_interval(&self, progress: u32) -> i32 {
        let p = progress as f64;
        match self {
            Texture::Grass => 0,
            // Roads get denser
            Texture::Asphalt => (150.0 - 0.6 * p).max(60.0).round() as i32,
            // Logs get sparser
            Texture::Water => (108.0 + 1.2 * p).min(270.0).round() as i32,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Kills on contact
    Vehicle,
    /// Carries the agent across water
    Log,
}

/// A vehicle or log moving across its lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub center: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center, self.size)
    }

    /// Move one frame and re-lock to the lane's height.
    /// Returns false once fully past the trailing edge.
    fn advance(&mut self, lane_y: f32) -> bool {
        self.center.x += self.speed;
        self.center.y = lane_y + LANE_HEIGHT / 2.0;

        let rect = self.rect();
        !((self.speed > 0.0 && rect.left() > SCREEN_WIDTH)
            || (self.speed < 0.0 && rect.right() < 0.0))
    }
}

/// One horizontal strip of the level
#[derive(Debug, Clone)]
pub struct Lane {
    pub texture: Texture,
    /// Top edge, eased toward `target_y`
    pub current_y: f32,
    pub target_y: f32,
    pub speed: f32,
    pub spawn_interval: i32,
    pub spawn_countdown: i32,
    pub obstacles: Vec<Obstacle>,
}

impl Lane {
    /// Build a lane, drawing its speed from `rng` for hazardous textures
    pub fn new(texture: Texture, progress: u32, rng: &mut SimRng) -> Self {
        let choices = texture.speed_choices();
        let speed = if choices.is_empty() {
            0.0
        } else {
            rng.choice(choices)
        };

        Self {
            texture,
            current_y: 0.0,
            target_y: 0.0,
            speed,
            spawn_interval: texture.spawn_interval(progress),
            spawn_countdown: 0,
            obstacles: Vec::new(),
        }
    }

    /// Point this lane at a window level (0 = bottom, 4 = top)
    pub fn goto_level(&mut self, level: usize) {
        self.target_y = crate::lane_target_y(level);
    }

    /// Jump straight to the target (initial layout)
    pub fn snap_to_target(&mut self) {
        self.current_y = self.target_y;
    }

    /// Whether the slide has settled enough for hazard checks
    pub fn is_settled(&self) -> bool {
        (self.current_y - self.target_y).abs() < LANE_SETTLE_TOLERANCE
    }

    /// Advance one frame: slide, spawn, move obstacles
    pub fn update(&mut self, rng: &mut SimRng) {
        let distance = self.target_y - self.current_y;
        if distance.abs() > LANE_SNAP_DISTANCE {
            self.current_y += distance * LANE_EASE;
        } else {
            self.current_y = self.target_y;
        }

        if self.spawn_interval > 0 {
            self.spawn_countdown -= 1;
            if self.spawn_countdown <= 0 {
                self.spawn_obstacle(rng);
                self.spawn_countdown = self.spawn_interval + rng.int_range(-5, 20);
            }
        }

        let lane_y = self.current_y;
        self.obstacles.retain_mut(|o| o.advance(lane_y));
    }

    /// Add one obstacle just beyond the edge it enters from
    fn spawn_obstacle(&mut self, rng: &mut SimRng) {
        let x = if self.speed > 0.0 {
            -SPAWN_OFFSET
        } else {
            SCREEN_WIDTH + SPAWN_OFFSET
        };
        let (kind, size) = match self.texture {
            Texture::Asphalt => (
                ObstacleKind::Vehicle,
                Vec2::new(VEHICLE_WIDTH, VEHICLE_HEIGHT),
            ),
            Texture::Water => {
                let width = rng.choice(&[SHORT_LOG_WIDTH, LONG_LOG_WIDTH]);
                (ObstacleKind::Log, Vec2::new(width, LOG_HEIGHT))
            }
            Texture::Grass => unreachable!("grass lanes never spawn"),
        };

        self.obstacles.push(Obstacle {
            kind,
            center: Vec2::new(x, self.current_y + LANE_HEIGHT / 2.0),
            size,
            speed: self.speed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grass_is_still() {
        let mut rng = SimRng::new(1);
        let mut lane = Lane::new(Texture::Grass, 40, &mut rng);
        assert_eq!(lane.speed, 0.0);
        assert_eq!(lane.spawn_interval, 0);

        for _ in 0..500 {
            lane.update(&mut rng);
        }
        assert!(lane.obstacles.is_empty());
    }

    #[test]
    fn test_hazard_speeds_come_from_texture_set() {
        let mut rng = SimRng::new(5);
        for _ in 0..50 {
            let road = Lane::new(Texture::Asphalt, 0, &mut rng);
            assert!(Texture::Asphalt.speed_choices().contains(&road.speed));
            let river = Lane::new(Texture::Water, 0, &mut rng);
            assert!(Texture::Water.speed_choices().contains(&river.speed));
        }
    }

    #[test]
    fn test_spawn_interval_scaling() {
        assert_eq!(Texture::Asphalt.spawn_interval(0), 150);
        assert_eq!(Texture::Asphalt.spawn_interval(10), 144);
        assert_eq!(Texture::Asphalt.spawn_interval(1000), 60);
        assert_eq!(Texture::Water.spawn_interval(0), 108);
        assert_eq!(Texture::Water.spawn_interval(10), 120);
        assert_eq!(Texture::Water.spawn_interval(1000), 270);
    }

    #[test]
    fn test_easing_snaps_to_target() {
        let mut rng = SimRng::new(1);
        let mut lane = Lane::new(Texture::Grass, 0, &mut rng);
        lane.current_y = 0.0;
        lane.target_y = 100.0;

        lane.update(&mut rng);
        assert!((lane.current_y - 20.0).abs() < 1e-4);

        for _ in 0..100 {
            lane.update(&mut rng);
        }
        assert_eq!(lane.current_y, 100.0);
        assert!(lane.is_settled());
    }

    #[test]
    fn test_first_update_spawns_at_leading_edge() {
        let mut rng = SimRng::new(9);
        let mut lane = Lane::new(Texture::Asphalt, 0, &mut rng);
        lane.goto_level(2);
        lane.snap_to_target();

        lane.update(&mut rng);
        assert_eq!(lane.obstacles.len(), 1);
        let car = &lane.obstacles[0];
        assert_eq!(car.kind, ObstacleKind::Vehicle);
        let expected_x = if lane.speed > 0.0 {
            -SPAWN_OFFSET + lane.speed
        } else {
            SCREEN_WIDTH + SPAWN_OFFSET + lane.speed
        };
        assert_eq!(car.center.x, expected_x);
        assert_eq!(car.center.y, lane.current_y + LANE_HEIGHT / 2.0);

        // Countdown reset with jitter
        let jitter = lane.spawn_countdown - lane.spawn_interval;
        assert!((-5..=20).contains(&jitter));
    }

    #[test]
    fn test_obstacles_follow_sliding_lane() {
        let mut rng = SimRng::new(2);
        let mut lane = Lane::new(Texture::Water, 0, &mut rng);
        lane.current_y = 0.0;
        lane.target_y = 200.0;

        for _ in 0..10 {
            lane.update(&mut rng);
            for log in &lane.obstacles {
                assert_eq!(log.kind, ObstacleKind::Log);
                assert_eq!(log.center.y, lane.current_y + LANE_HEIGHT / 2.0);
                assert!(log.size.x == SHORT_LOG_WIDTH || log.size.x == LONG_LOG_WIDTH);
                assert_eq!(log.size.y, LOG_HEIGHT);
            }
        }
        assert!(!lane.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_geometry() {
        let mut rng = SimRng::new(6);
        let mut road = Lane::new(Texture::Asphalt, 0, &mut rng);
        road.update(&mut rng);
        let car = road.obstacles[0].size;
        assert_eq!(car.x, 64.0);
        assert!((car.y - 60.0).abs() < 1e-3);

        // Both log lengths turn up over enough spawns
        let mut widths = Vec::new();
        for _ in 0..40 {
            let mut river = Lane::new(Texture::Water, 0, &mut rng);
            river.update(&mut rng);
            widths.push(river.obstacles[0].size.x);
        }
        assert!(widths.iter().all(|&w| w == 72.0 || w == 108.0));
        assert!(widths.contains(&72.0) && widths.contains(&108.0));
    }

    #[test]
    fn test_obstacle_removed_past_trailing_edge() {
        let mut rng = SimRng::new(4);
        let mut lane = Lane::new(Texture::Asphalt, 0, &mut rng);
        lane.spawn_interval = 0;
        lane.speed = 3.0;
        lane.obstacles.push(Obstacle {
            kind: ObstacleKind::Vehicle,
            center: Vec2::new(SCREEN_WIDTH + VEHICLE_WIDTH / 2.0 - 1.0, 50.0),
            size: Vec2::new(VEHICLE_WIDTH, VEHICLE_HEIGHT),
            speed: 3.0,
        });

        // Left edge at W-1 -> W+2 after one frame: gone
        lane.update(&mut rng);
        assert!(lane.obstacles.is_empty());
    }

    #[test]
    fn test_lane_traffic_is_bounded() {
        let mut rng = SimRng::new(12);
        let mut lane = Lane::new(Texture::Asphalt, 200, &mut rng);
        for _ in 0..10_000 {
            lane.update(&mut rng);
        }
        // Crossing takes at most (W + 2*offset) / 2 = 400 frames, spawns come every >= 55
        assert!(lane.obstacles.len() <= 8);
    }
}
