//! Simulation entities: the player sprite and the level furniture.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::{COIN_RADIUS, JUMP_FORCE, MAX_JUMPS, PLAYER_HEIGHT, PLAYER_WIDTH};

/// Color tag for a platform, resolved to CSS by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformColor {
    Grass,
    Spiked,
}

impl PlatformColor {
    pub fn as_css(&self) -> &'static str {
        match self {
            PlatformColor::Grass => "#4CAF50",
            PlatformColor::Spiked => "#FF4444",
        }
    }
}

/// A static platform slab. Immutable once generated; the whole collection is
/// replaced when a level is (re)built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub color: PlatformColor,
    pub has_spikes: bool,
}

impl Platform {
    pub fn safe(rect: Rect) -> Self {
        Self {
            rect,
            color: PlatformColor::Grass,
            has_spikes: false,
        }
    }

    pub fn spiked(rect: Rect) -> Self {
        Self {
            rect,
            color: PlatformColor::Spiked,
            has_spikes: true,
        }
    }
}

/// A collectible coin. Removed from the level the tick it is picked up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub radius: f32,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: COIN_RADIUS,
        }
    }
}

/// The player sprite. Owned exclusively by the session; mutated every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Horizontal speed magnitude, set per level
    pub speed: f32,
    /// Downward acceleration per tick, set per level
    pub gravity: f32,
    /// Upward impulse (negative = up)
    pub jump_force: f32,
    pub max_jumps: u32,
    /// Invariant: stays within `[0, max_jumps]`; refilled only on landing
    pub jumps_remaining: u32,
    pub alive: bool,
}

impl Player {
    /// Spawn at the level start position with a full jump budget.
    pub fn spawn(pos: Vec2, gravity: f32, speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            speed,
            gravity,
            jump_force: JUMP_FORCE,
            max_jumps: MAX_JUMPS,
            jumps_remaining: MAX_JUMPS,
            alive: true,
        }
    }

    /// Bounding rectangle for collision queries.
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Refill the jump budget (landing on a platform or the floor).
    pub fn refresh_jumps(&mut self) {
        self.jumps_remaining = self.max_jumps;
    }
}
