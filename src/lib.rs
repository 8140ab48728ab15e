//! Coin Dash - a browser platformer with procedurally generated levels
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level generation, game state)
//! - `render`: Canvas-2D frame drawing (browser only)
//! - `best_score`: Best-score persistence
//! - `settings`: Display preferences

pub mod best_score;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;

pub use best_score::BestScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Player sprite size in pixels
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Impulse applied per granted jump (negative = upward)
    pub const JUMP_FORCE: f32 = -12.0;
    /// Jumps available before a landing is required (double jump)
    pub const MAX_JUMPS: u32 = 2;
    /// Player spawn x within a fresh level
    pub const SPAWN_X: f32 = 50.0;

    /// Platform slab height
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    /// Horizontal margin kept clear at the world's sides during placement
    pub const SIDE_PADDING: f32 = 20.0;
    /// Probability that a non-anchor platform carries spikes
    pub const HAZARD_CHANCE: f64 = 0.25;
    /// Placement retries per platform before it is skipped
    pub const PLATFORM_ATTEMPTS: u32 = 8;
    /// Extra vertical clearance treated as "same height band" when
    /// rejecting stacked platform candidates
    pub const STACK_EPSILON: f32 = 5.0;
    /// How far above the world floor the anchor platform sits
    pub const ANCHOR_RAISE: f32 = 100.0;

    /// Coin radius
    pub const COIN_RADIUS: f32 = 10.0;
    /// Score awarded per collected coin
    pub const COIN_VALUE: u64 = 10;
    /// Coin inset from a platform's horizontal edges
    pub const COIN_EDGE_INSET: f32 = 12.0;
    /// Gap between a platform's top surface and the coin resting on it
    pub const COIN_CLEARANCE: f32 = 4.0;
    /// Placement attempts granted per requested coin
    pub const COIN_ATTEMPTS_PER_COIN: u32 = 20;

    /// Smallest world the generator accepts
    pub const MIN_WORLD_WIDTH: f32 = 160.0;
    pub const MIN_WORLD_HEIGHT: f32 = 240.0;

    /// Frames the level-up freeze lasts (~1.5 s at 60 fps)
    pub const LEVEL_TRANSITION_TICKS: u32 = 90;
}
