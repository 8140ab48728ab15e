//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per rendered frame
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod entity;
pub mod geometry;
pub mod level;
pub mod session;
pub mod tick;

pub use entity::{Coin, Platform, PlatformColor, Player};
pub use geometry::{Rect, rect_intersects_circle, supports};
pub use level::{GenError, Level, LevelSettings, WorldBounds, generate_level};
pub use session::{GamePhase, GameSession};
pub use tick::{TickInput, tick};
