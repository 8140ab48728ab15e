//! Procedural level generation
//!
//! Platforms climb upward from a guaranteed anchor near the floor; coins rest
//! on non-hazardous platforms. All randomness comes from the caller's seeded
//! RNG, and every placement loop is attempt-bounded: under pressure the
//! generator produces fewer platforms or coins, never an error and never a
//! spin.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Coin, Platform};
use super::geometry::{Rect, rect_intersects_circle};
use crate::consts::*;

/// World dimensions supplied by the host (canvas client size).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Reject sizes no level can be laid out in.
    pub fn validate(&self) -> Result<(), GenError> {
        if !self.width.is_finite()
            || !self.height.is_finite()
            || self.width < MIN_WORLD_WIDTH
            || self.height < MIN_WORLD_HEIGHT
        {
            return Err(GenError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Generation failure. Placement exhaustion is not an error (the generator
/// degrades to fewer platforms or coins); unusable world dimensions are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenError {
    InvalidBounds { width: f32, height: f32 },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::InvalidBounds { width, height } => write!(
                f,
                "world bounds {width}x{height} below minimum {MIN_WORLD_WIDTH}x{MIN_WORLD_HEIGHT}"
            ),
        }
    }
}

impl std::error::Error for GenError {}

/// Difficulty knobs derived from the level number. Pure; recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    pub platform_count: u32,
    pub coin_count: u32,
    pub gravity: f32,
    pub speed: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    pub platform_width: f32,
}

impl LevelSettings {
    /// Scaling: more platforms and coins, tighter gaps, heavier gravity and a
    /// faster player as the level climbs. Gap floors keep levels playable.
    pub fn for_level(level: u32) -> Self {
        let n = level.max(1) - 1;
        let min_gap = (100.0 - 10.0 * n as f32).max(40.0);
        let max_gap = (150.0 - 10.0 * n as f32).max(min_gap + 20.0);
        Self {
            platform_count: 10 + n / 2,
            coin_count: 5 + n * 3 / 10,
            gravity: 0.5 + 0.02 * n as f32,
            speed: 3.0 + 0.05 * n as f32,
            min_gap,
            max_gap,
            platform_width: 180.0,
        }
    }
}

/// A freshly generated platform/coin set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
}

/// Build the platform and coin set for `level` inside `bounds`.
///
/// The first platform is always the non-hazardous anchor near the floor.
pub fn generate_level(level: u32, bounds: WorldBounds, rng: &mut Pcg32) -> Result<Level, GenError> {
    bounds.validate()?;
    let settings = LevelSettings::for_level(level);
    let platforms = place_platforms(&settings, bounds, rng);
    let coins = place_coins(&settings, &platforms, rng);

    if (platforms.len() as u32) < settings.platform_count
        || (coins.len() as u32) < settings.coin_count
    {
        log::warn!(
            "level {} degraded: {}/{} platforms, {}/{} coins",
            level,
            platforms.len(),
            settings.platform_count,
            coins.len(),
            settings.coin_count
        );
    }

    Ok(Level { platforms, coins })
}

fn place_platforms(settings: &LevelSettings, bounds: WorldBounds, rng: &mut Pcg32) -> Vec<Platform> {
    let width = settings.platform_width.min(bounds.width - 2.0 * SIDE_PADDING);
    let max_x = bounds.width - SIDE_PADDING - width;
    let mut platforms = Vec::with_capacity(settings.platform_count as usize);

    // Anchor: centered, near the floor, never spiked.
    let anchor = Rect::new(
        (bounds.width - width) / 2.0,
        bounds.height - ANCHOR_RAISE,
        width,
        PLATFORM_HEIGHT,
    );
    platforms.push(Platform::safe(anchor));

    let mut prev_y = anchor.y;
    for _ in 1..settings.platform_count {
        let mut candidate = None;
        for _ in 0..PLATFORM_ATTEMPTS {
            let gap = rng.random_range(settings.min_gap..=settings.max_gap);
            let x = rng.random_range(SIDE_PADDING..=max_x);
            let rect = Rect::new(x, prev_y - gap, width, PLATFORM_HEIGHT);
            if !stacked(&rect, &platforms) {
                candidate = Some(rect);
                break;
            }
        }
        let Some(rect) = candidate else {
            continue;
        };
        if rect.y < PLATFORM_HEIGHT {
            break;
        }
        prev_y = rect.y;
        if rng.random_bool(HAZARD_CHANCE) {
            platforms.push(Platform::spiked(rect));
        } else {
            platforms.push(Platform::safe(rect));
        }
    }

    platforms
}

/// A candidate collides with the stack when it shares a height band and a
/// horizontal extent with an already placed platform.
fn stacked(candidate: &Rect, placed: &[Platform]) -> bool {
    placed.iter().any(|p| {
        (candidate.y - p.rect.y).abs() < PLATFORM_HEIGHT + STACK_EPSILON
            && candidate.x < p.rect.right()
            && candidate.right() > p.rect.x
    })
}

fn place_coins(settings: &LevelSettings, platforms: &[Platform], rng: &mut Pcg32) -> Vec<Coin> {
    let mut coins: Vec<Coin> = Vec::with_capacity(settings.coin_count as usize);
    let safe: Vec<&Platform> = platforms.iter().filter(|p| !p.has_spikes).collect();
    if safe.is_empty() {
        return coins;
    }

    let mut attempts = settings.coin_count * COIN_ATTEMPTS_PER_COIN;
    while (coins.len() as u32) < settings.coin_count && attempts > 0 {
        attempts -= 1;

        let rect = safe[rng.random_range(0..safe.len())].rect;
        let inset = COIN_EDGE_INSET.min(rect.w / 2.0);
        let x = rng.random_range(rect.x + inset..=rect.right() - inset);
        // Rest just above the platform, clipped below the world's top bound
        let y = (rect.top() - COIN_RADIUS - COIN_CLEARANCE).max(COIN_RADIUS);
        let pos = Vec2::new(x, y);

        let on_platform = platforms
            .iter()
            .any(|p| rect_intersects_circle(&p.rect, pos, COIN_RADIUS));
        let on_coin = coins
            .iter()
            .any(|c| (c.pos - pos).length_squared() < (2.0 * COIN_RADIUS).powi(2));
        if on_platform || on_coin {
            continue;
        }
        coins.push(Coin::new(pos));
    }

    coins
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_settings_scale_with_level() {
        let early = LevelSettings::for_level(1);
        let late = LevelSettings::for_level(11);

        assert_eq!(early.platform_count, 10);
        assert_eq!(early.coin_count, 5);
        assert_eq!(early.gravity, 0.5);
        assert_eq!(early.speed, 3.0);
        assert_eq!(early.min_gap, 100.0);
        assert_eq!(early.max_gap, 150.0);

        assert!(late.platform_count > early.platform_count);
        assert!(late.coin_count > early.coin_count);
        assert!(late.gravity > early.gravity);
        assert!(late.speed > early.speed);
        assert!(late.min_gap < early.min_gap);
        assert!(late.max_gap < early.max_gap);
        // Gap floors hold no matter how high the level goes
        let extreme = LevelSettings::for_level(1000);
        assert!(extreme.min_gap >= 40.0);
        assert!(extreme.max_gap >= extreme.min_gap + 20.0);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut r = rng(1);
        assert!(matches!(
            generate_level(1, WorldBounds::new(0.0, 600.0), &mut r),
            Err(GenError::InvalidBounds { .. })
        ));
        assert!(matches!(
            generate_level(1, WorldBounds::new(800.0, -50.0), &mut r),
            Err(GenError::InvalidBounds { .. })
        ));
        assert!(matches!(
            generate_level(1, WorldBounds::new(f32::NAN, 600.0), &mut r),
            Err(GenError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_anchor_platform_first_and_safe() {
        for seed in 0..20 {
            let mut r = rng(seed);
            let level = generate_level(1, WorldBounds::new(800.0, 600.0), &mut r).unwrap();
            let anchor = &level.platforms[0];
            assert!(!anchor.has_spikes);
            assert_eq!(anchor.rect.y, 500.0);
            assert_eq!(anchor.rect.x, (800.0 - anchor.rect.w) / 2.0);
        }
    }

    #[test]
    fn test_no_stacked_platforms_on_narrow_world() {
        // 300-wide world with 180-wide platforms: every pair shares horizontal
        // extent, so vertical separation is the only thing keeping them apart.
        for seed in 0..50 {
            let mut r = rng(seed);
            let level = generate_level(1, WorldBounds::new(300.0, 2000.0), &mut r).unwrap();
            for (i, a) in level.platforms.iter().enumerate() {
                for b in level.platforms.iter().skip(i + 1) {
                    let x_overlap = a.rect.x < b.rect.right() && a.rect.right() > b.rect.x;
                    if x_overlap {
                        assert!(
                            (a.rect.y - b.rect.y).abs() >= 5.0,
                            "stacked platforms at y={} and y={}",
                            a.rect.y,
                            b.rect.y
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_generation_degrades_gracefully() {
        // A barely-valid world has no room for ten platforms; the generator
        // must shorten the level rather than fail.
        let mut r = rng(7);
        let level = generate_level(1, WorldBounds::new(200.0, 250.0), &mut r).unwrap();
        let settings = LevelSettings::for_level(1);
        assert!(!level.platforms.is_empty());
        assert!((level.platforms.len() as u32) < settings.platform_count);
        assert!((level.coins.len() as u32) <= settings.coin_count);
        for platform in &level.platforms {
            assert!(platform.rect.y >= PLATFORM_HEIGHT);
        }
    }

    #[test]
    fn test_coins_rest_on_safe_platforms() {
        for seed in 0..20 {
            let mut r = rng(seed);
            // Level 5 so spiked platforms are likely present
            let level = generate_level(5, WorldBounds::new(800.0, 600.0), &mut r).unwrap();
            for coin in &level.coins {
                assert!(coin.pos.y >= coin.radius, "coin above the top bound");
                for platform in &level.platforms {
                    assert!(!rect_intersects_circle(&platform.rect, coin.pos, coin.radius));
                }
                let supported = level.platforms.iter().any(|p| {
                    !p.has_spikes
                        && coin.pos.x >= p.rect.x
                        && coin.pos.x <= p.rect.right()
                        && p.rect.top() - coin.pos.y > 0.0
                        && p.rect.top() - coin.pos.y <= COIN_RADIUS + COIN_CLEARANCE
                });
                assert!(supported, "coin not resting on a safe platform");
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let bounds = WorldBounds::new(800.0, 600.0);
        let a = generate_level(3, bounds, &mut rng(99)).unwrap();
        let b = generate_level(3, bounds, &mut rng(99)).unwrap();
        assert_eq!(a, b);
    }
}
