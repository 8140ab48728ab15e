//! Per-frame simulation step
//!
//! One `tick` advances the world by one rendered frame. Order matters:
//! gravity, horizontal intent, integration, jump arbitration, platform
//! contact, coin pickup, level advance, bound clamping.

use super::geometry::{rect_intersects_circle, supports};
use super::session::{GamePhase, GameSession};
use crate::consts::COIN_VALUE;

/// Key-state snapshot for a single tick.
///
/// `left`/`right` mirror held keys. `jump` is a discrete request: the host
/// sets it on a fresh keydown and clears it once the tick has run, so holding
/// the key does not re-jump.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the session by one tick. Does nothing while paused or dead;
/// during a level transition only the freeze countdown runs.
pub fn tick(session: &mut GameSession, input: &TickInput) {
    match session.phase {
        GamePhase::Paused | GamePhase::Dead => return,
        GamePhase::LevelTransition => {
            session.transition_ticks = session.transition_ticks.saturating_sub(1);
            if session.transition_ticks == 0 {
                session.phase = GamePhase::Running;
            }
            return;
        }
        GamePhase::Running => {}
    }

    session.time_ticks += 1;

    // Gravity, then horizontal intent: velocity is set, not accelerated.
    let player = &mut session.player;
    player.vel.y += player.gravity;
    player.vel.x = if input.left && !input.right {
        -player.speed
    } else if input.right && !input.left {
        player.speed
    } else {
        0.0
    };
    player.pos += player.vel;

    // Jump arbitration: each granted request consumes one unit of budget.
    if input.jump && player.jumps_remaining > 0 {
        player.vel.y = player.jump_force;
        player.jumps_remaining -= 1;
    }

    // Platform contact. Spikes kill on any contact; a safe platform only
    // catches a falling player.
    let player_rect = session.player.rect();
    let falling = session.player.vel.y > 0.0;
    let mut hit_spikes = false;
    let mut landed_on = None;
    for platform in &session.platforms {
        if !supports(&platform.rect, &player_rect) {
            continue;
        }
        if platform.has_spikes {
            hit_spikes = true;
            break;
        }
        if falling {
            landed_on = Some(platform.rect.top());
        }
    }
    if hit_spikes {
        session.kill_player();
        clamp_to_bounds(session);
        return;
    }
    if let Some(top) = landed_on {
        let player = &mut session.player;
        player.pos.y = top - player.size.y;
        player.vel.y = 0.0;
        player.refresh_jumps();
    }

    // Coin pickup: single retain pass, score counted as coins drop out.
    let player_rect = session.player.rect();
    let before = session.coins.len();
    session
        .coins
        .retain(|coin| !rect_intersects_circle(&player_rect, coin.pos, coin.radius));
    session.score += (before - session.coins.len()) as u64 * COIN_VALUE;

    if session.coins.is_empty() {
        session.advance_level();
        return;
    }

    clamp_to_bounds(session);
}

/// Keep the player inside the world, zeroing the velocity component that
/// crossed. The floor counts as a landing and refills the jump budget.
fn clamp_to_bounds(session: &mut GameSession) {
    let player = &mut session.player;

    let max_x = session.bounds.width - player.size.x;
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vel.x = 0.0;
    } else if player.pos.x > max_x {
        player.pos.x = max_x;
        player.vel.x = 0.0;
    }

    let floor_y = session.bounds.height - player.size.y;
    if player.pos.y < 0.0 {
        player.pos.y = 0.0;
        player.vel.y = 0.0;
    } else if player.pos.y > floor_y {
        player.pos.y = floor_y;
        player.vel.y = 0.0;
        player.refresh_jumps();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LEVEL_TRANSITION_TICKS;
    use crate::sim::entity::{Coin, Platform};
    use crate::sim::geometry::Rect;
    use crate::sim::level::WorldBounds;
    use glam::Vec2;
    use proptest::prelude::*;

    fn session() -> GameSession {
        GameSession::new(12345, WorldBounds::new(800.0, 600.0)).unwrap()
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_jump_sets_velocity_and_spends_budget() {
        // Level 1: gravity 0.5, jump force -12, budget 2; spawn at (50, 500)
        let mut session = session();
        assert_eq!(session.player.jumps_remaining, 2);

        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut session, &input);
        assert_eq!(session.player.vel.y, -12.0);
        assert_eq!(session.player.jumps_remaining, 1);
    }

    #[test]
    fn test_jump_consumes_discrete_request() {
        let mut session = session();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut session, &jump);
        assert_eq!(session.player.jumps_remaining, 1);

        // The host clears the flag after the tick; no further jumps happen
        for _ in 0..5 {
            tick(&mut session, &idle());
        }
        assert_eq!(session.player.jumps_remaining, 1);

        // A second request spends the last unit; a third is refused
        tick(&mut session, &jump);
        assert_eq!(session.player.vel.y, session.player.jump_force);
        assert_eq!(session.player.jumps_remaining, 0);
        tick(&mut session, &jump);
        assert_ne!(session.player.vel.y, session.player.jump_force);
        assert_eq!(session.player.jumps_remaining, 0);
    }

    #[test]
    fn test_fall_clamps_at_floor_and_restores_jumps() {
        // Nothing sits under the spawn column at (50, 500), so gravity wins
        let mut session = session();
        session.player.jumps_remaining = 0;

        let mut last_y = session.player.pos.y;
        let mut clamped = false;
        for _ in 0..200 {
            tick(&mut session, &idle());
            let y = session.player.pos.y;
            if y == 560.0 {
                clamped = true;
                break;
            }
            assert!(y > last_y, "fall must be strictly downward");
            last_y = y;
        }
        assert!(clamped, "player never reached the floor");
        assert_eq!(session.player.vel.y, 0.0);
        assert_eq!(session.player.jumps_remaining, session.player.max_jumps);
    }

    #[test]
    fn test_landing_snaps_and_refills_budget() {
        let mut session = session();
        session.platforms = vec![Platform::safe(Rect::new(0.0, 550.0, 200.0, 20.0))];
        session.coins = vec![Coin::new(Vec2::new(700.0, 100.0))];
        session.player.jumps_remaining = 0;

        for _ in 0..200 {
            tick(&mut session, &idle());
            if session.player.vel.y == 0.0 && session.player.pos.y == 510.0 {
                break;
            }
        }
        assert_eq!(session.player.pos.y, 510.0);
        assert_eq!(session.player.vel.y, 0.0);
        assert_eq!(session.player.jumps_remaining, session.player.max_jumps);
        assert_eq!(session.phase, GamePhase::Running);
    }

    #[test]
    fn test_spikes_kill_a_falling_player() {
        let mut session = session();
        session.platforms = vec![Platform::spiked(Rect::new(0.0, 550.0, 200.0, 20.0))];
        session.coins = vec![Coin::new(Vec2::new(700.0, 100.0))];

        for _ in 0..200 {
            tick(&mut session, &idle());
            if session.phase == GamePhase::Dead {
                break;
            }
        }
        assert_eq!(session.phase, GamePhase::Dead);
        assert!(!session.player.alive);
    }

    #[test]
    fn test_spikes_kill_regardless_of_direction() {
        // Spiked platform overhead; the player jumps up into it
        let mut session = session();
        session.platforms = vec![Platform::spiked(Rect::new(0.0, 420.0, 200.0, 20.0))];
        session.coins = vec![Coin::new(Vec2::new(700.0, 100.0))];

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut session, &jump);
        for _ in 0..30 {
            tick(&mut session, &idle());
            if session.phase == GamePhase::Dead {
                break;
            }
        }
        assert_eq!(session.phase, GamePhase::Dead);
    }

    #[test]
    fn test_coin_pickup_scores_and_removes_exactly_once() {
        let mut session = session();
        let on_player = Vec2::new(session.player.pos.x + 20.0, session.player.pos.y + 20.0);
        session.coins = vec![Coin::new(on_player), Coin::new(Vec2::new(700.0, 100.0))];
        session.platforms = vec![Platform::safe(Rect::new(0.0, 540.0, 800.0, 20.0))];

        tick(&mut session, &idle());
        assert_eq!(session.score, 10);
        assert_eq!(session.coins.len(), 1);
        assert_eq!(session.level, 1);

        // The far coin stays put on later ticks
        tick(&mut session, &idle());
        assert_eq!(session.score, 10);
        assert_eq!(session.coins.len(), 1);
    }

    #[test]
    fn test_collecting_last_coin_advances_level() {
        let mut session = session();
        let on_player = Vec2::new(session.player.pos.x + 20.0, session.player.pos.y + 20.0);
        session.coins = vec![Coin::new(on_player)];

        tick(&mut session, &idle());
        assert_eq!(session.level, 2);
        assert_eq!(session.score, 10);
        assert_eq!(session.phase, GamePhase::LevelTransition);
        assert!(!session.coins.is_empty());
        assert!(!session.platforms.is_empty());
        assert!(!session.platforms[0].has_spikes);
        assert_eq!(session.player.pos, Vec2::new(50.0, 500.0));
        assert_eq!(session.player.jumps_remaining, session.player.max_jumps);

        // The freeze counts down, then play resumes on the new level
        for _ in 0..LEVEL_TRANSITION_TICKS {
            tick(&mut session, &idle());
        }
        assert_eq!(session.phase, GamePhase::Running);
        assert_eq!(session.level, 2);
    }

    #[test]
    fn test_pause_is_a_pure_freeze() {
        let mut session = session();
        session.pause();

        let before = session.player.clone();
        let ticks = session.time_ticks;
        let busy = TickInput {
            left: true,
            jump: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut session, &busy);
        }
        assert_eq!(session.player, before);
        assert_eq!(session.time_ticks, ticks);
        assert_eq!(session.phase, GamePhase::Paused);

        session.resume();
        tick(&mut session, &idle());
        assert_eq!(session.time_ticks, ticks + 1);
    }

    #[test]
    fn test_dead_session_ignores_ticks() {
        let mut session = session();
        session.kill_player();
        let before = session.player.clone();
        tick(&mut session, &idle());
        assert_eq!(session.player, before);
        assert_eq!(session.phase, GamePhase::Dead);
    }

    #[test]
    fn test_horizontal_clamping_zeroes_velocity() {
        let mut session = session();
        session.coins = vec![Coin::new(Vec2::new(700.0, 100.0))];

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..400 {
            tick(&mut session, &left);
        }
        assert_eq!(session.player.pos.x, 0.0);
        assert_eq!(session.player.vel.x, 0.0);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..400 {
            tick(&mut session, &right);
        }
        assert_eq!(session.player.pos.x, 800.0 - session.player.size.x);
        assert_eq!(session.player.vel.x, 0.0);
    }

    #[test]
    fn test_ceiling_clamp_zeroes_upward_velocity() {
        let mut session = session();
        session.coins = vec![Coin::new(Vec2::new(700.0, 590.0))];
        session.platforms = vec![Platform::safe(Rect::new(0.0, 560.0, 800.0, 20.0))];
        session.player.pos = Vec2::new(400.0, 5.0);
        session.player.vel.y = -20.0;

        tick(&mut session, &idle());
        assert_eq!(session.player.pos.y, 0.0);
        assert_eq!(session.player.vel.y, 0.0);
    }

    #[test]
    fn test_same_inputs_same_outcome() {
        let bounds = WorldBounds::new(800.0, 600.0);
        let mut a = GameSession::new(99999, bounds).unwrap();
        let mut b = GameSession::new(99999, bounds).unwrap();

        let script = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for input in script.iter().cycle().take(240) {
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.coins, b.coins);
    }

    proptest! {
        // Core invariants across arbitrary input scripts: the jump budget
        // never leaves [0, max] and the player never leaves the world.
        #[test]
        fn prop_budget_and_bounds_hold(
            seed in 0u64..1000,
            script in prop::collection::vec(0u8..8, 1..300),
        ) {
            let mut session =
                GameSession::new(seed, WorldBounds::new(800.0, 600.0)).unwrap();
            for bits in script {
                let input = TickInput {
                    left: bits & 1 != 0,
                    right: bits & 2 != 0,
                    jump: bits & 4 != 0,
                };
                tick(&mut session, &input);
                let player = &session.player;
                prop_assert!(player.jumps_remaining <= player.max_jumps);
                prop_assert!(player.pos.x >= 0.0);
                prop_assert!(player.pos.x <= 800.0 - player.size.x);
                prop_assert!(player.pos.y >= 0.0);
                prop_assert!(player.pos.y <= 600.0 - player.size.y);
            }
        }
    }
}
