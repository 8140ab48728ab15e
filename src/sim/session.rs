//! Game session and run state machine
//!
//! `GameSession` owns every mutable entity in a run, no ambient globals. The
//! host drives it with `tick` while `Running`; pause, resume and restart are
//! explicit requests that no-op outside their source phase.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Coin, Platform, Player};
use super::level::{GenError, LevelSettings, WorldBounds, generate_level};
use crate::consts::{ANCHOR_RAISE, LEVEL_TRANSITION_TICKS, SPAWN_X};

/// Run state. `Paused`, `LevelTransition` and `Dead` all freeze the sim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen by an external pause request
    Paused,
    /// Brief freeze after a level is cleared, before play resumes
    LevelTransition,
    /// Spike contact ended the run; only an explicit restart leaves this state
    Dead,
}

/// Complete game state (deterministic, serializable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed; per-level RNG streams derive from it
    pub seed: u64,
    /// 1-based level number
    pub level: u32,
    pub score: u64,
    /// Best score seen across runs; the host persists it on death
    pub best_score: u64,
    pub phase: GamePhase,
    /// Frames left in `LevelTransition`
    pub transition_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub bounds: WorldBounds,
    /// Bounds to apply at the next level build (viewport changes land between
    /// levels, never mid-tick)
    pending_bounds: Option<WorldBounds>,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
}

impl GameSession {
    /// Start a run at level 1. Fails only on unusable world bounds.
    pub fn new(seed: u64, bounds: WorldBounds) -> Result<Self, GenError> {
        bounds.validate()?;
        let settings = LevelSettings::for_level(1);
        let mut session = Self {
            seed,
            level: 1,
            score: 0,
            best_score: 0,
            phase: GamePhase::Running,
            transition_ticks: 0,
            time_ticks: 0,
            bounds,
            pending_bounds: None,
            player: Player::spawn(spawn_pos(bounds), settings.gravity, settings.speed),
            platforms: Vec::new(),
            coins: Vec::new(),
        };
        session.build_level();
        log::info!(
            "session started: seed={}, world {}x{}",
            seed,
            bounds.width,
            bounds.height
        );
        Ok(session)
    }

    /// RNG stream for the current level; deterministic for (seed, level).
    fn level_rng(&self) -> Pcg32 {
        let stream = (self.level as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Pcg32::seed_from_u64(self.seed ^ stream)
    }

    /// Rebuild the current level's furniture and respawn the player.
    fn build_level(&mut self) {
        if let Some(bounds) = self.pending_bounds.take() {
            self.bounds = bounds;
        }
        let mut rng = self.level_rng();
        let level = match generate_level(self.level, self.bounds, &mut rng) {
            Ok(level) => level,
            // Bounds are validated before they ever reach the session
            Err(e) => {
                log::error!("level rebuild failed: {e}");
                return;
            }
        };
        let settings = LevelSettings::for_level(self.level);
        self.platforms = level.platforms;
        self.coins = level.coins;
        self.player = Player::spawn(spawn_pos(self.bounds), settings.gravity, settings.speed);
    }

    /// External pause request. Running → Paused; anything else is a no-op.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    /// External resume request. Paused → Running; anything else is a no-op.
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    /// Host convenience for a single pause key.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Stage new world bounds; they take effect at the next level build.
    pub fn set_bounds(&mut self, bounds: WorldBounds) -> Result<(), GenError> {
        bounds.validate()?;
        self.pending_bounds = Some(bounds);
        Ok(())
    }

    /// Restart after death with a fresh seed: level 1, score 0, new layout,
    /// fully reset player. Returns false (and does nothing) unless `Dead`.
    pub fn restart(&mut self, seed: u64) -> bool {
        if self.phase != GamePhase::Dead {
            return false;
        }
        self.seed = seed;
        self.level = 1;
        self.score = 0;
        self.transition_ticks = 0;
        self.build_level();
        self.phase = GamePhase::Running;
        log::info!("run restarted: seed={seed}");
        true
    }

    /// Spike contact: end the run. The best score updates here so the host
    /// can persist it on the Dead edge.
    pub(crate) fn kill_player(&mut self) {
        self.player.alive = false;
        self.phase = GamePhase::Dead;
        if self.score > self.best_score {
            self.best_score = self.score;
        }
        log::info!("run ended at level {} with score {}", self.level, self.score);
    }

    /// All coins collected: move to the next level and freeze briefly.
    /// The score carries over.
    pub(crate) fn advance_level(&mut self) {
        self.level += 1;
        self.build_level();
        self.transition_ticks = LEVEL_TRANSITION_TICKS;
        self.phase = GamePhase::LevelTransition;
        log::info!("level {} reached (score {})", self.level, self.score);
    }
}

fn spawn_pos(bounds: WorldBounds) -> Vec2 {
    Vec2::new(SPAWN_X, bounds.height - ANCHOR_RAISE)
}
