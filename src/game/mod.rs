//! Gameplay core: spawning, motion, catching, power-ups and the session
//! lifecycle. Nothing in here touches the DOM; the browser glue in
//! `crate::web` feeds timestamps and input in and renders the event queue.
//!
//! A [`Session`] is one play-through. The host calls [`Session::tick`] once
//! per animation frame with a monotonic timestamp, forwards pointer/key input,
//! and drains [`GameEvent`]s after each call.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::storage::StatsStore;

pub mod catch;
pub mod entity;
pub mod events;
pub mod konami;
pub mod motion;
pub mod powerup;
pub mod rarity;
pub mod render;
pub mod scheduler;
pub mod spawn;
pub mod stats;

pub use catch::{BombOutcome, BugCatch, HoverOutcome};
pub use entity::{Entities, Entity, EntityId, EntityKind, PowerUpKind};
pub use events::{Effect, GameEvent, Sparkle};
pub use motion::{Advance, MotionTuning, RemovalReason};
pub use powerup::PowerUpState;
pub use rarity::Rarity;
pub use render::{Renderer, present};
pub use scheduler::{CatchUp, Command, Scheduler};
pub use stats::{STATS_STORAGE_KEY, SessionStats};

use konami::KonamiDetector;

/// Size of the play area. Both sides are positive and finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(GameError::InvalidViewport { width, height })
        }
    }

    pub fn of(renderer: &dyn Renderer) -> Result<Self> {
        let (w, h) = renderer.viewport_size();
        Self::new(w, h)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Ended,
}

/// One play-through. Owns every piece of mutable game state; there are no
/// globals, so independent sessions can run side by side.
pub struct Session {
    config: GameConfig,
    viewport: Viewport,
    rng: StdRng,
    store: Box<dyn StatsStore>,
    scheduler: Scheduler,
    entities: Entities,
    power_ups: PowerUpState,
    stats: SessionStats,
    konami: KonamiDetector,
    konami_active: bool,
    score: u64,
    streak: u64,
    phase: Phase,
    started_at_ms: f64,
    now_ms: f64,
    events: Vec<GameEvent>,
}

impl Session {
    /// Start a session at `now_ms`, restoring lifetime stats from `store`.
    pub fn new(config: GameConfig, viewport: Viewport, store: Box<dyn StatsStore>, rng: StdRng, now_ms: f64) -> Self {
        let stats = stats::load_stats(store.as_ref());
        let mut scheduler = Scheduler::default();
        scheduler.every(Command::SpawnBug, config.bug_interval_ms, now_ms, CatchUp::Once);
        scheduler.every(Command::SpawnBomb, config.bomb_interval_ms, now_ms, CatchUp::Once);
        scheduler.every(Command::SpawnPowerUp, config.power_up_interval_ms, now_ms, CatchUp::Once);
        scheduler.every(Command::PowerUpTick, config.power_up_tick_ms, now_ms, CatchUp::Every);
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            games_played = stats.games_played,
            "session started"
        );
        Self {
            config,
            viewport,
            rng,
            store,
            scheduler,
            entities: Entities::default(),
            power_ups: PowerUpState::default(),
            stats,
            konami: KonamiDetector::default(),
            konami_active: false,
            score: 0,
            streak: 0,
            phase: Phase::Running,
            started_at_ms: now_ms,
            now_ms,
            events: Vec::new(),
        }
    }

    /// Deterministic session for tests and replays.
    pub fn with_seed(config: GameConfig, viewport: Viewport, store: Box<dyn StatsStore>, seed: u64, now_ms: f64) -> Self {
        Self::new(config, viewport, store, StdRng::seed_from_u64(seed), now_ms)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn streak(&self) -> u64 {
        self.streak
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn power_ups(&self) -> &PowerUpState {
        &self.power_ups
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn konami_active(&self) -> bool {
        self.konami_active
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Latest timestamp the session has seen.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// The host resized the play area. Entities keep their trajectories.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance virtual time to `now_ms`: move the entities already on screen
    /// by the elapsed time, then run due timers. Anything spawned here starts
    /// moving on the next tick. Timestamps going backwards are treated as no
    /// elapsed time.
    pub fn tick(&mut self, now_ms: f64) {
        if self.is_ended() {
            return;
        }
        let now = now_ms.max(self.now_ms);
        let dt = now - self.now_ms;
        self.now_ms = now;

        self.advance_entities(dt);
        for command in self.scheduler.due(now) {
            if self.is_ended() {
                return;
            }
            self.run(command);
        }
    }

    /// Insert an entity built by one of the `spawn` constructors.
    pub fn spawn(&mut self, entity: Entity) -> Option<EntityId> {
        if self.is_ended() {
            return None;
        }
        let (kind, glyph, x, y) = (entity.kind, entity.glyph, entity.x, entity.y);
        let id = self.entities.insert(entity);
        tracing::trace!(%id, ?kind, "spawned");
        self.events.push(GameEvent::EntitySpawned { id, kind, glyph, x, y });
        Some(id)
    }

    pub fn spawn_bug(&mut self) -> Option<EntityId> {
        let magnet = self.power_ups.is_active(PowerUpKind::Magnet);
        let bug = spawn::spawn_bug(&mut self.rng, self.viewport, magnet, self.now_ms);
        self.spawn(bug)
    }

    pub fn spawn_bomb(&mut self) -> Option<EntityId> {
        let bomb = spawn::spawn_bomb(&mut self.rng, self.viewport, self.now_ms);
        self.spawn(bomb)
    }

    pub fn spawn_power_up(&mut self) -> Option<EntityId> {
        let power_up = spawn::spawn_power_up(&mut self.rng, self.viewport, self.now_ms)?;
        self.spawn(power_up)
    }

    /// One power-up timer tick.
    pub fn tick_power_ups(&mut self) {
        if self.is_ended() {
            return;
        }
        for kind in self.power_ups.tick() {
            tracing::debug!(?kind, "power-up expired");
            self.events.push(GameEvent::PowerUpExpired { kind });
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.is_ended() {
            return;
        }
        self.events.push(GameEvent::NetMoved { x, y });
    }

    /// Feed a DOM key code to the key sequence detector.
    pub fn key_down(&mut self, key_code: u32) {
        if self.is_ended() || !self.konami.push(key_code) {
            return;
        }
        tracing::info!("konami mode activated");
        self.konami_active = true;
        self.events.push(GameEvent::KonamiMode { active: true });
        self.scheduler.cancel(Command::EndKonamiMode);
        self.scheduler
            .after(self.now_ms, self.config.konami_duration_ms, Command::EndKonamiMode);
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::SpawnBug => {
                self.spawn_bug();
            }
            Command::SpawnBomb => {
                if roll(&mut self.rng, self.config.bomb_chance) {
                    self.spawn_bomb();
                }
            }
            Command::SpawnPowerUp => {
                if roll(&mut self.rng, self.config.power_up_attempt_chance) {
                    self.spawn_power_up();
                }
            }
            Command::PowerUpTick => self.tick_power_ups(),
            Command::EndSession => self.end(),
            Command::EndKonamiMode => {
                self.konami_active = false;
                self.events.push(GameEvent::KonamiMode { active: false });
            }
        }
    }

    fn advance_entities(&mut self, dt_ms: f64) {
        let tuning = self.config.motion;
        let mut removed = Vec::new();
        for (id, entity) in self.entities.iter_mut() {
            let before = (entity.x, entity.y);
            match motion::advance(entity, self.viewport, &tuning, self.now_ms, dt_ms) {
                Advance::Moved => {
                    if (entity.x, entity.y) != before {
                        self.events.push(GameEvent::EntityMoved {
                            id,
                            x: entity.x,
                            y: entity.y,
                        });
                    }
                }
                Advance::Removed(reason) => removed.push((id, reason)),
            }
        }
        for (id, reason) in removed {
            self.entities.remove(id);
            self.events.push(GameEvent::EntityRemoved { id, reason });
        }
    }

    /// Running -> Ended. Finalizes and persists lifetime stats; later calls
    /// do nothing.
    fn end(&mut self) {
        if self.is_ended() {
            return;
        }
        self.phase = Phase::Ended;
        self.scheduler.clear();
        for id in self.entities.clear() {
            self.events.push(GameEvent::EntityRemoved {
                id,
                reason: RemovalReason::SessionEnded,
            });
        }

        let played_secs = ((self.now_ms - self.started_at_ms) / 1_000.0).floor().max(0.0) as u64;
        self.stats.games_played += 1;
        self.stats.highest_score = self.stats.highest_score.max(self.score);
        self.stats.total_play_time += played_secs;
        if let Err(err) = stats::save_stats(self.store.as_mut(), &self.stats) {
            tracing::warn!("could not persist stats: {err}");
        }
        tracing::info!(score = self.score, played_secs, "session ended");

        self.events.push(GameEvent::StatsChanged(self.stats.clone()));
        self.events.push(GameEvent::SessionEnded {
            final_score: self.score,
        });
    }
}

/// Bernoulli draw that tolerates out-of-range probabilities.
fn roll(rng: &mut StdRng, p: f64) -> bool {
    if p >= 1.0 {
        true
    } else if p > 0.0 {
        rng.gen_bool(p)
    } else {
        false
    }
}
