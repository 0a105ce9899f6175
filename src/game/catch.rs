//! Hover resolution. Every entry point returns `None` when the session has
//! ended or the entity is already gone, so duplicate hover events are
//! harmless.

use super::entity::{EntityId, EntityKind, PowerUpKind};
use super::events::{Effect, GameEvent, Sparkle};
use super::motion::RemovalReason;
use super::rarity::Rarity;
use super::scheduler::Command;
use super::Session;

/// Score multiplier while the golden net is active.
pub const GOLDEN_NET_MULTIPLIER: u64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BugCatch {
    pub score_delta: u64,
    pub new_streak: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BombOutcome {
    /// The shield absorbed the bomb. Shields are time-boxed, so nothing is
    /// consumed.
    Shielded,
    /// Streak reset; the session ends after the configured delay.
    Detonated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverOutcome {
    Bug(BugCatch),
    Bomb(BombOutcome),
    PowerUp(PowerUpKind),
}

impl Session {
    /// The pointer entered entity `id`.
    pub fn hover(&mut self, id: EntityId) -> Option<HoverOutcome> {
        match self.live_kind(id)? {
            EntityKind::Bug { .. } => self.resolve_bug_catch(id).map(HoverOutcome::Bug),
            EntityKind::Bomb => self.resolve_bomb_catch(id).map(HoverOutcome::Bomb),
            EntityKind::PowerUp(_) => self.resolve_power_up_pickup(id).map(HoverOutcome::PowerUp),
        }
    }

    pub fn resolve_bug_catch(&mut self, id: EntityId) -> Option<BugCatch> {
        let EntityKind::Bug { rarity } = self.live_kind(id)? else {
            return None;
        };
        let bug = self.entities.remove(id)?;

        let multiplier = if self.power_ups.is_active(PowerUpKind::GoldenNet) {
            GOLDEN_NET_MULTIPLIER
        } else {
            1
        };
        let points = u64::from(bug.points) * multiplier;
        self.score += points;
        self.streak += 1;

        self.stats.total_bugs_caught += 1;
        match rarity {
            Rarity::Rare => self.stats.rare_bugs_caught += 1,
            Rarity::UltraRare => self.stats.ultra_rare_bugs_caught += 1,
            Rarity::Common => {}
        }
        self.stats.longest_streak = self.stats.longest_streak.max(self.streak);

        self.events.push(GameEvent::NetSwung);
        self.events.push(GameEvent::EntityRemoved {
            id,
            reason: RemovalReason::Caught,
        });
        self.events.push(GameEvent::Effect {
            effect: Effect::Sparkle(Sparkle::for_rarity(rarity)),
            x: bug.x,
            y: bug.y,
        });
        self.events.push(GameEvent::Effect {
            effect: Effect::Points(points),
            x: bug.x,
            y: bug.y,
        });
        self.events.push(GameEvent::ScoreChanged { score: self.score });
        self.events.push(GameEvent::StreakChanged { streak: self.streak });
        self.events.push(GameEvent::StatsChanged(self.stats.clone()));

        Some(BugCatch {
            score_delta: points,
            new_streak: self.streak,
        })
    }

    pub fn resolve_bomb_catch(&mut self, id: EntityId) -> Option<BombOutcome> {
        if self.live_kind(id)? != EntityKind::Bomb {
            return None;
        }
        let bomb = self.entities.remove(id)?;

        if self.power_ups.is_active(PowerUpKind::Shield) {
            self.events.push(GameEvent::EntityRemoved {
                id,
                reason: RemovalReason::Caught,
            });
            self.events.push(GameEvent::Effect {
                effect: Effect::Shielded,
                x: bomb.x,
                y: bomb.y,
            });
            tracing::debug!(%id, "bomb absorbed by shield");
            return Some(BombOutcome::Shielded);
        }

        self.streak = 0;
        self.events.push(GameEvent::NetSwung);
        self.events.push(GameEvent::EntityRemoved {
            id,
            reason: RemovalReason::Caught,
        });
        self.events.push(GameEvent::Effect {
            effect: Effect::Explosion,
            x: bomb.x,
            y: bomb.y,
        });
        self.events.push(GameEvent::StreakChanged { streak: 0 });
        if !self.scheduler.is_pending(Command::EndSession) {
            self.scheduler
                .after(self.now_ms, self.config.bomb_end_delay_ms, Command::EndSession);
        }
        tracing::info!(%id, score = self.score, "bomb caught");
        Some(BombOutcome::Detonated)
    }

    pub fn resolve_power_up_pickup(&mut self, id: EntityId) -> Option<PowerUpKind> {
        let EntityKind::PowerUp(kind) = self.live_kind(id)? else {
            return None;
        };
        self.entities.remove(id)?;
        self.power_ups.activate(kind, self.config.power_up_tick_ms);
        self.events.push(GameEvent::EntityRemoved {
            id,
            reason: RemovalReason::Caught,
        });
        self.events.push(GameEvent::PowerUpActivated { kind });
        tracing::debug!(?kind, "power-up activated");
        Some(kind)
    }

    /// Kind of a live entity, or `None` once the session ended or the entity
    /// is gone.
    fn live_kind(&self, id: EntityId) -> Option<EntityKind> {
        if self.is_ended() {
            return None;
        }
        self.entities.get(id).map(|e| e.kind)
    }
}
