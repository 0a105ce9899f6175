use std::collections::BTreeMap;
use std::fmt;

use super::rarity::Rarity;

/// Opaque handle the host uses to address a rendered entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    GoldenNet,
    Magnet,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::GoldenNet,
        PowerUpKind::Magnet,
        PowerUpKind::Shield,
    ];

    /// Active duration in milliseconds, whatever the power-up tick cadence.
    pub const fn duration_ms(self) -> f64 {
        match self {
            PowerUpKind::GoldenNet => 10_000.0,
            PowerUpKind::Magnet => 15_000.0,
            PowerUpKind::Shield => 12_000.0,
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            PowerUpKind::GoldenNet => "🥇",
            PowerUpKind::Magnet => "🧲",
            PowerUpKind::Shield => "🛡️",
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            PowerUpKind::GoldenNet => "golden-net",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::Shield => "shield",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            PowerUpKind::GoldenNet => "Golden Net Active! 2x Points!",
            PowerUpKind::Magnet => "Magnet Active! Attracts rare bugs!",
            PowerUpKind::Shield => "Shield Active! Bomb protection!",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            PowerUpKind::GoldenNet => 0,
            PowerUpKind::Magnet => 1,
            PowerUpKind::Shield => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Bug { rarity: Rarity },
    Bomb,
    PowerUp(PowerUpKind),
}

impl EntityKind {
    /// Multipliers applied by the motion engine on top of the per-entity
    /// speed and wobble. Power-ups sit still.
    pub const fn motion_multipliers(self) -> (f64, f64) {
        match self {
            EntityKind::Bug { .. } => (1.0, 1.0),
            EntityKind::Bomb => (1.3, 1.5),
            EntityKind::PowerUp(_) => (0.0, 0.0),
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            EntityKind::Bug { .. } => "bug",
            EntityKind::Bomb => "bug bomb",
            EntityKind::PowerUp(_) => "power-up",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub glyph: &'static str,
    pub x: f64,
    pub y: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub speed: f64,
    pub wobble: f64,
    pub phase: f64,
    pub points: u32,
    pub spawned_at_ms: f64,
    pub expires_at_ms: f64,
}

/// Live entities keyed by id. Ids are never reused within a session, so a
/// stale hover for a removed entity can never hit a newer one.
#[derive(Debug, Default)]
pub struct Entities {
    next_id: u32,
    live: BTreeMap<EntityId, Entity>,
}

impl Entities {
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.live.get(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.live.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.live.iter().map(|(id, e)| (*id, e))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.live.iter_mut().map(|(id, e)| (*id, e))
    }

    pub fn clear(&mut self) -> Vec<EntityId> {
        let ids = self.live.keys().copied().collect();
        self.live.clear();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy() -> Entity {
        Entity {
            kind: EntityKind::Bomb,
            glyph: "💣",
            x: 0.0,
            y: 0.0,
            target_x: 0.0,
            target_y: 0.0,
            speed: 0.5,
            wobble: 1.0,
            phase: 0.0,
            points: 0,
            spawned_at_ms: 0.0,
            expires_at_ms: 1.0,
        }
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut arena = Entities::default();
        let a = arena.insert(dummy());
        assert!(arena.remove(a).is_some());
        let b = arena.insert(dummy());
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());
    }

    #[test]
    fn power_up_durations_in_seconds() {
        assert_eq!(PowerUpKind::GoldenNet.duration_ms(), 10_000.0);
        assert_eq!(PowerUpKind::Magnet.duration_ms(), 15_000.0);
        assert_eq!(PowerUpKind::Shield.duration_ms(), 12_000.0);
    }
}
