use super::entity::{EntityId, EntityKind, PowerUpKind};
use super::motion::RemovalReason;
use super::rarity::Rarity;
use super::stats::SessionStats;

/// Catch feedback colour, one per rarity tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sparkle {
    Default,
    Blue,
    Rainbow,
}

impl Sparkle {
    pub const fn for_rarity(rarity: Rarity) -> Self {
        match rarity {
            Rarity::Common => Sparkle::Default,
            Rarity::Rare => Sparkle::Blue,
            Rarity::UltraRare => Sparkle::Rainbow,
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Sparkle::Default => "sparkle sparkle-default",
            Sparkle::Blue => "sparkle sparkle-blue",
            Sparkle::Rainbow => "sparkle sparkle-rainbow",
        }
    }
}

/// Transient visual/audio cues anchored at a screen position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Sparkle(Sparkle),
    /// "+N" popup after a catch.
    Points(u64),
    Explosion,
    Shielded,
}

impl Effect {
    pub fn label(&self) -> String {
        match self {
            Effect::Sparkle(_) => String::new(),
            Effect::Points(points) => format!("+{points} 🐛"),
            Effect::Explosion => "💥 OH NO!".to_owned(),
            Effect::Shielded => "Shield Protected You!".to_owned(),
        }
    }

    /// How long the host keeps the cue on screen.
    pub const fn duration_ms(&self) -> f64 {
        match self {
            Effect::Sparkle(_) => 1_000.0,
            Effect::Points(_) | Effect::Explosion | Effect::Shielded => 2_000.0,
        }
    }
}

/// Everything the session tells the host, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        glyph: &'static str,
        x: f64,
        y: f64,
    },
    EntityMoved {
        id: EntityId,
        x: f64,
        y: f64,
    },
    EntityRemoved {
        id: EntityId,
        reason: RemovalReason,
    },
    Effect {
        effect: Effect,
        x: f64,
        y: f64,
    },
    NetMoved {
        x: f64,
        y: f64,
    },
    NetSwung,
    ScoreChanged {
        score: u64,
    },
    StreakChanged {
        streak: u64,
    },
    StatsChanged(SessionStats),
    PowerUpActivated {
        kind: PowerUpKind,
    },
    PowerUpExpired {
        kind: PowerUpKind,
    },
    KonamiMode {
        active: bool,
    },
    SessionEnded {
        final_score: u64,
    },
}
