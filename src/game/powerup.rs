use super::entity::PowerUpKind;

/// Stock power-up timer cadence.
pub const DEFAULT_TICK_MS: f64 = 100.0;

/// Number of `tick_ms` ticks that cover `kind`'s duration, at least one.
/// A non-positive or non-finite cadence counts in default ticks.
pub fn duration_ticks(kind: PowerUpKind, tick_ms: f64) -> u32 {
    let tick_ms = if tick_ms.is_finite() && tick_ms > 0.0 { tick_ms } else { DEFAULT_TICK_MS };
    (kind.duration_ms() / tick_ms).round().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Remaining ticks per power-up slot. A slot is active exactly while its
/// counter is non-zero, so the two can never disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerUpState {
    remaining: [u32; 3],
}

impl PowerUpState {
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining[kind.index()] > 0
    }

    pub fn remaining_ticks(&self, kind: PowerUpKind) -> u32 {
        self.remaining[kind.index()]
    }

    /// (Re)start a slot with its full duration, counted in ticks of
    /// `tick_ms`. Durations do not stack.
    pub fn activate(&mut self, kind: PowerUpKind, tick_ms: f64) {
        self.activate_for(kind, duration_ticks(kind, tick_ms));
    }

    pub fn activate_for(&mut self, kind: PowerUpKind, ticks: u32) {
        self.remaining[kind.index()] = ticks;
    }

    /// One timer tick. Returns the kinds that ran out on this tick.
    pub fn tick(&mut self) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = &mut self.remaining[kind.index()];
            if *slot > 0 {
                *slot -= 1;
                if *slot == 0 {
                    expired.push(kind);
                }
            }
        }
        expired
    }
}
