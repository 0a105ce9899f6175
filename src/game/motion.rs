//! Per-frame movement: every mover eases toward its target and sways
//! sideways on a sine wave. All rates are expressed per reference frame and
//! scaled by the real elapsed time, so motion speed does not depend on the
//! host's frame rate.

use serde::Deserialize;

use super::Viewport;
use super::entity::Entity;
use super::spawn::OFFSCREEN_MARGIN;

/// Fraction of the remaining distance covered per reference frame, before the
/// per-entity speed and kind multiplier.
pub const CONVERGENCE_RATE: f64 = 0.01;
/// Sideways pixels per reference frame at wobble amplitude 1.
pub const WOBBLE_SCALE: f64 = 0.5;
/// Angular frequency of the sway (radians per second).
pub const WOBBLE_FREQUENCY: f64 = 3.0;
/// 60 fps.
pub const REFERENCE_FRAME_MS: f64 = 1_000.0 / 60.0;
/// Longest step applied in one call. A frame arriving after a long pause
/// (hidden tab) moves entities as if a quarter second had passed.
pub const MAX_STEP_MS: f64 = 250.0;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionTuning {
    pub convergence_rate: f64,
    pub wobble_scale: f64,
    pub wobble_frequency: f64,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            convergence_rate: CONVERGENCE_RATE,
            wobble_scale: WOBBLE_SCALE,
            wobble_frequency: WOBBLE_FREQUENCY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    Caught,
    Expired,
    LeftViewport,
    SessionEnded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Moved,
    Removed(RemovalReason),
}

/// Outside the viewport by more than the spawn margin.
pub fn out_of_bounds(x: f64, y: f64, viewport: Viewport) -> bool {
    x < -OFFSCREEN_MARGIN
        || y < -OFFSCREEN_MARGIN
        || x > viewport.width + OFFSCREEN_MARGIN
        || y > viewport.height + OFFSCREEN_MARGIN
}

/// Move `entity` by one step of `dt_ms`. The caller removes the entity when
/// this returns `Advance::Removed`.
pub fn advance(entity: &mut Entity, viewport: Viewport, tuning: &MotionTuning, now_ms: f64, dt_ms: f64) -> Advance {
    if now_ms >= entity.expires_at_ms {
        return Advance::Removed(RemovalReason::Expired);
    }

    let (speed_mult, wobble_mult) = entity.kind.motion_multipliers();
    let frames = dt_ms.clamp(0.0, MAX_STEP_MS) / REFERENCE_FRAME_MS;
    if frames > 0.0 && speed_mult > 0.0 {
        let dx = entity.target_x - entity.x;
        let dy = entity.target_y - entity.y;

        let pull = (tuning.convergence_rate * entity.speed * speed_mult * frames).min(1.0);
        entity.x += dx * pull;
        entity.y += dy * pull;

        let dist = dx.hypot(dy);
        if dist > f64::EPSILON {
            let elapsed_s = (now_ms - entity.spawned_at_ms) / 1_000.0;
            let sway = (elapsed_s * tuning.wobble_frequency + entity.phase).sin()
                * entity.wobble
                * tuning.wobble_scale
                * wobble_mult
                * frames;
            // Perpendicular to the heading.
            entity.x += -dy / dist * sway;
            entity.y += dx / dist * sway;
        }
    }

    if out_of_bounds(entity.x, entity.y, viewport) {
        Advance::Removed(RemovalReason::LeftViewport)
    } else {
        Advance::Moved
    }
}
