//! Pure entity constructors. Cadence lives in the scheduler; these only decide
//! what a freshly spawned entity looks like.

use std::f64::consts::TAU;

use rand::Rng;
use rand::seq::SliceRandom;

use super::Viewport;
use super::entity::{Entity, EntityKind, PowerUpKind};
use super::rarity::select_rarity;

/// Distance outside the viewport where movers start and aim.
pub const OFFSCREEN_MARGIN: f64 = 50.0;

pub const BUG_SPEED_RANGE: std::ops::Range<f64> = 0.3..0.7;
pub const BUG_WOBBLE_RANGE: std::ops::Range<f64> = 1.0..3.0;
pub const MOVER_LIFETIME_MS: std::ops::Range<f64> = 4_000.0..7_000.0;

/// Independent gate applied every time a power-up spawn is attempted.
pub const POWER_UP_SPAWN_CHANCE: f64 = 0.15;
pub const POWER_UP_LIFETIME_MS: f64 = 8_000.0;

pub const BOMB_GLYPH: &str = "💣";

/// Entry edge of a mover; it always aims for the opposite edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// Start and target for a crossing from `side` to the opposite edge.
pub fn trajectory<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, side: Side) -> ((f64, f64), (f64, f64)) {
    let (w, h, m) = (viewport.width, viewport.height, OFFSCREEN_MARGIN);
    match side {
        Side::Top => ((rng.gen_range(0.0..w), -m), (rng.gen_range(0.0..w), h + m)),
        Side::Right => ((w + m, rng.gen_range(0.0..h)), (-m, rng.gen_range(0.0..h))),
        Side::Bottom => ((rng.gen_range(0.0..w), h + m), (rng.gen_range(0.0..w), -m)),
        Side::Left => ((-m, rng.gen_range(0.0..h)), (w + m, rng.gen_range(0.0..h))),
    }
}

fn mover<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    kind: EntityKind,
    glyph: &'static str,
    points: u32,
    now_ms: f64,
) -> Entity {
    let side = Side::ALL[rng.gen_range(0..Side::ALL.len())];
    let ((x, y), (target_x, target_y)) = trajectory(rng, viewport, side);
    Entity {
        kind,
        glyph,
        x,
        y,
        target_x,
        target_y,
        speed: rng.gen_range(BUG_SPEED_RANGE),
        wobble: rng.gen_range(BUG_WOBBLE_RANGE),
        phase: rng.gen_range(0.0..TAU),
        points,
        spawned_at_ms: now_ms,
        expires_at_ms: now_ms + rng.gen_range(MOVER_LIFETIME_MS),
    }
}

pub fn spawn_bug<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, magnet_active: bool, now_ms: f64) -> Entity {
    let rarity = select_rarity(rng, magnet_active);
    let glyph = rarity.glyphs().choose(rng).copied().unwrap_or("🐛");
    mover(rng, viewport, EntityKind::Bug { rarity }, glyph, rarity.points(), now_ms)
}

/// Bombs share the bug trajectory; their faster, wobblier motion comes from
/// the kind multipliers in the motion engine.
pub fn spawn_bomb<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, now_ms: f64) -> Entity {
    mover(rng, viewport, EntityKind::Bomb, BOMB_GLYPH, 0, now_ms)
}

/// Returns `None` when the spawn gate rejects this attempt.
pub fn spawn_power_up<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, now_ms: f64) -> Option<Entity> {
    if !rng.gen_bool(POWER_UP_SPAWN_CHANCE) {
        return None;
    }
    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    let x = rng.gen_range(0.0..viewport.width * 0.9);
    let y = rng.gen_range(0.0..viewport.height * 0.8);
    Some(Entity {
        kind: EntityKind::PowerUp(kind),
        glyph: kind.glyph(),
        x,
        y,
        target_x: x,
        target_y: y,
        speed: 0.0,
        wobble: 0.0,
        phase: 0.0,
        points: 0,
        spawned_at_ms: now_ms,
        expires_at_ms: now_ms + POWER_UP_LIFETIME_MS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rarity::Rarity;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn bug_parameters_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let bug = spawn_bug(&mut rng, viewport(), false, 500.0);
            let EntityKind::Bug { rarity } = bug.kind else {
                panic!("expected a bug, got {:?}", bug.kind);
            };
            assert_eq!(bug.points, rarity.points());
            assert!(rarity.glyphs().contains(&bug.glyph));
            assert!(BUG_SPEED_RANGE.contains(&bug.speed));
            assert!(BUG_WOBBLE_RANGE.contains(&bug.wobble));
            assert!((0.0..TAU).contains(&bug.phase));
            let life = bug.expires_at_ms - bug.spawned_at_ms;
            assert!((4_000.0..7_000.0).contains(&life), "lifetime {life}");
        }
    }

    #[test]
    fn movers_start_on_one_margin_and_aim_at_the_opposite_one() {
        let mut rng = StdRng::seed_from_u64(2);
        let vp = viewport();
        for _ in 0..500 {
            let e = spawn_bomb(&mut rng, vp, 0.0);
            let crossing_vertical = e.y == -OFFSCREEN_MARGIN && e.target_y == vp.height + OFFSCREEN_MARGIN
                || e.y == vp.height + OFFSCREEN_MARGIN && e.target_y == -OFFSCREEN_MARGIN;
            let crossing_horizontal = e.x == -OFFSCREEN_MARGIN && e.target_x == vp.width + OFFSCREEN_MARGIN
                || e.x == vp.width + OFFSCREEN_MARGIN && e.target_x == -OFFSCREEN_MARGIN;
            assert!(crossing_vertical || crossing_horizontal, "{e:?}");
        }
    }

    #[test]
    fn all_four_sides_are_used() {
        let mut rng = StdRng::seed_from_u64(3);
        let vp = viewport();
        let mut seen = [false; 4];
        for _ in 0..200 {
            let e = spawn_bomb(&mut rng, vp, 0.0);
            if e.y == -OFFSCREEN_MARGIN {
                seen[0] = true;
            } else if e.x == vp.width + OFFSCREEN_MARGIN {
                seen[1] = true;
            } else if e.y == vp.height + OFFSCREEN_MARGIN {
                seen[2] = true;
            } else if e.x == -OFFSCREEN_MARGIN {
                seen[3] = true;
            }
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn bombs_carry_no_points() {
        let mut rng = StdRng::seed_from_u64(4);
        let bomb = spawn_bomb(&mut rng, viewport(), 0.0);
        assert_eq!(bomb.kind, EntityKind::Bomb);
        assert_eq!(bomb.points, 0);
        assert_eq!(bomb.glyph, BOMB_GLYPH);
    }

    #[test]
    fn power_up_gate_and_placement() {
        let mut rng = StdRng::seed_from_u64(5);
        let vp = viewport();
        let attempts = 20_000;
        let mut spawned = 0;
        for _ in 0..attempts {
            if let Some(p) = spawn_power_up(&mut rng, vp, 100.0) {
                spawned += 1;
                assert!(matches!(p.kind, EntityKind::PowerUp(_)));
                assert!(p.x >= 0.0 && p.x < vp.width * 0.9);
                assert!(p.y >= 0.0 && p.y < vp.height * 0.8);
                assert_eq!((p.x, p.y), (p.target_x, p.target_y));
                assert_eq!(p.expires_at_ms, 100.0 + POWER_UP_LIFETIME_MS);
            }
        }
        let frac = spawned as f64 / attempts as f64;
        assert!((frac - POWER_UP_SPAWN_CHANCE).abs() < 0.015, "gate fraction {frac}");
    }

    #[test]
    fn magnet_biases_bug_rarity() {
        let mut rng = StdRng::seed_from_u64(6);
        let ultra = (0..50_000)
            .map(|_| spawn_bug(&mut rng, viewport(), true, 0.0))
            .filter(|b| b.kind == EntityKind::Bug { rarity: Rarity::UltraRare })
            .count();
        let frac = ultra as f64 / 50_000.0;
        assert!((frac - 0.02).abs() < 0.004, "ultraRare fraction {frac}");
    }
}
