use rand::Rng;

/// Bug tiers. Each tier fixes the point value and glyph pool of a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Rare,
    UltraRare,
}

impl Rarity {
    pub const fn points(self) -> u32 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 5,
            Rarity::UltraRare => 10,
        }
    }

    pub const fn glyphs(self) -> &'static [&'static str] {
        match self {
            Rarity::Common => &["🐛", "🦗", "🐜", "🐞", "🕷️"],
            Rarity::Rare => &["🦋", "🐝", "🦂", "🐢"],
            Rarity::UltraRare => &["🦄", "🐲", "🦚", "🐳"],
        }
    }

    /// CSS class suffix the host uses for tier styling.
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            Rarity::Common => None,
            Rarity::Rare => Some("rare"),
            Rarity::UltraRare => Some("ultra-rare"),
        }
    }
}

// Cumulative bounds over a roll in [0, 100): weights {ultraRare: 1, rare: 8, common: 91}.
pub const ULTRA_RARE_BOUND: f64 = 1.0;
pub const RARE_BOUND: f64 = 9.0;

// Magnet bounds. Note the rare band shrinks to [2, 3) while the magnet is on.
pub const MAGNET_ULTRA_RARE_BOUND: f64 = 2.0;
pub const MAGNET_RARE_BOUND: f64 = 3.0;

/// Classify a roll in `[0, 100)`.
pub fn rarity_for_roll(roll: f64, magnet_active: bool) -> Rarity {
    let (ultra, rare) = if magnet_active {
        (MAGNET_ULTRA_RARE_BOUND, MAGNET_RARE_BOUND)
    } else {
        (ULTRA_RARE_BOUND, RARE_BOUND)
    };
    if roll < ultra {
        Rarity::UltraRare
    } else if roll < rare {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

pub fn select_rarity<R: Rng + ?Sized>(rng: &mut R, magnet_active: bool) -> Rarity {
    rarity_for_roll(rng.gen_range(0.0..100.0), magnet_active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn baseline_thresholds() {
        assert_eq!(rarity_for_roll(0.0, false), Rarity::UltraRare);
        assert_eq!(rarity_for_roll(0.999, false), Rarity::UltraRare);
        assert_eq!(rarity_for_roll(1.0, false), Rarity::Rare);
        assert_eq!(rarity_for_roll(8.999, false), Rarity::Rare);
        assert_eq!(rarity_for_roll(9.0, false), Rarity::Common);
        assert_eq!(rarity_for_roll(99.999, false), Rarity::Common);
    }

    #[test]
    fn magnet_thresholds() {
        assert_eq!(rarity_for_roll(1.5, true), Rarity::UltraRare);
        assert_eq!(rarity_for_roll(2.0, true), Rarity::Rare);
        assert_eq!(rarity_for_roll(2.999, true), Rarity::Rare);
        // A roll that is rare without the magnet is common with it.
        assert_eq!(rarity_for_roll(5.0, true), Rarity::Common);
    }

    #[test]
    fn baseline_rare_fraction_converges_to_nine_percent() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 200_000;
        let rare_plus = (0..n)
            .map(|_| select_rarity(&mut rng, false))
            .filter(|r| *r != Rarity::Common)
            .count();
        let frac = rare_plus as f64 / n as f64;
        assert!((frac - 0.09).abs() < 0.005, "rare+ultraRare fraction {frac}");
    }

    #[test]
    fn points_table() {
        assert_eq!(Rarity::Common.points(), 1);
        assert_eq!(Rarity::Rare.points(), 5);
        assert_eq!(Rarity::UltraRare.points(), 10);
        for r in [Rarity::Common, Rarity::Rare, Rarity::UltraRare] {
            assert!(!r.glyphs().is_empty());
        }
    }
}
