use std::{fmt, str::FromStr, sync::Arc};

use core_sim::Catalog;
use rand::{Rng, RngCore};
use thiserror::Error;

pub const DEFAULT_MAX_MOVE: f64 = 0.05;
const ZIG_RISE: f64 = 0.25;
const ZAG_FALL: f64 = 0.20;

pub type PriceUpdateFn = dyn Fn(u64, &mut Catalog, &mut dyn RngCore) + Send + Sync;

/// A caller-supplied price update identified by an explicit key.
#[derive(Clone)]
pub struct CustomPriceRule {
    key: String,
    rule: Arc<PriceUpdateFn>,
}

impl CustomPriceRule {
    pub fn new<F>(key: impl Into<String>, rule: F) -> Self
    where
        F: Fn(u64, &mut Catalog, &mut dyn RngCore) + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            rule: Arc::new(rule),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for CustomPriceRule {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl fmt::Debug for CustomPriceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPriceRule")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// How instrument prices move once every agent has acted in a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceRule {
    /// Every price rises by a uniform draw from `[-max_move, max_move)`.
    RandomWalk { max_move: f64 },
    Flat,
    /// +25% on odd ticks, -20% on even ticks. Any even number of ticks nets
    /// out to the starting price.
    ZigZag,
    /// Each instrument independently either rises 25% or falls 20%.
    RandomZigZag,
    Custom(CustomPriceRule),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price rule `{0}`; expected one of: random-walk, flat, zig-zag, random-zig-zag")]
pub struct ParsePriceRuleError(String);

impl Default for PriceRule {
    fn default() -> Self {
        Self::random_walk(DEFAULT_MAX_MOVE)
    }
}

impl PriceRule {
    pub fn random_walk(max_move: f64) -> Self {
        Self::RandomWalk { max_move }
    }

    pub fn custom<F>(key: impl Into<String>, rule: F) -> Self
    where
        F: Fn(u64, &mut Catalog, &mut dyn RngCore) + Send + Sync + 'static,
    {
        Self::Custom(CustomPriceRule::new(key, rule))
    }

    /// Rebinds the step width of a random walk; other rules are unchanged.
    pub fn with_max_move(self, max_move: f64) -> Self {
        match self {
            Self::RandomWalk { .. } => Self::RandomWalk { max_move },
            other => other,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::RandomWalk { .. } => "random-walk",
            Self::Flat => "flat",
            Self::ZigZag => "zig-zag",
            Self::RandomZigZag => "random-zig-zag",
            Self::Custom(custom) => custom.key(),
        }
    }

    pub fn apply(&self, time: u64, catalog: &mut Catalog, rng: &mut dyn RngCore) {
        match self {
            Self::RandomWalk { max_move } => {
                let max_move = *max_move;
                // The sampled range is `2 * max_move` wide and must stay finite.
                if !(max_move > 0.0 && (2.0 * max_move).is_finite()) {
                    return;
                }
                for mut instrument in catalog.iter_mut() {
                    instrument.rise(rng.gen_range(-max_move..max_move));
                }
            }
            Self::Flat => {}
            Self::ZigZag => {
                for mut instrument in catalog.iter_mut() {
                    if time % 2 == 1 {
                        instrument.rise(ZIG_RISE);
                    } else {
                        instrument.fall(ZAG_FALL);
                    }
                }
            }
            Self::RandomZigZag => {
                for mut instrument in catalog.iter_mut() {
                    if rng.gen_bool(0.5) {
                        instrument.rise(ZIG_RISE);
                    } else {
                        instrument.fall(ZAG_FALL);
                    }
                }
            }
            Self::Custom(custom) => (custom.rule)(time, catalog, rng),
        }
    }
}

impl FromStr for PriceRule {
    type Err = ParsePriceRuleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "random-walk" => Ok(Self::default()),
            "flat" => Ok(Self::Flat),
            "zig-zag" => Ok(Self::ZigZag),
            "random-zig-zag" => Ok(Self::RandomZigZag),
            other => Err(ParsePriceRuleError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use core_sim::{Catalog, Instrument};
    use rand::{rngs::StdRng, SeedableRng};

    use super::PriceRule;

    fn three_listings() -> Catalog {
        Catalog::from_iter([
            Instrument::new("AAPL", 100.0),
            Instrument::new("GOOGL", 200.0),
            Instrument::new("MSFT", 50.0),
        ])
    }

    #[test]
    fn flat_rule_leaves_prices_alone() {
        let mut catalog = three_listings();
        let mut rng = StdRng::seed_from_u64(1);

        for time in 1..=10 {
            PriceRule::Flat.apply(time, &mut catalog, &mut rng);
        }

        assert_eq!(catalog, three_listings());
    }

    #[test]
    fn zig_zag_returns_to_start_after_even_ticks() {
        let mut catalog = three_listings();
        let mut rng = StdRng::seed_from_u64(1);

        PriceRule::ZigZag.apply(1, &mut catalog, &mut rng);
        assert_eq!(catalog.price("AAPL"), Some(125.0));

        for time in 2..=10 {
            PriceRule::ZigZag.apply(time, &mut catalog, &mut rng);
        }

        assert_eq!(catalog, three_listings());
    }

    #[test]
    fn random_zig_zag_moves_by_fixed_factors() {
        let start = three_listings();
        let mut catalog = three_listings();
        let mut rng = StdRng::seed_from_u64(4);

        PriceRule::RandomZigZag.apply(1, &mut catalog, &mut rng);

        for instrument in catalog.iter() {
            let ratio = instrument.price() / start.price(instrument.symbol()).unwrap();
            assert!((ratio - 1.25).abs() < 1e-12 || (ratio - 0.8).abs() < 1e-12);
        }
    }

    #[test]
    fn random_walk_stays_within_band() {
        let start = three_listings();
        let mut catalog = three_listings();
        let mut rng = StdRng::seed_from_u64(8);

        PriceRule::default().apply(1, &mut catalog, &mut rng);

        for instrument in catalog.iter() {
            let change = instrument.price() / start.price(instrument.symbol()).unwrap() - 1.0;
            assert!(change.abs() <= 0.05 + 1e-12);
        }
        assert_ne!(catalog, start);
    }

    #[test]
    fn zero_width_random_walk_is_flat() {
        let mut catalog = three_listings();
        let mut rng = StdRng::seed_from_u64(8);

        PriceRule::random_walk(0.0).apply(1, &mut catalog, &mut rng);

        assert_eq!(catalog, three_listings());
    }

    #[test]
    fn unbounded_random_walk_widths_are_flat() {
        let mut catalog = three_listings();
        let mut rng = StdRng::seed_from_u64(8);

        for max_move in [f64::MAX, f64::MAX / 1.5, f64::INFINITY, f64::NAN, -0.1] {
            PriceRule::random_walk(max_move).apply(1, &mut catalog, &mut rng);
        }

        assert_eq!(catalog, three_listings());
    }

    #[test]
    fn custom_rule_receives_tick_time() {
        let mut catalog = three_listings();
        let mut rng = StdRng::seed_from_u64(1);
        let add_time = PriceRule::custom("add-time", |time, catalog, _| {
            for mut instrument in catalog.iter_mut() {
                let price = instrument.price();
                instrument.set_price(price + time as f64);
            }
        });

        add_time.apply(3, &mut catalog, &mut rng);

        assert_eq!(catalog.price("AAPL"), Some(103.0));
        assert_eq!(add_time.name(), "add-time");
    }

    #[test]
    fn parses_names_and_compares_by_tag() {
        assert_eq!("flat".parse::<PriceRule>(), Ok(PriceRule::Flat));
        assert_eq!("zig-zag".parse::<PriceRule>(), Ok(PriceRule::ZigZag));
        assert_eq!("random-zig-zag".parse::<PriceRule>(), Ok(PriceRule::RandomZigZag));
        assert_eq!("random-walk".parse::<PriceRule>(), Ok(PriceRule::default()));
        assert!("crash".parse::<PriceRule>().is_err());

        assert_eq!(
            PriceRule::custom("a", |_, _, _| {}),
            PriceRule::custom("a", |_, _, _| {})
        );
        assert_ne!(PriceRule::custom("a", |_, _, _| {}), PriceRule::Flat);
        assert_eq!(
            PriceRule::default().with_max_move(0.1),
            PriceRule::random_walk(0.1)
        );
    }
}
