use std::env;

use core_sim::{Instrument, LotMode, SimConfig};
use runtime::PriceRule;
use strategy::Strategy;
use thiserror::Error;

const DEFAULT_STEPS: u64 = 100;
const DEFAULT_AGENTS: usize = 3;
const DEFAULT_WHOLE_SHARES: bool = false;
const DEFAULT_INSTRUMENTS: &str = "AAPL:100,GOOGL:200,MSFT:150";
const DEFAULT_REPLAY_OUTPUT_PATH: &str = "artifacts/replay.csv";

const STEPS_KEY: &str = "SIM_STEPS";
const SEED_KEY: &str = "SIM_SEED";
const STRATEGY_KEY: &str = "SIM_STRATEGY";
const PRICE_RULE_KEY: &str = "SIM_PRICE_RULE";
const MAX_PRICE_MOVE_KEY: &str = "SIM_MAX_PRICE_MOVE";
const AGENTS_KEY: &str = "SIM_AGENTS";
const INITIAL_CASH_KEY: &str = "SIM_INITIAL_CASH";
const WHOLE_SHARES_KEY: &str = "SIM_WHOLE_SHARES";
const INSTRUMENTS_KEY: &str = "SIM_INSTRUMENTS";
const REPLAY_OUTPUT_KEY: &str = "SIM_REPLAY_OUTPUT";

#[derive(Debug, Clone)]
pub struct Config {
    pub steps: u64,
    pub agents: usize,
    pub strategy: Strategy,
    pub price_rule: PriceRule,
    pub instruments: Vec<Instrument>,
    pub replay_output_path: String,
    pub sim: SimConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SIM_STEPS must be a non-negative integer")]
    InvalidSteps,
    #[error("SIM_SEED must be a non-negative integer")]
    InvalidSeed,
    #[error("SIM_STRATEGY must be one of: random, equal-weight, buy-and-hold")]
    InvalidStrategy,
    #[error("SIM_PRICE_RULE must be one of: random-walk, flat, zig-zag, random-zig-zag")]
    InvalidPriceRule,
    #[error("SIM_MAX_PRICE_MOVE must be a finite number greater than 0 and below 1")]
    InvalidMaxPriceMove,
    #[error("SIM_AGENTS must be a non-negative integer")]
    InvalidAgents,
    #[error("SIM_INITIAL_CASH must be a finite, non-negative amount")]
    InvalidInitialCash,
    #[error("SIM_WHOLE_SHARES must be true or false")]
    InvalidWholeShares,
    #[error("SIM_INSTRUMENTS must be a comma-separated list of SYMBOL:PRICE with positive prices")]
    InvalidInstruments,
    #[error("SIM_REPLAY_OUTPUT must not be empty or whitespace")]
    InvalidReplayOutputPath,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SimConfig::default();

        let steps = parse_env(STEPS_KEY, DEFAULT_STEPS, ConfigError::InvalidSteps, |value| {
            value.parse().ok()
        })?;
        let seed = parse_env(SEED_KEY, defaults.seed, ConfigError::InvalidSeed, |value| {
            value.parse().ok()
        })?;
        let agents = parse_env(AGENTS_KEY, DEFAULT_AGENTS, ConfigError::InvalidAgents, |value| {
            value.parse().ok()
        })?;
        let initial_cash = parse_env(
            INITIAL_CASH_KEY,
            defaults.initial_cash,
            ConfigError::InvalidInitialCash,
            |value| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|cash| cash.is_finite() && *cash >= 0.0)
            },
        )?;
        let max_price_move = parse_env(
            MAX_PRICE_MOVE_KEY,
            defaults.max_price_move,
            ConfigError::InvalidMaxPriceMove,
            |value| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|pct| pct.is_finite() && *pct > 0.0 && *pct < 1.0)
            },
        )?;
        let whole_shares = parse_env(
            WHOLE_SHARES_KEY,
            DEFAULT_WHOLE_SHARES,
            ConfigError::InvalidWholeShares,
            parse_bool,
        )?;
        let lot_mode = if whole_shares {
            LotMode::Whole
        } else {
            LotMode::Fractional
        };

        let strategy = parse_env(
            STRATEGY_KEY,
            Strategy::equal_weight(),
            ConfigError::InvalidStrategy,
            |value| value.parse::<Strategy>().ok(),
        )?
        .with_lots(lot_mode);

        let price_rule = parse_env(
            PRICE_RULE_KEY,
            PriceRule::default(),
            ConfigError::InvalidPriceRule,
            |value| value.parse::<PriceRule>().ok(),
        )?
        .with_max_move(max_price_move);

        let instruments = parse_env(
            INSTRUMENTS_KEY,
            default_instruments(),
            ConfigError::InvalidInstruments,
            parse_instruments,
        )?;

        let replay_output_path = parse_env(
            REPLAY_OUTPUT_KEY,
            DEFAULT_REPLAY_OUTPUT_PATH.to_owned(),
            ConfigError::InvalidReplayOutputPath,
            |value| (!value.trim().is_empty()).then(|| value.to_owned()),
        )?;

        Ok(Self {
            steps,
            agents,
            strategy,
            price_rule,
            instruments,
            replay_output_path,
            sim: SimConfig {
                seed,
                initial_cash,
                max_price_move,
                lot_mode,
            },
        })
    }
}

fn default_instruments() -> Vec<Instrument> {
    parse_instruments(DEFAULT_INSTRUMENTS).unwrap_or_default()
}

fn parse_env<T>(
    key: &'static str,
    default_value: T,
    invalid_error: ConfigError,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => parse(value.trim()).ok_or(invalid_error),
        Err(env::VarError::NotPresent) => Ok(default_value),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parses `SYMBOL:PRICE[,SYMBOL:PRICE...]`. Later entries win on duplicate
/// symbols once listed in a catalog.
fn parse_instruments(value: &str) -> Option<Vec<Instrument>> {
    value
        .split(',')
        .map(|entry| {
            let (symbol, price) = entry.trim().split_once(':')?;
            let symbol = symbol.trim();
            let price = price.trim().parse::<f64>().ok()?;
            (!symbol.is_empty() && price.is_finite() && price > 0.0)
                .then(|| Instrument::new(symbol, price))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::{env, sync::Mutex};

    use core_sim::{Instrument, LotMode};
    use runtime::PriceRule;
    use strategy::Strategy;

    use super::{
        Config, ConfigError, AGENTS_KEY, INITIAL_CASH_KEY, INSTRUMENTS_KEY, MAX_PRICE_MOVE_KEY,
        PRICE_RULE_KEY, REPLAY_OUTPUT_KEY, SEED_KEY, STEPS_KEY, STRATEGY_KEY, WHOLE_SHARES_KEY,
    };

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }

        fn unset(key: &'static str) -> Self {
            let previous = env::var_os(key);
            env::remove_var(key);
            Self { key, previous }
        }

        #[cfg(unix)]
        fn set_os(key: &'static str, value: std::ffi::OsString) -> Self {
            let previous = env::var_os(key);
            env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.previous.take() {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn reset_config_env_baseline() -> Vec<EnvVarGuard> {
        [
            STEPS_KEY,
            SEED_KEY,
            STRATEGY_KEY,
            PRICE_RULE_KEY,
            MAX_PRICE_MOVE_KEY,
            AGENTS_KEY,
            INITIAL_CASH_KEY,
            WHOLE_SHARES_KEY,
            INSTRUMENTS_KEY,
            REPLAY_OUTPUT_KEY,
        ]
        .into_iter()
        .map(EnvVarGuard::unset)
        .collect()
    }

    #[test]
    fn defaults_when_env_is_unset() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();

        let config = Config::from_env().unwrap();

        assert_eq!(config.steps, 100);
        assert_eq!(config.agents, 3);
        assert_eq!(config.sim.seed, 42);
        assert_eq!(config.sim.initial_cash, 1_000.0);
        assert_eq!(config.sim.lot_mode, LotMode::Fractional);
        assert_eq!(config.strategy, Strategy::equal_weight());
        assert_eq!(config.price_rule, PriceRule::random_walk(0.05));
        assert_eq!(config.replay_output_path, "artifacts/replay.csv");
        assert_eq!(
            config.instruments,
            vec![
                Instrument::new("AAPL", 100.0),
                Instrument::new("GOOGL", 200.0),
                Instrument::new("MSFT", 150.0),
            ]
        );
    }

    #[test]
    fn uses_overrides_from_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _steps = EnvVarGuard::set(STEPS_KEY, "25");
        let _seed = EnvVarGuard::set(SEED_KEY, "7");
        let _strategy = EnvVarGuard::set(STRATEGY_KEY, "buy-and-hold");
        let _rule = EnvVarGuard::set(PRICE_RULE_KEY, "zig-zag");
        let _agents = EnvVarGuard::set(AGENTS_KEY, "2");
        let _cash = EnvVarGuard::set(INITIAL_CASH_KEY, "500");
        let _instruments = EnvVarGuard::set(INSTRUMENTS_KEY, "TSLA:250, NVDA:90.5");
        let _replay = EnvVarGuard::set(REPLAY_OUTPUT_KEY, "out/run.csv");

        let config = Config::from_env().unwrap();

        assert_eq!(config.steps, 25);
        assert_eq!(config.sim.seed, 7);
        assert_eq!(config.strategy, Strategy::buy_and_hold());
        assert_eq!(config.price_rule, PriceRule::ZigZag);
        assert_eq!(config.agents, 2);
        assert_eq!(config.sim.initial_cash, 500.0);
        assert_eq!(
            config.instruments,
            vec![Instrument::new("TSLA", 250.0), Instrument::new("NVDA", 90.5)]
        );
        assert_eq!(config.replay_output_path, "out/run.csv");
    }

    #[test]
    fn whole_shares_switch_strategy_lots() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(WHOLE_SHARES_KEY, "true");

        let config = Config::from_env().unwrap();

        assert_eq!(config.sim.lot_mode, LotMode::Whole);
        assert_eq!(
            config.strategy,
            Strategy::EqualWeight {
                lots: LotMode::Whole
            }
        );
    }

    #[test]
    fn max_price_move_rebinds_random_walk() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(MAX_PRICE_MOVE_KEY, "0.1");

        let config = Config::from_env().unwrap();

        assert_eq!(config.price_rule, PriceRule::random_walk(0.1));
        assert_eq!(config.sim.max_price_move, 0.1);
    }

    #[test]
    fn returns_error_for_invalid_overrides() {
        let _lock = ENV_LOCK.lock().unwrap();
        let cases: [(&'static str, &str, fn(&ConfigError) -> bool); 9] = [
            (STEPS_KEY, "-1", |err| matches!(err, ConfigError::InvalidSteps)),
            (SEED_KEY, "seed", |err| matches!(err, ConfigError::InvalidSeed)),
            (STRATEGY_KEY, "momentum", |err| {
                matches!(err, ConfigError::InvalidStrategy)
            }),
            (PRICE_RULE_KEY, "crash", |err| {
                matches!(err, ConfigError::InvalidPriceRule)
            }),
            (MAX_PRICE_MOVE_KEY, "1.5", |err| {
                matches!(err, ConfigError::InvalidMaxPriceMove)
            }),
            (INITIAL_CASH_KEY, "-5", |err| {
                matches!(err, ConfigError::InvalidInitialCash)
            }),
            (WHOLE_SHARES_KEY, "yes", |err| {
                matches!(err, ConfigError::InvalidWholeShares)
            }),
            (INSTRUMENTS_KEY, "AAPL:100,GOOGL", |err| {
                matches!(err, ConfigError::InvalidInstruments)
            }),
            (REPLAY_OUTPUT_KEY, "   ", |err| {
                matches!(err, ConfigError::InvalidReplayOutputPath)
            }),
        ];

        for (key, value, expected) in cases {
            let _baseline = reset_config_env_baseline();
            let _guard = EnvVarGuard::set(key, value);

            let err = Config::from_env().unwrap_err();

            assert!(expected(&err), "{key}={value:?} gave {err:?}");
        }
    }

    #[test]
    fn rejects_non_positive_instrument_prices() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set(INSTRUMENTS_KEY, "AAPL:0");

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidInstruments));
    }

    #[cfg(unix)]
    #[test]
    fn returns_error_for_non_unicode_env_var() {
        use std::os::unix::ffi::OsStringExt;

        let _lock = ENV_LOCK.lock().unwrap();
        let _baseline = reset_config_env_baseline();
        let _guard = EnvVarGuard::set_os(
            STRATEGY_KEY,
            std::ffi::OsString::from_vec(vec![0x66, 0x6f, 0x80]),
        );

        let err = Config::from_env().unwrap_err();

        assert!(matches!(err, ConfigError::NonUnicode(STRATEGY_KEY)));
        assert_eq!(err.to_string(), "SIM_STRATEGY contains non-unicode data");
    }
}
