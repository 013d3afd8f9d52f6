use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::core::Ticks;
use crate::scheduler::Policy;
use crate::sim::workload::DEFAULT_SIZES;

pub const DEFAULT_HORIZON: Ticks = 100;
pub const DEFAULT_PACE_MS: u64 = 1000;

pub const ENV_HORIZON: &str = "SCHED_SIM_HORIZON";
pub const ENV_SEED: &str = "SCHED_SIM_SEED";
pub const ENV_PACE_MS: &str = "SCHED_SIM_PACE_MS";
pub const ENV_MAX_SIZE: &str = "SCHED_SIM_MAX_SIZE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid scheduling method: {0:?}")]
    InvalidSelection(String),
    #[error("invalid value {value:?} for {name}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("--all cannot be combined with a method selection ({0:?})")]
    ConflictingSelection(String),
    #[error("process sizes need a maximum of at least 1")]
    EmptySizeRange,
    #[error("failed to read method selection: {0}")]
    Io(#[from] std::io::Error),
}

/// Which lanes the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only the selected policy receives work.
    Single(Policy),
    /// FCFS, SJF and Round-Robin each receive their own arrivals.
    Parallel,
}

impl Mode {
    pub fn policies(self) -> Vec<Policy> {
        match self {
            Self::Single(policy) => vec![policy],
            Self::Parallel => Policy::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub mode: Mode,
    pub horizon: Ticks,
    pub seed: Option<u64>,
    pub pace: Duration,
    pub sizes: RangeInclusive<Ticks>,
}

impl SimConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            horizon: DEFAULT_HORIZON,
            seed: None,
            pace: Duration::from_millis(DEFAULT_PACE_MS),
            sizes: DEFAULT_SIZES,
        }
    }

    /// Build a config from command-line arguments (program name excluded),
    /// falling back to `env` for anything not given on the command line.
    /// `prompt` is called for the method selection only when neither a
    /// positional selection nor `--all` was passed.
    pub fn from_env_and_args<I, E, P>(args: I, env: E, prompt: P) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
        P: FnOnce() -> Result<String, ConfigError>,
    {
        let mut selection = None;
        let mut parallel = false;
        let mut horizon = None;
        let mut seed = None;
        let mut pace_ms = None;
        let mut max_size = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--all" => parallel = true,
                "--horizon" => horizon = Some(flag_value(&mut args, "--horizon")?),
                "--seed" => seed = Some(flag_value(&mut args, "--seed")?),
                "--pace-ms" => pace_ms = Some(flag_value(&mut args, "--pace-ms")?),
                "--max-size" => max_size = Some(flag_value(&mut args, "--max-size")?),
                other if other.starts_with("--") || selection.is_some() => {
                    return Err(ConfigError::UnknownArgument(arg));
                }
                _ => selection = Some(arg),
            }
        }

        let mode = match (parallel, selection) {
            (true, Some(raw)) => return Err(ConfigError::ConflictingSelection(raw)),
            (true, None) => Mode::Parallel,
            (false, Some(raw)) => Mode::Single(parse_selection(&raw)?),
            (false, None) => Mode::Single(parse_selection(&prompt()?)?),
        };

        let mut config = Self::new(mode);
        if let Some(horizon) = pick(horizon, &env, ENV_HORIZON, "horizon")? {
            config.horizon = horizon;
        }
        config.seed = pick(seed, &env, ENV_SEED, "seed")?;
        if let Some(ms) = pick(pace_ms, &env, ENV_PACE_MS, "pace-ms")? {
            config.pace = Duration::from_millis(ms);
        }
        if let Some(max) = pick(max_size, &env, ENV_MAX_SIZE, "max-size")? {
            if max == 0 {
                return Err(ConfigError::EmptySizeRange);
            }
            config.sizes = 1..=max;
        }

        Ok(config)
    }
}

/// Menu number to policy. Anything but 1, 2 or 3 is rejected.
pub fn parse_selection(raw: &str) -> Result<Policy, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(Policy::from_selection)
        .ok_or_else(|| ConfigError::InvalidSelection(raw.trim().to_string()))
}

fn flag_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue(flag))
}

// Command line wins over environment
fn pick<T, E>(
    cli: Option<String>,
    env: &E,
    var: &str,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    E: Fn(&str) -> Option<String>,
{
    let Some(raw) = cli.or_else(|| env(var)) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn no_prompt() -> Result<String, ConfigError> {
        panic!("prompt should not be consulted")
    }

    #[test]
    fn positional_selection_picks_single_policy() {
        let config = SimConfig::from_env_and_args(args(&["2"]), no_env, no_prompt).unwrap();
        assert_eq!(config.mode, Mode::Single(Policy::Sjf));
        assert_eq!(config.horizon, DEFAULT_HORIZON);
        assert_eq!(config.pace, Duration::from_millis(DEFAULT_PACE_MS));
        assert_eq!(config.sizes, 1..=10);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn prompt_used_when_no_selection() {
        let config =
            SimConfig::from_env_and_args(args(&[]), no_env, || Ok("3\n".to_string())).unwrap();
        assert_eq!(config.mode, Mode::Single(Policy::RoundRobin));
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        for raw in ["0", "4", "-1", "abc", ""] {
            let err = SimConfig::from_env_and_args(args(&[raw]), no_env, no_prompt).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSelection(_)), "{raw:?} -> {err}");
        }
    }

    #[test]
    fn all_flag_selects_parallel_mode() {
        let config = SimConfig::from_env_and_args(args(&["--all"]), no_env, no_prompt).unwrap();
        assert_eq!(config.mode, Mode::Parallel);
        assert_eq!(config.mode.policies(), Policy::ALL.to_vec());
    }

    #[test]
    fn all_flag_with_selection_is_rejected() {
        for list in [&["--all", "2"][..], &["2", "--all"][..]] {
            let err = SimConfig::from_env_and_args(args(list), no_env, no_prompt).unwrap_err();
            assert!(
                matches!(&err, ConfigError::ConflictingSelection(raw) if raw == "2"),
                "{list:?} -> {err}"
            );
        }
    }

    #[test]
    fn flags_override_environment() {
        let env = |var: &str| match var {
            ENV_HORIZON => Some("50".to_string()),
            ENV_SEED => Some("9".to_string()),
            ENV_PACE_MS => Some("0".to_string()),
            _ => None,
        };
        let config =
            SimConfig::from_env_and_args(args(&["1", "--horizon", "20"]), env, no_prompt).unwrap();
        assert_eq!(config.horizon, 20);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.pace, Duration::ZERO);
    }

    #[test]
    fn bad_numbers_and_flags_are_errors() {
        let err = SimConfig::from_env_and_args(args(&["1", "--horizon", "soon"]), no_env, no_prompt)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "horizon", .. }));

        let err =
            SimConfig::from_env_and_args(args(&["1", "--seed"]), no_env, no_prompt).unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue("--seed")));

        let err =
            SimConfig::from_env_and_args(args(&["1", "--fast"]), no_env, no_prompt).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownArgument(_)));

        let err = SimConfig::from_env_and_args(args(&["1", "--max-size", "0"]), no_env, no_prompt)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptySizeRange));
    }
}
