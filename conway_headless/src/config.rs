// config.rs - Runner defaults and environment overrides

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use conway_coro::patterns::{self, Pattern};
use conway_coro::Params;

// Compile-time defaults
pub const DEFAULT_WIDTH: usize = 16;
pub const DEFAULT_HEIGHT: usize = 16;
pub const DEFAULT_TURNS: usize = 100;
pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_IMAGES: &str = "images";
pub const DEFAULT_OUT: &str = "out";

#[derive(Debug)]
pub struct Config {
    pub params: Params,
    pub images: PathBuf,
    pub out: PathBuf,
    pub tick: Duration,
    /// Seed used when no input image exists; `None` means a random fill.
    pub pattern: Option<&'static Pattern>,
}

impl Config {
    /// Reads `GOL_*` variables over the defaults and validates the result.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let params = Params::new(
            var(&lookup, "GOL_WIDTH", DEFAULT_WIDTH)?,
            var(&lookup, "GOL_HEIGHT", DEFAULT_HEIGHT)?,
            var(&lookup, "GOL_TURNS", DEFAULT_TURNS)?,
            var(&lookup, "GOL_THREADS", DEFAULT_THREADS)?,
        );
        params.validate()?;

        let default_tick = conway_coro::DEFAULT_TICK_INTERVAL.as_millis() as u64;
        let tick_ms: u64 = var(&lookup, "GOL_TICK_MS", default_tick)?;
        anyhow::ensure!(tick_ms > 0, "GOL_TICK_MS must be at least 1");

        let pattern = match lookup("GOL_PATTERN") {
            Some(name) => Some(
                patterns::find(&name).with_context(|| format!("unknown pattern {name:?}"))?,
            ),
            None => None,
        };

        Ok(Self {
            params,
            images: var(&lookup, "GOL_IMAGES", PathBuf::from(DEFAULT_IMAGES))?,
            out: var(&lookup, "GOL_OUT", PathBuf::from(DEFAULT_OUT))?,
            tick: Duration::from_millis(tick_ms),
            pattern,
        })
    }
}

fn var<T>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.parse().with_context(|| format!("{key}={raw:?}")),
        None => Ok(default),
    }
}
