//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`], the settings for one supervised run.
//!
//! ## Sentinel values
//! - `close_timeout` below [`MIN_CLOSE_TIMEOUT`] → floored to 10s
//! - `bus_capacity = 0` → clamped to 1
//!
//! ## Environment
//! [`SupervisorConfig::from_env`] reads:
//! - `RUNKIT_CLOSE_TIMEOUT_SECONDS` (default `10`)
//! - `RUNKIT_BUS_CAPACITY` (default `1024`)

use std::str::FromStr;
use std::time::Duration;

use crate::env::get_env;
use crate::taxonomy::{Error, Kind};

/// Lower bound applied to [`SupervisorConfig::close_timeout`].
pub const MIN_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_CLOSE_TIMEOUT: &str = "RUNKIT_CLOSE_TIMEOUT_SECONDS";
pub const ENV_BUS_CAPACITY: &str = "RUNKIT_BUS_CAPACITY";

const OP_FROM_ENV: &str = "SupervisorConfig::from_env";

/// Configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `close_timeout`: how long drain waits for closers (floored at 10s)
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Maximum time drain waits for every closer to return.
    ///
    /// Values below [`MIN_CLOSE_TIMEOUT`] are raised to it, so a
    /// misconfigured near-zero timeout cannot truncate in-flight cleanup.
    pub close_timeout: Duration,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events skip
    /// the oldest ones.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Returns the close timeout raised to at least [`MIN_CLOSE_TIMEOUT`].
    #[inline]
    pub fn close_timeout_floored(&self) -> Duration {
        self.close_timeout.max(MIN_CLOSE_TIMEOUT)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(get_env)
    }

    /// Builds the configuration from any `(name, default) -> value` lookup.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use runkit::SupervisorConfig;
    ///
    /// let cfg = SupervisorConfig::from_lookup(|name, default| match name {
    ///     "RUNKIT_CLOSE_TIMEOUT_SECONDS" => "30".to_string(),
    ///     _ => default.to_string(),
    /// })?;
    /// assert_eq!(cfg.close_timeout, Duration::from_secs(30));
    /// assert_eq!(cfg.bus_capacity, 1024);
    /// # Ok::<(), runkit::Error>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str, &str) -> String,
    {
        let defaults = Self::default();
        let secs: u64 = parse(
            &lookup,
            ENV_CLOSE_TIMEOUT,
            &defaults.close_timeout.as_secs().to_string(),
        )?;
        let bus_capacity: usize =
            parse(&lookup, ENV_BUS_CAPACITY, &defaults.bus_capacity.to_string())?;

        Ok(Self {
            close_timeout: Duration::from_secs(secs),
            bus_capacity,
        })
    }
}

fn parse<T, F>(lookup: &F, name: &'static str, default: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str, &str) -> String,
{
    let raw = lookup(name, default);
    raw.trim().parse::<T>().map_err(|e| {
        Error::builder()
            .op(OP_FROM_ENV)
            .kind(Kind::Invalid)
            .field("variable", name)
            .field("value", &raw)
            .cause(e)
            .build()
    })
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `close_timeout = 10s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            close_timeout: MIN_CLOSE_TIMEOUT,
            bus_capacity: 1024,
        }
    }
}
