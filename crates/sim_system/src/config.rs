//! Simulation configuration.

use sim_component::{DEFAULT_COMPONENT_CAPACITY, SimError, SimResult};

/// Default number of cycles between two compactions.
pub const DEFAULT_COMPACTION_INTERVAL: u64 = 100;

/// The environment variable used to override the compaction interval.
pub const COMPACTION_INTERVAL_ENV: &str = "SIM_COMPACTION_INTERVAL";

/// The environment variable used to override the component type capacity.
pub const COMPONENT_CAPACITY_ENV: &str = "SIM_COMPONENT_CAPACITY";

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Compact every pool after each cycle whose number is a multiple of
    /// this value. `0` disables compaction.
    pub compaction_interval: u64,
    /// Maximum number of distinct component types.
    pub component_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            compaction_interval: DEFAULT_COMPACTION_INTERVAL,
            component_capacity: DEFAULT_COMPONENT_CAPACITY,
        }
    }
}

impl SimConfig {
    /// Build a config from [`COMPACTION_INTERVAL_ENV`] and
    /// [`COMPONENT_CAPACITY_ENV`], falling back to the defaults for unset
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if a variable is set but is not
    /// an unsigned integer.
    pub fn from_env() -> SimResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SimConfig::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`SimConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SimResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            compaction_interval: parse_or(
                &lookup,
                COMPACTION_INTERVAL_ENV,
                defaults.compaction_interval,
            )?,
            component_capacity: parse_or(
                &lookup,
                COMPONENT_CAPACITY_ENV,
                defaults.component_capacity,
            )?,
        })
    }

    /// Override the compaction interval.
    #[must_use]
    pub fn with_compaction_interval(mut self, cycles: u64) -> Self {
        self.compaction_interval = cycles;
        self
    }

    /// Override the component type capacity.
    #[must_use]
    pub fn with_component_capacity(mut self, capacity: usize) -> Self {
        self.component_capacity = capacity;
        self
    }

    /// Returns `true` if pools are compacted at the end of `cycle`.
    #[must_use]
    pub fn compacts_after(&self, cycle: u64) -> bool {
        self.compaction_interval != 0 && cycle % self.compaction_interval == 0
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> SimResult<T> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SimError::InvalidConfig { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.compaction_interval, 100);
        assert_eq!(config.component_capacity, DEFAULT_COMPONENT_CAPACITY);
    }

    #[test]
    fn test_compacts_after() {
        let config = SimConfig::default();
        assert!(config.compacts_after(0));
        assert!(!config.compacts_after(1));
        assert!(config.compacts_after(200));

        let never = config.with_compaction_interval(0);
        assert!(!never.compacts_after(0));
        assert!(!never.compacts_after(100));
    }

    #[test]
    fn test_from_lookup_unset_uses_defaults() {
        let config = SimConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = SimConfig::from_lookup(|key| match key {
            COMPACTION_INTERVAL_ENV => Some(" 25 ".to_string()),
            COMPONENT_CAPACITY_ENV => Some("8".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.compaction_interval, 25);
        assert_eq!(config.component_capacity, 8);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = SimConfig::from_lookup(|key| {
            (key == COMPACTION_INTERVAL_ENV).then(|| "often".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig {
                key: COMPACTION_INTERVAL_ENV,
                ..
            }
        ));
    }
}
