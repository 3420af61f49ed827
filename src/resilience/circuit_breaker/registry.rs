//! Per-dependency breaker registry with lazy construction.

use std::sync::Arc;

use dashmap::DashMap;

use super::breaker::CircuitBreaker;
use super::state::BreakerConfig;

/// Process-wide collection of breakers keyed by dependency identity.
///
/// Breakers are created once on first use and live for the process
/// lifetime; repeated lookups return the same instance.
pub struct BreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
    default_config: BreakerConfig,
}

impl BreakerRegistry {
    pub fn new(default_config: BreakerConfig) -> Self {
        Self {
            breakers: DashMap::new(),
            default_config,
        }
    }

    /// Get or create the breaker for a dependency using the default config.
    pub fn get(&self, name: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(CircuitBreaker::new(name, self.default_config.clone()))
            })
            .clone()
    }

    /// Get or create with a config specific to this dependency.
    pub fn get_with_config(&self, name: &str, config: BreakerConfig) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(name, config)))
            .clone()
    }

    /// Names of all registered dependencies.
    pub fn names(&self) -> Vec<String> {
        self.breakers.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for BreakerRegistry {
    fn default() -> Self {
        Self::new(BreakerConfig::default())
    }
}
