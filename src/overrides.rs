use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Manual win-probability overrides for specific matchups.
///
/// Overrides are stored with team names in lexicographic order; a lookup
/// with the teams reversed gets the complementary probability back.
#[derive(Clone, Debug, Default)]
pub struct OverridesMap {
    overrides: HashMap<(String, String), f64>,
}

impl OverridesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from a CSV file, one `team1,team2,probability` per
    /// line. Blank lines are skipped.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut map = Self::new();
        for line in fs::read_to_string(path)?.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() != 3 {
                return Err(ConfigError::InvalidOverride {
                    line: line.to_string(),
                    reason: "expected team1,team2,probability".to_string(),
                });
            }
            let prob: f64 = parts[2].trim().parse().map_err(|e| ConfigError::InvalidOverride {
                line: line.to_string(),
                reason: format!("bad probability: {e}"),
            })?;
            map.add(parts[0].trim(), parts[1].trim(), prob);
        }
        Ok(map)
    }

    /// Add or replace the probability of `name1` beating `name2`.
    pub fn add(&mut self, name1: &str, name2: &str, prob: f64) {
        let (key, value) = if name1 < name2 {
            ((name1.to_string(), name2.to_string()), prob)
        } else {
            ((name2.to_string(), name1.to_string()), 1.0 - prob)
        };
        self.overrides.insert(key, value);
    }

    pub fn remove(&mut self, name1: &str, name2: &str) {
        let key = if name1 < name2 {
            (name1.to_string(), name2.to_string())
        } else {
            (name2.to_string(), name1.to_string())
        };
        self.overrides.remove(&key);
    }

    /// Probability of `name1` beating `name2`, if an override exists.
    pub fn get(&self, name1: &str, name2: &str) -> Option<f64> {
        let (key, flip) = if name1 < name2 {
            ((name1.to_string(), name2.to_string()), false)
        } else {
            ((name2.to_string(), name1.to_string()), true)
        };
        self.overrides
            .get(&key)
            .map(|&p| if flip { 1.0 - p } else { p })
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
