use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Name-to-rating table supplied by an external ratings provider.
///
/// The provider side (scraping, HTML parsing) lives outside this crate; the
/// persisted form is a flat JSON object of team name to rating.
#[derive(Clone, Debug, Default)]
pub struct RatingsTable {
    ratings: HashMap<String, f64>,
}

impl RatingsTable {
    pub fn new(ratings: HashMap<String, f64>) -> Self {
        RatingsTable { ratings }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let ratings: HashMap<String, f64> = serde_json::from_str(json)?;
        Ok(RatingsTable { ratings })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.ratings.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
