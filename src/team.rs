use serde::{Deserialize, Serialize};

/// A tournament participant.
///
/// `index` is the team's position in the bracket's global team list. It is
/// assigned once when the bracket is built and never reused or reassigned;
/// games refer to teams by this index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,

    /// Pre-tournament rank within the region, 1-16. Lower is stronger.
    /// Informational except to the seed-based win model.
    pub seed: u32,

    pub region: String,

    /// Strength rating from the ratings provider. `None` until the bracket
    /// is enriched via [`Bracket::apply_ratings`](crate::Bracket::apply_ratings).
    #[serde(default)]
    pub rating: Option<f64>,

    /// Name the ratings provider knows this team by, when it differs from
    /// `name`.
    #[serde(default)]
    pub rating_name: Option<String>,

    #[serde(default)]
    pub index: usize,
}

impl Team {
    pub fn new(name: impl Into<String>, seed: u32, region: impl Into<String>) -> Self {
        Team {
            name: name.into(),
            seed,
            region: region.into(),
            rating: None,
            rating_name: None,
            index: 0,
        }
    }

    /// Key this team resolves to in the ratings provider's table.
    pub fn rating_key(&self) -> &str {
        self.rating_name.as_deref().unwrap_or(&self.name)
    }
}
