use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bracket::Bracket;
use crate::error::ConfigError;
use crate::simulation::Simulation;
use crate::win_prob::WinModel;

/// One entrant's predicted bracket plus pool metadata.
///
/// Entries are scoring targets only; the simulator never mutates them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketEntry {
    pub bracket: Bracket,

    /// Pool-unique entrant identifier, also the tie-break key.
    pub entrant: String,

    #[serde(default)]
    pub bracket_name: Option<String>,

    /// The entrant's predicted total score of the final game.
    #[serde(default)]
    pub predicted_final_score: Option<u32>,

    /// Score against the most recent actual/simulated outcome. Set by
    /// [`Group::score_all`].
    #[serde(default)]
    pub score: Option<f64>,
}

impl BracketEntry {
    pub fn new(entrant: impl Into<String>, bracket: Bracket) -> Self {
        BracketEntry {
            bracket,
            entrant: entrant.into(),
            bracket_name: None,
            predicted_final_score: None,
            score: None,
        }
    }
}

/// A pool of competing bracket predictions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Group {
    pub entries: Vec<BracketEntry>,
}

impl Group {
    pub fn new(entries: Vec<BracketEntry>) -> Self {
        Group { entries }
    }

    /// Load every `*.json` entry file in a directory. Files are read in
    /// sorted filename order so the resulting group is stable.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            entries.push(crate::snapshot::load_entry(&path)?);
        }
        debug!(count = entries.len(), "loaded group entries");
        Ok(Group { entries })
    }

    /// Score every entry against `actual_bracket` and return the winner.
    pub fn score_all(&mut self, actual_bracket: &Bracket) -> Option<&BracketEntry> {
        for entry in &mut self.entries {
            entry.score = Some(actual_bracket.score(&entry.bracket));
        }
        self.winner()
    }

    /// Entry with the highest score. Ties resolve to the lexicographically
    /// smallest entrant name, so repeated calls always agree regardless of
    /// entry order. Unscored entries count as zero.
    pub fn winner(&self) -> Option<&BracketEntry> {
        let mut best: Option<&BracketEntry> = None;
        for entry in &self.entries {
            match best {
                Some(current)
                    if !beats(
                        (entry.score.unwrap_or(0.0), &entry.entrant),
                        (current.score.unwrap_or(0.0), &current.entrant),
                    ) => {}
                _ => best = Some(entry),
            }
        }
        best
    }
}

/// Max-score tie-break shared by [`Group::winner`] and the per-run winner
/// in [`SimGroup`]: higher score wins, equal scores go to the smaller
/// entrant name.
fn beats(challenger: (f64, &str), incumbent: (f64, &str)) -> bool {
    challenger.0 > incumbent.0 || (challenger.0 == incumbent.0 && challenger.1 < incumbent.1)
}

/// Group-level simulation summary: for each entrant, the average score
/// across all runs and the probability of being the run's winner.
#[derive(Clone, Debug)]
pub struct SimGroup {
    pub average_scores: HashMap<String, f64>,
    pub winner_prob: HashMap<String, f64>,
}

impl SimGroup {
    /// Simulate `sim_count` outcomes of `current_bracket` and score the
    /// whole group against each one, via the batch runner's per-run
    /// callback.
    pub fn run(
        group: &Group,
        current_bracket: &Bracket,
        model: WinModel,
        sim_count: usize,
        seed: u64,
    ) -> Self {
        let mut total_scores: HashMap<String, f64> = group
            .entries
            .iter()
            .map(|entry| (entry.entrant.clone(), 0.0))
            .collect();
        let mut win_counts: HashMap<String, u64> = group
            .entries
            .iter()
            .map(|entry| (entry.entrant.clone(), 0))
            .collect();

        let mut simulation = Simulation::new(current_bracket.clone(), model, sim_count);
        simulation.run_with_callback(seed, |simmed| {
            let mut run_winner: Option<(f64, &str)> = None;
            for entry in &group.entries {
                let entry_score = simmed.score(&entry.bracket);
                *total_scores.get_mut(&entry.entrant).expect("entrant seeded above") +=
                    entry_score;

                let challenger = (entry_score, entry.entrant.as_str());
                match run_winner {
                    Some(incumbent) if !beats(challenger, incumbent) => {}
                    _ => run_winner = Some(challenger),
                }
            }
            if let Some((_, entrant)) = run_winner {
                *win_counts.get_mut(entrant).expect("entrant seeded above") += 1;
            }
        });

        let runs = sim_count.max(1) as f64;
        SimGroup {
            average_scores: total_scores
                .into_iter()
                .map(|(entrant, total)| (entrant, total / runs))
                .collect(),
            winner_prob: win_counts
                .into_iter()
                .map(|(entrant, count)| (entrant, count as f64 / runs))
                .collect(),
        }
    }
}
