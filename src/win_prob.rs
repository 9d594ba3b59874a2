use rand::Rng;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::bracket::{Bracket, Game};
use crate::constants::{AVG_TEMPO, DEFAULT_MARGIN_STDDEV, DEFAULT_SCALE_FACTOR};
use crate::overrides::OverridesMap;
use crate::team::Team;

/// Win-probability model used to decide a single game.
///
/// Deterministic variants always return the same winner for the same
/// matchup; stochastic variants compute a probability for the first team
/// and draw one uniform value against it.
#[derive(Clone, Debug)]
pub enum WinModel {
    /// Coin flip, ignores team data.
    Random,

    /// Larger strength rating wins. Ties go to the first team.
    HigherRatingWins,

    /// Lower seed number wins (1 beats 16). Ties go to the first team.
    BetterSeedWins,

    /// Logistic curve over the rating differential, scaled by tempo and an
    /// externally-fitted scale factor.
    Logistic {
        scale_factor: f64,
        overrides: Option<OverridesMap>,
    },

    /// Normal CDF over the predicted scoring margin. Slower than
    /// `Logistic`; kept for comparison runs.
    NormalMargin {
        stddev: f64,
        overrides: Option<OverridesMap>,
    },
}

impl WinModel {
    pub fn logistic() -> Self {
        WinModel::Logistic {
            scale_factor: DEFAULT_SCALE_FACTOR,
            overrides: None,
        }
    }

    pub fn normal_margin() -> Self {
        WinModel::NormalMargin {
            stddev: DEFAULT_MARGIN_STDDEV,
            overrides: None,
        }
    }

    /// Decide `game`, returning the winning team index.
    ///
    /// Both participant slots must be populated; ratings must already be
    /// applied for the rating-based variants.
    pub fn pick_winner<R: Rng>(&self, game: &Game, bracket: &Bracket, rng: &mut R) -> usize {
        let index1 = game
            .team1_index
            .unwrap_or_else(|| panic!("game {} has no first participant", game.game_id));
        let index2 = game
            .team2_index
            .unwrap_or_else(|| panic!("game {} has no second participant", game.game_id));
        let team1 = &bracket.teams[index1];
        let team2 = &bracket.teams[index2];

        match self {
            WinModel::Random => {
                if rng.gen::<f64>() < 0.5 {
                    index1
                } else {
                    index2
                }
            }
            WinModel::HigherRatingWins => {
                if rating_of(team1) >= rating_of(team2) {
                    index1
                } else {
                    index2
                }
            }
            WinModel::BetterSeedWins => {
                if team1.seed <= team2.seed {
                    index1
                } else {
                    index2
                }
            }
            WinModel::Logistic {
                scale_factor,
                overrides,
            } => {
                let prob = override_or(overrides, team1, team2, || {
                    logistic_win_prob(rating_of(team1), rating_of(team2), *scale_factor)
                });
                if rng.gen::<f64>() < prob {
                    index1
                } else {
                    index2
                }
            }
            WinModel::NormalMargin { stddev, overrides } => {
                let prob = override_or(overrides, team1, team2, || {
                    normal_margin_win_prob(rating_of(team1), rating_of(team2), *stddev)
                });
                if rng.gen::<f64>() < prob {
                    index1
                } else {
                    index2
                }
            }
        }
    }
}

fn rating_of(team: &Team) -> f64 {
    team.rating
        .unwrap_or_else(|| panic!("team {:?} has no rating; apply ratings before simulating", team.name))
}

fn override_or(
    overrides: &Option<OverridesMap>,
    team1: &Team,
    team2: &Team,
    compute: impl FnOnce() -> f64,
) -> f64 {
    overrides
        .as_ref()
        .and_then(|map| map.get(&team1.name, &team2.name))
        .unwrap_or_else(compute)
}

/// Probability that a team rated `rating1` beats one rated `rating2` under
/// the logistic model: `1 / (1 + 10^(margin / scale_factor))` where the
/// margin is the rating gap scaled by tempo.
pub fn logistic_win_prob(rating1: f64, rating2: f64, scale_factor: f64) -> f64 {
    let team2_margin = (rating2 - rating1) * (AVG_TEMPO / 100.0);
    1.0 / (1.0 + 10f64.powf(team2_margin / scale_factor))
}

/// Probability that a team rated `rating1` beats one rated `rating2` using
/// a normal CDF over the predicted margin:
/// `1 - CDF(0; mean = rating1 - rating2, std = stddev)`.
pub fn normal_margin_win_prob(rating1: f64, rating2: f64, stddev: f64) -> f64 {
    let predicted_margin = rating1 - rating2;
    let normal = Normal::new(0.0, 1.0).unwrap();
    1.0 - normal.cdf((0.0 - predicted_margin) / stddev)
}
