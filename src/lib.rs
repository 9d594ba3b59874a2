//! Bracket Core - single-elimination tournament simulation and scoring.
//!
//! The crate models a tournament bracket as a flat, round-ordered game
//! tree, plays out undecided games with pluggable win-probability models,
//! aggregates per-game outcome distributions over Monte Carlo batches, and
//! scores pools of predicted brackets against the simulated outcomes.
//! Ratings acquisition, plotting and dashboards live outside this crate
//! and only consume its public types.

pub mod bracket;
pub mod constants;
pub mod error;
pub mod group;
pub mod overrides;
pub mod ratings;
pub mod simulation;
pub mod snapshot;
pub mod team;
pub mod win_prob;

pub use bracket::{Bracket, Game};
pub use constants::{AVG_TEMPO, BASE_POINTS, DEFAULT_MARGIN_STDDEV, DEFAULT_SCALE_FACTOR};
pub use error::ConfigError;
pub use group::{BracketEntry, Group, SimGroup};
pub use overrides::OverridesMap;
pub use ratings::RatingsTable;
pub use simulation::{sim, Simulation};
pub use team::Team;
pub use win_prob::{logistic_win_prob, normal_margin_win_prob, WinModel};
