/// Total points available to a game is `BASE_POINTS / round_of`.
///
/// 640 makes a round-of-64 game worth 10 points and the championship worth
/// 320, doubling every round.
pub const BASE_POINTS: f64 = 640.0;

/// Average tempo (possessions per 40 minutes) for college basketball.
pub const AVG_TEMPO: f64 = 70.0;

/// Logistic-curve scale factor, fit offline against historical
/// spread-to-win-probability data. Externally supplied configuration, not a
/// derived invariant.
pub const DEFAULT_SCALE_FACTOR: f64 = 13.742;

/// Standard deviation of the scoring margin used by the normal-margin model.
pub const DEFAULT_MARGIN_STDDEV: f64 = 11.0;
