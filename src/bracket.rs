use serde::{Deserialize, Serialize};

use crate::constants::BASE_POINTS;
use crate::error::ConfigError;
use crate::ratings::RatingsTable;
use crate::team::Team;

/// One matchup node in the elimination tree.
///
/// Participant slots hold indices into the bracket's team list and stay
/// `None` until the feeding games are decided. Once set, `winner_index` is
/// always one of the two participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: usize,

    /// Number of teams remaining when this game's round begins: N for the
    /// first round down to 2 for the championship.
    pub round_of: usize,

    #[serde(default)]
    pub team1_index: Option<usize>,
    #[serde(default)]
    pub team2_index: Option<usize>,
    #[serde(default)]
    pub winner_index: Option<usize>,
}

impl Game {
    pub fn is_decided(&self) -> bool {
        self.winner_index.is_some()
    }

    pub fn has_both_participants(&self) -> bool {
        self.team1_index.is_some() && self.team2_index.is_some()
    }
}

/// The full single-elimination tree: teams plus a flat, round-ordered game
/// list.
///
/// The game list's shape is fixed at construction; only winner and
/// participant slots mutate afterwards. `Clone` is a deep copy, so a clone
/// can be simulated forward without touching the original.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub teams: Vec<Team>,
    pub games: Vec<Game>,
}

impl Bracket {
    /// Build a bracket from a team list whose length is a power of two.
    ///
    /// For N teams this generates N-1 games in round order: N/2 games at
    /// round_of N, then N/4 at round_of N/2, down to the single
    /// championship game at round_of 2. First-round game `i` is seeded with
    /// teams `2i` and `2i+1`; every later game starts with empty slots.
    pub fn new(mut teams: Vec<Team>) -> Result<Self, ConfigError> {
        let num_teams = teams.len();
        if num_teams == 0 {
            return Err(ConfigError::EmptyBracket);
        }
        if !num_teams.is_power_of_two() || num_teams < 2 {
            return Err(ConfigError::TeamCountNotPowerOfTwo(num_teams));
        }

        for (index, team) in teams.iter_mut().enumerate() {
            team.index = index;
        }

        let mut games = Vec::with_capacity(num_teams - 1);
        let mut round_of = num_teams;
        let mut game_id = 0;
        while round_of >= 2 {
            for _ in 0..round_of / 2 {
                games.push(Game {
                    game_id,
                    round_of,
                    team1_index: None,
                    team2_index: None,
                    winner_index: None,
                });
                game_id += 1;
            }
            round_of /= 2;
        }

        for index in 0..num_teams / 2 {
            games[index].team1_index = Some(index * 2);
            games[index].team2_index = Some(index * 2 + 1);
        }

        Ok(Bracket { teams, games })
    }

    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    /// First game id of the round with the given `round_of`.
    ///
    /// Rounds are laid out consecutively, so for N teams the round-of-R
    /// games start at N - R (for 64 teams: 64->0, 32->32, 16->48, 8->56,
    /// 4->60, 2->62).
    fn round_start(&self, round_of: usize) -> usize {
        self.num_teams() - round_of
    }

    /// Record `winner_index` as the winner of `game_id` and place it into
    /// the next round's game.
    ///
    /// The winner must be one of the game's two populated participant
    /// slots; anything else is a caller bug and panics before any state is
    /// touched. Calling twice with the same winner just re-sets the same
    /// values.
    pub fn advance_winner(&mut self, game_id: usize, winner_index: usize) {
        let game = &self.games[game_id];
        assert!(
            game.has_both_participants(),
            "game {game_id} does not have both participants yet"
        );
        assert!(
            game.team1_index == Some(winner_index) || game.team2_index == Some(winner_index),
            "team {winner_index} is not a participant of game {game_id}"
        );

        let round_of = game.round_of;
        self.games[game_id].winner_index = Some(winner_index);

        // round_of 2 is the championship; 1 would mean the tournament is
        // already over. Either way there is no next game.
        if round_of <= 2 {
            return;
        }

        let pos = game_id - self.round_start(round_of);
        let target = self.round_start(round_of / 2) + pos / 2;
        if pos % 2 == 0 {
            self.games[target].team1_index = Some(winner_index);
        } else {
            self.games[target].team2_index = Some(winner_index);
        }
    }

    pub fn undecided_games(&self) -> Vec<&Game> {
        self.games.iter().filter(|game| !game.is_decided()).collect()
    }

    /// Largest round_of among undecided games, i.e. the earliest round still
    /// in progress. `None` once every game is decided.
    pub fn current_round_of(&self) -> Option<usize> {
        self.undecided_games()
            .iter()
            .map(|game| game.round_of)
            .max()
    }

    pub fn current_round_games(&self) -> Vec<&Game> {
        match self.current_round_of() {
            Some(round_of) => self
                .undecided_games()
                .into_iter()
                .filter(|game| game.round_of == round_of)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Winner of the championship game, once decided.
    pub fn champion(&self) -> Option<&Team> {
        let final_game = self.games.last()?;
        final_game.winner_index.map(|index| &self.teams[index])
    }

    /// Agreement score between this bracket and another with the same
    /// structure.
    ///
    /// Each game where both winners are set and equal is worth
    /// `BASE_POINTS / round_of`; a game undecided in either bracket scores
    /// nothing. Symmetric: `a.score(&b) == b.score(&a)`.
    pub fn score(&self, other: &Bracket) -> f64 {
        self.games
            .iter()
            .zip(&other.games)
            .filter(|(mine, theirs)| {
                mine.winner_index.is_some() && mine.winner_index == theirs.winner_index
            })
            .map(|(mine, _)| BASE_POINTS / mine.round_of as f64)
            .sum()
    }

    /// Fill in every team's rating from the provider table.
    ///
    /// Rating data must be complete: any team whose rating key is absent
    /// from the table fails the whole enrichment.
    pub fn apply_ratings(&mut self, ratings: &RatingsTable) -> Result<(), ConfigError> {
        for team in &mut self.teams {
            match ratings.get(team.rating_key()) {
                Some(rating) => team.rating = Some(rating),
                None => return Err(ConfigError::MissingRating(team.rating_key().to_string())),
            }
        }
        Ok(())
    }

    /// Shape check for brackets read back from a snapshot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let num_teams = self.teams.len();
        if num_teams == 0 {
            return Err(ConfigError::EmptyBracket);
        }
        if !num_teams.is_power_of_two() || num_teams < 2 {
            return Err(ConfigError::TeamCountNotPowerOfTwo(num_teams));
        }
        if self.games.len() != num_teams - 1 {
            return Err(ConfigError::MalformedSnapshot(format!(
                "expected {} games for {} teams, found {}",
                num_teams - 1,
                num_teams,
                self.games.len()
            )));
        }

        for (index, team) in self.teams.iter().enumerate() {
            if team.index != index {
                return Err(ConfigError::MalformedSnapshot(format!(
                    "team {:?} stored at position {} but carries index {}",
                    team.name, index, team.index
                )));
            }
        }

        let mut expected_round_of = num_teams;
        let mut games_left_in_round = num_teams / 2;
        for (position, game) in self.games.iter().enumerate() {
            if game.game_id != position {
                return Err(ConfigError::MalformedSnapshot(format!(
                    "game at position {position} has id {}",
                    game.game_id
                )));
            }
            if game.round_of != expected_round_of {
                return Err(ConfigError::MalformedSnapshot(format!(
                    "game {position} has round_of {}, expected {expected_round_of}",
                    game.round_of
                )));
            }
            for slot in [game.team1_index, game.team2_index, game.winner_index] {
                if let Some(index) = slot {
                    if index >= num_teams {
                        return Err(ConfigError::MalformedSnapshot(format!(
                            "game {position} references team index {index} out of range"
                        )));
                    }
                }
            }
            if let Some(winner) = game.winner_index {
                if game.team1_index != Some(winner) && game.team2_index != Some(winner) {
                    return Err(ConfigError::MalformedSnapshot(format!(
                        "game {position} winner {winner} is not a participant"
                    )));
                }
            }

            games_left_in_round -= 1;
            if games_left_in_round == 0 {
                expected_round_of /= 2;
                games_left_in_round = expected_round_of / 2;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn make_teams(count: usize) -> Vec<Team> {
        (0..count)
            .map(|i| Team::new(format!("Team{i}"), (i % 16) as u32 + 1, "East"))
            .collect()
    }

    #[test]
    fn four_team_structure() {
        let bracket = Bracket::new(make_teams(4)).unwrap();
        assert_eq!(bracket.games.len(), 3);
        assert_eq!(
            bracket.games.iter().map(|g| g.round_of).collect::<Vec<_>>(),
            vec![4, 4, 2]
        );
        assert_eq!(bracket.games[0].team1_index, Some(0));
        assert_eq!(bracket.games[0].team2_index, Some(1));
        assert_eq!(bracket.games[1].team1_index, Some(2));
        assert_eq!(bracket.games[1].team2_index, Some(3));
        assert!(!bracket.games[2].has_both_participants());
    }

    #[test]
    fn sixty_four_team_round_offsets() {
        let bracket = Bracket::new(make_teams(64)).unwrap();
        assert_eq!(bracket.games.len(), 63);
        for (round_of, start) in [(64, 0), (32, 32), (16, 48), (8, 56), (4, 60), (2, 62)] {
            assert_eq!(bracket.games[start].round_of, round_of);
            assert_eq!(bracket.round_start(round_of), start);
        }
    }

    #[test]
    fn rejects_bad_team_counts() {
        assert!(matches!(
            Bracket::new(Vec::new()),
            Err(ConfigError::EmptyBracket)
        ));
        assert!(matches!(
            Bracket::new(make_teams(6)),
            Err(ConfigError::TeamCountNotPowerOfTwo(6))
        ));
        assert!(matches!(
            Bracket::new(make_teams(1)),
            Err(ConfigError::TeamCountNotPowerOfTwo(1))
        ));
    }

    #[test]
    fn advance_winner_populates_next_round() {
        let mut bracket = Bracket::new(make_teams(8)).unwrap();
        bracket.advance_winner(0, 1);
        bracket.advance_winner(1, 2);
        bracket.advance_winner(2, 4);
        bracket.advance_winner(3, 7);

        assert_eq!(bracket.games[4].team1_index, Some(1));
        assert_eq!(bracket.games[4].team2_index, Some(2));
        assert_eq!(bracket.games[5].team1_index, Some(4));
        assert_eq!(bracket.games[5].team2_index, Some(7));

        bracket.advance_winner(4, 2);
        bracket.advance_winner(5, 7);
        assert_eq!(bracket.games[6].team1_index, Some(2));
        assert_eq!(bracket.games[6].team2_index, Some(7));

        bracket.advance_winner(6, 7);
        assert_eq!(bracket.champion().unwrap().index, 7);
        assert_eq!(bracket.current_round_of(), None);
    }

    #[test]
    fn advance_winner_is_idempotent() {
        let mut bracket = Bracket::new(make_teams(4)).unwrap();
        bracket.advance_winner(0, 0);
        let after_first = bracket.clone();
        bracket.advance_winner(0, 0);
        assert_eq!(bracket, after_first);
    }

    #[test]
    #[should_panic(expected = "not a participant")]
    fn advance_winner_rejects_non_participant() {
        let mut bracket = Bracket::new(make_teams(4)).unwrap();
        bracket.advance_winner(0, 3);
    }

    #[test]
    #[should_panic(expected = "does not have both participants")]
    fn advance_winner_rejects_unpopulated_game() {
        let mut bracket = Bracket::new(make_teams(4)).unwrap();
        bracket.advance_winner(2, 0);
    }

    #[test]
    fn failed_advance_leaves_state_untouched() {
        let mut bracket = Bracket::new(make_teams(4)).unwrap();
        bracket.advance_winner(0, 0);
        let before = bracket.clone();

        let result = catch_unwind(AssertUnwindSafe(|| bracket.advance_winner(1, 0)));
        assert!(result.is_err());
        assert_eq!(bracket, before);
    }

    #[test]
    fn current_round_tracks_progress() {
        let mut bracket = Bracket::new(make_teams(4)).unwrap();
        assert_eq!(bracket.current_round_of(), Some(4));
        assert_eq!(bracket.current_round_games().len(), 2);

        bracket.advance_winner(0, 0);
        assert_eq!(bracket.current_round_of(), Some(4));
        assert_eq!(bracket.current_round_games().len(), 1);

        bracket.advance_winner(1, 2);
        assert_eq!(bracket.current_round_of(), Some(2));
        assert_eq!(bracket.current_round_games().len(), 1);

        bracket.advance_winner(2, 0);
        assert_eq!(bracket.current_round_of(), None);
        assert!(bracket.current_round_games().is_empty());
    }

    #[test]
    fn clone_is_independent() {
        let original = Bracket::new(make_teams(4)).unwrap();
        let mut copy = original.clone();
        copy.advance_winner(0, 1);
        copy.teams[0].rating = Some(99.0);

        assert_eq!(original.games[0].winner_index, None);
        assert_eq!(original.games[2].team1_index, None);
        assert_eq!(original.teams[0].rating, None);
    }

    fn fully_decided(num_teams: usize) -> Bracket {
        let mut bracket = Bracket::new(make_teams(num_teams)).unwrap();
        for id in 0..bracket.games.len() {
            let winner = bracket.games[id].team1_index.unwrap();
            bracket.advance_winner(id, winner);
        }
        bracket
    }

    #[test]
    fn bracket_matches_itself_perfectly() {
        let bracket = fully_decided(8);
        let expected: f64 = bracket
            .games
            .iter()
            .map(|game| BASE_POINTS / game.round_of as f64)
            .sum();
        assert_eq!(bracket.score(&bracket), expected);
        // 4 * 80 + 2 * 160 + 320
        assert_eq!(expected, 960.0);
    }

    #[test]
    fn score_is_symmetric_and_ignores_undecided() {
        let decided = fully_decided(4);
        let mut partial = Bracket::new(make_teams(4)).unwrap();
        partial.advance_winner(0, 0);

        assert_eq!(decided.score(&partial), partial.score(&decided));
        // Only game 0 agrees; games 1 and 2 are undecided in `partial`.
        assert_eq!(decided.score(&partial), 160.0);

        let empty = Bracket::new(make_teams(4)).unwrap();
        assert_eq!(empty.score(&empty), 0.0, "None/None must not score");
    }

    #[test]
    fn validate_accepts_fresh_and_decided_brackets() {
        Bracket::new(make_teams(16)).unwrap().validate().unwrap();
        fully_decided(16).validate().unwrap();
    }

    #[test]
    fn validate_rejects_tampered_snapshots() {
        let mut truncated = Bracket::new(make_teams(8)).unwrap();
        truncated.games.pop();
        assert!(truncated.validate().is_err());

        let mut bad_winner = fully_decided(4);
        bad_winner.games[0].winner_index = Some(3);
        assert!(bad_winner.validate().is_err());

        let mut bad_round = Bracket::new(make_teams(4)).unwrap();
        bad_round.games[2].round_of = 4;
        assert!(bad_round.validate().is_err());
    }

    proptest! {
        #[test]
        fn structure_holds_for_any_power_of_two(exponent in 1u32..=7) {
            let num_teams = 2usize.pow(exponent);
            let bracket = Bracket::new(make_teams(num_teams)).unwrap();

            prop_assert_eq!(bracket.games.len(), num_teams - 1);

            let mut expected_round_of = num_teams;
            let mut seen = 0;
            while expected_round_of >= 2 {
                for offset in 0..expected_round_of / 2 {
                    prop_assert_eq!(bracket.games[seen + offset].round_of, expected_round_of);
                }
                seen += expected_round_of / 2;
                expected_round_of /= 2;
            }

            // First round covers every team index exactly once, in order.
            let mut covered = Vec::new();
            for game in &bracket.games[..num_teams / 2] {
                covered.push(game.team1_index.unwrap());
                covered.push(game.team2_index.unwrap());
            }
            prop_assert_eq!(covered, (0..num_teams).collect::<Vec<_>>());
        }
    }
}
