use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::bracket::Bracket;
use crate::win_prob::WinModel;

/// Play out every undecided game in one forward pass.
///
/// Games are stored in round order, so by the time the pass reaches a game
/// its participants have already been filled in by earlier advancements.
/// The input bracket is never touched; a fully-decided bracket comes back
/// as an identical clone.
pub fn sim<R: Rng>(bracket: &Bracket, model: &WinModel, rng: &mut R) -> Bracket {
    let mut simmed = bracket.clone();
    for game_id in 0..simmed.games.len() {
        let winner = {
            let game = &simmed.games[game_id];
            if game.is_decided() || !game.has_both_participants() {
                continue;
            }
            model.pick_winner(game, &simmed, rng)
        };
        simmed.advance_winner(game_id, winner);
    }
    simmed
}

/// Batch Monte Carlo runner.
///
/// Every run starts from a fresh clone of the same input bracket and uses
/// its own ChaCha8 generator seeded from the master seed, so serial and
/// parallel execution produce identical counters and any batch can be
/// replayed exactly.
pub struct Simulation {
    bracket: Bracket,
    model: WinModel,
    sim_count: usize,
    /// Per game id: winning team index -> number of runs it won.
    results: Vec<HashMap<usize, u64>>,
    completed_runs: u64,
}

impl Simulation {
    pub fn new(bracket: Bracket, model: WinModel, sim_count: usize) -> Self {
        let num_games = bracket.games.len();
        Simulation {
            bracket,
            model,
            sim_count,
            results: vec![HashMap::new(); num_games],
            completed_runs: 0,
        }
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn sim_count(&self) -> usize {
        self.sim_count
    }

    /// Run `sim_count` independent simulations serially.
    pub fn run(&mut self, seed: u64) {
        self.run_with_callback(seed, |_| {});
    }

    /// Serial batch with a per-run hook.
    ///
    /// The callback sees each run's fully-decided bracket, which lets
    /// callers layer their own aggregation (group scoring, say) on top of a
    /// single batch instead of re-simulating.
    pub fn run_with_callback<F: FnMut(&Bracket)>(&mut self, seed: u64, mut callback: F) {
        debug!(sim_count = self.sim_count, seed, "running simulation batch");

        for (run, run_seed) in self.run_seeds(seed).into_iter().enumerate() {
            trace!(run, "simulating");
            let mut rng = ChaCha8Rng::seed_from_u64(run_seed);
            let simmed = sim(&self.bracket, &self.model, &mut rng);
            record(&mut self.results, &simmed);
            self.completed_runs += 1;
            callback(&simmed);
        }
    }

    /// Parallel batch. Counters merge by addition, so the totals are
    /// identical to a serial run with the same seed.
    pub fn run_parallel(&mut self, seed: u64) {
        debug!(sim_count = self.sim_count, seed, "running parallel simulation batch");
        let num_games = self.bracket.games.len();

        let counts = self
            .run_seeds(seed)
            .into_par_iter()
            .fold(
                || vec![HashMap::new(); num_games],
                |mut acc, run_seed| {
                    let mut rng = ChaCha8Rng::seed_from_u64(run_seed);
                    let simmed = sim(&self.bracket, &self.model, &mut rng);
                    record(&mut acc, &simmed);
                    acc
                },
            )
            .reduce(|| vec![HashMap::new(); num_games], merge);

        for (totals, partial) in self.results.iter_mut().zip(counts) {
            for (winner, count) in partial {
                *totals.entry(winner).or_insert(0) += count;
            }
        }
        self.completed_runs += self.sim_count as u64;
    }

    /// Clear accumulated counters so the runner can be reused for an
    /// independent batch.
    pub fn reset(&mut self) {
        for counter in &mut self.results {
            counter.clear();
        }
        self.completed_runs = 0;
    }

    /// Empirical outcome distribution for one game: `(team name, frequency)`
    /// sorted by descending frequency, ties by team index.
    pub fn results(&self, game_id: usize) -> Vec<(String, f64)> {
        let mut counts: Vec<(usize, u64)> = self.results[game_id]
            .iter()
            .map(|(&winner, &count)| (winner, count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let total = self.completed_runs.max(1) as f64;
        counts
            .into_iter()
            .map(|(winner, count)| (self.bracket.teams[winner].name.clone(), count as f64 / total))
            .collect()
    }

    /// Human-readable distribution for a game, optionally collapsing the
    /// tail past `cutoff` into an `<others>` line.
    pub fn pretty_results(&self, game_id: usize, cutoff: Option<usize>) -> String {
        let results = self.results(game_id);
        let cutoff = cutoff.unwrap_or(results.len());

        let mut out = String::new();
        for (name, freq) in results.iter().take(cutoff) {
            out.push_str(&format!("{}: {:.1}%\n", name, freq * 100.0));
        }
        if results.len() > cutoff {
            let rest: f64 = results[cutoff..].iter().map(|(_, freq)| freq).sum();
            out.push_str(&format!("<others>: {:.1}%", rest * 100.0));
        }
        out.trim_end().to_string()
    }

    /// Most frequent outcome for a game, formatted like `pretty_results`.
    pub fn most_likely_result(&self, game_id: usize) -> Option<String> {
        let (name, freq) = self.results(game_id).into_iter().next()?;
        Some(format!("{}: {:.1}%", name, freq * 100.0))
    }

    fn run_seeds(&self, seed: u64) -> Vec<u64> {
        let mut master = ChaCha8Rng::seed_from_u64(seed);
        (0..self.sim_count).map(|_| master.gen()).collect()
    }
}

fn record(results: &mut [HashMap<usize, u64>], simmed: &Bracket) {
    for game in &simmed.games {
        if let Some(winner) = game.winner_index {
            *results[game.game_id].entry(winner).or_insert(0) += 1;
        }
    }
}

fn merge(mut left: Vec<HashMap<usize, u64>>, right: Vec<HashMap<usize, u64>>) -> Vec<HashMap<usize, u64>> {
    for (totals, partial) in left.iter_mut().zip(right) {
        for (winner, count) in partial {
            *totals.entry(winner).or_insert(0) += count;
        }
    }
    left
}
