//! Anytime annealing over route orders.
//!
//! # Algorithm
//!
//! Each call to [`RouteOptimizer::step`] is one iteration:
//!
//! 1. Reverse a random segment of the current route
//! 2. Score the candidate with [`evaluate_route`] from the last committed
//!    departure position
//! 3. Accept if the score is higher, otherwise with probability
//!    `exp((candidate - current) / T)`
//! 4. Multiply `T` by the cooling factor, accepted or not
//!
//! The optimizer has no stopping state of its own; callers decide how many
//! iterations to run. It holds no per-iteration history, so memory stays
//! flat however long it runs.

use super::config::AnnealConfig;
use super::neighbor::{reverse_segment, Reversal};
use crate::catalog::{Item, Position};
use crate::route::{evaluate_route, RouteHorizon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability of moving from a route scoring `current` to one scoring `candidate`.
///
/// Higher scores are better. Candidates at least as good as the current
/// route are always accepted. At a non-positive temperature a strictly
/// worse candidate is never accepted.
///
/// # Examples
///
/// ```
/// use coin_route::anneal::acceptance_probability;
///
/// assert_eq!(acceptance_probability(12, 10, 1.0), 1.0);
/// assert_eq!(acceptance_probability(10, 10, 0.0), 1.0);
/// assert!((acceptance_probability(9, 10, 1.0) - (-1.0f64).exp()).abs() < 1e-12);
/// assert_eq!(acceptance_probability(9, 10, 0.0), 0.0);
/// ```
pub fn acceptance_probability(candidate: u64, current: u64, temperature: f64) -> f64 {
    if candidate >= current {
        return 1.0;
    }
    if temperature.is_nan() || temperature <= 0.0 {
        return 0.0;
    }
    let delta = candidate as f64 - current as f64;
    (delta / temperature).exp()
}

/// What one iteration did with its candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The candidate replaces the current route.
    Accepted {
        route: Vec<usize>,
        score: u64,
        /// Whether the candidate scored strictly higher.
        improving: bool,
        reversal: Reversal,
    },
    /// The candidate was discarded.
    Rejected { score: u64 },
    /// The route was too short to mutate.
    Skipped,
}

/// Sequential annealing state: temperature, random stream and counters.
///
/// The route itself is owned by the caller; each [`step`](Self::step)
/// receives a working copy and hands back the candidate when accepted.
#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    config: AnnealConfig,
    temperature: f64,
    rng: StdRng,
    iterations: usize,
    accepted_moves: usize,
    improving_moves: usize,
}

impl RouteOptimizer {
    /// Creates an optimizer at the configured initial temperature.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`AnnealConfig::validate`]
    /// first to get a descriptive error).
    pub fn new(config: &AnnealConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("invalid AnnealConfig: {e}");
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        Self {
            config: config.clone(),
            temperature: config.initial_temperature,
            rng,
            iterations: 0,
            accepted_moves: 0,
            improving_moves: 0,
        }
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Total iterations run, including skipped ones.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Accepted candidates, improving ones included.
    pub fn accepted_moves(&self) -> usize {
        self.accepted_moves
    }

    pub fn improving_moves(&self) -> usize {
        self.improving_moves
    }

    /// Runs one iteration against a working copy of the route.
    ///
    /// `working` is consumed as the candidate buffer. `current_score` must be
    /// `evaluate_route(items, start, working, horizon)` for the unmodified
    /// copy.
    pub fn step(
        &mut self,
        items: &[Item],
        start: Position,
        mut working: Vec<usize>,
        current_score: u64,
        horizon: &RouteHorizon,
    ) -> IterationOutcome {
        let outcome = match reverse_segment(&mut working, &mut self.rng) {
            None => IterationOutcome::Skipped,
            Some(reversal) => {
                let score = evaluate_route(items, start, &working, horizon);
                let probability = acceptance_probability(score, current_score, self.temperature);

                if probability > self.rng.random::<f64>() {
                    let improving = score > current_score;
                    self.accepted_moves += 1;
                    if improving {
                        self.improving_moves += 1;
                    }
                    IterationOutcome::Accepted {
                        route: working,
                        score,
                        improving,
                        reversal,
                    }
                } else {
                    IterationOutcome::Rejected { score }
                }
            }
        };

        self.iterations += 1;
        self.cool();
        outcome
    }

    /// Geometric cooling. Subnormal temperatures would stop shrinking under
    /// rounding, so they collapse to exactly zero.
    fn cool(&mut self) {
        let next = self.temperature * self.config.cooling_factor;
        self.temperature = if next < f64::MIN_POSITIVE { 0.0 } else { next };
    }

    /// Runs `count` iterations on a route the caller owns outright.
    ///
    /// `route` and `score` are replaced on every acceptance.
    pub fn run_iterations(
        &mut self,
        items: &[Item],
        start: Position,
        route: &mut Vec<usize>,
        score: &mut u64,
        horizon: &RouteHorizon,
        count: usize,
    ) {
        for _ in 0..count {
            if let IterationOutcome::Accepted {
                route: candidate,
                score: candidate_score,
                ..
            } = self.step(items, start, route.clone(), *score, horizon)
            {
                *route = candidate;
                *score = candidate_score;
            }
        }
    }
}
