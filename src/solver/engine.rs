//! Thread-safe solver: target cursor plus anytime optimizer.

use super::events::{EventLog, ScoreEvent};
use super::report::{OptimizeReport, SolverStatistics};
use super::state::RouteState;
use crate::anneal::{AnnealConfig, IterationOutcome, RouteOptimizer};
use crate::catalog::{Item, Position};
use crate::error::SolverError;
use crate::route::{build_greedy, reachable_prefix, RouteHorizon};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, trace};

/// Items and horizon, fixed at initialization.
#[derive(Debug)]
struct Problem {
    items: Vec<Item>,
    horizon: RouteHorizon,
}

/// Route solver shared by a foreground cursor and a background optimizer.
///
/// The foreground actor calls [`advance_target`](Self::advance_target)
/// whenever the agent reaches its target; a background thread feeds CPU
/// time through [`run_optimization_iterations`](Self::run_optimization_iterations).
///
/// Each optimizer iteration copies the route under the lock, works on the
/// copy unlocked, then publishes the candidate only if no pop happened in
/// between. A pop holds the lock for its whole read-remove-return sequence,
/// so it always sees a complete route. Optimizer runs are serialized by a
/// second lock, keeping temperature and score a single sequential chain.
///
/// # Examples
///
/// ```
/// use coin_route::anneal::AnnealConfig;
/// use coin_route::catalog::{generate, CatalogConfig, Position};
/// use coin_route::solver::CoinSolver;
///
/// let items = generate(&CatalogConfig::default().with_count(20)).unwrap();
/// let solver = CoinSolver::new(AnnealConfig::default().with_seed(1)).unwrap();
/// solver.initialize(items, Position::new(0, 0), 10.0, 6.0).unwrap();
///
/// solver.run_iterations(1_000).unwrap();
/// let first = solver.advance_target().unwrap();
/// assert_eq!(solver.current_target(), Some(first));
/// assert_eq!(solver.remaining_items().len(), 19);
/// ```
#[derive(Debug)]
pub struct CoinSolver {
    problem: OnceLock<Problem>,
    state: Mutex<Option<RouteState>>,
    optimizer: Mutex<RouteOptimizer>,
    events: Mutex<EventLog>,
    iterations: AtomicUsize,
    accepted_moves: AtomicUsize,
    improving_moves: AtomicUsize,
    temperature_bits: AtomicU64,
}

impl CoinSolver {
    /// Creates an uninitialized solver.
    ///
    /// # Errors
    ///
    /// [`SolverError::InvalidConfig`] if the annealing config is invalid.
    pub fn new(config: AnnealConfig) -> Result<Self, SolverError> {
        config.validate().map_err(SolverError::InvalidConfig)?;
        let optimizer = RouteOptimizer::new(&config);
        Ok(Self {
            problem: OnceLock::new(),
            state: Mutex::new(None),
            temperature_bits: AtomicU64::new(optimizer.temperature().to_bits()),
            optimizer: Mutex::new(optimizer),
            events: Mutex::new(EventLog::default()),
            iterations: AtomicUsize::new(0),
            accepted_moves: AtomicUsize::new(0),
            improving_moves: AtomicUsize::new(0),
        })
    }

    /// One-time setup: validates the items and builds the greedy route.
    ///
    /// # Errors
    ///
    /// - [`SolverError::AlreadyInitialized`] on a second call
    /// - [`SolverError::InvalidConfig`] for a negative/NaN `time_limit` or a
    ///   non-positive `speed_factor`
    /// - [`SolverError::DuplicateId`], [`SolverError::DuplicatePosition`] or
    ///   [`SolverError::ZeroScore`] for an inconsistent item set
    pub fn initialize(
        &self,
        items: Vec<Item>,
        start: Position,
        time_limit: f64,
        speed_factor: f64,
    ) -> Result<(), SolverError> {
        let mut guard = self.state.lock();
        if guard.is_some() {
            return Err(SolverError::AlreadyInitialized);
        }

        let horizon = RouteHorizon::new(time_limit, speed_factor);
        horizon.validate().map_err(SolverError::InvalidConfig)?;
        check_items(&items)?;

        let route = build_greedy(start, &items);
        let state = RouteState::new(&items, start, route, &horizon);
        info!(
            items = items.len(),
            %start,
            time_limit,
            speed_factor,
            score = state.score,
            "Solver initialized with greedy route"
        );

        self.problem
            .set(Problem { items, horizon })
            .map_err(|_| SolverError::AlreadyInitialized)?;
        *guard = Some(state);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.problem.get().is_some()
    }

    /// Collects the current target and hands out the next one.
    ///
    /// Queues a [`ScoreEvent`] for the previous target, if any, then pops the
    /// route head. The call that finds the route empty still reports the
    /// last target's score before failing.
    ///
    /// # Errors
    ///
    /// - [`SolverError::NotInitialized`] before [`initialize`](Self::initialize)
    /// - [`SolverError::Exhausted`] once no items remain
    pub fn advance_target(&self) -> Result<Item, SolverError> {
        let problem = self.problem()?;
        let mut guard = self.state.lock();
        let state = guard.as_mut().ok_or(SolverError::NotInitialized)?;

        let pop = state.pop_next(&problem.items, &problem.horizon);
        if let Some(index) = pop.acquired {
            let item = &problem.items[index];
            let event = self.events.lock().push(item.id, item.score);
            debug!(
                item = %item.id,
                score = item.score,
                sequence = event.sequence,
                total = state.acquired_total,
                "Score acquired"
            );
        }

        match pop.next {
            Some(index) => {
                let item = problem.items[index].clone();
                debug!(
                    item = %item.id,
                    position = %item.position,
                    remaining = state.route.len(),
                    reachable = reachable_prefix(
                        &problem.items,
                        state.position,
                        &state.route,
                        &problem.horizon
                    ),
                    route_score = state.score,
                    "Next target"
                );
                Ok(item)
            }
            None => Err(SolverError::Exhausted),
        }
    }

    /// The item most recently handed out and not yet collected.
    pub fn current_target(&self) -> Option<Item> {
        let problem = self.problem.get()?;
        let guard = self.state.lock();
        let index = guard.as_ref()?.current_target?;
        Some(problem.items[index].clone())
    }

    /// Snapshot of the planned visiting order, excluding the current target.
    pub fn remaining_items(&self) -> Vec<Item> {
        let Some(problem) = self.problem.get() else {
            return Vec::new();
        };
        let guard = self.state.lock();
        guard
            .as_ref()
            .map(|state| {
                state
                    .route
                    .iter()
                    .map(|&index| problem.items[index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Departure position the remaining route is scored from.
    pub fn current_position(&self) -> Option<Position> {
        self.state.lock().as_ref().map(|state| state.position)
    }

    /// Time horizon the route is scored against.
    pub fn horizon(&self) -> Option<RouteHorizon> {
        self.problem.get().map(|problem| problem.horizon)
    }

    /// Takes every queued score event, oldest first.
    pub fn drain_score_events(&self) -> Vec<ScoreEvent> {
        self.events.lock().drain()
    }

    /// Registers a channel that receives every future score event in order.
    pub fn subscribe(&self) -> Receiver<ScoreEvent> {
        self.events.lock().subscribe()
    }

    pub fn statistics(&self) -> SolverStatistics {
        let guard = self.state.lock();
        let (current_score, remaining, pops, acquired_total) = guard
            .as_ref()
            .map(|s| (s.score, s.route.len(), s.pops, s.acquired_total))
            .unwrap_or_default();
        let reachable = match (self.problem.get(), guard.as_ref()) {
            (Some(problem), Some(state)) => {
                reachable_prefix(&problem.items, state.position, &state.route, &problem.horizon)
            }
            _ => 0,
        };

        SolverStatistics {
            iterations: self.iterations.load(Ordering::Relaxed),
            accepted_moves: self.accepted_moves.load(Ordering::Relaxed),
            improving_moves: self.improving_moves.load(Ordering::Relaxed),
            temperature: f64::from_bits(self.temperature_bits.load(Ordering::Relaxed)),
            current_score,
            remaining,
            reachable,
            pops,
            acquired_total,
        }
    }

    /// Runs optimizer iterations until `deadline` on the monotonic clock.
    pub fn run_optimization_iterations(
        &self,
        deadline: Instant,
    ) -> Result<OptimizeReport, SolverError> {
        self.run_loop(Some(deadline), None, None)
    }

    /// Runs optimizer iterations for `budget` from now.
    pub fn run_for(&self, budget: Duration) -> Result<OptimizeReport, SolverError> {
        self.run_loop(Some(Instant::now() + budget), None, None)
    }

    /// Runs until `deadline` or until `cancel` is set, whichever comes first.
    ///
    /// The flag is checked between iterations; an iteration in flight either
    /// publishes its whole route or nothing.
    pub fn run_with_cancel(
        &self,
        deadline: Instant,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<OptimizeReport, SolverError> {
        self.run_loop(Some(deadline), None, cancel.as_deref())
    }

    /// Runs exactly `count` iterations, independent of the clock.
    pub fn run_iterations(&self, count: usize) -> Result<OptimizeReport, SolverError> {
        self.run_loop(None, Some(count), None)
    }

    fn problem(&self) -> Result<&Problem, SolverError> {
        self.problem.get().ok_or(SolverError::NotInitialized)
    }

    #[instrument(skip_all, fields(max_iterations = ?max_iterations), err(Display))]
    fn run_loop(
        &self,
        deadline: Option<Instant>,
        max_iterations: Option<usize>,
        cancel: Option<&AtomicBool>,
    ) -> Result<OptimizeReport, SolverError> {
        let problem = self.problem()?;
        let mut optimizer = self.optimizer.lock();
        let started = Instant::now();

        let mut report = OptimizeReport {
            best_score: self.statistics().current_score,
            ..OptimizeReport::default()
        };

        loop {
            if max_iterations.is_some_and(|max| report.iterations >= max) {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                report.deadline_reached = true;
                break;
            }
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                report.cancelled = true;
                break;
            }

            let (position, working, score, revision) = {
                let guard = self.state.lock();
                let state = guard.as_ref().ok_or(SolverError::NotInitialized)?;
                (state.position, state.route.clone(), state.score, state.revision)
            };

            let outcome = optimizer.step(&problem.items, position, working, score, &problem.horizon);
            report.iterations += 1;
            self.iterations.fetch_add(1, Ordering::Relaxed);
            self.temperature_bits
                .store(optimizer.temperature().to_bits(), Ordering::Relaxed);

            let IterationOutcome::Accepted {
                route,
                score: candidate_score,
                improving,
                ..
            } = outcome
            else {
                continue;
            };

            let published = self
                .state
                .lock()
                .as_mut()
                .is_some_and(|state| state.publish(revision, route, candidate_score));

            if !published {
                report.stale_discards += 1;
                trace!("Route changed during the iteration; candidate discarded.");
                continue;
            }

            report.accepted_moves += 1;
            self.accepted_moves.fetch_add(1, Ordering::Relaxed);
            if improving {
                report.improving_moves += 1;
                self.improving_moves.fetch_add(1, Ordering::Relaxed);
            }
            if candidate_score > report.best_score {
                report.best_score = candidate_score;
                debug!(score = candidate_score, "New best route score");
            }
        }

        report.final_temperature = optimizer.temperature();
        report.final_score = self.statistics().current_score;
        report.elapsed = started.elapsed();

        info!(
            iterations = report.iterations,
            accepted = report.accepted_moves,
            improving = report.improving_moves,
            stale = report.stale_discards,
            temperature = report.final_temperature,
            score = report.final_score,
            cancelled = report.cancelled,
            "Optimization run finished"
        );
        Ok(report)
    }
}

fn check_items(items: &[Item]) -> Result<(), SolverError> {
    let mut ids = HashSet::with_capacity(items.len());
    let mut positions = HashSet::with_capacity(items.len());
    for item in items {
        if item.score == 0 {
            return Err(SolverError::ZeroScore(item.id));
        }
        if !ids.insert(item.id) {
            return Err(SolverError::DuplicateId(item.id));
        }
        if !positions.insert(item.position) {
            return Err(SolverError::DuplicatePosition(item.position));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{generate, CatalogConfig};
    use crate::route::evaluate_route;
    use std::thread;

    fn line_items() -> Vec<Item> {
        vec![
            Item::new(0, (1, 0), 1),
            Item::new(1, (2, 0), 2),
            Item::new(2, (3, 0), 3),
        ]
    }

    fn solver(seed: u64) -> CoinSolver {
        CoinSolver::new(AnnealConfig::default().with_seed(seed)).unwrap()
    }

    fn catalog_solver(count: usize, seed: u64) -> CoinSolver {
        let items = generate(&CatalogConfig::default().with_count(count)).unwrap();
        let solver = solver(seed);
        solver
            .initialize(items, Position::new(0, 0), 10.0, 6.0)
            .unwrap();
        solver
    }

    #[test]
    fn test_invalid_anneal_config() {
        let err = CoinSolver::new(AnnealConfig::default().with_cooling_factor(1.5)).unwrap_err();
        assert!(matches!(err, SolverError::InvalidConfig(_)));
    }

    #[test]
    fn test_initialize_twice_fails() {
        let solver = solver(1);
        solver
            .initialize(line_items(), Position::new(0, 0), 10.0, 1.0)
            .unwrap();
        assert_eq!(
            solver.initialize(line_items(), Position::new(0, 0), 10.0, 1.0),
            Err(SolverError::AlreadyInitialized)
        );
    }

    #[test]
    fn test_initialize_rejects_inconsistent_items() {
        let mut dup_id = line_items();
        dup_id[2].id = dup_id[0].id;
        assert!(matches!(
            solver(1).initialize(dup_id, Position::new(0, 0), 10.0, 1.0),
            Err(SolverError::DuplicateId(_))
        ));

        let mut dup_pos = line_items();
        dup_pos[1].position = dup_pos[0].position;
        assert!(matches!(
            solver(1).initialize(dup_pos, Position::new(0, 0), 10.0, 1.0),
            Err(SolverError::DuplicatePosition(_))
        ));

        let mut zero = line_items();
        zero[1].score = 0;
        assert!(matches!(
            solver(1).initialize(zero, Position::new(0, 0), 10.0, 1.0),
            Err(SolverError::ZeroScore(_))
        ));

        assert!(matches!(
            solver(1).initialize(line_items(), Position::new(0, 0), 10.0, 0.0),
            Err(SolverError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_failed_initialize_can_be_retried() {
        let solver = solver(1);
        assert!(solver
            .initialize(line_items(), Position::new(0, 0), -1.0, 1.0)
            .is_err());
        assert!(!solver.is_initialized());
        solver
            .initialize(line_items(), Position::new(0, 0), 1.0, 1.0)
            .unwrap();
        assert!(solver.is_initialized());
    }

    #[test]
    fn test_uninitialized_operations() {
        let solver = solver(1);
        assert_eq!(solver.advance_target(), Err(SolverError::NotInitialized));
        assert_eq!(solver.run_iterations(10), Err(SolverError::NotInitialized));
        assert!(solver.current_target().is_none());
        assert!(solver.remaining_items().is_empty());
        assert!(solver.current_position().is_none());
    }

    #[test]
    fn test_greedy_route_with_first_tie_winner() {
        let solver = solver(1);
        solver
            .initialize(line_items(), Position::new(0, 0), f64::INFINITY, 1.0)
            .unwrap();
        let order: Vec<_> = solver.remaining_items().iter().map(|i| i.id.0).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(solver.statistics().current_score, 6);
        assert!(solver.current_target().is_none());
    }

    #[test]
    fn test_pop_exhaustion_and_events() {
        let solver = solver(1);
        solver
            .initialize(line_items(), Position::new(0, 0), f64::INFINITY, 1.0)
            .unwrap();

        let first = solver.advance_target().unwrap();
        assert_eq!(first.id.0, 0);
        assert!(solver.drain_score_events().is_empty());

        let second = solver.advance_target().unwrap();
        let events = solver.drain_score_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].item, first.id);
        assert_eq!(events[0].score, first.score);

        let third = solver.advance_target().unwrap();
        let events = solver.drain_score_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].item, second.id);
        assert_eq!(solver.current_target(), Some(third.clone()));
        assert!(solver.remaining_items().is_empty());

        assert_eq!(solver.advance_target(), Err(SolverError::Exhausted));
        let events = solver.drain_score_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].item, third.id);

        assert_eq!(solver.advance_target(), Err(SolverError::Exhausted));
        assert!(solver.drain_score_events().is_empty());

        let stats = solver.statistics();
        assert_eq!(stats.pops, 3);
        assert_eq!(stats.acquired_total, 6);
    }

    #[test]
    fn test_pop_moves_departure_position() {
        let solver = solver(1);
        solver
            .initialize(line_items(), Position::new(0, 0), f64::INFINITY, 1.0)
            .unwrap();
        assert_eq!(solver.current_position(), Some(Position::new(0, 0)));
        solver.run_iterations(50).unwrap();
        assert_eq!(solver.current_position(), Some(Position::new(0, 0)));

        let target = solver.advance_target().unwrap();
        assert_eq!(solver.current_position(), Some(target.position));
    }

    #[test]
    fn test_route_invariants_after_iterations() {
        let solver = catalog_solver(60, 4);
        solver.advance_target().unwrap();
        let report = solver.run_iterations(3_000).unwrap();
        assert_eq!(report.iterations, 3_000);
        assert_eq!(report.stale_discards, 0);
        assert!(report.best_score >= report.final_score);

        let remaining = solver.remaining_items();
        assert_eq!(remaining.len(), 59);
        let ids: HashSet<_> = remaining.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 59);
        assert!(!ids.contains(&solver.current_target().unwrap().id));

        let items = generate(&CatalogConfig::default().with_count(60)).unwrap();
        let route: Vec<usize> = remaining.iter().map(|i| i.id.0).collect();
        let horizon = solver.horizon().unwrap();
        let position = solver.current_position().unwrap();
        assert_eq!(
            solver.statistics().current_score,
            evaluate_route(&items, position, &route, &horizon)
        );
        assert_eq!(report.final_score, solver.statistics().current_score);
    }

    #[test]
    fn test_temperature_statistics_track_optimizer() {
        let solver = catalog_solver(20, 2);
        assert!((solver.statistics().temperature - 1000.0).abs() < 1e-10);
        solver.run_iterations(10).unwrap();
        let stats = solver.statistics();
        assert_eq!(stats.iterations, 10);
        assert!((stats.temperature - 1000.0 * 0.9f64.powi(10)).abs() < 1e-9);
    }

    #[test]
    fn test_statistics_accumulate_published_moves() {
        let solver = catalog_solver(40, 6);
        let stats = solver.statistics();
        assert_eq!((stats.accepted_moves, stats.improving_moves), (0, 0));

        let first = solver.run_iterations(500).unwrap();
        solver.advance_target().unwrap();
        let second = solver.run_iterations(700).unwrap();

        let stats = solver.statistics();
        assert_eq!(stats.iterations, 1_200);
        assert_eq!(stats.accepted_moves, first.accepted_moves + second.accepted_moves);
        assert_eq!(stats.improving_moves, first.improving_moves + second.improving_moves);
        assert!(stats.accepted_moves >= stats.improving_moves);
        assert!(stats.accepted_moves > 0);
    }

    #[test]
    fn test_reachable_counts_items_inside_horizon() {
        assert_eq!(solver(1).statistics().reachable, 0);

        let solver = solver(1);
        // Unit steps at speed 1: the first two items arrive at t = 1 and t = 2,
        // the third would arrive at the limit and is cut off.
        solver
            .initialize(line_items(), Position::new(0, 0), 3.0, 1.0)
            .unwrap();
        let stats = solver.statistics();
        assert_eq!(stats.remaining, 3);
        assert_eq!(stats.reachable, 2);
        assert_eq!(stats.current_score, 3);

        solver.advance_target().unwrap();
        let stats = solver.statistics();
        assert_eq!(stats.remaining, 2);
        assert_eq!(stats.reachable, 2);
    }

    #[test]
    fn test_initialize_accepts_extreme_coordinates() {
        let items = vec![
            Item::new(0, (i32::MAX, 0), 5),
            Item::new(1, (i32::MIN, 0), 7),
            Item::new(2, (i32::MIN, i32::MAX), 3),
        ];
        let solver = solver(1);
        solver
            .initialize(items, Position::new(0, 0), f64::INFINITY, 1.0)
            .unwrap();
        assert_eq!(solver.statistics().current_score, 15);
        solver.run_iterations(100).unwrap();
        assert_eq!(solver.statistics().current_score, 15);
        assert!(solver.advance_target().is_ok());
    }

    #[test]
    fn test_expired_deadline_runs_nothing() {
        let solver = catalog_solver(20, 2);
        let report = solver.run_optimization_iterations(Instant::now()).unwrap();
        assert_eq!(report.iterations, 0);
        assert!(report.deadline_reached);
    }

    #[test]
    fn test_cancel_before_start() {
        let solver = catalog_solver(20, 2);
        let cancel = Arc::new(AtomicBool::new(true));
        let report = solver
            .run_with_cancel(Instant::now() + Duration::from_secs(60), Some(cancel))
            .unwrap();
        assert!(report.cancelled);
        assert_eq!(report.iterations, 0);
    }

    #[test]
    fn test_subscriber_sees_events_in_pop_order() {
        let solver = catalog_solver(10, 3);
        let rx = solver.subscribe();

        let mut popped = Vec::new();
        while let Ok(item) = solver.advance_target() {
            popped.push(item);
        }

        let received: Vec<ScoreEvent> = rx.try_iter().collect();
        assert_eq!(received.len(), popped.len());
        for (i, (event, item)) in received.iter().zip(&popped).enumerate() {
            assert_eq!(event.sequence, i);
            assert_eq!(event.item, item.id);
            assert_eq!(event.score, item.score);
        }
    }

    #[test]
    fn test_concurrent_pops_and_optimization() {
        let solver = Arc::new(catalog_solver(100, 8));
        let cancel = Arc::new(AtomicBool::new(false));

        let background = {
            let solver = Arc::clone(&solver);
            let cancel = Arc::clone(&cancel);
            thread::spawn(move || {
                solver.run_with_cancel(Instant::now() + Duration::from_secs(30), Some(cancel))
            })
        };

        let mut seen = HashSet::new();
        loop {
            match solver.advance_target() {
                Ok(item) => assert!(seen.insert(item.id), "item {} popped twice", item.id),
                Err(SolverError::Exhausted) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
            thread::yield_now();
        }

        cancel.store(true, Ordering::Relaxed);
        let report = background.join().unwrap().unwrap();
        assert!(report.cancelled);

        assert_eq!(seen.len(), 100);
        let events = solver.drain_score_events();
        assert_eq!(events.len(), 100);
        let total: u64 = events.iter().map(|e| u64::from(e.score)).sum();
        assert_eq!(total, (1..=100u64).sum::<u64>());
        assert_eq!(solver.statistics().acquired_total, total);
    }
}
