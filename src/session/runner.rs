//! Session wiring and the background optimizer thread.

use super::config::SessionConfig;
use super::scoreboard::Scoreboard;
use crate::catalog::{generate, Item};
use crate::error::SolverError;
use crate::solver::{CoinSolver, OptimizeReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// A background optimizer thread working against a deadline.
///
/// Dropping the handle signals the thread to stop without waiting for it.
#[derive(Debug)]
pub struct OptimizerHandle {
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<OptimizeReport, SolverError>>>,
}

impl OptimizerHandle {
    /// Spawns a thread running `solver`'s optimizer until `deadline` or [`stop`](Self::stop).
    pub fn spawn(solver: Arc<CoinSolver>, deadline: Instant) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let thread = thread::spawn(move || solver.run_with_cancel(deadline, Some(flag)));
        Self {
            cancel,
            thread: Some(thread),
        }
    }

    /// Asks the thread to stop after its current iteration.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Waits for the thread and returns its report.
    ///
    /// A panic on the optimizer thread is resumed on the caller.
    pub fn join(mut self) -> Result<OptimizeReport, SolverError> {
        match self.thread.take() {
            Some(thread) => match thread.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            },
            None => Ok(OptimizeReport::default()),
        }
    }
}

impl Drop for OptimizerHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop();
        }
    }
}

/// One collection session: catalog, solver and score tally.
///
/// # Examples
///
/// ```
/// use coin_route::catalog::CatalogConfig;
/// use coin_route::anneal::AnnealConfig;
/// use coin_route::session::{Session, SessionConfig};
/// use std::time::Duration;
///
/// let config = SessionConfig::default()
///     .with_catalog(CatalogConfig::default().with_count(15))
///     .with_anneal(AnnealConfig::default().with_seed(3))
///     .with_preparation_time(Duration::from_millis(5));
/// let mut session = Session::new(config).unwrap();
/// session.prepare().unwrap();
///
/// while session.advance().is_ok() {}
/// assert_eq!(session.scoreboard().collected(), 15);
/// ```
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    items: Vec<Item>,
    solver: Arc<CoinSolver>,
    scoreboard: Scoreboard,
    play_started: Option<Instant>,
}

impl Session {
    /// Generates the catalog and initializes the solver.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidConfig`] for an invalid config
    /// - [`SolverError::Catalog`] when the grid cannot hold the requested
    ///   number of items
    pub fn new(config: SessionConfig) -> Result<Self, SolverError> {
        config.validate().map_err(SolverError::InvalidConfig)?;

        let items = generate(&config.catalog).map_err(|e| {
            error!(error = %e, "Catalog generation failed");
            e
        })?;
        let solver = CoinSolver::new(config.anneal.clone())?;
        solver.initialize(
            items.clone(),
            config.start,
            config.horizon.time_limit,
            config.horizon.speed_factor,
        )?;

        info!(
            items = items.len(),
            width = config.catalog.width,
            height = config.catalog.height,
            "Session ready"
        );
        Ok(Self {
            config,
            items,
            solver: Arc::new(solver),
            scoreboard: Scoreboard::new(),
            play_started: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The full catalog in generation order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn solver(&self) -> &Arc<CoinSolver> {
        &self.solver
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Runs the optimizer on the calling thread for the preparation time.
    pub fn prepare(&self) -> Result<OptimizeReport, SolverError> {
        self.solver.run_for(self.config.preparation_time)
    }

    /// Starts the optimizer on a background thread for `budget`.
    pub fn spawn_optimizer(&self, budget: Duration) -> OptimizerHandle {
        OptimizerHandle::spawn(Arc::clone(&self.solver), Instant::now() + budget)
    }

    /// Collects the current target and returns the next one.
    ///
    /// The first call starts the play clock used for score samples.
    pub fn advance(&mut self) -> Result<Item, SolverError> {
        let started = *self.play_started.get_or_insert_with(Instant::now);
        let result = self.solver.advance_target();

        let elapsed = started.elapsed();
        for event in self.solver.drain_score_events() {
            self.scoreboard.record(&event, elapsed);
        }

        if matches!(result, Err(SolverError::Exhausted)) {
            info!(
                total = self.scoreboard.total(),
                collected = self.scoreboard.collected(),
                "All items collected"
            );
        }
        result
    }

    /// Time since the first [`advance`](Self::advance), if play has started.
    pub fn play_elapsed(&self) -> Option<Duration> {
        self.play_started.map(|started| started.elapsed())
    }
}
