//! Search driver: construction, descent and iterated ruin-and-recreate.
//!
//! # Algorithm
//!
//! 1. **Construct** with path-cheapest-arc, then insert leftovers at their
//!    cheapest feasible position. If stops remain, retry insertion from an
//!    empty plan in seeded random orders; if that also fails the instance is
//!    reported infeasible.
//! 2. **Descend**: apply every local search operator in turn until a full
//!    round changes nothing (variable neighbourhood descent).
//! 3. **Perturb**: from the best plan, remove a few stops (random or related
//!    removal), reinsert them cheapest-first in random order and descend.
//!    The result replaces the best plan only when its score is strictly
//!    lower.
//!
//! The search ends when the deadline expires or after `max_stagnation`
//! consecutive perturbations without improvement.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::SolverConfig;
use crate::constructive::{cheapest_insertion, path_cheapest_arc};
use crate::error::RoutingError;
use crate::evaluation::RoutingModel;
use crate::local_search::OPERATORS;
use crate::models::Solution;

use super::ruin::{random_removal, related_removal};
use super::{Deadline, PlanState};

/// Fraction of routed stops a perturbation removes at most.
const RUIN_FRACTION: f64 = 0.3;

/// Time-bounded search over one [`RoutingModel`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_multitrip::config::SolverConfig;
/// use u_multitrip::distance::TravelTimeMatrix;
/// use u_multitrip::evaluation::RoutingModel;
/// use u_multitrip::models::{RoutingInstance, StopRecord};
/// use u_multitrip::search::SearchEngine;
///
/// let stops = vec![
///     StopRecord::new("Facility", "Base", 35.0, 139.0),
///     StopRecord::new("Ito", "Home", 35.01, 139.0),
///     StopRecord::new("Sato", "Home", 35.02, 139.0),
/// ];
/// let matrix = TravelTimeMatrix::from_rows(vec![
///     vec![0, 10, 10],
///     vec![10, 0, 5],
///     vec![10, 5, 0],
/// ]).unwrap();
/// let config = SolverConfig { num_cars: 1, max_trips: 1, ..SolverConfig::default() }
///     .with_time_limit(Duration::from_secs(1));
/// let instance = RoutingInstance::new(&stops, matrix, &config).unwrap();
/// let model = RoutingModel::build(&instance);
///
/// let solution = SearchEngine::new(&model, &config).run().unwrap();
/// assert_eq!(solution.objective(), 25);
/// ```
pub struct SearchEngine<'a> {
    model: &'a RoutingModel<'a>,
    config: &'a SolverConfig,
}

impl<'a> SearchEngine<'a> {
    pub fn new(model: &'a RoutingModel<'a>, config: &'a SolverConfig) -> Self {
        Self { model, config }
    }

    /// Runs construction and improvement within the configured time limit.
    pub fn run(&self) -> Result<Solution, RoutingError> {
        let deadline = Deadline::after(self.config.time_limit());
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut best = self.construct_within(&deadline, &mut rng)?;
        debug!(
            "construction: objective {} ({} later trips)",
            best.score().objective,
            best.score().activations
        );
        self.descend(&mut best, &deadline);
        debug!("after descent: objective {}", best.score().objective);

        let mut stagnation = 0;
        let mut rounds = 0usize;
        while !deadline.expired() && stagnation < self.config.max_stagnation {
            rounds += 1;
            match self.perturb(&best, &deadline, &mut rng) {
                Some(candidate) if candidate.score() < best.score() => {
                    debug!(
                        "round {rounds}: objective {} -> {}",
                        best.score().objective,
                        candidate.score().objective
                    );
                    best = candidate;
                    stagnation = 0;
                }
                _ => stagnation += 1,
            }
        }

        best.compact(self.model);
        let solution = best.to_solution();
        info!(
            "search finished after {rounds} perturbation round(s) in {:.2?}: objective {}, {} trip(s)",
            deadline.elapsed(),
            solution.objective(),
            solution.num_trips()
        );
        Ok(solution)
    }

    /// Builds a complete feasible plan without improvement. Deterministic
    /// for a given configuration.
    pub fn construct(&self) -> Result<PlanState, RoutingError> {
        let deadline = Deadline::after(self.config.time_limit());
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.construct_within(&deadline, &mut rng)
    }

    fn construct_within(&self, deadline: &Deadline, rng: &mut StdRng) -> Result<PlanState, RoutingError> {
        let model = self.model;
        let mut state = path_cheapest_arc(model);
        let pending = state.unassigned(model);
        let leftover = cheapest_insertion(model, &mut state, &pending);
        if leftover.is_empty() {
            return Ok(state);
        }
        debug!(
            "greedy construction left {} stop(s) unrouted, retrying in random orders",
            leftover.len()
        );

        let mut fewest = leftover.len();
        let mut order: Vec<usize> = model.customers().collect();
        for _ in 0..self.config.max_stagnation.max(1) {
            if deadline.expired() {
                break;
            }
            order.shuffle(rng);
            let mut attempt = PlanState::empty(model);
            let leftover = cheapest_insertion(model, &mut attempt, &order);
            if leftover.is_empty() {
                return Ok(attempt);
            }
            fewest = fewest.min(leftover.len());
        }

        warn!("no feasible plan: {fewest} stop(s) cannot be routed");
        Err(RoutingError::NoSolution { unassigned: fewest })
    }

    /// Applies every operator in turn until a full round finds nothing.
    pub fn descend(&self, state: &mut PlanState, deadline: &Deadline) {
        loop {
            let mut changed = false;
            for (name, operator) in OPERATORS {
                if deadline.expired() {
                    return;
                }
                if operator(state, self.model, deadline) {
                    debug!("{name}: objective {}", state.score().objective);
                    changed = true;
                }
            }
            if !changed {
                return;
            }
        }
    }

    /// One ruin-and-recreate round from `best`. `None` if the removed stops
    /// could not all be reinserted.
    fn perturb(&self, best: &PlanState, deadline: &Deadline, rng: &mut StdRng) -> Option<PlanState> {
        let model = self.model;
        let routed = model.instance().num_stops().saturating_sub(1);
        let max_remove = ((routed as f64 * RUIN_FRACTION).round() as usize).max(1);
        let count = rng.random_range(1..=max_remove as u64) as usize;

        let mut candidate = best.clone();
        let mut removed = if rng.random_bool(0.5) {
            random_removal(&mut candidate, model, count, rng)
        } else {
            related_removal(&mut candidate, model, count, rng)
        };
        if removed.is_empty() {
            return None;
        }
        removed.shuffle(rng);

        if !cheapest_insertion(model, &mut candidate, &removed).is_empty() {
            return None;
        }
        self.descend(&mut candidate, deadline);
        Some(candidate)
    }
}
