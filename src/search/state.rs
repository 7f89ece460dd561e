//! Working plan manipulated by construction and local search.
//!
//! Routes are stored per trip slot as stop sequences (depot excluded), next
//! to the cached schedule of every physical vehicle. A committed state is
//! always feasible: every change is re-scheduled for the vehicles it touches
//! before it is kept.

use crate::evaluation::{PlanEvaluator, RoutingModel, Score, VehicleSchedule};
use crate::models::Solution;

/// A candidate change that has been applied in place and scheduled, but not
/// yet committed or rolled back.
#[derive(Debug)]
pub struct Trial {
    previous: Vec<(usize, Vec<usize>)>,
    schedules: Vec<(usize, VehicleSchedule)>,
    before: Score,
    after: Score,
}

impl Trial {
    pub fn before(&self) -> Score {
        self.before
    }

    pub fn after(&self) -> Score {
        self.after
    }

    /// `(objective, activations)` change this trial would cause.
    pub fn delta(&self) -> (i64, i64) {
        (
            self.after.objective - self.before.objective,
            self.after.activations as i64 - self.before.activations as i64,
        )
    }
}

/// Feasible routes for every trip slot plus cached vehicle schedules.
#[derive(Debug, Clone)]
pub struct PlanState {
    routes: Vec<Vec<usize>>,
    schedules: Vec<VehicleSchedule>,
}

impl PlanState {
    /// A plan with every slot unused.
    pub fn empty(model: &RoutingModel) -> Self {
        let idle = VehicleSchedule {
            trips: Vec::new(),
            travel_time: 0,
            penalty: 0,
            activations: 0,
        };
        Self {
            routes: vec![Vec::new(); model.num_slots()],
            schedules: vec![idle; model.num_vehicles()],
        }
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub fn route(&self, slot: usize) -> &[usize] {
        &self.routes[slot]
    }

    /// Total score over all vehicles.
    pub fn score(&self) -> Score {
        self.schedules.iter().map(VehicleSchedule::score).sum()
    }

    /// Demand currently carried by `slot`.
    pub fn load(&self, model: &RoutingModel, slot: usize) -> i64 {
        self.routes[slot].iter().map(|&s| model.demand(s)).sum()
    }

    /// Customers not on any route, in increasing index order.
    pub fn unassigned(&self, model: &RoutingModel) -> Vec<usize> {
        let mut routed = vec![false; model.instance().num_stops()];
        for &stop in self.routes.iter().flatten() {
            routed[stop] = true;
        }
        model.customers().filter(|&s| !routed[s]).collect()
    }

    /// Applies `changes` (slot, new route) in place and schedules the
    /// affected vehicles. Infeasible changes are rolled back immediately.
    pub fn trial(&mut self, model: &RoutingModel, changes: Vec<(usize, Vec<usize>)>) -> Option<Trial> {
        let mut vehicles: Vec<usize> = changes.iter().map(|(slot, _)| model.vehicle_of(*slot)).collect();
        vehicles.sort_unstable();
        vehicles.dedup();

        let previous: Vec<(usize, Vec<usize>)> = changes
            .into_iter()
            .map(|(slot, route)| (slot, std::mem::replace(&mut self.routes[slot], route)))
            .collect();

        let evaluator = PlanEvaluator::new(model);
        let mut schedules = Vec::with_capacity(vehicles.len());
        for &vehicle in &vehicles {
            match evaluator.schedule_vehicle(vehicle, &self.routes) {
                Ok(schedule) => schedules.push((vehicle, schedule)),
                Err(_) => {
                    self.restore(previous);
                    return None;
                }
            }
        }

        let before: Score = vehicles.iter().map(|&v| self.schedules[v].score()).sum();
        let after: Score = schedules.iter().map(|(_, s)| s.score()).sum();
        Some(Trial {
            previous,
            schedules,
            before,
            after,
        })
    }

    /// Keeps a trial's routes and schedules.
    pub fn commit(&mut self, trial: Trial) {
        for (vehicle, schedule) in trial.schedules {
            self.schedules[vehicle] = schedule;
        }
    }

    /// Reverts a trial's routes.
    pub fn rollback(&mut self, trial: Trial) {
        self.restore(trial.previous);
    }

    /// Applies `changes` if they keep the plan feasible, whatever the cost.
    pub fn apply_if_feasible(&mut self, model: &RoutingModel, changes: Vec<(usize, Vec<usize>)>) -> bool {
        match self.trial(model, changes) {
            Some(trial) => {
                self.commit(trial);
                true
            }
            None => false,
        }
    }

    /// Applies `changes` only if they are feasible and strictly improve the
    /// score. Touched vehicles are compacted afterwards.
    pub fn try_improve(&mut self, model: &RoutingModel, changes: Vec<(usize, Vec<usize>)>) -> bool {
        let Some(trial) = self.trial(model, changes) else {
            return false;
        };
        if trial.after() < trial.before() {
            let vehicles: Vec<usize> = trial.schedules.iter().map(|(v, _)| *v).collect();
            self.commit(trial);
            for vehicle in vehicles {
                self.compact_vehicle(model, vehicle);
            }
            true
        } else {
            self.rollback(trial);
            false
        }
    }

    /// Score change of `changes` without keeping them. `None` if infeasible.
    pub fn delta(&mut self, model: &RoutingModel, changes: Vec<(usize, Vec<usize>)>) -> Option<(i64, i64)> {
        let trial = self.trial(model, changes)?;
        let delta = trial.delta();
        self.rollback(trial);
        Some(delta)
    }

    /// Moves a vehicle's used trips into its lowest trip ordinals, keeping
    /// their order. An idle slot takes no time, so timing is unchanged and
    /// the activation penalty can only drop.
    pub fn compact_vehicle(&mut self, model: &RoutingModel, vehicle: usize) {
        let slots: Vec<usize> = model.vehicle_slots(vehicle).collect();
        let used: Vec<Vec<usize>> = slots
            .iter()
            .filter(|&&slot| !self.routes[slot].is_empty())
            .map(|&slot| self.routes[slot].clone())
            .collect();
        let already_compact = slots
            .iter()
            .zip(&used)
            .all(|(&slot, route)| self.routes[slot] == *route);
        if already_compact {
            return;
        }

        let mut compacted = used;
        compacted.resize(slots.len(), Vec::new());
        let changes = slots.into_iter().zip(compacted).collect();
        if let Some(trial) = self.trial(model, changes) {
            if trial.after() <= trial.before() {
                self.commit(trial);
            } else {
                self.rollback(trial);
            }
        }
    }

    /// Compacts every vehicle.
    pub fn compact(&mut self, model: &RoutingModel) {
        for vehicle in 0..model.num_vehicles() {
            self.compact_vehicle(model, vehicle);
        }
    }

    /// Freezes the plan into a [`Solution`] with trips ordered by slot.
    pub fn to_solution(&self) -> Solution {
        let mut trips: Vec<_> = self
            .schedules
            .iter()
            .flat_map(|s| s.trips.iter().cloned())
            .collect();
        trips.sort_by_key(|t| t.slot);
        let score = self.score();
        Solution::new(trips, score.objective, score.activations)
    }

    fn restore(&mut self, previous: Vec<(usize, Vec<usize>)>) {
        for (slot, route) in previous.into_iter().rev() {
            self.routes[slot] = route;
        }
    }
}
