//! The bee colony: food sources and the three search phases.
//!
//! # Perturbation
//!
//! A bee working food source `i` with neighbour `k` picks one flight `p`
//! and moves it to aircraft
//!
//! ```text
//! v = trunc(x_ip + q * (x_kp - x_ip)),   q ~ U[-1, 1)
//! ```
//!
//! folded back into the pool by negating negatives and subtracting the pool
//! size while out of range. `q` is redrawn until the aircraft is free on
//! the flight's date. The move is kept only if it strictly lowers the
//! objective; otherwise it is undone and the source's trial counter grows.
//!
//! # Reference
//!
//! Karaboga, D. (2005). "An Idea Based on Honey Bee Swarm for Numerical
//! Optimization", Technical Report TR06, Erciyes University.

use rand::Rng;

use super::food_source::{is_feasible, FoodSource};
use crate::cost::CostModel;
use crate::error::FleetError;
use crate::model::{AircraftId, Instance};

/// Fitness of the cheapest food source after [`Colony::compute_fitness`].
pub const MAX_FITNESS: f64 = 100.0;

/// Population of food sources plus the random stream driving them.
///
/// Owns every food source; the global best is tracked as an index into
/// the population and refreshed only by [`update_best`](Colony::update_best).
pub struct Colony<'a, R: Rng> {
    instance: &'a Instance,
    cost: &'a CostModel,
    sources: Vec<FoodSource>,
    best: usize,
    limit: usize,
    max_attempts: usize,
    rng: R,
}

impl<'a, R: Rng> Colony<'a, R> {
    /// Creates `food_number` random feasible food sources, with fitness and
    /// selection probabilities already computed.
    pub fn new(
        instance: &'a Instance,
        cost: &'a CostModel,
        food_number: usize,
        limit: usize,
        max_attempts: usize,
        mut rng: R,
    ) -> Result<Self, FleetError> {
        if instance.flights.is_empty() || cost.pool_size() == 0 {
            return Err(FleetError::EmptyInstance);
        }
        if food_number < 2 {
            return Err(FleetError::InvalidConfig(format!(
                "a colony needs at least two food sources, got {food_number}"
            )));
        }

        let sources = (0..food_number)
            .map(|_| FoodSource::random(&instance.flights, cost, max_attempts, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;

        let mut colony = Self {
            instance,
            cost,
            sources,
            best: 0,
            limit,
            max_attempts,
            rng,
        };
        colony.update_best();
        colony.compute_fitness();
        Ok(colony)
    }

    pub fn sources(&self) -> &[FoodSource] {
        &self.sources
    }

    /// The food source recorded by the last [`update_best`](Self::update_best).
    pub fn best(&self) -> &FoodSource {
        &self.sources[self.best]
    }

    pub fn best_index(&self) -> usize {
        self.best
    }

    pub fn into_best(mut self) -> FoodSource {
        self.sources.swap_remove(self.best)
    }

    /// Sends one employed bee to every food source, in index order.
    pub fn employed_phase(&mut self) {
        for i in 0..self.sources.len() {
            let k = self.random_neighbor(i);
            self.perturb(i, k);
        }
    }

    /// Scales objectives to fitness in `[0, 100]` (100 = cheapest) and maps
    /// fitness to a selection probability in `[0.1, 1.0]`.
    ///
    /// When all objectives are equal every source gets fitness 100.
    pub fn compute_fitness(&mut self) {
        let worst = self.sources.iter().map(FoodSource::objective).max().unwrap_or(0);
        let best = self.sources.iter().map(FoodSource::objective).min().unwrap_or(0);
        let range = (worst - best) as f64;

        for source in &mut self.sources {
            let fitness = if worst == best {
                MAX_FITNESS
            } else {
                (worst - source.objective()) as f64 * MAX_FITNESS / range
            };
            source.set_fitness(fitness);
        }

        let max_fitness = self
            .sources
            .iter()
            .map(FoodSource::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        for source in &mut self.sources {
            let p = 0.9 * (source.fitness() / max_fitness) + 0.1;
            source.set_selection_probability(p);
        }
    }

    /// Round-robin over the food sources, dispatching an onlooker to each
    /// one that wins its probability draw, until `food_number` onlookers
    /// have worked.
    pub fn onlooker_phase(&mut self) {
        let n = self.sources.len();
        let mut i = 0;
        let mut dispatched = 0;

        while dispatched < n {
            let draw: f64 = self.rng.random();
            if draw < self.sources[i].selection_probability() {
                dispatched += 1;
                let k = self.random_neighbor(i);
                self.perturb(i, k);
            }
            i = (i + 1) % n;
        }
    }

    /// Replaces every food source that reached the trial limit, unless its
    /// objective equals the recorded best's. Returns the number replaced.
    ///
    /// Fitness is recomputed when anything was replaced.
    pub fn scout_phase(&mut self) -> Result<usize, FleetError> {
        let best_objective = self.best().objective();
        let mut resets = 0;

        for i in 0..self.sources.len() {
            let source = &self.sources[i];
            if source.trials() >= self.limit && source.objective() != best_objective {
                let fresh = match FoodSource::random(
                    &self.instance.flights,
                    self.cost,
                    self.max_attempts,
                    &mut self.rng,
                ) {
                    Ok(fresh) => fresh,
                    Err(err) => {
                        tracing::warn!(source = i, error = %err, "scout reset failed");
                        return Err(err);
                    }
                };
                tracing::trace!(
                    source = i,
                    abandoned = source.objective(),
                    fresh = fresh.objective(),
                    "scout reset"
                );
                self.sources[i] = fresh;
                resets += 1;
            }
        }
        if resets > 0 {
            self.compute_fitness();
        }
        Ok(resets)
    }

    /// Records the current cheapest food source as the best; ties go to
    /// the lowest index.
    pub fn update_best(&mut self) -> usize {
        self.best = self
            .sources
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.objective())
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.best
    }

    /// Tries to improve food source `i` by moving one flight towards the
    /// aircraft food source `k` uses for it.
    pub fn perturb(&mut self, i: usize, k: usize) {
        let instance = self.instance;
        let cost = self.cost;
        let pool = cost.pool_size() as i64;

        let p = self.rng.random_range(0..instance.flights.len());
        let date = instance.flights[p].date;
        let neighbor = self.sources[k].aircraft_of(p).index() as i64;

        let rng = &mut self.rng;
        let source = &mut self.sources[i];
        let before = source.objective();
        let current = source.aircraft_of(p);
        let x = current.index() as i64;
        source.vacate(current, date);

        let mut next = None;
        for _ in 0..self.max_attempts {
            let q: f64 = rng.random_range(-1.0..1.0);
            let candidate = fold_index((x as f64 + q * (neighbor - x) as f64) as i64, pool);
            if is_feasible(source.occupancy(), candidate, date) {
                next = Some(candidate);
                break;
            }
        }
        // The slot just vacated is always free.
        let next = next.unwrap_or(current);

        source.commit(p, date, next, cost);

        if source.objective() >= before {
            source.vacate(next, date);
            source.commit(p, date, current, cost);
            source.record_failure();
        } else {
            source.record_improvement();
        }
    }

    /// Uniform index in `0..n` other than `i`.
    fn random_neighbor(&mut self, i: usize) -> usize {
        let k = self.rng.random_range(0..self.sources.len() - 1);
        if k >= i {
            k + 1
        } else {
            k
        }
    }
}

/// Folds a raw perturbed index into `0..pool`: negatives are mirrored,
/// overflow wraps by whole pool sizes.
pub fn fold_index(raw: i64, pool: i64) -> AircraftId {
    let mut v = raw.abs();
    while v > pool - 1 {
        v -= pool;
    }
    AircraftId(v as usize)
}
