//! Food sources: complete flight-to-aircraft assignments with their search
//! bookkeeping, and the per-aircraft date index that keeps them feasible.

use std::collections::BTreeSet;

use rand::Rng;

use crate::cost::CostModel;
use crate::error::FleetError;
use crate::model::{AircraftId, Assignment, Flight, FlightDate, Instance};

/// Dates already flown by each pool slot within one food source.
///
/// An aircraft may serve at most one flight per date, so each slot holds
/// a set of dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    dates: Vec<BTreeSet<FlightDate>>,
}

impl Occupancy {
    pub fn new(pool_size: usize) -> Self {
        Self {
            dates: vec![BTreeSet::new(); pool_size],
        }
    }

    #[inline]
    pub fn pool_size(&self) -> usize {
        self.dates.len()
    }

    /// Dates on which `aircraft` is busy.
    pub fn dates(&self, aircraft: AircraftId) -> &BTreeSet<FlightDate> {
        &self.dates[aircraft.index()]
    }

    /// Pool slots with nothing scheduled on `date`, in index order.
    pub fn free_aircraft(&self, date: FlightDate) -> impl Iterator<Item = AircraftId> + '_ {
        self.dates
            .iter()
            .enumerate()
            .filter(move |(_, d)| !d.contains(&date))
            .map(|(i, _)| AircraftId(i))
    }

    /// Marks `aircraft` busy on `date`. Returns `false` if it already was.
    pub(crate) fn occupy(&mut self, aircraft: AircraftId, date: FlightDate) -> bool {
        self.dates[aircraft.index()].insert(date)
    }

    /// Releases `aircraft` on `date`. Returns `false` if it was not busy.
    pub(crate) fn vacate(&mut self, aircraft: AircraftId, date: FlightDate) -> bool {
        self.dates[aircraft.index()].remove(&date)
    }
}

/// Whether `aircraft` may take a flight on `date`.
#[inline]
pub fn is_feasible(occupancy: &Occupancy, aircraft: AircraftId, date: FlightDate) -> bool {
    !occupancy.dates[aircraft.index()].contains(&date)
}

/// One candidate solution of the colony.
#[derive(Debug, Clone)]
pub struct FoodSource {
    nectar: Vec<Assignment>,
    objective: i64,
    fitness: f64,
    selection_probability: f64,
    trials: usize,
    occupancy: Occupancy,
}

impl FoodSource {
    /// Assigns every flight, in order, a uniformly random aircraft that is
    /// still free on the flight's date.
    ///
    /// Up to `max_attempts` random draws are made per flight; if they all
    /// hit busy aircraft, a free one is picked directly. Fails only when
    /// no aircraft at all is free on some date.
    pub fn random<R: Rng>(
        flights: &[Flight],
        cost: &CostModel,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Self, FleetError> {
        let mut occupancy = Occupancy::new(cost.pool_size());
        let mut nectar = Vec::with_capacity(flights.len());

        for (f, flight) in flights.iter().enumerate() {
            let aircraft = pick_free(&occupancy, flight.date, max_attempts, rng).ok_or(
                FleetError::NoFeasibleAircraft {
                    flight: f,
                    date: flight.date,
                },
            )?;
            occupancy.occupy(aircraft, flight.date);
            nectar.push(Assignment {
                flight: f,
                aircraft,
            });
        }

        let objective = cost.evaluate(&nectar);
        Ok(Self::with_parts(nectar, objective, occupancy))
    }

    /// Builds a food source from an explicit aircraft per flight.
    ///
    /// Fails if an id lies outside the pool or an aircraft would fly twice
    /// on one date.
    pub fn from_aircraft(
        flights: &[Flight],
        aircraft: &[AircraftId],
        cost: &CostModel,
    ) -> Result<Self, FleetError> {
        if aircraft.len() != flights.len() {
            return Err(FleetError::InvalidConfig(format!(
                "expected {} aircraft, got {}",
                flights.len(),
                aircraft.len()
            )));
        }
        let mut occupancy = Occupancy::new(cost.pool_size());
        let mut nectar = Vec::with_capacity(flights.len());

        for (f, (flight, &a)) in flights.iter().zip(aircraft).enumerate() {
            if a.index() >= cost.pool_size() {
                return Err(FleetError::InvalidConfig(format!(
                    "flight {f}: aircraft {a} outside a pool of {}",
                    cost.pool_size()
                )));
            }
            if !is_feasible(&occupancy, a, flight.date) {
                return Err(FleetError::NoFeasibleAircraft {
                    flight: f,
                    date: flight.date,
                });
            }
            occupancy.occupy(a, flight.date);
            nectar.push(Assignment {
                flight: f,
                aircraft: a,
            });
        }

        let objective = cost.evaluate(&nectar);
        Ok(Self::with_parts(nectar, objective, occupancy))
    }

    fn with_parts(nectar: Vec<Assignment>, objective: i64, occupancy: Occupancy) -> Self {
        Self {
            nectar,
            objective,
            fitness: 0.0,
            selection_probability: 0.0,
            trials: 0,
            occupancy,
        }
    }

    /// The flight-to-aircraft pairs, indexed by flight.
    pub fn nectar(&self) -> &[Assignment] {
        &self.nectar
    }

    #[inline]
    pub fn aircraft_of(&self, flight: usize) -> AircraftId {
        self.nectar[flight].aircraft
    }

    /// Cached total cost of [`nectar`](Self::nectar).
    #[inline]
    pub fn objective(&self) -> i64 {
        self.objective
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn selection_probability(&self) -> f64 {
        self.selection_probability
    }

    /// Consecutive non-improving perturbations since the last reset.
    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    pub(crate) fn set_selection_probability(&mut self, p: f64) {
        self.selection_probability = p;
    }

    pub(crate) fn record_failure(&mut self) {
        self.trials += 1;
    }

    pub(crate) fn record_improvement(&mut self) {
        self.trials = 0;
    }

    pub(crate) fn vacate(&mut self, aircraft: AircraftId, date: FlightDate) -> bool {
        self.occupancy.vacate(aircraft, date)
    }

    /// Moves `flight` onto `aircraft` (which must be free on `date`; the
    /// previous aircraft must already be vacated) and recomputes the
    /// objective.
    pub(crate) fn commit(
        &mut self,
        flight: usize,
        date: FlightDate,
        aircraft: AircraftId,
        cost: &CostModel,
    ) {
        let inserted = self.occupancy.occupy(aircraft, date);
        debug_assert!(inserted, "aircraft {aircraft} double-booked on {date}");
        self.nectar[flight].aircraft = aircraft;
        self.objective = cost.evaluate(&self.nectar);
    }

    /// Checks that the date index agrees exactly with the assignment.
    pub fn is_consistent(&self, flights: &[Flight]) -> bool {
        let indexed: usize = self.occupancy.dates.iter().map(BTreeSet::len).sum();
        indexed == self.nectar.len()
            && self
                .nectar
                .iter()
                .all(|a| self.occupancy.dates(a.aircraft).contains(&flights[a.flight].date))
    }

    /// One line per flight, `origin -> destination  date  : aircraft`.
    pub fn describe(&self, instance: &Instance) -> Vec<String> {
        self.nectar
            .iter()
            .map(|a| {
                let flight = &instance.flights[a.flight];
                format!(
                    "{} -> {}  {}  : {}",
                    flight.origin,
                    flight.destination,
                    flight.date,
                    instance.aircraft_label(a.aircraft)
                )
            })
            .collect()
    }
}

/// Draws a random aircraft free on `date`, falling back to a direct pick
/// among the free ones after `max_attempts` misses.
pub(crate) fn pick_free<R: Rng>(
    occupancy: &Occupancy,
    date: FlightDate,
    max_attempts: usize,
    rng: &mut R,
) -> Option<AircraftId> {
    let pool = occupancy.pool_size();
    if pool == 0 || occupancy.free_aircraft(date).next().is_none() {
        return None;
    }

    for _ in 0..max_attempts {
        let candidate = AircraftId(rng.random_range(0..pool));
        if is_feasible(occupancy, candidate, date) {
            return Some(candidate);
        }
    }

    let free: Vec<AircraftId> = occupancy.free_aircraft(date).collect();
    Some(free[rng.random_range(0..free.len())])
}
