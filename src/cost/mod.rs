//! Operating cost of a flight-to-aircraft assignment.
//!
//! Every flight contributes, for the aircraft model serving it:
//!
//! - handling: `2 × handling_cost`
//! - fuel: `fuel_cost_per_minute × block minutes`
//! - maintenance: `maintenance_cost_per_minute × block minutes`
//! - ATC: `atc_cost_per_nautical_mile × city-pair distance`
//! - airport charges for the model's fleet class: landing at origin,
//!   landing at destination, parking at destination
//!
//! A flight on the null aircraft costs [`CANCELLATION_PENALTY`] and
//! nothing else. The total is truncated to an integer.
//!
//! Since every term depends only on the (flight, aircraft) pair, the
//! model tabulates all pairs once up front; [`CostModel::evaluate`] is
//! then a plain sum over the assignment.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{AircraftId, AirportCharge, Assignment, ChargeType, Flight, Instance};

/// Cost of leaving a flight without an aircraft.
pub const CANCELLATION_PENALTY: f64 = 100_000.0;

/// What a [`MissingReference`] failed to find.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MissingKind {
    AircraftModel { model: String },
    CityPair { origin: String, destination: String },
    AirportCharge { fleet: String, airport: String, charge_type: ChargeType },
}

/// A cost term that was treated as zero because the reference tables had
/// no matching record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingReference {
    pub flight: usize,
    pub kind: MissingKind,
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MissingKind::AircraftModel { model } => {
                write!(f, "flight {}: no cost row for model {model}", self.flight)
            }
            MissingKind::CityPair { origin, destination } => {
                write!(f, "flight {}: no distance for {origin}-{destination}", self.flight)
            }
            MissingKind::AirportCharge { fleet, airport, charge_type } => write!(
                f,
                "flight {}: no {charge_type} charge at {airport} for fleet {fleet}",
                self.flight
            ),
        }
    }
}

/// Tabulated cost of every (flight, pool slot) pair.
#[derive(Debug, Clone)]
pub struct CostModel {
    flights: usize,
    pool_size: usize,
    /// Row-major `[flight][slot]`.
    table: Vec<f64>,
    missing: Vec<MissingReference>,
}

impl CostModel {
    /// Builds the cost table for `instance`.
    ///
    /// With `cancellation_allowed` the pool gets one extra slot, the null
    /// aircraft, priced at [`CANCELLATION_PENALTY`] for every flight.
    pub fn new(instance: &Instance, cancellation_allowed: bool) -> Self {
        let flights = instance.flights.len();
        let real = instance.aircraft.len();
        let pool_size = instance.pool_size(cancellation_allowed);
        let mut audit = Audit::default();

        let distances: Vec<f64> = instance
            .flights
            .iter()
            .enumerate()
            .map(|(f, flight)| {
                match instance
                    .city_pairs
                    .iter()
                    .find(|p| p.connects(&flight.origin, &flight.destination))
                {
                    Some(pair) => pair.distance_nm,
                    None => {
                        audit.note(
                            f,
                            MissingKind::CityPair {
                                origin: flight.origin.clone(),
                                destination: flight.destination.clone(),
                            },
                        );
                        0.0
                    }
                }
            })
            .collect();

        // Several aircraft usually share a model; price each model once.
        let mut columns: HashMap<&str, Vec<f64>> = HashMap::new();
        for aircraft in &instance.aircraft {
            if columns.contains_key(aircraft.model.as_str()) {
                continue;
            }
            let column = instance
                .flights
                .iter()
                .enumerate()
                .map(|(f, flight)| {
                    model_cost(instance, f, flight, &aircraft.model, distances[f], &mut audit)
                })
                .collect();
            columns.insert(aircraft.model.as_str(), column);
        }

        let mut table = vec![0.0; flights * pool_size];
        for f in 0..flights {
            let row = &mut table[f * pool_size..(f + 1) * pool_size];
            for (a, cell) in row.iter_mut().enumerate() {
                *cell = if a < real {
                    columns[instance.aircraft[a].model.as_str()][f]
                } else {
                    CANCELLATION_PENALTY
                };
            }
        }

        let missing = audit.entries;
        if !missing.is_empty() {
            tracing::warn!(
                count = missing.len(),
                "reference data incomplete; unmatched cost terms count as zero"
            );
            for m in &missing {
                tracing::debug!("{m}");
            }
        }

        Self {
            flights,
            pool_size,
            table,
            missing,
        }
    }

    /// Untruncated cost of serving `flight` with `aircraft`.
    #[inline]
    pub fn flight_cost(&self, flight: usize, aircraft: AircraftId) -> f64 {
        debug_assert!(flight < self.flights && aircraft.index() < self.pool_size);
        self.table[flight * self.pool_size + aircraft.index()]
    }

    /// Total cost of a full assignment, truncated to an integer.
    pub fn evaluate(&self, assignments: &[Assignment]) -> i64 {
        let total: f64 = assignments
            .iter()
            .map(|a| self.flight_cost(a.flight, a.aircraft))
            .sum();
        total as i64
    }

    /// Cost terms that had no matching reference record.
    pub fn missing_references(&self) -> &[MissingReference] {
        &self.missing
    }

    pub fn flight_count(&self) -> usize {
        self.flights
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }
}

fn model_cost(
    instance: &Instance,
    f: usize,
    flight: &Flight,
    model: &str,
    distance_nm: f64,
    audit: &mut Audit,
) -> f64 {
    let Some(row) = instance.models.iter().find(|m| m.model == model) else {
        audit.note(
            f,
            MissingKind::AircraftModel {
                model: model.to_string(),
            },
        );
        return 0.0;
    };

    let minutes = flight.scheduled_minutes() as f64;
    2.0 * row.handling_cost
        + row.fuel_cost_per_minute * minutes
        + row.maintenance_cost_per_minute * minutes
        + row.atc_cost_per_nautical_mile * distance_nm
        + airport_charges(&instance.charges, f, flight, &row.fleet, audit)
}

/// Landing at origin, landing at destination and parking at destination.
///
/// Records are scanned in table order; each fills the first still-empty
/// category it matches, and the scan stops once all three are filled.
fn airport_charges(
    charges: &[AirportCharge],
    f: usize,
    flight: &Flight,
    fleet: &str,
    audit: &mut Audit,
) -> f64 {
    let wanted = [
        (flight.origin.as_str(), ChargeType::Landing),
        (flight.destination.as_str(), ChargeType::Landing),
        (flight.destination.as_str(), ChargeType::Parking),
    ];
    let mut found: [Option<f64>; 3] = [None; 3];

    for charge in charges.iter().filter(|c| c.fleet == fleet) {
        let slot = wanted.iter().zip(found.iter()).position(|(&(airport, kind), hit)| {
            hit.is_none() && charge.airport == airport && charge.charge_type == kind
        });
        if let Some(slot) = slot {
            found[slot] = Some(charge.amount);
            if found.iter().all(Option::is_some) {
                break;
            }
        }
    }

    for (&(airport, charge_type), hit) in wanted.iter().zip(found.iter()) {
        if hit.is_none() {
            audit.note(
                f,
                MissingKind::AirportCharge {
                    fleet: fleet.to_string(),
                    airport: airport.to_string(),
                    charge_type,
                },
            );
        }
    }

    found.iter().flatten().sum()
}

/// Unmatched reference lookups, deduplicated, in discovery order.
#[derive(Default)]
struct Audit {
    seen: HashSet<MissingReference>,
    entries: Vec<MissingReference>,
}

impl Audit {
    fn note(&mut self, flight: usize, kind: MissingKind) {
        let entry = MissingReference { flight, kind };
        if !self.seen.contains(&entry) {
            self.seen.insert(entry.clone());
            self.entries.push(entry);
        }
    }
}
