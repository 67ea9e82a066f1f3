//! Flight, fleet and reference-table records.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Calendar date a flight operates on.
pub type FlightDate = NaiveDate;

/// A scheduled flight.
///
/// Identity is the flight's position in [`Instance::flights`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub origin: String,
    pub destination: String,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub date: FlightDate,
}

impl Flight {
    /// Scheduled block time in whole minutes.
    ///
    /// An arrival stamped earlier than the departure is read as a same-day
    /// clock difference and wrapped into `[0, 1440)`.
    pub fn scheduled_minutes(&self) -> i64 {
        let minutes = (self.arrival - self.departure).num_minutes();
        if minutes < 0 {
            minutes.rem_euclid(MINUTES_PER_DAY)
        } else {
            minutes
        }
    }
}

/// A physical aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    pub registration: String,
    pub model: String,
}

/// Index of an aircraft in the engine's aircraft pool.
///
/// When cancellation is allowed the pool holds one extra slot past the
/// real fleet: the null aircraft, meaning "flight cancelled".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AircraftId(pub usize);

impl AircraftId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// Returns `true` if this id is the null aircraft of a fleet with
    /// `real_count` real aircraft.
    #[inline]
    pub fn is_cancelled(self, real_count: usize) -> bool {
        self.0 >= real_count
    }
}

impl fmt::Display for AircraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One flight bound to one pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub flight: usize,
    pub aircraft: AircraftId,
}

/// Per-model cost coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftModel {
    pub model: String,
    pub handling_cost: f64,
    pub fuel_cost_per_minute: f64,
    pub maintenance_cost_per_minute: f64,
    pub atc_cost_per_nautical_mile: f64,
    pub fleet: String,
}

/// Great-circle distance between two airports; direction does not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityPair {
    pub origin: String,
    pub destination: String,
    pub distance_nm: f64,
}

impl CityPair {
    /// Matches the pair in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.origin == a && self.destination == b) || (self.origin == b && self.destination == a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeType {
    #[serde(rename = "LND")]
    Landing,
    #[serde(rename = "PRK")]
    Parking,
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeType::Landing => f.write_str("LND"),
            ChargeType::Parking => f.write_str("PRK"),
        }
    }
}

/// A fee levied by an airport on one fleet class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportCharge {
    pub fleet: String,
    pub airport: String,
    pub charge_type: ChargeType,
    pub amount: f64,
}

/// Everything the optimizer reads: the flight schedule, the fleet and the
/// three cost reference tables. Loaded once, never mutated by the search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instance {
    pub flights: Vec<Flight>,
    pub aircraft: Vec<Aircraft>,
    pub models: Vec<AircraftModel>,
    pub city_pairs: Vec<CityPair>,
    pub charges: Vec<AirportCharge>,
}

impl Instance {
    /// Number of aircraft slots available to the search, including the
    /// null aircraft when cancellation is allowed.
    pub fn pool_size(&self, cancellation_allowed: bool) -> usize {
        self.aircraft.len() + usize::from(cancellation_allowed)
    }

    /// Human-readable label for a pool slot.
    pub fn aircraft_label(&self, id: AircraftId) -> String {
        match self.aircraft.get(id.index()) {
            Some(ac) => format!("{} ({})", ac.registration, ac.model),
            None => "CANCELLED".to_string(),
        }
    }
}
