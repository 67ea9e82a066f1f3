//! Problem data: the flight schedule, the fleet and the cost reference
//! tables, plus CSV loading.

mod loader;
mod types;

pub use loader::{AIRCRAFT_FILE, CHARGES_FILE, CITY_PAIRS_FILE, FLIGHTS_FILE, MODELS_FILE};
pub use types::{
    Aircraft, AircraftId, AircraftModel, AirportCharge, Assignment, ChargeType, CityPair, Flight,
    FlightDate, Instance,
};
