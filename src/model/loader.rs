//! CSV loading of an [`Instance`].
//!
//! Each table lives in its own headered CSV file whose column names match
//! the record's field names. Timestamps use ISO 8601
//! (`2024-03-01T08:30:00`), dates `2024-03-01`, charge types `LND`/`PRK`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::types::Instance;
use crate::error::FleetError;

pub const FLIGHTS_FILE: &str = "flights.csv";
pub const AIRCRAFT_FILE: &str = "aircraft.csv";
pub const MODELS_FILE: &str = "aircraft_models.csv";
pub const CITY_PAIRS_FILE: &str = "city_pairs.csv";
pub const CHARGES_FILE: &str = "airport_charges.csv";

impl Instance {
    /// Reads all five tables from `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FleetError> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            let path = dir.join(name);
            File::open(&path).map_err(|source| FleetError::Io {
                file: path.display().to_string(),
                source,
            })
        };

        let instance = Self::from_readers(
            open(FLIGHTS_FILE)?,
            open(AIRCRAFT_FILE)?,
            open(MODELS_FILE)?,
            open(CITY_PAIRS_FILE)?,
            open(CHARGES_FILE)?,
        )?;

        tracing::info!(
            dir = %dir.display(),
            flights = instance.flights.len(),
            aircraft = instance.aircraft.len(),
            models = instance.models.len(),
            city_pairs = instance.city_pairs.len(),
            charges = instance.charges.len(),
            "reference data loaded"
        );
        Ok(instance)
    }

    /// Reads all five tables from arbitrary CSV sources.
    pub fn from_readers<F, A, M, P, C>(
        flights: F,
        aircraft: A,
        models: M,
        city_pairs: P,
        charges: C,
    ) -> Result<Self, FleetError>
    where
        F: Read,
        A: Read,
        M: Read,
        P: Read,
        C: Read,
    {
        Ok(Self {
            flights: read_table(flights, FLIGHTS_FILE)?,
            aircraft: read_table(aircraft, AIRCRAFT_FILE)?,
            models: read_table(models, MODELS_FILE)?,
            city_pairs: read_table(city_pairs, CITY_PAIRS_FILE)?,
            charges: read_table(charges, CHARGES_FILE)?,
        })
    }
}

fn read_table<T: DeserializeOwned, R: Read>(reader: R, file: &str) -> Result<Vec<T>, FleetError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| FleetError::Csv {
            file: file.to_string(),
            source,
        })
}
