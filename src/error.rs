//! Error type shared by loading, cost evaluation and the search engine.

use chrono::NaiveDate;

use crate::cost::MissingReference;

/// Errors produced by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    /// The engine configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No aircraft in the pool is free on the flight's date.
    #[error("no feasible aircraft for flight {flight} on {date}")]
    NoFeasibleAircraft { flight: usize, date: NaiveDate },

    /// A reference table has no entry needed to cost an assignment.
    ///
    /// Only raised when strict reference data is requested.
    #[error("missing reference datum: {0}")]
    MissingReference(MissingReference),

    /// The instance has no flights or no aircraft.
    #[error("instance must contain at least one flight and one aircraft")]
    EmptyInstance,

    #[error("io error on {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
}
