//! Flight-to-aircraft assignment by Artificial Bee Colony search.
//!
//! Given a flight schedule, a fleet and cost reference tables, the crate
//! searches for a cheap assignment of aircraft to flights such that no
//! aircraft serves two flights on the same date.
//!
//! - [`model`]: flights, aircraft, reference tables and CSV loading
//! - [`cost`]: the per-flight operating cost and the total objective
//! - [`abc`]: the bee colony search and its run report
//!
//! # Example
//!
//! ```no_run
//! use fleet_abc::abc::{AbcConfig, AbcRunner};
//! use fleet_abc::model::Instance;
//!
//! let instance = Instance::from_dir("data").unwrap();
//! let config = AbcConfig::default()
//!     .with_max_cycles(100)
//!     .with_colony_size(20)
//!     .with_seed(42);
//! let result = AbcRunner::run(&instance, &config).unwrap();
//! println!("best cost {}", result.last_best);
//! ```

pub mod abc;
pub mod cost;
pub mod error;
pub mod model;

pub use error::FleetError;
