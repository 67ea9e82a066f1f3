//! Artificial Bee Colony (ABC) search over flight-to-aircraft assignments.
//!
//! A colony keeps `colony_size / 2` food sources, each a complete
//! assignment in which no aircraft flies twice on one date. Every cycle
//! runs three phases:
//!
//! 1. **Employed bees**: each food source is perturbed once towards a
//!    random other source.
//! 2. **Onlooker bees**: sources are revisited with probability growing
//!    with their fitness until `colony_size / 2` perturbations are done.
//! 3. **Scout bees**: sources whose trial counter reached the limit are
//!    replaced by fresh random assignments, unless they cost as much as
//!    the current best.
//!
//! # Key Types
//!
//! - [`AbcConfig`]: cycle count, colony size, abandonment limit, seed
//! - [`Colony`]: the population and its phases
//! - [`FoodSource`]: one assignment with its cached objective and trials
//! - [`AbcRunner`] / [`AbcResult`]: the cycle loop and its statistics
//!
//! # References
//!
//! - Karaboga (2005), "An Idea Based on Honey Bee Swarm for Numerical
//!   Optimization", TR06, Erciyes University
//! - Karaboga & Basturk (2007), "A powerful and efficient algorithm for
//!   numerical function optimization: artificial bee colony (ABC) algorithm"

mod colony;
mod config;
mod food_source;
mod report;
mod runner;

pub use colony::{fold_index, Colony, MAX_FITNESS};
pub use config::AbcConfig;
pub use food_source::{is_feasible, FoodSource, Occupancy};
pub use runner::{AbcResult, AbcRunner};
