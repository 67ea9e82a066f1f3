//! ABC execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use u_numflow::random::create_rng;

use super::colony::Colony;
use super::config::AbcConfig;
use super::food_source::FoodSource;
use crate::cost::CostModel;
use crate::error::FleetError;
use crate::model::Instance;

/// Result of an ABC run.
///
/// `first_best` and `last_best` are the colony minimum right after
/// initialization and after the final update. Because the cheapest food
/// source is never abandoned and never accepts a worse move, the colony
/// minimum does not increase between updates, so these coincide with the
/// running best.
#[derive(Debug, Clone)]
pub struct AbcResult {
    /// The cheapest food source at the end of the run.
    pub best: FoodSource,

    /// Colony minimum after initialization.
    pub first_best: i64,

    /// Colony minimum after the last update (equals `best.objective()`).
    pub last_best: i64,

    /// Cycle in which the colony minimum last changed (0 if never).
    pub best_cycle: usize,

    /// Completed cycles.
    pub cycles: usize,

    /// Colony minimum at the start of each completed cycle.
    pub cost_history: Vec<i64>,

    /// Number of food sources replaced by scouts.
    pub scout_resets: usize,

    pub max_cycles: usize,
    pub colony_size: usize,
    pub limit: usize,

    pub flight_count: usize,

    /// Aircraft pool size, including the null aircraft if cancellation was
    /// allowed.
    pub aircraft_count: usize,

    pub runtime: Duration,

    /// Whether cancelled externally.
    pub cancelled: bool,
}

impl AbcResult {
    /// `(first_best - last_best) / first_best` in percent, rounded to two
    /// decimals. Zero when `first_best` is zero.
    pub fn improvement_rate(&self) -> f64 {
        if self.first_best == 0 {
            return 0.0;
        }
        let rate = (self.first_best - self.last_best) as f64 / self.first_best as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}

/// Executes the Artificial Bee Colony search.
///
/// # Usage
///
/// ```ignore
/// let instance = Instance::from_dir("data")?;
/// let config = AbcConfig::default().with_max_cycles(100).with_seed(42);
/// let result = AbcRunner::run(&instance, &config)?;
/// println!("best cost: {}", result.last_best);
/// ```
pub struct AbcRunner;

impl AbcRunner {
    /// Runs the search for `config.max_cycles` cycles.
    pub fn run(instance: &Instance, config: &AbcConfig) -> Result<AbcResult, FleetError> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked before each cycle; a cycle in progress always
    /// completes, so no food source is left half-moved.
    pub fn run_with_cancel(
        instance: &Instance,
        config: &AbcConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AbcResult, FleetError> {
        config.validate().map_err(FleetError::InvalidConfig)?;
        if instance.flights.is_empty() || instance.aircraft.is_empty() {
            return Err(FleetError::EmptyInstance);
        }

        let started = Instant::now();
        let cost = CostModel::new(instance, config.cancellation_allowed);
        if config.strict_reference_data {
            if let Some(missing) = cost.missing_references().first() {
                return Err(FleetError::MissingReference(missing.clone()));
            }
        }

        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let limit = config.limit();
        tracing::info!(
            flights = instance.flights.len(),
            aircraft = cost.pool_size(),
            max_cycles = config.max_cycles,
            colony_size = config.colony_size,
            limit,
            cancellation_allowed = config.cancellation_allowed,
            "starting bee colony search"
        );

        let mut colony = Colony::new(
            instance,
            &cost,
            config.food_number(),
            limit,
            config.max_feasibility_attempts,
            rng,
        )?;

        let first_best = colony.best().objective();
        let mut last_best = first_best;
        let mut best_cycle = 0;
        let mut cost_history = Vec::with_capacity(config.max_cycles);
        let mut scout_resets = 0;
        let mut cancelled = false;

        for cycle in 0..config.max_cycles {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            cost_history.push(colony.best().objective());
            tracing::debug!(cycle, best = colony.best().objective(), "cycle");

            colony.employed_phase();
            colony.compute_fitness();
            colony.onlooker_phase();
            colony.update_best();
            track_best(&colony, cycle, &mut last_best, &mut best_cycle);

            scout_resets += colony.scout_phase()?;
            colony.update_best();
            track_best(&colony, cycle, &mut last_best, &mut best_cycle);
        }

        let cycles = cost_history.len();
        let runtime = started.elapsed();
        let aircraft_count = cost.pool_size();
        let best = colony.into_best();

        tracing::info!(
            cycles,
            first_best,
            last_best,
            best_cycle,
            scout_resets,
            runtime_ms = runtime.as_millis() as u64,
            cancelled,
            "bee colony search finished"
        );

        Ok(AbcResult {
            best,
            first_best,
            last_best,
            best_cycle,
            cycles,
            cost_history,
            scout_resets,
            max_cycles: config.max_cycles,
            colony_size: config.colony_size,
            limit,
            flight_count: instance.flights.len(),
            aircraft_count,
            runtime,
            cancelled,
        })
    }
}

fn track_best<R: rand::Rng>(
    colony: &Colony<'_, R>,
    cycle: usize,
    last_best: &mut i64,
    best_cycle: &mut usize,
) {
    let objective = colony.best().objective();
    if objective != *last_best {
        *last_best = objective;
        *best_cycle = cycle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Aircraft, AircraftModel, Flight};
    use chrono::NaiveDate;

    fn instance() -> Instance {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let dates = [1, 1, 1, 2, 2, 3, 3, 4, 5, 5];
        Instance {
            flights: dates
                .iter()
                .enumerate()
                .map(|(i, &d)| Flight {
                    origin: "BEG".into(),
                    destination: "ZRH".into(),
                    departure: day(d).and_hms_opt(6, 0, 0).unwrap(),
                    arrival: day(d).and_hms_opt(7 + i as u32 % 4, 0, 0).unwrap(),
                    date: day(d),
                })
                .collect(),
            aircraft: ["A319", "A320", "E190", "A319", "ATR72"]
                .iter()
                .enumerate()
                .map(|(i, m)| Aircraft {
                    registration: format!("YU-A{i:02}"),
                    model: m.to_string(),
                })
                .collect(),
            models: [
                ("A319", 300.0, 40.0),
                ("A320", 320.0, 44.0),
                ("E190", 250.0, 30.0),
                ("ATR72", 120.0, 15.0),
            ]
            .iter()
            .map(|&(m, handling, fuel)| AircraftModel {
                model: m.into(),
                handling_cost: handling,
                fuel_cost_per_minute: fuel,
                maintenance_cost_per_minute: 5.0,
                atc_cost_per_nautical_mile: 0.0,
                fleet: "NB".into(),
            })
            .collect(),
            city_pairs: vec![],
            charges: vec![],
        }
    }

    #[test]
    fn test_run_completes_all_cycles() {
        let inst = instance();
        let config = AbcConfig::default()
            .with_max_cycles(30)
            .with_colony_size(10)
            .with_limit_divider(3)
            .with_seed(42);

        let result = AbcRunner::run(&inst, &config).unwrap();

        assert_eq!(result.cycles, 30);
        assert_eq!(result.cost_history.len(), 30);
        assert!(!result.cancelled);
        assert_eq!(result.last_best, result.best.objective());
        assert!(result.last_best <= result.first_best);
        assert!(result.best_cycle < 30);
        assert!(result.best.is_consistent(&inst.flights));
        assert_eq!(result.limit, 10);
        assert_eq!(result.aircraft_count, 5);
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let inst = instance();
        let config = AbcConfig::default().with_max_cycles(40).with_seed(3);

        let result = AbcRunner::run(&inst, &config).unwrap();

        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "colony minimum should not increase: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let inst = instance();
        let config = AbcConfig::default().with_max_cycles(20).with_seed(1234);

        let a = AbcRunner::run(&inst, &config).unwrap();
        let b = AbcRunner::run(&inst, &config).unwrap();

        assert_eq!(a.best.nectar(), b.best.nectar());
        assert_eq!(a.cost_history, b.cost_history);
        assert_eq!(a.best.describe(&inst), b.best.describe(&inst));
    }

    #[test]
    fn test_cancellation() {
        let inst = instance();
        let config = AbcConfig::default().with_max_cycles(1_000).with_seed(42);

        // Set before running so the check is deterministic.
        let cancel = Arc::new(AtomicBool::new(true));
        let result = AbcRunner::run_with_cancel(&inst, &config, Some(cancel)).unwrap();

        assert!(result.cancelled);
        assert_eq!(result.cycles, 0);
        assert_eq!(result.first_best, result.last_best);
    }

    #[test]
    fn test_invalid_config() {
        let inst = instance();
        let config = AbcConfig::default().with_colony_size(2);
        assert!(matches!(
            AbcRunner::run(&inst, &config),
            Err(FleetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_instance() {
        let config = AbcConfig::default();
        assert!(matches!(
            AbcRunner::run(&Instance::default(), &config),
            Err(FleetError::EmptyInstance)
        ));
    }

    #[test]
    fn test_strict_reference_data() {
        let mut inst = instance();
        inst.models.pop();
        let config = AbcConfig::default()
            .with_strict_reference_data(true)
            .with_seed(1);

        assert!(matches!(
            AbcRunner::run(&inst, &config),
            Err(FleetError::MissingReference(_))
        ));
    }

    #[test]
    fn test_improvement_rate() {
        let inst = instance();
        let config = AbcConfig::default().with_max_cycles(1).with_seed(1);
        let mut result = AbcRunner::run(&inst, &config).unwrap();

        result.first_best = 3000;
        result.last_best = 2000;
        assert!((result.improvement_rate() - 33.33).abs() < 1e-9);

        result.first_best = 0;
        assert_eq!(result.improvement_rate(), 0.0);
    }
}
