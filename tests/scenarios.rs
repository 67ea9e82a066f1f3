//! End-to-end runs on small hand-built schedules.

use chrono::NaiveDate;
use fleet_abc::abc::{AbcConfig, AbcRunner, Colony};
use fleet_abc::cost::{CostModel, CANCELLATION_PENALTY};
use fleet_abc::model::{
    Aircraft, AircraftId, AircraftModel, AirportCharge, ChargeType, CityPair, Flight, Instance,
};
use fleet_abc::FleetError;
use u_numflow::random::create_rng;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn flight(origin: &str, destination: &str, d: u32, dep: u32, arr: u32) -> Flight {
    Flight {
        origin: origin.into(),
        destination: destination.into(),
        departure: day(d).and_hms_opt(dep, 0, 0).unwrap(),
        arrival: day(d).and_hms_opt(arr, 0, 0).unwrap(),
        date: day(d),
    }
}

fn aircraft(models: &[&str]) -> Vec<Aircraft> {
    models
        .iter()
        .enumerate()
        .map(|(i, m)| Aircraft {
            registration: format!("YU-T{i:02}"),
            model: m.to_string(),
        })
        .collect()
}

fn model(name: &str, handling: f64, fuel: f64, fleet: &str) -> AircraftModel {
    AircraftModel {
        model: name.into(),
        handling_cost: handling,
        fuel_cost_per_minute: fuel,
        maintenance_cost_per_minute: 8.0,
        atc_cost_per_nautical_mile: 0.5,
        fleet: fleet.into(),
    }
}

fn tables(instance: &mut Instance) {
    instance.city_pairs = vec![
        CityPair {
            origin: "BEG".into(),
            destination: "ZRH".into(),
            distance_nm: 520.0,
        },
        CityPair {
            origin: "BEG".into(),
            destination: "VIE".into(),
            distance_nm: 260.0,
        },
    ];
    for fleet in ["NB", "RJ"] {
        for airport in ["BEG", "ZRH", "VIE"] {
            instance.charges.push(AirportCharge {
                fleet: fleet.into(),
                airport: airport.into(),
                charge_type: ChargeType::Landing,
                amount: if fleet == "NB" { 400.0 } else { 150.0 },
            });
            instance.charges.push(AirportCharge {
                fleet: fleet.into(),
                airport: airport.into(),
                charge_type: ChargeType::Parking,
                amount: 60.0,
            });
        }
    }
}

#[test]
fn three_flights_two_aircraft_five_cycles() {
    let mut instance = Instance {
        flights: vec![
            flight("BEG", "ZRH", 1, 8, 10),
            flight("ZRH", "BEG", 1, 12, 14),
            flight("BEG", "VIE", 2, 7, 8),
        ],
        aircraft: aircraft(&["A319", "CRJ9"]),
        models: vec![model("A319", 300.0, 40.0, "NB"), model("CRJ9", 150.0, 22.0, "RJ")],
        ..Instance::default()
    };
    tables(&mut instance);

    let config = AbcConfig::default()
        .with_colony_size(4)
        .with_max_cycles(5)
        .with_limit_divider(1)
        .with_seed(2024);
    let result = AbcRunner::run(&instance, &config).unwrap();

    assert_eq!(result.cycles, 5);
    assert_eq!(result.cost_history.len(), 5);
    assert!(result.last_best >= 0);
    assert_eq!(result.last_best, result.best.objective());
    assert!(result.best.is_consistent(&instance.flights));
}

#[test]
fn identical_costs_never_abandon() {
    let mut instance = Instance {
        flights: (1..=4).map(|d| flight("BEG", "ZRH", d, 8, 10)).collect(),
        aircraft: aircraft(&["A319", "A319", "A319"]),
        models: vec![model("A319", 300.0, 40.0, "NB")],
        ..Instance::default()
    };
    tables(&mut instance);

    // Every feasible assignment costs the same.
    let cost = CostModel::new(&instance, false);
    let mut colony = Colony::new(&instance, &cost, 4, 0, 100, create_rng(17)).unwrap();
    let reference = colony.best().objective();
    assert!(colony.sources().iter().all(|s| s.objective() == reference));

    colony.employed_phase();
    colony.compute_fitness();
    for source in colony.sources() {
        assert_eq!(source.fitness(), 100.0);
        assert_eq!(source.selection_probability(), 1.0);
        assert!(source.trials() >= 1, "equal-cost moves count as failures");
    }

    // Limit 0 makes every source eligible, yet all tie with the best.
    colony.update_best();
    assert_eq!(colony.scout_phase().unwrap(), 0);

    let config = AbcConfig::default()
        .with_colony_size(8)
        .with_max_cycles(12)
        .with_limit_divider(12)
        .with_seed(5);
    let result = AbcRunner::run(&instance, &config).unwrap();
    assert_eq!(result.scout_resets, 0);
    assert_eq!(result.first_best, result.last_best);
    assert_eq!(result.best_cycle, 0);
    assert_eq!(result.improvement_rate(), 0.0);
}

#[test]
fn single_aircraft_same_date_cancels_one_flight() {
    let mut instance = Instance {
        flights: vec![flight("BEG", "ZRH", 3, 8, 10), flight("ZRH", "BEG", 3, 12, 14)],
        aircraft: aircraft(&["A319"]),
        models: vec![model("A319", 300.0, 40.0, "NB")],
        ..Instance::default()
    };
    tables(&mut instance);

    let config = AbcConfig::default()
        .with_colony_size(4)
        .with_max_cycles(5)
        .with_cancellation(true)
        .with_seed(8);
    let result = AbcRunner::run(&instance, &config).unwrap();

    let cancelled = result
        .best
        .nectar()
        .iter()
        .filter(|a| a.aircraft.is_cancelled(instance.aircraft.len()))
        .count();
    let served = result
        .best
        .nectar()
        .iter()
        .filter(|a| a.aircraft == AircraftId(0))
        .count();
    assert_eq!(cancelled, 1);
    assert_eq!(served, 1);
    assert!(result.last_best as f64 >= CANCELLATION_PENALTY);
    assert!(result.best.is_consistent(&instance.flights));
}

#[test]
fn single_aircraft_same_date_without_cancellation_is_infeasible() {
    let instance = Instance {
        flights: vec![flight("BEG", "ZRH", 3, 8, 10), flight("ZRH", "BEG", 3, 12, 14)],
        aircraft: aircraft(&["A319"]),
        models: vec![model("A319", 300.0, 40.0, "NB")],
        ..Instance::default()
    };

    let config = AbcConfig::default().with_colony_size(4).with_seed(8);
    let err = AbcRunner::run(&instance, &config).unwrap_err();
    assert!(matches!(err, FleetError::NoFeasibleAircraft { flight: 1, .. }));
}

#[test]
fn fixed_seed_reproduces_report_body() {
    let mut instance = Instance {
        flights: vec![
            flight("BEG", "ZRH", 1, 8, 10),
            flight("ZRH", "BEG", 1, 11, 13),
            flight("BEG", "VIE", 1, 14, 15),
            flight("VIE", "BEG", 2, 9, 10),
            flight("BEG", "ZRH", 2, 12, 14),
            flight("ZRH", "BEG", 3, 16, 18),
        ],
        aircraft: aircraft(&["A319", "CRJ9", "A319", "CRJ9"]),
        models: vec![model("A319", 300.0, 40.0, "NB"), model("CRJ9", 150.0, 22.0, "RJ")],
        ..Instance::default()
    };
    tables(&mut instance);

    let config = AbcConfig::default()
        .with_colony_size(10)
        .with_max_cycles(25)
        .with_limit_divider(5)
        .with_seed(99);
    let a = AbcRunner::run(&instance, &config).unwrap();
    let b = AbcRunner::run(&instance, &config).unwrap();

    assert_eq!(a.best.describe(&instance), b.best.describe(&instance));
    assert_eq!(a.first_best, b.first_best);
    assert_eq!(a.last_best, b.last_best);
    assert_eq!(a.best_cycle, b.best_cycle);
    assert_eq!(a.scout_resets, b.scout_resets);
}
