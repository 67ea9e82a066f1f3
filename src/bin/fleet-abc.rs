//! Runs the bee colony search on a directory of CSV reference data and
//! writes a text report next to the working directory.
//!
//! ```text
//! fleet-abc <data-dir> [cycles] [colony-size] [limit-divider] [seed] [--allow-cancel]
//! ```

use anyhow::{bail, Context};
use fleet_abc::abc::{AbcConfig, AbcRunner};
use fleet_abc::model::Instance;
use tracing_subscriber::EnvFilter;

fn parse<T>(value: Option<&String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v.parse().with_context(|| format!("invalid {name}: {v}")),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut allow_cancel = false;
    let mut args = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--allow-cancel" {
            allow_cancel = true;
        } else {
            args.push(arg);
        }
    }

    let Some(data_dir) = args.first() else {
        bail!(
            "usage: fleet-abc <data-dir> [cycles] [colony-size] [limit-divider] [seed] \
             [--allow-cancel]"
        );
    };

    let defaults = AbcConfig::default();
    let mut config = AbcConfig::default()
        .with_max_cycles(parse(args.get(1), "cycles", defaults.max_cycles)?)
        .with_colony_size(parse(args.get(2), "colony size", defaults.colony_size)?)
        .with_limit_divider(parse(args.get(3), "limit divider", defaults.limit_divider)?)
        .with_cancellation(allow_cancel);
    if let Some(seed) = args.get(4) {
        config = config.with_seed(parse(Some(seed), "seed", 0u64)?);
    }

    let instance = Instance::from_dir(data_dir)
        .with_context(|| format!("loading reference data from {data_dir}"))?;
    let result = AbcRunner::run(&instance, &config)?;

    let report = format!(
        "TEST-ABC-{}-{}-{}.txt",
        config.max_cycles, config.colony_size, config.limit_divider
    );
    result.write_report(&instance, &report)?;

    tracing::info!(
        first_best = result.first_best,
        last_best = result.last_best,
        improvement = result.improvement_rate(),
        best_cycle = result.best_cycle,
        report = %report,
        "done"
    );
    Ok(())
}
