//! Plain-text run report.

use std::path::Path;

use super::runner::AbcResult;
use crate::error::FleetError;
use crate::model::Instance;

impl AbcResult {
    /// Renders the run parameters, statistics and best assignment.
    pub fn render(&self, instance: &Instance) -> String {
        let mut lines = vec![
            "Artificial bee colony optimization".to_string(),
            "ABC parameters:".to_string(),
            format!("MAX_CYCLE_NUMBER: {}", self.max_cycles),
            format!("COLONY_SIZE: {}", self.colony_size),
            format!("LIMIT_TRIALS: {}", self.limit),
            "Run results:".to_string(),
            format!("\t- flights: {}", self.flight_count),
            format!("\t- aircrafts: {}", self.aircraft_count),
            format!("\t- runtime in ms: {}  ms", self.runtime.as_millis()),
            format!("\t- cycles completed: {}", self.cycles),
        ];
        if self.cancelled {
            lines.push("\t- cancelled before completion".to_string());
        }
        lines.extend([
            format!("\t- first best: {}", self.first_best),
            format!("\t- last best: {}", self.last_best),
            format!("\t- improvement rate: {:.2} %", self.improvement_rate()),
            format!("\t- optimum found in cycle no. {}", self.best_cycle),
            format!("\t- scout resets: {}", self.scout_resets),
            "\n\nBEST SOLUTION:\n".to_string(),
        ]);
        lines.extend(self.best.describe(instance));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Writes [`render`](Self::render) to `path`.
    pub fn write_report(
        &self,
        instance: &Instance,
        path: impl AsRef<Path>,
    ) -> Result<(), FleetError> {
        let path = path.as_ref();
        std::fs::write(path, self.render(instance)).map_err(|source| FleetError::Io {
            file: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }
}
