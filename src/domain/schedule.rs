use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::optimizer::Strategy;

/// Full-horizon dispatch solution: six flow series of length `T` and the
/// battery state of charge at every step boundary (length `T + 1`).
///
/// Produced once per optimizer invocation and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSchedule {
    pub id: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub strategy: Strategy,
    /// Grid power routed into the battery (kW).
    pub charge_from_grid: Vec<f64>,
    /// Grid power serving the load directly (kW).
    pub buy_from_grid: Vec<f64>,
    /// PV power routed into the battery (kW).
    pub charge_from_pv: Vec<f64>,
    /// PV power serving the load directly (kW).
    pub use_pv: Vec<f64>,
    /// Battery power serving the load (kW).
    pub use_battery: Vec<f64>,
    /// PV power exported at the feed-in tariff (kW).
    pub sell_pv: Vec<f64>,
    /// Battery state of charge at step boundaries (kWh), length `steps() + 1`.
    pub soc: Vec<f64>,
}

/// Aggregate totals of a schedule, for logging and the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub steps: usize,
    pub grid_import_kwh: f64,
    pub pv_used_kwh: f64,
    pub pv_sold_kwh: f64,
    pub battery_discharge_kwh: f64,
    pub final_soc_kwh: f64,
}

impl DispatchSchedule {
    /// Number of time steps in the horizon.
    pub fn steps(&self) -> usize {
        self.buy_from_grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps() == 0
    }

    pub fn summary(&self, delta_t: f64) -> DispatchSummary {
        let energy = |series: &[f64]| series.iter().sum::<f64>() * delta_t;
        DispatchSummary {
            steps: self.steps(),
            grid_import_kwh: energy(&self.buy_from_grid) + energy(&self.charge_from_grid),
            pv_used_kwh: energy(&self.use_pv) + energy(&self.charge_from_pv),
            pv_sold_kwh: energy(&self.sell_pv),
            battery_discharge_kwh: energy(&self.use_battery),
            final_soc_kwh: self.soc.last().copied().unwrap_or(0.0),
        }
    }
}
