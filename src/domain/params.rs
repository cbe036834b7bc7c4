use serde::{Deserialize, Serialize};

/// Physical and contractual parameters of the site, fixed for a whole run.
///
/// Constructed once from configuration (with the battery/PV integration
/// toggles already applied) and validated before the optimizer ever sees it.
/// Energy in kWh, power in kW, prices in EUR/kWh, `delta_t` in hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemParams {
    pub battery_capacity_min: f64,
    pub battery_capacity_max: f64,
    pub charge_power_max: f64,
    pub discharge_power_max: f64,
    /// Round-trip efficiency; the model splits it as sqrt on each path.
    pub efficiency: f64,
    /// Time-step duration in hours.
    pub delta_t: f64,
    pub initial_soc: f64,
    pub grid_power_max: f64,
    pub pv_capacity: f64,
    pub feed_in_tariff: f64,
    /// Flat purchase price used when the run fixes the purchase price.
    pub reference_fixed_price: f64,
    pub annual_consumption: f64,

    // Investment-related parameters, consumed only by the finance layer.
    pub battery_investment_cost: f64,
    pub battery_fixed_cost: f64,
    pub pv_investment_cost: f64,
    pub pv_fixed_cost: f64,
    pub power_electronics_cost: f64,
    pub inflation_rate: f64,
    pub interest_rate: f64,
}

impl SystemParams {
    /// Zeroes out battery and/or PV parameters when the corresponding
    /// integration is switched off, so the optimizer never has to know
    /// about the toggles.
    pub fn apply_integrations(mut self, battery: bool, pv: bool) -> Self {
        if !battery {
            self.battery_capacity_max = 0.0;
            self.battery_investment_cost = 0.0;
            self.battery_fixed_cost = 0.0;
            self.charge_power_max = 0.0;
            self.discharge_power_max = 0.0;
            self.initial_soc = 0.0;
        }
        if !pv {
            self.pv_capacity = 0.0;
            self.pv_investment_cost = 0.0;
            self.pv_fixed_cost = 0.0;
            self.feed_in_tariff = 0.0;
        }
        self
    }

    /// Validate that the parameter set is physically possible.
    pub fn validate(&self) -> Result<(), String> {
        if self.battery_capacity_min < 0.0 {
            return Err("battery_capacity_min must be non-negative".to_string());
        }
        if self.battery_capacity_max < self.battery_capacity_min {
            return Err("battery_capacity_max must be >= battery_capacity_min".to_string());
        }
        if self.charge_power_max < 0.0 {
            return Err("charge_power_max must be non-negative".to_string());
        }
        if self.discharge_power_max < 0.0 {
            return Err("discharge_power_max must be non-negative".to_string());
        }
        if self.efficiency <= 0.0 || self.efficiency > 1.0 {
            return Err("efficiency must be in (0, 1]".to_string());
        }
        if self.delta_t <= 0.0 {
            return Err("delta_t must be positive".to_string());
        }
        if self.initial_soc < self.battery_capacity_min
            || self.initial_soc > self.battery_capacity_max
        {
            return Err(
                "initial_soc must lie within [battery_capacity_min, battery_capacity_max]"
                    .to_string(),
            );
        }
        if self.grid_power_max < 0.0 {
            return Err("grid_power_max must be non-negative".to_string());
        }
        if self.pv_capacity < 0.0 {
            return Err("pv_capacity must be non-negative".to_string());
        }
        if self.annual_consumption < 0.0 {
            return Err("annual_consumption must be non-negative".to_string());
        }
        Ok(())
    }
}
