use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::SystemParams;
use crate::optimizer::Strategy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub run: RunConfig,
    pub data: DataConfig,
    pub battery: BatteryConfig,
    pub pv: PvConfig,
    pub grid: GridConfig,
    pub finance: FinanceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// `"perfect_foresight"` or `"day_ahead"`, case-insensitive.
    pub strategy: String,
    pub fixed_purchase_price: bool,
    pub battery_integration: bool,
    pub pv_integration: bool,
    /// Years the cumulative profit curves are extended over.
    pub extension_years: usize,
    pub delta_t_hours: f64,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub price_file: PathBuf,
    pub pv_file: PathBuf,
    pub load_file: PathBuf,
    /// Sub-hourly sample counts; 1 means the file is already hourly.
    pub pv_samples_per_hour: usize,
    pub load_samples_per_hour: usize,
    /// Repeat Feb 28 of the load profile as Feb 29.
    pub leap_year: bool,
    /// Timestamp of the first step, used for the exported timeseries.
    pub start_time: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatteryConfig {
    pub capacity_min_kwh: f64,
    pub capacity_max_kwh: f64,
    pub charge_power_max_kw: f64,
    pub discharge_power_max_kw: f64,
    pub efficiency: f64,
    pub initial_soc_kwh: f64,
    pub investment_cost_per_kwh: f64,
    pub fixed_cost_eur: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PvConfig {
    pub capacity_kwp: f64,
    pub feed_in_tariff_eur_per_kwh: f64,
    pub investment_cost_per_kwp: f64,
    pub fixed_cost_eur: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    pub power_max_kw: f64,
    pub reference_fixed_price_eur_per_kwh: f64,
    pub annual_consumption_kwh: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinanceConfig {
    pub power_electronics_cost_eur: f64,
    pub inflation_rate: f64,
    pub interest_rate: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("BD__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    /// Parsed strategy selector; fails before anything else runs.
    pub fn strategy(&self) -> Result<Strategy> {
        Ok(Strategy::parse(&self.run.strategy)?)
    }

    /// Builds the immutable, validated parameter set the core consumes,
    /// with the integration toggles already applied.
    pub fn system_params(&self) -> Result<SystemParams> {
        let params = SystemParams {
            battery_capacity_min: self.battery.capacity_min_kwh,
            battery_capacity_max: self.battery.capacity_max_kwh,
            charge_power_max: self.battery.charge_power_max_kw,
            discharge_power_max: self.battery.discharge_power_max_kw,
            efficiency: self.battery.efficiency,
            delta_t: self.run.delta_t_hours,
            initial_soc: self.battery.initial_soc_kwh,
            grid_power_max: self.grid.power_max_kw,
            pv_capacity: self.pv.capacity_kwp,
            feed_in_tariff: self.pv.feed_in_tariff_eur_per_kwh,
            reference_fixed_price: self.grid.reference_fixed_price_eur_per_kwh,
            annual_consumption: self.grid.annual_consumption_kwh,
            battery_investment_cost: self.battery.investment_cost_per_kwh,
            battery_fixed_cost: self.battery.fixed_cost_eur,
            pv_investment_cost: self.pv.investment_cost_per_kwp,
            pv_fixed_cost: self.pv.fixed_cost_eur,
            power_electronics_cost: self.finance.power_electronics_cost_eur,
            inflation_rate: self.finance.inflation_rate,
            interest_rate: self.finance.interest_rate,
        }
        .apply_integrations(self.run.battery_integration, self.run.pv_integration);
        params
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid system parameters: {e}"))?;
        Ok(params)
    }
}
