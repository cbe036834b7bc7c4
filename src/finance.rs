//! Post-hoc financial aggregation: investment costs and cumulative profit
//! series derived from a solved dispatch schedule.
//!
//! All profit series run over `horizon steps x extension_years` entries:
//! the one-year cumulative curve is replayed year after year, each year
//! starting from the previous year's final value, then shifted by the
//! (discounted) investment cost.

use itertools::izip;
use serde::Serialize;

use crate::domain::SystemParams;

/// Discounted up-front investment, split by asset.
#[derive(Debug, Clone, Serialize)]
pub struct InvestmentCosts {
    pub battery: f64,
    pub pv: f64,
    pub power_electronics: f64,
}

pub fn investment_costs(params: &SystemParams) -> InvestmentCosts {
    let discount = (1.0 + params.inflation_rate) / (1.0 + params.interest_rate);
    InvestmentCosts {
        battery: (params.battery_capacity_max * params.battery_investment_cost
            + params.battery_fixed_cost)
            * discount,
        pv: (params.pv_capacity * params.pv_investment_cost + params.pv_fixed_cost) * discount,
        power_electronics: params.power_electronics_cost * discount,
    }
}

/// Cumulative cost of charging the battery from the grid, negated into a
/// profit curve and offset by the battery investment.
pub fn battery_profit(
    prices: &[f64],
    charge_from_grid: &[f64],
    delta_t: f64,
    investment_cost: f64,
    years: usize,
) -> Vec<f64> {
    let mut acc = 0.0;
    let profit: Vec<f64> = izip!(prices, charge_from_grid)
        .map(|(p, c)| {
            acc += p * c;
            -acc * delta_t
        })
        .collect();
    offset_by(extend_over_years(&profit, years), investment_cost)
}

/// Cumulative feed-in revenue, offset by the PV investment.
pub fn pv_profit(
    sell_pv: &[f64],
    delta_t: f64,
    investment_cost: f64,
    years: usize,
    feed_in_tariff: f64,
) -> Vec<f64> {
    let mut acc = 0.0;
    let profit: Vec<f64> = sell_pv
        .iter()
        .map(|s| {
            acc += s * feed_in_tariff * delta_t;
            acc
        })
        .collect();
    offset_by(extend_over_years(&profit, years), investment_cost)
}

/// Savings of spot-price purchasing against the flat reference tariff.
/// Zero by definition when the run already purchases at the fixed price.
pub fn effective_purchase_profit(
    params: &SystemParams,
    prices: &[f64],
    buy_from_grid: &[f64],
    delta_t: f64,
    years: usize,
    fixed_purchase_price: bool,
) -> Vec<f64> {
    if fixed_purchase_price {
        return vec![0.0; prices.len() * years];
    }
    let baseline = params.reference_fixed_price * params.annual_consumption;
    let mut acc = 0.0;
    let profit: Vec<f64> = izip!(prices, buy_from_grid)
        .map(|(p, b)| {
            acc += p * b * delta_t;
            baseline - acc
        })
        .collect();
    extend_over_years(&profit, years)
}

/// Element-wise total across the three profit components, less the power
/// electronics investment.
pub fn total_profit(
    battery: &[f64],
    pv: &[f64],
    purchase: &[f64],
    power_electronics_cost: f64,
) -> Vec<f64> {
    izip!(battery, pv, purchase)
        .map(|(b, p, e)| b + p + e - power_electronics_cost)
        .collect()
}

/// Replays a one-year cumulative curve over `years` years; every year
/// continues from the previous year's final value.
fn extend_over_years(profit: &[f64], years: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(profit.len() * years);
    let mut base = 0.0;
    for _ in 0..years {
        for p in profit {
            out.push(p + base);
        }
        base = out.last().copied().unwrap_or(0.0);
    }
    out
}

fn offset_by(mut series: Vec<f64>, investment_cost: f64) -> Vec<f64> {
    for v in &mut series {
        *v -= investment_cost;
    }
    series
}
