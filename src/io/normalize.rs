//! Unit conversion and scaling of the raw input series, performed before
//! the optimizer runs: spot prices arrive in EUR/MWh, PV output as raw
//! feed-in of an arbitrary reference plant, the load profile in
//! unnormalized kW.

/// Mean capacity factor the scaled PV output is anchored to.
const PV_CAPACITY_FACTOR: f64 = 0.12;

/// EUR/MWh -> EUR/kWh.
pub fn prices_eur_per_kwh(prices_eur_per_mwh: &[f64]) -> Vec<f64> {
    prices_eur_per_mwh.iter().map(|p| p / 1000.0).collect()
}

/// Min-max normalizes the raw PV series and rescales it so that the mean
/// output corresponds to `pv_capacity` at the reference capacity factor.
/// A zero capacity (PV integration off) yields an all-zero series.
pub fn scale_pv_output(raw: &[f64], pv_capacity: f64) -> Vec<f64> {
    if raw.is_empty() || pv_capacity == 0.0 {
        return vec![0.0; raw.len()];
    }
    let min = raw.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = raw.iter().sum::<f64>() / raw.len() as f64;
    if mean == 0.0 || max == min {
        return vec![0.0; raw.len()];
    }
    let factor = pv_capacity * PV_CAPACITY_FACTOR * max / mean;
    raw.iter()
        .map(|v| (v - min) / (max - min) * factor)
        .collect()
}

/// Scales the load profile so its energy sum matches the target annual
/// consumption.
pub fn scale_load_profile(raw: &[f64], annual_consumption: f64) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    if total == 0.0 {
        return vec![0.0; raw.len()];
    }
    let factor = annual_consumption / total;
    raw.iter().map(|v| v * factor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_mwh_prices_to_kwh() {
        assert_eq!(prices_eur_per_kwh(&[80.0, -5.0]), vec![0.08, -0.005]);
    }

    #[test]
    fn load_profile_sums_to_annual_consumption() {
        let scaled = scale_load_profile(&[1.0, 3.0, 2.0, 2.0], 4500.0);
        let total: f64 = scaled.iter().sum();
        assert!((total - 4500.0).abs() < 1e-9);
        // Shape is preserved.
        assert!((scaled[1] / scaled[0] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_load_profile_stays_zero() {
        assert_eq!(scale_load_profile(&[0.0, 0.0], 4500.0), vec![0.0, 0.0]);
    }

    #[test]
    fn pv_scaling_matches_reference_formula() {
        let raw = [0.0, 2.0, 4.0, 2.0];
        let scaled = scale_pv_output(&raw, 10.0);
        // normalized = (v - min) / (max - min), factor = cap * 0.12 * max / mean
        let factor = 10.0 * 0.12 * 4.0 / 2.0;
        let expected: Vec<f64> = raw.iter().map(|v| v / 4.0 * factor).collect();
        for (s, e) in scaled.iter().zip(&expected) {
            assert!((s - e).abs() < 1e-9, "{s} != {e}");
        }
    }

    #[test]
    fn zero_capacity_disables_pv() {
        assert_eq!(scale_pv_output(&[1.0, 2.0], 0.0), vec![0.0, 0.0]);
    }

    #[test]
    fn flat_pv_series_scales_to_zero() {
        assert_eq!(scale_pv_output(&[3.0, 3.0, 3.0], 10.0), vec![0.0, 0.0, 0.0]);
    }
}
