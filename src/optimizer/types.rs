use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

/// Errors raised by the dispatch core.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown optimization strategy \"{0}\", expected \"perfect_foresight\" or \"day_ahead\"")]
    UnknownStrategy(String),

    #[error("input series lengths differ: prices={prices}, pv_output={pv}, load_profile={load}")]
    LengthMismatch { prices: usize, pv: usize, load: usize },

    #[error("empty time horizon, nothing to optimize")]
    EmptyHorizon,

    /// The LP for the window `[start, end)` came back infeasible,
    /// unbounded or otherwise unsolved. Fatal; there is no partial-result
    /// mode and no constraint relaxation.
    #[error("dispatch window [{start}, {end}) failed to solve: {status}")]
    WindowSolve {
        start: usize,
        end: usize,
        status: String,
    },
}

/// How the horizon is partitioned into solve windows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum::Display,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One window spanning the whole horizon, full price knowledge.
    PerfectForesight,
    /// Consecutive 24-step windows chained only through the battery SOC.
    DayAhead,
}

impl Strategy {
    /// Case-insensitive parse of the configured selector. Fails before any
    /// model is built.
    pub fn parse(s: &str) -> Result<Self, DispatchError> {
        Self::from_str(s).map_err(|_| DispatchError::UnknownStrategy(s.to_string()))
    }
}

/// The three aligned input series. Lengths are checked once at
/// construction; timestamp alignment is assumed, not re-verified.
#[derive(Debug, Clone)]
pub struct DispatchInput {
    prices: Vec<f64>,
    pv_output: Vec<f64>,
    load_profile: Vec<f64>,
}

impl DispatchInput {
    pub fn new(
        prices: Vec<f64>,
        pv_output: Vec<f64>,
        load_profile: Vec<f64>,
    ) -> Result<Self, DispatchError> {
        if prices.len() != pv_output.len() || prices.len() != load_profile.len() {
            return Err(DispatchError::LengthMismatch {
                prices: prices.len(),
                pv: pv_output.len(),
                load: load_profile.len(),
            });
        }
        Ok(Self {
            prices,
            pv_output,
            load_profile,
        })
    }

    /// Number of time steps `T`.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn pv_output(&self) -> &[f64] {
        &self.pv_output
    }

    pub fn load_profile(&self) -> &[f64] {
        &self.load_profile
    }
}
