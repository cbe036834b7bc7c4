//! Battery Dispatch Planner - cost-minimizing dispatch scheduling for a
//! battery storage system co-located with a PV generator and a load.
//!
//! The core is an LP-based dispatch engine (`optimizer`); everything else
//! is configuration, CSV ingest/export and post-hoc financial aggregation.

pub mod config;
pub mod domain;
pub mod finance;
pub mod io;
pub mod optimizer;
pub mod telemetry;
