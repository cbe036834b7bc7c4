//! CSV export of the solved dispatch timeseries.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Duration, FixedOffset};
use itertools::izip;

use crate::domain::DispatchSchedule;

/// Column header for the results timeseries CSV.
const HEADER: &str = "timestamp,soc_kwh,price_eur_per_kwh,charge_from_grid_kw,\
                      charge_from_pv_kw,use_battery_kw,use_pv_kw,sell_pv_kw,\
                      buy_from_grid_kw,load_kw,total_profit_eur";

/// Writes the solved timeseries to a CSV file at the given path.
///
/// One row per time step; the SOC column holds the state at the *end* of
/// each step (`soc[t + 1]`), so the row is self-contained. Produces
/// deterministic output for identical inputs.
pub fn export_csv(
    path: &Path,
    start: DateTime<FixedOffset>,
    schedule: &DispatchSchedule,
    prices: &[f64],
    load: &[f64],
    total_profit: &[f64],
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(buf, start, schedule, prices, load, total_profit)
}

/// Writes the solved timeseries as CSV to any writer.
pub fn write_csv(
    writer: impl Write,
    start: DateTime<FixedOffset>,
    schedule: &DispatchSchedule,
    prices: &[f64],
    load: &[f64],
    total_profit: &[f64],
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let rows = izip!(
        &schedule.soc[1..],
        prices,
        &schedule.charge_from_grid,
        &schedule.charge_from_pv,
        &schedule.use_battery,
        &schedule.use_pv,
        &schedule.sell_pv,
        &schedule.buy_from_grid,
        load,
        total_profit,
    );
    for (t, (soc, price, cg, cp, ub, up, sp, bg, ld, profit)) in rows.enumerate() {
        let timestamp = start + Duration::hours(t as i64);
        wtr.write_record(&[
            timestamp.to_rfc3339(),
            format!("{soc:.4}"),
            format!("{price:.5}"),
            format!("{cg:.4}"),
            format!("{cp:.4}"),
            format!("{ub:.4}"),
            format!("{up:.4}"),
            format!("{sp:.4}"),
            format!("{bg:.4}"),
            format!("{ld:.4}"),
            format!("{profit:.2}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
