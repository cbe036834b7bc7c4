use anyhow::{Context, Result};
use battery_dispatch::{config::Config, finance, telemetry};
use battery_dispatch::io::{export, loader, normalize};
use battery_dispatch::optimizer::{DispatchInput, DispatchOptimizer};
use serde_json::json;
use std::fs;
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load().context("loading configuration")?;
    let strategy = cfg.strategy()?;
    let params = cfg.system_params()?;

    info!(
        %strategy,
        fixed_purchase_price = cfg.run.fixed_purchase_price,
        battery = cfg.run.battery_integration,
        pv = cfg.run.pv_integration,
        "starting battery dispatch run"
    );

    // Load and normalize the three input series.
    let raw_prices = loader::read_series(&cfg.data.price_file).context("reading price data")?;
    let raw_pv = loader::read_series(&cfg.data.pv_file).context("reading PV data")?;
    let raw_load = loader::read_series(&cfg.data.load_file).context("reading load profile")?;

    let raw_pv = loader::aggregate_hourly(&raw_pv, cfg.data.pv_samples_per_hour);
    let mut raw_load = loader::aggregate_hourly(&raw_load, cfg.data.load_samples_per_hour);
    if cfg.data.leap_year {
        raw_load = loader::insert_leap_day(raw_load).context("patching leap day")?;
    }

    let prices = normalize::prices_eur_per_kwh(&raw_prices);
    let pv_output = normalize::scale_pv_output(&raw_pv, params.pv_capacity);
    let load_profile = normalize::scale_load_profile(&raw_load, params.annual_consumption);
    info!(steps = prices.len(), "input series loaded");

    // Solve the dispatch problem over the full horizon.
    let input = DispatchInput::new(prices.clone(), pv_output, load_profile.clone())?;
    let optimizer = DispatchOptimizer::new(params.clone(), strategy, cfg.run.fixed_purchase_price);
    let schedule = optimizer.optimize(&input)?;
    let summary = schedule.summary(params.delta_t);
    info!(
        grid_import_kwh = summary.grid_import_kwh,
        pv_sold_kwh = summary.pv_sold_kwh,
        final_soc_kwh = summary.final_soc_kwh,
        "dispatch schedule solved"
    );

    // Financial aggregation over the extension horizon.
    let costs = finance::investment_costs(&params);
    let battery_profit = finance::battery_profit(
        &prices,
        &schedule.charge_from_grid,
        params.delta_t,
        costs.battery,
        cfg.run.extension_years,
    );
    let pv_profit = finance::pv_profit(
        &schedule.sell_pv,
        params.delta_t,
        costs.pv,
        cfg.run.extension_years,
        params.feed_in_tariff,
    );
    let purchase_profit = finance::effective_purchase_profit(
        &params,
        &prices,
        &schedule.buy_from_grid,
        params.delta_t,
        cfg.run.extension_years,
        cfg.run.fixed_purchase_price,
    );
    let total_profit = finance::total_profit(
        &battery_profit,
        &pv_profit,
        &purchase_profit,
        costs.power_electronics,
    );

    // Write the result bundle.
    fs::create_dir_all(&cfg.run.output_dir).context("creating output directory")?;
    let timeseries_path = cfg.run.output_dir.join("results_timeseries.csv");
    export::export_csv(
        &timeseries_path,
        cfg.data.start_time,
        &schedule,
        &prices,
        &load_profile,
        &total_profit,
    )
    .context("writing results timeseries")?;

    let summary_path = cfg.run.output_dir.join("summary.json");
    let summary_file = fs::File::create(&summary_path).context("creating summary file")?;
    serde_json::to_writer_pretty(
        summary_file,
        &json!({
            "schedule_id": schedule.id,
            "strategy": strategy,
            "dispatch": summary,
            "investment_costs": costs,
            "final_total_profit_eur": total_profit.last(),
        }),
    )
    .context("writing run summary")?;

    info!(
        timeseries = %timeseries_path.display(),
        summary = %summary_path.display(),
        "results written"
    );
    Ok(())
}
