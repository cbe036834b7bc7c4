use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{DispatchSchedule, SystemParams};
use crate::optimizer::model::{self, WindowSolution};
use crate::optimizer::{horizon, DispatchError, DispatchInput, Strategy};

/// Number of steps per day-ahead window (hourly steps, one day).
pub const DAY_AHEAD_STEPS: usize = 24;

/// Orchestrates the dispatch optimization: partitions the horizon
/// according to the strategy, solves each window in order and stitches
/// the solutions into a full-horizon schedule.
///
/// Windows are strictly sequential: each one's initial SOC is the final
/// solved SOC of its predecessor, so window `k + 1` cannot start before
/// window `k` is solved.
pub struct DispatchOptimizer {
    params: SystemParams,
    strategy: Strategy,
    fixed_purchase_price: bool,
}

impl DispatchOptimizer {
    pub fn new(params: SystemParams, strategy: Strategy, fixed_purchase_price: bool) -> Self {
        Self {
            params,
            strategy,
            fixed_purchase_price,
        }
    }

    pub fn optimize(&self, input: &DispatchInput) -> Result<DispatchSchedule, DispatchError> {
        let total = input.len();
        if total == 0 {
            return Err(DispatchError::EmptyHorizon);
        }
        let window_len = match self.strategy {
            Strategy::PerfectForesight => total,
            Strategy::DayAhead => DAY_AHEAD_STEPS,
        };

        let mut stitcher = Stitcher::new(total, self.params.initial_soc);
        for window in horizon::windows(total, window_len) {
            debug!(start = window.start, end = window.end, "solving dispatch window");
            let solution = model::solve_window(
                &input.prices()[window.clone()],
                &input.pv_output()[window.clone()],
                &input.load_profile()[window.clone()],
                &self.params,
                stitcher.current_soc(),
                self.fixed_purchase_price,
                window.start,
            )?;
            stitcher.push(solution);
        }

        let schedule = stitcher.finish(self.strategy);
        info!(
            strategy = %self.strategy,
            steps = schedule.steps(),
            final_soc = schedule.soc.last().copied().unwrap_or(0.0),
            "dispatch horizon solved"
        );
        Ok(schedule)
    }
}

/// Concatenates window solutions in time order. Each window's `soc[0]`
/// repeats the previous window's final SOC and is skipped on append.
struct Stitcher {
    initial_soc: f64,
    charge_from_grid: Vec<f64>,
    buy_from_grid: Vec<f64>,
    charge_from_pv: Vec<f64>,
    use_pv: Vec<f64>,
    use_battery: Vec<f64>,
    sell_pv: Vec<f64>,
    soc: Vec<f64>,
}

impl Stitcher {
    fn new(total_steps: usize, initial_soc: f64) -> Self {
        let mut soc = Vec::with_capacity(total_steps + 1);
        soc.push(initial_soc);
        Self {
            initial_soc,
            charge_from_grid: Vec::with_capacity(total_steps),
            buy_from_grid: Vec::with_capacity(total_steps),
            charge_from_pv: Vec::with_capacity(total_steps),
            use_pv: Vec::with_capacity(total_steps),
            use_battery: Vec::with_capacity(total_steps),
            sell_pv: Vec::with_capacity(total_steps),
            soc,
        }
    }

    /// SOC hand-off value for the next window's boundary constraint.
    fn current_soc(&self) -> f64 {
        self.soc.last().copied().unwrap_or(self.initial_soc)
    }

    fn push(&mut self, w: WindowSolution) {
        self.charge_from_grid.extend(w.charge_from_grid);
        self.buy_from_grid.extend(w.buy_from_grid);
        self.charge_from_pv.extend(w.charge_from_pv);
        self.use_pv.extend(w.use_pv);
        self.use_battery.extend(w.use_battery);
        self.sell_pv.extend(w.sell_pv);
        self.soc.extend(&w.soc[1..]);
    }

    fn finish(self, strategy: Strategy) -> DispatchSchedule {
        DispatchSchedule {
            id: Uuid::new_v4(),
            created_at: Utc::now().fixed_offset(),
            strategy,
            charge_from_grid: self.charge_from_grid,
            buy_from_grid: self.buy_from_grid,
            charge_from_pv: self.charge_from_pv,
            use_pv: self.use_pv,
            use_battery: self.use_battery,
            sell_pv: self.sell_pv,
            soc: self.soc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(flows: f64, soc: Vec<f64>) -> WindowSolution {
        let n = soc.len() - 1;
        WindowSolution {
            charge_from_grid: vec![flows; n],
            buy_from_grid: vec![flows; n],
            charge_from_pv: vec![flows; n],
            use_pv: vec![flows; n],
            use_battery: vec![flows; n],
            sell_pv: vec![flows; n],
            soc,
        }
    }

    #[test]
    fn stitcher_skips_repeated_soc_boundary() {
        let mut stitcher = Stitcher::new(4, 1.0);
        assert_eq!(stitcher.current_soc(), 1.0);

        stitcher.push(window(0.5, vec![1.0, 2.0, 3.0]));
        assert_eq!(stitcher.current_soc(), 3.0);

        stitcher.push(window(0.25, vec![3.0, 2.5, 4.0]));
        let schedule = stitcher.finish(Strategy::DayAhead);

        assert_eq!(schedule.steps(), 4);
        assert_eq!(schedule.soc, vec![1.0, 2.0, 3.0, 2.5, 4.0]);
        assert_eq!(schedule.buy_from_grid, vec![0.5, 0.5, 0.25, 0.25]);
    }

    #[test]
    fn stitcher_seeds_initial_soc() {
        let stitcher = Stitcher::new(0, 7.5);
        let schedule = stitcher.finish(Strategy::PerfectForesight);
        assert_eq!(schedule.soc, vec![7.5]);
        assert!(schedule.is_empty());
    }
}
