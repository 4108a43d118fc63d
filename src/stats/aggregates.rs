//! Aggregate Queries
//! The six fixed analytical tables behind the dashboard charts. Each one is
//! computed over the whole dataset, independent of the sidebar filter.

use super::calculator::percentage;
use crate::data::schema::{column_total, FTQ, NUM_KILLED, PERIOD, REGION, TOTAL_CRASHES};
use crate::data::{CauseCategory, CrashTable};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

pub const TOP_FATAL_REGION_PERIODS: usize = 10;
pub const TOP_DEADLIEST_REGIONS: usize = 10;
pub const TOP_CRASH_REGIONS: usize = 15;
pub const TOP_REASONS: usize = 5;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Deaths summed for one region within one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPeriodTotal {
    pub region: String,
    pub period: String,
    pub value: i64,
}

/// A value summed over one group (a region or a period).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTotal {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CauseTotal {
    pub cause: CauseCategory,
    pub count: i64,
}

/// Cause totals, largest first. Equal totals keep column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseRanking {
    pub ranked: Vec<CauseTotal>,
}

impl CauseRanking {
    pub fn main_reason(&self) -> Option<&CauseTotal> {
        self.ranked.first()
    }

    pub fn top_reasons(&self) -> &[CauseTotal] {
        &self.ranked[..self.ranked.len().min(TOP_REASONS)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareRow {
    pub category: &'static str,
    pub count: i64,
    /// Percentage of all crashes; `None` when there are no crashes.
    pub percentage: Option<f64>,
}

/// Crashes attributed to faulty vehicles against every other crash.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleFaultShare {
    pub faulty: ShareRow,
    pub other: ShareRow,
}

impl VehicleFaultShare {
    pub fn rows(&self) -> [&ShareRow; 2] {
        [&self.faulty, &self.other]
    }
}

/// All six aggregate tables, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub fatal_region_periods: Vec<RegionPeriodTotal>,
    pub deadliest_regions: Vec<GroupTotal>,
    pub crash_regions: Vec<GroupTotal>,
    pub causes: CauseRanking,
    pub crashes_by_period: Vec<GroupTotal>,
    pub vehicle_fault: VehicleFaultShare,
}

pub struct Aggregator;

impl Aggregator {
    pub fn report<T: CrashTable + ?Sized>(table: &T) -> Result<AggregateReport, StatsError> {
        let report = AggregateReport {
            fatal_region_periods: Self::top_fatal_region_periods(table)?,
            deadliest_regions: Self::top_deadliest_regions(table)?,
            crash_regions: Self::top_crash_regions(table)?,
            causes: Self::cause_ranking(table)?,
            crashes_by_period: Self::crashes_by_period(table)?,
            vehicle_fault: Self::vehicle_fault_share(table)?,
        };
        debug!(
            region_periods = report.fatal_region_periods.len(),
            regions = report.crash_regions.len(),
            periods = report.crashes_by_period.len(),
            "aggregates computed"
        );
        Ok(report)
    }

    /// (region, period) pairs with the most deaths.
    pub fn top_fatal_region_periods<T: CrashTable + ?Sized>(
        table: &T,
    ) -> Result<Vec<RegionPeriodTotal>, StatsError> {
        let frame = Self::top_groups(
            table.frame(),
            &[REGION, PERIOD],
            NUM_KILLED,
            TOP_FATAL_REGION_PERIODS,
        )?;

        let regions = frame.column(REGION)?.str()?;
        let periods = frame.column(PERIOD)?.str()?;
        let values = frame.column(NUM_KILLED)?.i64()?;

        let rows = regions
            .into_iter()
            .zip(periods)
            .zip(values)
            .map(|((region, period), value)| RegionPeriodTotal {
                region: region.unwrap_or_default().to_string(),
                period: period.unwrap_or_default().to_string(),
                value: value.unwrap_or(0),
            })
            .collect();
        Ok(rows)
    }

    /// Regions with the most deaths over the whole dataset.
    pub fn top_deadliest_regions<T: CrashTable + ?Sized>(
        table: &T,
    ) -> Result<Vec<GroupTotal>, StatsError> {
        let frame = Self::top_groups(table.frame(), &[REGION], NUM_KILLED, TOP_DEADLIEST_REGIONS)?;
        Self::group_totals(&frame, REGION, NUM_KILLED)
    }

    /// Regions with the most crashes over the whole dataset.
    pub fn top_crash_regions<T: CrashTable + ?Sized>(
        table: &T,
    ) -> Result<Vec<GroupTotal>, StatsError> {
        let frame = Self::top_groups(table.frame(), &[REGION], TOTAL_CRASHES, TOP_CRASH_REGIONS)?;
        Self::group_totals(&frame, REGION, TOTAL_CRASHES)
    }

    /// Every cause column summed and ranked.
    pub fn cause_ranking<T: CrashTable + ?Sized>(table: &T) -> Result<CauseRanking, StatsError> {
        let mut ranked = CauseCategory::ALL
            .iter()
            .map(|&cause| -> PolarsResult<CauseTotal> {
                Ok(CauseTotal {
                    cause,
                    count: column_total(table.frame(), cause.column())?,
                })
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        // stable: ties stay in column order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(CauseRanking { ranked })
    }

    /// Crash totals per period, in period key order.
    pub fn crashes_by_period<T: CrashTable + ?Sized>(
        table: &T,
    ) -> Result<Vec<GroupTotal>, StatsError> {
        let frame = Self::group_sums(table.frame(), &[PERIOD], TOTAL_CRASHES).collect()?;
        Self::group_totals(&frame, PERIOD, TOTAL_CRASHES)
    }

    /// Faulty-vehicle crashes versus all other crashes.
    pub fn vehicle_fault_share<T: CrashTable + ?Sized>(
        table: &T,
    ) -> Result<VehicleFaultShare, StatsError> {
        let total = column_total(table.frame(), TOTAL_CRASHES)?;
        let faulty = column_total(table.frame(), FTQ)?;
        let other = total - faulty;

        Ok(VehicleFaultShare {
            faulty: ShareRow {
                category: "Faulty Vehicles",
                count: faulty,
                percentage: percentage(faulty, total),
            },
            other: ShareRow {
                category: "All Other Crashes",
                count: other,
                percentage: percentage(other, total),
            },
        })
    }

    /// Sum `value` per group, ordered by the group keys.
    fn group_sums(frame: &DataFrame, keys: &[&str], value: &str) -> LazyFrame {
        let keys: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
        frame
            .clone()
            .lazy()
            .group_by(keys.clone())
            .agg([col(value).sum()])
            .sort_by_exprs(keys, SortMultipleOptions::default())
    }

    /// Sum `value` per group, rank descending and keep the first `limit`.
    /// The ranking sort is stable over key order, so ties are listed by key.
    fn top_groups(
        frame: &DataFrame,
        keys: &[&str],
        value: &str,
        limit: usize,
    ) -> PolarsResult<DataFrame> {
        Self::group_sums(frame, keys, value)
            .sort_by_exprs(
                [col(value)],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .limit(limit as IdxSize)
            .collect()
    }

    fn group_totals(
        frame: &DataFrame,
        key: &str,
        value: &str,
    ) -> Result<Vec<GroupTotal>, StatsError> {
        let labels = frame.column(key)?.str()?;
        let values = frame.column(value)?.i64()?;

        let rows = labels
            .into_iter()
            .zip(values)
            .map(|(label, value)| GroupTotal {
                label: label.unwrap_or_default().to_string(),
                value: value.unwrap_or(0),
            })
            .collect();
        Ok(rows)
    }
}
