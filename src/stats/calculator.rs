//! Statistics Calculator Module
//! Headline metrics over the whole crash dataset.

use crate::data::schema::{column_total, DAD, NUM_INJURED, NUM_KILLED, SPV, TOTAL_CRASHES};
use crate::data::CrashTable;
use polars::prelude::*;
use tracing::{debug, warn};

/// Headline metrics shown above the charts.
///
/// Rates are `None` when the dataset records zero crashes, since every rate
/// divides by the crash total.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSet {
    pub total_crashes: i64,
    pub total_injured: i64,
    pub total_deaths: i64,
    pub speed_violations: i64,
    pub under_influence: i64,
    /// Injuries per crash.
    pub injury_rate: Option<f64>,
    /// Deaths per crash.
    pub fatality_rate: Option<f64>,
    /// Speed-violation crashes as a percentage of all crashes.
    pub speed_violation_rate: Option<f64>,
    /// Alcohol/drug crashes as a percentage of all crashes.
    pub under_influence_rate: Option<f64>,
}

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: i64, denominator: i64) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}

/// `100 * part / whole`, or `None` when `whole` is zero.
pub fn percentage(part: i64, whole: i64) -> Option<f64> {
    (whole != 0).then(|| part as f64 * 100.0 / whole as f64)
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the headline metrics. Every sum is taken fresh from the table.
    pub fn compute_kpis<T: CrashTable + ?Sized>(table: &T) -> PolarsResult<KpiSet> {
        let frame = table.frame();
        let total_crashes = column_total(frame, TOTAL_CRASHES)?;
        let total_injured = column_total(frame, NUM_INJURED)?;
        let total_deaths = column_total(frame, NUM_KILLED)?;
        let speed_violations = column_total(frame, SPV)?;
        let under_influence = column_total(frame, DAD)?;

        if total_crashes == 0 {
            warn!("crash total is zero; rates are undefined");
        }

        let kpis = KpiSet {
            total_crashes,
            total_injured,
            total_deaths,
            speed_violations,
            under_influence,
            injury_rate: ratio(total_injured, total_crashes),
            fatality_rate: ratio(total_deaths, total_crashes),
            speed_violation_rate: percentage(speed_violations, total_crashes),
            under_influence_rate: percentage(under_influence, total_crashes),
        };
        debug!(?kpis, "kpis computed");
        Ok(kpis)
    }
}
