//! Data Processor Module
//! Applies filter criteria to a crash table with Polars lazy expressions.

use super::criteria::{CountBounds, FilterCriteria};
use super::schema::{self, CauseCategory, CrashRecord, PERIOD, REGION};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// A table with the crash schema: the loaded dataset or a filtered subset.
pub trait CrashTable {
    fn frame(&self) -> &DataFrame;

    fn height(&self) -> usize {
        self.frame().height()
    }

    fn records(&self) -> PolarsResult<Vec<CrashRecord>> {
        schema::records_from_frame(self.frame())
    }
}

/// Rows of a table that matched a set of criteria, in their original order.
#[derive(Debug, Clone)]
pub struct FilteredView {
    frame: DataFrame,
}

impl CrashTable for FilteredView {
    fn frame(&self) -> &DataFrame {
        &self.frame
    }
}

/// Keep the rows matching every criterion.
///
/// Region and period must match exactly and each count must lie within its
/// bounds. When causes are selected a row must also have at least one of them
/// recorded.
pub fn filter<T: CrashTable + ?Sized>(
    table: &T,
    criteria: &FilterCriteria,
) -> Result<FilteredView, ProcessorError> {
    let frame = table
        .frame()
        .clone()
        .lazy()
        .filter(predicate(criteria))
        .collect()?;

    debug!(
        region = %criteria.region,
        period = %criteria.period,
        causes = criteria.causes.len(),
        rows_in = table.height(),
        rows_out = frame.height(),
        "filter applied"
    );

    Ok(FilteredView { frame })
}

fn predicate(criteria: &FilterCriteria) -> Expr {
    let base = col(REGION)
        .eq(lit(criteria.region.as_str()))
        .and(col(PERIOD).eq(lit(criteria.period.as_str())));

    let bounded = criteria
        .bounds()
        .into_iter()
        .fold(base, |acc, (column, bounds)| acc.and(within(column, bounds)));

    match any_cause(&criteria.causes) {
        Some(causes) => bounded.and(causes),
        None => bounded,
    }
}

fn within(column: &str, bounds: CountBounds) -> Expr {
    col(column)
        .gt_eq(lit(bounds.min))
        .and(col(column).lt_eq(lit(bounds.max)))
}

/// OR over the selected cause columns; `None` when nothing is selected.
fn any_cause(causes: &[CauseCategory]) -> Option<Expr> {
    causes
        .iter()
        .map(|cause| col(cause.column()).gt(lit(0i64)))
        .reduce(|acc, expr| acc.or(expr))
}
