//! Filter Criteria
//! The sidebar selection: one region, one period, four count bounds and an
//! optional set of causes.

use super::loader::Dataset;
use super::schema::{CauseCategory, NUM_INJURED, NUM_KILLED, TOTAL_CRASHES, TOTAL_VEHICLES};
use polars::prelude::*;

/// Inclusive bounds on a count column. `min > max` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    pub min: i64,
    pub max: i64,
}

impl CountBounds {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Bounds covering `0..=max`.
    pub fn up_to(max: i64) -> Self {
        Self::new(0, max)
    }

    #[cfg(test)]
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub region: String,
    pub period: String,
    pub injured: CountBounds,
    pub killed: CountBounds,
    pub crashes: CountBounds,
    pub vehicles: CountBounds,
    /// Empty means no cause restriction.
    pub causes: Vec<CauseCategory>,
}

impl FilterCriteria {
    /// Starting selection for a freshly loaded dataset: first region, first
    /// period, every bound spanning `0..=column max`, no causes.
    pub fn for_dataset(dataset: &Dataset) -> PolarsResult<Self> {
        let first = |labels: Vec<String>| labels.into_iter().next().unwrap_or_default();

        Ok(Self {
            region: first(dataset.regions()?),
            period: first(dataset.periods()?),
            injured: CountBounds::up_to(dataset.column_max(NUM_INJURED)?),
            killed: CountBounds::up_to(dataset.column_max(NUM_KILLED)?),
            crashes: CountBounds::up_to(dataset.column_max(TOTAL_CRASHES)?),
            vehicles: CountBounds::up_to(dataset.column_max(TOTAL_VEHICLES)?),
            causes: Vec::new(),
        })
    }

    /// Count bounds paired with the column they restrict.
    pub fn bounds(&self) -> [(&'static str, CountBounds); 4] {
        [
            (NUM_INJURED, self.injured),
            (NUM_KILLED, self.killed),
            (TOTAL_CRASHES, self.crashes),
            (TOTAL_VEHICLES, self.vehicles),
        ]
    }

    pub fn is_cause_selected(&self, cause: CauseCategory) -> bool {
        self.causes.contains(&cause)
    }

    /// Select or deselect a cause. Selection order is kept and duplicates are
    /// ignored.
    pub fn set_cause(&mut self, cause: CauseCategory, selected: bool) {
        if selected {
            if !self.is_cause_selected(cause) {
                self.causes.push(cause);
            }
        } else {
            self.causes.retain(|c| *c != cause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_dataset;

    #[test]
    fn defaults_span_each_column() {
        let criteria = FilterCriteria::for_dataset(&sample_dataset()).unwrap();

        assert_eq!(criteria.region, "Lagos");
        assert_eq!(criteria.period, "Q1 2020");
        assert_eq!(criteria.injured, CountBounds::new(0, 30));
        assert_eq!(criteria.killed, CountBounds::new(0, 12));
        assert_eq!(criteria.crashes, CountBounds::new(0, 40));
        assert_eq!(criteria.vehicles, CountBounds::new(0, 55));
        assert!(criteria.causes.is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = CountBounds::new(2, 5);
        assert!(bounds.contains(2));
        assert!(bounds.contains(5));
        assert!(!bounds.contains(1));
        assert!(!bounds.contains(6));
        assert!(!CountBounds::new(5, 2).contains(3));
    }

    #[test]
    fn set_cause_ignores_duplicates() {
        let mut criteria = FilterCriteria::for_dataset(&sample_dataset()).unwrap();
        criteria.set_cause(CauseCategory::PoorWeather, true);
        criteria.set_cause(CauseCategory::PoorWeather, true);
        criteria.set_cause(CauseCategory::SpeedViolation, true);
        assert_eq!(
            criteria.causes,
            vec![CauseCategory::PoorWeather, CauseCategory::SpeedViolation]
        );

        criteria.set_cause(CauseCategory::PoorWeather, false);
        assert_eq!(criteria.causes, vec![CauseCategory::SpeedViolation]);
    }
}
