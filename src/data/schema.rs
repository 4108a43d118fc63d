//! Crash Table Schema
//! Column contract of the crash dataset, record type and validation.

use polars::prelude::*;
use thiserror::Error;

pub const REGION: &str = "State";
pub const PERIOD: &str = "Quarter";
pub const TOTAL_CRASHES: &str = "Total_Crashes";
pub const NUM_INJURED: &str = "Num_Injured";
pub const NUM_KILLED: &str = "Num_Killed";
pub const TOTAL_VEHICLES: &str = "Total_Vehicles_Involved";
pub const SPV: &str = "SPV";
pub const DAD: &str = "DAD";
pub const PWR: &str = "PWR";
pub const FTQ: &str = "FTQ";
pub const OTHER_FACTORS: &str = "Other_Factors";

/// Label columns, read as strings.
pub const LABEL_COLUMNS: [&str; 2] = [REGION, PERIOD];

/// Count columns, read as non-negative 64-bit integers.
pub const COUNT_COLUMNS: [&str; 9] = [
    TOTAL_CRASHES,
    NUM_INJURED,
    NUM_KILLED,
    TOTAL_VEHICLES,
    SPV,
    DAD,
    PWR,
    FTQ,
    OTHER_FACTORS,
];

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("column '{0}' has empty cells")]
    MissingValues(&'static str),
    #[error("column '{0}' is not an integer column")]
    NotNumeric(&'static str),
    #[error("column '{0}' contains negative values")]
    Negative(&'static str),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// A recorded cause of crashes. Each cause maps to one count column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CauseCategory {
    SpeedViolation,
    DrivingUnderInfluence,
    PoorWeather,
    FaultyVehicle,
    Other,
}

impl CauseCategory {
    pub const ALL: [CauseCategory; 5] = [
        CauseCategory::SpeedViolation,
        CauseCategory::DrivingUnderInfluence,
        CauseCategory::PoorWeather,
        CauseCategory::FaultyVehicle,
        CauseCategory::Other,
    ];

    /// Source column holding the cause count.
    pub fn column(self) -> &'static str {
        match self {
            CauseCategory::SpeedViolation => SPV,
            CauseCategory::DrivingUnderInfluence => DAD,
            CauseCategory::PoorWeather => PWR,
            CauseCategory::FaultyVehicle => FTQ,
            CauseCategory::Other => OTHER_FACTORS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CauseCategory::SpeedViolation => "Speed violation",
            CauseCategory::DrivingUnderInfluence => "Driving under alcohol/drug influence",
            CauseCategory::PoorWeather => "Poor weather",
            CauseCategory::FaultyVehicle => "Faulty vehicle",
            CauseCategory::Other => "Other factors",
        }
    }
}

impl std::fmt::Display for CauseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the crash table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrashRecord {
    pub region: String,
    pub period: String,
    pub total_crashes: i64,
    pub injured: i64,
    pub killed: i64,
    pub vehicles: i64,
    pub speed_violation: i64,
    pub under_influence: i64,
    pub poor_weather: i64,
    pub faulty_vehicle: i64,
    pub other_factors: i64,
}

/// Validate a raw frame against the column contract.
///
/// Returns a frame holding exactly the required columns: labels cast to
/// strings, counts cast to `Int64`. Extra columns are dropped.
pub fn normalize(raw: &DataFrame) -> Result<DataFrame, SchemaError> {
    let mut columns = Vec::with_capacity(LABEL_COLUMNS.len() + COUNT_COLUMNS.len());

    for name in LABEL_COLUMNS {
        let column = raw
            .column(name)
            .map_err(|_| SchemaError::MissingColumn(name))?;
        let series = column.as_materialized_series().cast(&DataType::String)?;
        if series.null_count() > 0 {
            return Err(SchemaError::MissingValues(name));
        }
        columns.push(Column::from(series));
    }

    for name in COUNT_COLUMNS {
        let column = raw
            .column(name)
            .map_err(|_| SchemaError::MissingColumn(name))?;
        if column.null_count() > 0 {
            return Err(SchemaError::MissingValues(name));
        }
        let series = column.as_materialized_series();
        if series.dtype().is_float() && !all_whole(series)? {
            return Err(SchemaError::NotNumeric(name));
        }
        let series = series
            .strict_cast(&DataType::Int64)
            .map_err(|_| SchemaError::NotNumeric(name))?;
        if series.i64()?.into_iter().flatten().any(|v| v < 0) {
            return Err(SchemaError::Negative(name));
        }
        columns.push(Column::from(series));
    }

    Ok(DataFrame::new(columns)?)
}

/// Float columns are accepted as counts only when no value has a fractional
/// part.
fn all_whole(series: &Series) -> PolarsResult<bool> {
    let values = series.cast(&DataType::Float64)?;
    let whole = values.f64()?.into_iter().flatten().all(|v| v.fract() == 0.0);
    Ok(whole)
}

/// Read the rows of a normalized frame back into records.
pub fn records_from_frame(frame: &DataFrame) -> PolarsResult<Vec<CrashRecord>> {
    let regions = frame.column(REGION)?.str()?;
    let periods = frame.column(PERIOD)?.str()?;
    let total_crashes = frame.column(TOTAL_CRASHES)?.i64()?;
    let injured = frame.column(NUM_INJURED)?.i64()?;
    let killed = frame.column(NUM_KILLED)?.i64()?;
    let vehicles = frame.column(TOTAL_VEHICLES)?.i64()?;
    let spv = frame.column(SPV)?.i64()?;
    let dad = frame.column(DAD)?.i64()?;
    let pwr = frame.column(PWR)?.i64()?;
    let ftq = frame.column(FTQ)?.i64()?;
    let other = frame.column(OTHER_FACTORS)?.i64()?;

    let records = (0..frame.height())
        .map(|i| CrashRecord {
            region: regions.get(i).unwrap_or_default().to_string(),
            period: periods.get(i).unwrap_or_default().to_string(),
            total_crashes: total_crashes.get(i).unwrap_or(0),
            injured: injured.get(i).unwrap_or(0),
            killed: killed.get(i).unwrap_or(0),
            vehicles: vehicles.get(i).unwrap_or(0),
            speed_violation: spv.get(i).unwrap_or(0),
            under_influence: dad.get(i).unwrap_or(0),
            poor_weather: pwr.get(i).unwrap_or(0),
            faulty_vehicle: ftq.get(i).unwrap_or(0),
            other_factors: other.get(i).unwrap_or(0),
        })
        .collect();

    Ok(records)
}

/// Sum of an integer column; zero for an empty frame.
pub fn column_total(frame: &DataFrame, name: &str) -> PolarsResult<i64> {
    Ok(frame.column(name)?.i64()?.sum().unwrap_or(0))
}

/// Largest value of an integer column; zero for an empty frame.
pub fn column_max(frame: &DataFrame, name: &str) -> PolarsResult<i64> {
    Ok(frame.column(name)?.i64()?.max().unwrap_or(0))
}

/// Distinct values of a string column in first-appearance order.
pub fn distinct_labels(frame: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let unique = frame.column(name)?.as_materialized_series().unique_stable()?;
    let labels = unique
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{frame_from_records, record};

    fn raw_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(PERIOD.into(), vec!["Q1 2020", "Q2 2020"]),
            Column::new(REGION.into(), vec!["Lagos", "Kano"]),
            Column::new("Notes".into(), vec!["a", "b"]),
            Column::new(TOTAL_CRASHES.into(), vec![10.0, 4.0]),
            Column::new(NUM_INJURED.into(), vec![3i64, 2]),
            Column::new(NUM_KILLED.into(), vec![1i64, 0]),
            Column::new(TOTAL_VEHICLES.into(), vec![12i64, 5]),
            Column::new(SPV.into(), vec![2i64, 0]),
            Column::new(DAD.into(), vec![0i64, 1]),
            Column::new(PWR.into(), vec![0i64, 0]),
            Column::new(FTQ.into(), vec![1i64, 0]),
            Column::new(OTHER_FACTORS.into(), vec![7i64, 3]),
        ])
        .unwrap()
    }

    #[test]
    fn normalize_keeps_required_columns_in_contract_order() {
        let frame = normalize(&raw_frame()).unwrap();

        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut expected = vec![REGION, PERIOD];
        expected.extend(COUNT_COLUMNS);
        assert_eq!(names, expected);
        assert_eq!(frame.column(TOTAL_CRASHES).unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn whole_float_counts_are_accepted() {
        let frame = normalize(&raw_frame()).unwrap();
        let crashes: Vec<Option<i64>> = frame
            .column(TOTAL_CRASHES)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(crashes, vec![Some(10), Some(4)]);
    }

    #[test]
    fn normalize_rejects_fractional_counts() {
        let mut raw = raw_frame();
        raw.with_column(Column::new(TOTAL_CRASHES.into(), vec![10.0, 12.9]))
            .unwrap();
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, SchemaError::NotNumeric(TOTAL_CRASHES)));
    }

    #[test]
    fn normalize_reports_missing_column() {
        let raw = raw_frame().drop(FTQ).unwrap();
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn(FTQ)));
    }

    #[test]
    fn normalize_rejects_negative_counts() {
        let mut raw = raw_frame();
        raw.with_column(Column::new(NUM_KILLED.into(), vec![1i64, -2]))
            .unwrap();
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, SchemaError::Negative(NUM_KILLED)));
    }

    #[test]
    fn normalize_rejects_text_in_count_column() {
        let mut raw = raw_frame();
        raw.with_column(Column::new(SPV.into(), vec!["2", "many"]))
            .unwrap();
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, SchemaError::NotNumeric(SPV)));
    }

    #[test]
    fn normalize_rejects_empty_count_cells() {
        let mut raw = raw_frame();
        raw.with_column(Column::new(DAD.into(), vec![Some(1i64), None]))
            .unwrap();
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, SchemaError::MissingValues(DAD)));
    }

    #[test]
    fn records_survive_a_trip_through_a_frame() {
        let records = vec![
            record("Lagos", "Q1 2020").crashes(10).killed(2),
            record("Kano", "Q1 2020").crashes(3).causes(&[CauseCategory::PoorWeather]),
        ];
        let frame = frame_from_records(&records).unwrap();
        assert_eq!(records_from_frame(&frame).unwrap(), records);
    }

    #[test]
    fn distinct_labels_keep_first_appearance_order() {
        let records = vec![
            record("Oyo", "Q2 2020"),
            record("Abia", "Q1 2020"),
            record("Oyo", "Q1 2020"),
        ];
        let frame = frame_from_records(&records).unwrap();
        assert_eq!(distinct_labels(&frame, REGION).unwrap(), vec!["Oyo", "Abia"]);
        assert_eq!(
            distinct_labels(&frame, PERIOD).unwrap(),
            vec!["Q2 2020", "Q1 2020"]
        );
    }

    #[test]
    fn has_cause_means_positive_count() {
        let rec = record("Lagos", "Q1 2020").causes(&[CauseCategory::Other]);
        assert!(rec.has_cause(CauseCategory::Other));
        assert!(!rec.has_cause(CauseCategory::SpeedViolation));
    }
}
