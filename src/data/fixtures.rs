//! In-memory crash tables for unit tests.

use super::loader::Dataset;
use super::schema::*;
use polars::prelude::*;

pub fn record(region: &str, period: &str) -> CrashRecord {
    CrashRecord {
        region: region.to_string(),
        period: period.to_string(),
        ..CrashRecord::default()
    }
}

impl CrashRecord {
    pub fn cause_count(&self, cause: CauseCategory) -> i64 {
        match cause {
            CauseCategory::SpeedViolation => self.speed_violation,
            CauseCategory::DrivingUnderInfluence => self.under_influence,
            CauseCategory::PoorWeather => self.poor_weather,
            CauseCategory::FaultyVehicle => self.faulty_vehicle,
            CauseCategory::Other => self.other_factors,
        }
    }

    /// A cause counts as recorded when at least one crash is attributed to it.
    pub fn has_cause(&self, cause: CauseCategory) -> bool {
        self.cause_count(cause) > 0
    }

    pub fn crashes(mut self, n: i64) -> Self {
        self.total_crashes = n;
        self
    }

    pub fn injured(mut self, n: i64) -> Self {
        self.injured = n;
        self
    }

    pub fn killed(mut self, n: i64) -> Self {
        self.killed = n;
        self
    }

    pub fn vehicles(mut self, n: i64) -> Self {
        self.vehicles = n;
        self
    }

    pub fn cause(mut self, cause: CauseCategory, n: i64) -> Self {
        let slot = match cause {
            CauseCategory::SpeedViolation => &mut self.speed_violation,
            CauseCategory::DrivingUnderInfluence => &mut self.under_influence,
            CauseCategory::PoorWeather => &mut self.poor_weather,
            CauseCategory::FaultyVehicle => &mut self.faulty_vehicle,
            CauseCategory::Other => &mut self.other_factors,
        };
        *slot = n;
        self
    }

    /// Mark each listed cause with a single crash.
    pub fn causes(self, causes: &[CauseCategory]) -> Self {
        causes.iter().fold(self, |rec, &cause| rec.cause(cause, 1))
    }
}

pub fn frame_from_records(records: &[CrashRecord]) -> PolarsResult<DataFrame> {
    let labels = |get: fn(&CrashRecord) -> &str| -> Vec<String> {
        records.iter().map(|r| get(r).to_string()).collect()
    };
    let counts = |get: fn(&CrashRecord) -> i64| -> Vec<i64> { records.iter().map(get).collect() };

    DataFrame::new(vec![
        Column::new(REGION.into(), labels(|r| r.region.as_str())),
        Column::new(PERIOD.into(), labels(|r| r.period.as_str())),
        Column::new(TOTAL_CRASHES.into(), counts(|r| r.total_crashes)),
        Column::new(NUM_INJURED.into(), counts(|r| r.injured)),
        Column::new(NUM_KILLED.into(), counts(|r| r.killed)),
        Column::new(TOTAL_VEHICLES.into(), counts(|r| r.vehicles)),
        Column::new(SPV.into(), counts(|r| r.speed_violation)),
        Column::new(DAD.into(), counts(|r| r.under_influence)),
        Column::new(PWR.into(), counts(|r| r.poor_weather)),
        Column::new(FTQ.into(), counts(|r| r.faulty_vehicle)),
        Column::new(OTHER_FACTORS.into(), counts(|r| r.other_factors)),
    ])
}

pub fn dataset(records: &[CrashRecord]) -> Dataset {
    let frame = frame_from_records(records).unwrap();
    Dataset::from_frame(&frame, "memory.csv").unwrap()
}

/// A small table in the shape of the quarterly state reports.
pub fn sample_dataset() -> Dataset {
    use CauseCategory::*;

    dataset(&[
        record("Lagos", "Q1 2020")
            .crashes(40)
            .injured(30)
            .killed(6)
            .vehicles(55)
            .cause(SpeedViolation, 20)
            .cause(FaultyVehicle, 4)
            .cause(Other, 16),
        record("Kano", "Q1 2020")
            .crashes(25)
            .injured(12)
            .killed(9)
            .vehicles(31)
            .cause(SpeedViolation, 10)
            .cause(DrivingUnderInfluence, 5)
            .cause(Other, 10),
        record("Oyo", "Q1 2020")
            .crashes(10)
            .injured(8)
            .killed(1)
            .vehicles(14)
            .cause(PoorWeather, 3)
            .cause(Other, 7),
        record("Lagos", "Q2 2020")
            .crashes(35)
            .injured(22)
            .killed(3)
            .vehicles(47)
            .cause(SpeedViolation, 15)
            .cause(DrivingUnderInfluence, 2)
            .cause(FaultyVehicle, 3)
            .cause(Other, 15),
        record("Kano", "Q2 2020")
            .crashes(20)
            .injured(11)
            .killed(12)
            .vehicles(26)
            .cause(PoorWeather, 6)
            .cause(Other, 14),
        record("Oyo", "Q2 2020")
            .crashes(0)
            .injured(0)
            .killed(0)
            .vehicles(0),
    ])
}
