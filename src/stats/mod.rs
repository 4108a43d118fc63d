//! Stats module - KPIs and aggregate queries

mod aggregates;
mod calculator;

pub use aggregates::{AggregateReport, Aggregator, GroupTotal};
pub use calculator::{KpiSet, StatsCalculator};
