//! Data module - CSV loading, schema and filtering

mod criteria;
mod loader;
mod processor;
pub mod schema;

#[cfg(test)]
pub mod fixtures;

pub use criteria::{CountBounds, FilterCriteria};
pub use loader::{DataLoader, Dataset};
pub use processor::{filter, CrashTable};
pub use schema::{CauseCategory, CrashRecord};
