pub mod error;
pub mod io;
pub mod label;
pub mod logscan;
pub mod migrate;
pub mod plan;
pub mod reconcile;
pub mod stats;
pub mod store;
pub mod table;

pub use error::{PlanError, Result};
