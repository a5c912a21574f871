pub mod count;
pub mod generate;
pub mod stats;
pub mod sync;
pub mod update;
pub mod upgrade;
