//! Weekly posting schedule: time-slot arithmetic, the plan generator, and
//! the stats reduction. Pure logic over in-memory slices -- no I/O here.

pub mod generator;
pub mod slots;
pub mod stats;

pub use generator::{GenerateError, PlanSettings, generate_week};
pub use stats::compute_stats;
