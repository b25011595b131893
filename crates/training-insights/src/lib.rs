pub mod config;
pub mod error;
pub mod insights;
pub mod narrative;
pub mod problem;
pub mod router;
pub mod telemetry;

pub use router::insights_router;
