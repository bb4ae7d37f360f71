//! Export planning, serialization, and run orchestration.

pub mod orchestrator;
pub mod plan;
pub mod writer;

pub use orchestrator::{BackupOrchestrator, BackupTrigger, RunReport};
pub use plan::{ExportPlan, ExportPlanner};
