//! Business-logic service layer.

mod blacklist;
mod csv_export;
mod orchestrator;
mod pipeline;
mod team_store;
mod tracker;

pub use blacklist::{DomainBlacklist, domain_of};
pub use csv_export::{CsvExporter, ExportRecord};
pub use orchestrator::{AuthOutcome, AuthStage, AuthorizationOrchestrator};
pub use pipeline::{CancelFlag, PipelineDriver, RunSummary, crs_sync_team_owners};
pub use team_store::TeamStore;
pub use tracker::AccountTracker;
