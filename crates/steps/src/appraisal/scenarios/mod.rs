//! Saved scenario list: snapshots, shortlisting and CSV export.

mod export;
pub mod repository;
pub mod service;

pub use export::{write_csv, ExportError};
pub use repository::{
    InMemoryScenarioRepository, SavedScenario, ScenarioId, ScenarioRepository,
    ScenarioStoreError,
};
pub use service::{
    scenario_tags, SaveScenario, ScenarioRecheck, ScenarioService, ScenarioServiceError,
};
