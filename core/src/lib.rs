// Atelier Core Library
// Portfolio admin runtime: project store, dashboard workflow, description generator

pub mod api;
pub mod dashboard;
pub mod generator;
pub mod project;
pub mod store;

// Export core types
pub use api::{ApiConfig, ApiServer};
pub use dashboard::{DashboardController, Mode};
pub use generator::{
    CompletionBackend, DescriptionGenerator, GeneratedDescription, HttpGenerator, LocalGenerator,
};
pub use project::{EditBuffer, Project, ProjectDetails};
pub use store::{FileSlot, InMemorySlot, ProjectStore, SlotStore};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtelierError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Generation backend error: {0}")]
    BackendError(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, AtelierError>;
