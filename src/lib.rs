//! RevOps Analytics Library
//!
//! Synthetic sales-pipeline generation and the dashboard aggregations built
//! on top of it. The binaries in `src/main.rs` and `src/bin/` are thin CLI
//! wrappers around these modules.

pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod format;
pub mod generator;
pub mod logging;
pub mod opportunity;

pub use error::{ConfigError, DatasetError, GenerateError};
pub use generator::{generate_dataset, GenerationSummary, GeneratorConfig, OpportunityGenerator};
pub use opportunity::Opportunity;
