//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! kanri crate. Import this module to get access to the core functionality
//! without having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use kanri::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load and compile a connector specification
//! let raw_spec = std::fs::read_to_string("path/to/connector_spec.json")?;
//! let raw: serde_json::Value = serde_json::from_str(&raw_spec)?;
//!
//! let schema = raw.into_schema()?;
//! let fields = SpecCompiler::builder(schema).build().compile()?;
//!
//! // Cache the compiled form for the next console load
//! CompiledForm::new("postgres", DEFAULT_BASE_PATH, fields).save("postgres.form")?;
//! # Ok(())
//! # }
//! ```

// Core compilation
pub use crate::compiler::{DEFAULT_BASE_PATH, SpecCompiler, SpecCompilerBuilder};

// Schema and field models
pub use crate::field::{CompiledForm, ConstValue, FieldKind, FieldSpec, all_leaves};
pub use crate::schema::{IntoSchema, ObjectSchema, ScalarSchema, SchemaNode, UnionSchema};

// Job tracking
pub use crate::poller::{
    DEFAULT_POLL_INTERVAL, DEFAULT_RETRY_INTERVAL, JobTracker, JobTrackerBuilder, PollState,
    PollStatus, ProgressEntry, TrackSession,
};

// Backend collaborators
pub use crate::api::{
    Action, JOB_FAILED, JOB_SUCCEEDED, JobDetail, PipelineApi, SubmitReceipt,
};

// Workflows and catalog selection
pub use crate::catalog::{DestinationSyncMode, SourceCatalog, StreamSelection, SyncMode};
pub use crate::workflow::{
    ConnectionSyncWorkflow, WorkspaceParams, WorkspaceSetupWorkflow, WorkspaceState,
};

// Error types
pub use crate::error::{
    ArtifactError, CatalogError, LookupError, SchemaCompileError, SchemaConversionError,
    TrackError, WorkflowError,
};

// Standard library re-exports commonly used with this crate
pub use std::sync::Arc;
pub use std::time::Duration;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
