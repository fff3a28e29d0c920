//! # Kanri - Schema-to-Form Compilation and Job Tracking Engine
//!
//! **Kanri** is the library core of an administrative console for
//! data-integration pipelines. It owns the two algorithms such consoles keep
//! reinventing:
//!
//! - **Schema-to-form compilation**: third-party connector definitions are
//!   deeply nested, discriminated-union JSON schemas. The [`SpecCompiler`]
//!   flattens one into an ordered tree of [`FieldSpec`] descriptors a form
//!   renderer can walk directly, with field ordering and
//!   conditional-visibility metadata resolved ahead of time.
//! - **Job status tracking**: sync runs and workspace builds execute in an
//!   asynchronous backend subsystem behind a two-level task → job
//!   indirection. The [`JobTracker`] polls a task to its terminal state,
//!   switching to the authoritative nested job mid-flight and absorbing
//!   transient backend failures with a longer retry interval.
//!
//! Everything that talks to the outside world — transport, authentication,
//! rendering, notification — stays outside the crate, injected through the
//! [`PipelineApi`] trait.
//!
//! ## Core Workflow
//!
//! 1. **Fetch**: pull a connector's raw specification through your
//!    [`PipelineApi`] implementation.
//! 2. **Convert**: turn the raw JSON into the canonical [`SchemaNode`] model
//!    with the [`IntoSchema`] trait.
//! 3. **Compile**: run the [`SpecCompiler`] to get renderable field specs;
//!    optionally cache them as a [`CompiledForm`] artifact.
//! 4. **Act and track**: submit a sync or workspace build through a workflow
//!    and observe its [`PollState`] stream until it settles.
//!
//! ## Quick Start
//!
//! Compiling a connector specification with a discriminated union:
//!
//! ```rust
//! use kanri::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let raw = serde_json::json!({
//!         "type": "object",
//!         "title": "Postgres Source Spec",
//!         "required": ["host", "port"],
//!         "properties": {
//!             "host": { "type": "string", "title": "Host", "order": 0 },
//!             "port": { "type": "integer", "title": "Port", "order": 1 },
//!             "replication_method": {
//!                 "type": "object",
//!                 "title": "Replication Method",
//!                 "oneOf": [
//!                     {
//!                         "type": "object",
//!                         "required": ["method"],
//!                         "properties": {
//!                             "method": { "type": "string", "const": "Standard" }
//!                         }
//!                     },
//!                     {
//!                         "type": "object",
//!                         "required": ["method", "replication_slot"],
//!                         "properties": {
//!                             "method": { "type": "string", "const": "CDC" },
//!                             "replication_slot": { "type": "string" }
//!                         }
//!                     }
//!                 ]
//!             }
//!         }
//!     });
//!
//!     // Convert the raw definition, then compile it into renderable specs.
//!     let schema = raw.into_schema()?;
//!     let compiler = SpecCompiler::builder(schema).base_path("config").build();
//!     let fields = compiler.compile()?;
//!
//!     // Leaves carry the conditional-visibility metadata the renderer needs:
//!     // `config.replication_method.replication_slot` is only active while
//!     // the discriminator is set to "CDC".
//!     for leaf in all_leaves(&fields) {
//!         println!("{} (required: {})", leaf.path, leaf.required);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Tracking a background task is covered in the [`poller`] module
//! documentation.
//!
//! [`SpecCompiler`]: crate::compiler::SpecCompiler
//! [`FieldSpec`]: crate::field::FieldSpec
//! [`JobTracker`]: crate::poller::JobTracker
//! [`PipelineApi`]: crate::api::PipelineApi
//! [`SchemaNode`]: crate::schema::SchemaNode
//! [`IntoSchema`]: crate::schema::IntoSchema
//! [`CompiledForm`]: crate::field::CompiledForm
//! [`PollState`]: crate::poller::PollState

pub mod api;
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod field;
pub mod poller;
pub mod prelude;
pub mod schema;
pub mod workflow;
