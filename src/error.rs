use thiserror::Error;

/// Errors that can occur when converting a raw definition into a [`SchemaNode`].
///
/// [`SchemaNode`]: crate::schema::SchemaNode
#[derive(Error, Debug, Clone)]
pub enum SchemaConversionError {
    #[error("Invalid schema definition: {0}")]
    ValidationError(String),
}

/// Errors that can occur during the schema-to-form compilation phase.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaCompileError {
    #[error("The root schema must be an object with properties")]
    RootNotObject,

    #[error("The union at '{path}' declares no variants")]
    EmptyUnion { path: String },

    #[error(
        "Variant {index} of the union at '{path}' declares no required list, so the common discriminator cannot be resolved"
    )]
    MissingRequiredList { path: String, index: usize },

    #[error("The variants of the union at '{path}' share no required property to act as a discriminator")]
    NoCommonDiscriminator { path: String },

    #[error(
        "The union at '{path}' has {count} shared required properties and no single one carries a constant in every variant"
    )]
    AmbiguousDiscriminator { path: String, count: usize },

    #[error("Variant {index} of the union at '{path}' is missing the discriminator property '{name}'")]
    MissingDiscriminatorProperty {
        path: String,
        index: usize,
        name: String,
    },

    #[error(
        "The discriminator property '{name}' in variant {index} of the union at '{path}' carries no constant value"
    )]
    MissingDiscriminatorConst {
        path: String,
        index: usize,
        name: String,
    },

    #[error("Two variants of the union at '{path}' reuse the constant '{value}'")]
    DuplicateVariantConst {
        path: String,
        value: crate::field::ConstValue,
    },
}

/// A failed lookup against one of the injected backend collaborators.
///
/// Lookups are treated as transient: the tracker recovers from them by
/// rescheduling at its backoff interval, and workflows only surface them for
/// the initial submit.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Backend lookup failed: {0}")]
pub struct LookupError(pub String);

/// Errors surfaced by a tracking session itself.
///
/// A failed *job* is not an error: it is delivered as a terminal
/// [`PollState`] value.
///
/// [`PollState`]: crate::poller::PollState
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("Tracking session for task '{0}' was cancelled before reaching a terminal state")]
    Cancelled(String),
}

/// Errors raised by the workflow orchestrators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Action submission failed: {0}")]
    Submit(#[from] LookupError),

    #[error("The backend accepted the action but returned no task identifier to track")]
    NoTaskReturned,

    #[error(transparent)]
    Track(#[from] TrackError),
}

/// Errors that can occur while manipulating a source catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Invalid discovery payload: {0}")]
    InvalidDiscovery(String),

    #[error("No stream named '{0}' in the catalog")]
    UnknownStream(String),

    #[error("Stream '{0}' does not support incremental sync")]
    IncrementalUnsupported(String),
}

/// Errors that can occur when saving or loading a compiled-form artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),

    #[error("Could not access artifact file '{path}': {message}")]
    Io { path: String, message: String },
}
