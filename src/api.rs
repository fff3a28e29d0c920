//! The injected backend surface the tracker and workflows poll against.
//!
//! Transport, authentication, and endpoint layout are deliberately outside
//! this crate: a console wires the trait up to its own HTTP client and the
//! core only sees the minimal payload shapes it has to parse.

use crate::error::LookupError;
use crate::poller::ProgressEntry;
use crate::schema::SchemaNode;
use crate::workflow::WorkspaceParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Job status the job-detail collaborator reports for a finished run.
pub const JOB_SUCCEEDED: &str = "succeeded";
/// Job status the job-detail collaborator reports for a failed run.
pub const JOB_FAILED: &str = "failed";

/// Authoritative detail of a nested execution job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    /// Opaque backend status string; only [`JOB_SUCCEEDED`] and
    /// [`JOB_FAILED`] are terminal.
    pub status: String,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Receipt returned when an action is accepted for background execution.
///
/// `task_id` is `None` for actions the backend applies synchronously (for
/// example a workspace target-schema update), in which case there is nothing
/// to track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// An action a workflow can submit for execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Trigger a sync run of an existing connection.
    SyncConnection { connection_id: String },
    /// Create a connection from a catalog selection payload.
    CreateConnection { payload: serde_json::Value },
    /// Build a fresh transformation workspace.
    CreateWorkspace(WorkspaceParams),
    /// Point an existing workspace at a different repository.
    UpdateWorkspaceRepository {
        repo_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        access_token: Option<String>,
    },
    /// Change an existing workspace's target schema. Applied synchronously
    /// by the backend, no task to track.
    UpdateWorkspaceSchema { target_schema: String },
}

impl Action {
    /// Short action name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SyncConnection { .. } => "sync_connection",
            Action::CreateConnection { .. } => "create_connection",
            Action::CreateWorkspace(_) => "create_workspace",
            Action::UpdateWorkspaceRepository { .. } => "update_workspace_repository",
            Action::UpdateWorkspaceSchema { .. } => "update_workspace_schema",
        }
    }
}

/// The backend collaborators consumed by the tracker and the workflows.
///
/// Every method may fail with a [`LookupError`]; the tracker treats those as
/// transient and retries, workflows surface them only for the initial
/// submit.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Current progress log of a background task.
    async fn fetch_task_progress(&self, task_id: &str) -> Result<Vec<ProgressEntry>, LookupError>;

    /// Authoritative detail of a nested execution job.
    async fn fetch_job_detail(&self, job_id: &str) -> Result<JobDetail, LookupError>;

    /// Raw specification schema of a connector definition.
    async fn fetch_connector_schema(&self, connector_id: &str) -> Result<SchemaNode, LookupError>;

    /// Submits an action for execution and returns its tracking receipt.
    async fn submit_action(&self, action: Action) -> Result<SubmitReceipt, LookupError>;
}
