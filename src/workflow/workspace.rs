use crate::api::{Action, PipelineApi};
use crate::error::WorkflowError;
use crate::poller::{JobTracker, PollState};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Parameters for building or editing a transformation workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceParams {
    pub repo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub target_schema: String,
}

/// The currently persisted workspace configuration, used to decide which
/// parts of an edit actually changed.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceState {
    pub repo_url: String,
    pub target_schema: String,
}

/// Builds transformation workspaces and tracks their setup tasks.
pub struct WorkspaceSetupWorkflow {
    api: Arc<dyn PipelineApi>,
    tracker: JobTracker,
}

impl WorkspaceSetupWorkflow {
    pub fn new(api: Arc<dyn PipelineApi>) -> Self {
        let tracker = JobTracker::builder(Arc::clone(&api)).build();
        Self { api, tracker }
    }

    /// Uses a caller-configured tracker instead of the default intervals.
    pub fn with_tracker(api: Arc<dyn PipelineApi>, tracker: JobTracker) -> Self {
        Self { api, tracker }
    }

    /// Builds a fresh workspace and waits for the setup task's terminal
    /// state.
    pub async fn create(&self, params: WorkspaceParams) -> Result<PollState, WorkflowError> {
        let receipt = self
            .api
            .submit_action(Action::CreateWorkspace(params))
            .await?;
        let task_id = receipt.task_id.ok_or(WorkflowError::NoTaskReturned)?;
        info!(task_id = %task_id, "workspace_build_submitted");

        let mut session = self.tracker.track(&task_id);
        Ok(session.await_terminal().await?)
    }

    /// Applies an edit to an existing workspace.
    ///
    /// A target-schema change is applied directly; only a repository change
    /// (or a newly supplied access token) triggers a tracked rebuild.
    /// Returns the rebuild's terminal state when one ran, `None` when the
    /// edit completed without a background task.
    pub async fn edit(
        &self,
        params: WorkspaceParams,
        current: &WorkspaceState,
    ) -> Result<Option<PollState>, WorkflowError> {
        if !params.target_schema.is_empty() && params.target_schema != current.target_schema {
            self.api
                .submit_action(Action::UpdateWorkspaceSchema {
                    target_schema: params.target_schema.clone(),
                })
                .await?;
            info!(target_schema = %params.target_schema, "workspace_schema_updated");
        }

        if params.repo_url.is_empty() {
            return Ok(None);
        }
        // Same repository and no new token: nothing to rebuild.
        if params.repo_url == current.repo_url && params.access_token.is_none() {
            return Ok(None);
        }

        let receipt = self
            .api
            .submit_action(Action::UpdateWorkspaceRepository {
                repo_url: params.repo_url.clone(),
                access_token: params.access_token.clone(),
            })
            .await?;
        let Some(task_id) = receipt.task_id else {
            return Ok(None);
        };
        info!(task_id = %task_id, "workspace_rebuild_submitted");

        let mut session = self.tracker.track(&task_id);
        Ok(Some(session.await_terminal().await?))
    }
}
