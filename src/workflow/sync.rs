use crate::api::{Action, PipelineApi};
use crate::error::WorkflowError;
use crate::poller::{JobTracker, PollState};
use std::sync::Arc;
use tracing::info;

/// Triggers sync runs of existing connections and tracks them to completion.
pub struct ConnectionSyncWorkflow {
    api: Arc<dyn PipelineApi>,
    tracker: JobTracker,
}

impl ConnectionSyncWorkflow {
    pub fn new(api: Arc<dyn PipelineApi>) -> Self {
        let tracker = JobTracker::builder(Arc::clone(&api)).build();
        Self { api, tracker }
    }

    /// Uses a caller-configured tracker instead of the default intervals.
    pub fn with_tracker(api: Arc<dyn PipelineApi>, tracker: JobTracker) -> Self {
        Self { api, tracker }
    }

    /// Starts a sync run and waits for its terminal state.
    ///
    /// A sync that ends in failure is returned as a failed [`PollState`],
    /// not as an error; only the initial submit can error out.
    pub async fn sync(&self, connection_id: &str) -> Result<PollState, WorkflowError> {
        let receipt = self
            .api
            .submit_action(Action::SyncConnection {
                connection_id: connection_id.to_string(),
            })
            .await?;
        let task_id = receipt.task_id.ok_or(WorkflowError::NoTaskReturned)?;
        info!(connection_id, task_id = %task_id, "sync_submitted");

        let mut session = self.tracker.track(&task_id);
        Ok(session.await_terminal().await?)
    }

    /// Creates a connection from a catalog selection payload (see
    /// [`SourceCatalog::connection_payload`]). Applied directly by the
    /// backend; nothing to track.
    ///
    /// [`SourceCatalog::connection_payload`]: crate::catalog::SourceCatalog::connection_payload
    pub async fn create_connection(&self, payload: serde_json::Value) -> Result<(), WorkflowError> {
        self.api
            .submit_action(Action::CreateConnection { payload })
            .await?;
        info!("connection_created");
        Ok(())
    }
}
