//! Tests for the submit-then-track workflow orchestrators.
mod common;
use common::*;
use kanri::prelude::*;

fn receipt(task_id: &str) -> SubmitReceipt {
    SubmitReceipt {
        task_id: Some(task_id.to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn test_sync_tracks_submitted_task_to_success() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Ok(receipt("task-77")));
    api.push_progress(Ok(job_linked_progress("job-12")));
    api.push_job_detail(Ok(JobDetail {
        status: JOB_SUCCEEDED.to_string(),
        logs: vec![],
    }));

    let workflow = ConnectionSyncWorkflow::new(api.clone());
    let terminal = workflow.sync("conn-1").await.expect("workflow result");

    assert_eq!(terminal.status, PollStatus::Succeeded);
    assert_eq!(terminal.task_id, "task-77");
    assert_eq!(
        api.submitted_actions(),
        vec![Action::SyncConnection {
            connection_id: "conn-1".to_string()
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sync_surfaces_job_failure_as_state_not_error() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Ok(receipt("task-78")));
    api.push_progress(Ok(job_linked_progress("job-13")));
    api.push_job_detail(Ok(JobDetail {
        status: JOB_FAILED.to_string(),
        logs: vec!["source unreachable".to_string()],
    }));

    let workflow = ConnectionSyncWorkflow::new(api.clone());
    let terminal = workflow.sync("conn-2").await.expect("workflow result");

    assert_eq!(terminal.status, PollStatus::Failed);
    assert_eq!(terminal.failure_logs, vec!["source unreachable".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_sync_submit_failure_is_an_error() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Err(LookupError("503".to_string())));

    let workflow = ConnectionSyncWorkflow::new(api.clone());
    let result = workflow.sync("conn-3").await;

    assert_eq!(
        result,
        Err(WorkflowError::Submit(LookupError("503".to_string())))
    );
}

#[tokio::test(start_paused = true)]
async fn test_sync_without_task_id_is_rejected() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Ok(SubmitReceipt { task_id: None }));

    let workflow = ConnectionSyncWorkflow::new(api.clone());
    let result = workflow.sync("conn-4").await;

    assert_eq!(result, Err(WorkflowError::NoTaskReturned));
}

#[tokio::test(start_paused = true)]
async fn test_workspace_create_tracks_build_task() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Ok(receipt("task-80")));
    api.push_progress(Ok(vec![
        ProgressEntry::awaiting(Some(1), "queued for execution"),
        ProgressEntry::terminal(Some(2), "clone failed", "repository not found"),
    ]));

    let workflow = WorkspaceSetupWorkflow::new(api.clone());
    let params = WorkspaceParams {
        repo_url: "https://example.com/org/transforms.git".to_string(),
        access_token: None,
        target_schema: "analytics".to_string(),
    };
    let terminal = workflow.create(params.clone()).await.expect("workflow result");

    assert_eq!(terminal.status, PollStatus::Failed);
    assert_eq!(
        terminal.failure_message.as_deref(),
        Some("repository not found")
    );
    assert_eq!(
        api.submitted_actions(),
        vec![Action::CreateWorkspace(params)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_workspace_noop_edit_completes_without_submitting() {
    let api = Arc::new(ScriptedApi::new());

    let workflow = WorkspaceSetupWorkflow::new(api.clone());
    let current = WorkspaceState {
        repo_url: "https://example.com/org/transforms.git".to_string(),
        target_schema: "analytics".to_string(),
    };
    let params = WorkspaceParams {
        repo_url: current.repo_url.clone(),
        access_token: None,
        target_schema: current.target_schema.clone(),
    };

    let outcome = workflow.edit(params, &current).await.expect("edit result");
    assert_eq!(outcome, None);
    assert!(api.submitted_actions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_workspace_schema_only_edit_is_untracked() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Ok(SubmitReceipt { task_id: None }));

    let workflow = WorkspaceSetupWorkflow::new(api.clone());
    let current = WorkspaceState {
        repo_url: "https://example.com/org/transforms.git".to_string(),
        target_schema: "analytics".to_string(),
    };
    let params = WorkspaceParams {
        repo_url: current.repo_url.clone(),
        access_token: None,
        target_schema: "analytics_staging".to_string(),
    };

    let outcome = workflow.edit(params, &current).await.expect("edit result");
    assert_eq!(outcome, None);
    assert_eq!(
        api.submitted_actions(),
        vec![Action::UpdateWorkspaceSchema {
            target_schema: "analytics_staging".to_string()
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_workspace_repo_change_triggers_tracked_rebuild() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Ok(receipt("task-81")));
    api.push_progress(Ok(job_linked_progress("job-20")));
    api.push_job_detail(Ok(JobDetail {
        status: JOB_SUCCEEDED.to_string(),
        logs: vec![],
    }));

    let workflow = WorkspaceSetupWorkflow::new(api.clone());
    let current = WorkspaceState {
        repo_url: "https://example.com/org/transforms.git".to_string(),
        target_schema: "analytics".to_string(),
    };
    let params = WorkspaceParams {
        repo_url: "https://example.com/org/transforms-v2.git".to_string(),
        access_token: Some("ghp_token".to_string()),
        target_schema: current.target_schema.clone(),
    };

    let outcome = workflow.edit(params, &current).await.expect("edit result");
    let terminal = outcome.expect("a rebuild was tracked");
    assert_eq!(terminal.status, PollStatus::Succeeded);
    assert_eq!(terminal.task_id, "task-81");

    assert_eq!(
        api.submitted_actions(),
        vec![Action::UpdateWorkspaceRepository {
            repo_url: "https://example.com/org/transforms-v2.git".to_string(),
            access_token: Some("ghp_token".to_string()),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_connection_submits_catalog_payload() {
    let api = Arc::new(ScriptedApi::new());
    api.push_receipt(Ok(SubmitReceipt { task_id: None }));

    let discovery = serde_json::json!({
        "catalog": {
            "streams": [
                { "stream": { "name": "visits", "supportedSyncModes": ["full_refresh", "incremental"] } }
            ]
        }
    });
    let mut catalog = SourceCatalog::from_discovery(&discovery).expect("catalog");
    catalog.select("visits", true).expect("known stream");
    let payload = catalog.connection_payload("prod visits", "src-1", None, true);

    let workflow = ConnectionSyncWorkflow::new(api.clone());
    workflow
        .create_connection(payload.clone())
        .await
        .expect("create result");

    assert_eq!(
        api.submitted_actions(),
        vec![Action::CreateConnection { payload }]
    );
}
