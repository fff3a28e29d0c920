//! Common test utilities for building schema definitions and scripted backends.
use kanri::prelude::*;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Converts a raw JSON definition, panicking on malformed fixtures.
#[allow(dead_code)]
pub fn schema_from_json(raw: serde_json::Value) -> SchemaNode {
    raw.into_schema().expect("valid schema definition")
}

/// A flat connector schema: four scalars, no unions, no ordering hints.
#[allow(dead_code)]
pub fn create_flat_schema() -> SchemaNode {
    schema_from_json(serde_json::json!({
        "type": "object",
        "title": "Flat Source Spec",
        "required": ["host", "port"],
        "properties": {
            "host": { "type": "string", "title": "Host" },
            "port": { "type": "integer", "title": "Port" },
            "database": { "type": "string" },
            "password": { "type": "string" }
        }
    }))
}

/// Mixes explicit order hints 0 and 2 with two unhinted properties, declared
/// in the order alpha, beta, gamma, delta.
#[allow(dead_code)]
pub fn create_mixed_order_schema() -> SchemaNode {
    schema_from_json(serde_json::json!({
        "type": "object",
        "required": [],
        "properties": {
            "alpha": { "type": "string", "order": 0 },
            "beta": { "type": "string", "order": 2 },
            "gamma": { "type": "string" },
            "delta": { "type": "string" }
        }
    }))
}

/// A two-variant union keyed on `connector_type` with constants "a" and "b".
#[allow(dead_code)]
pub fn create_union_schema() -> SchemaNode {
    schema_from_json(serde_json::json!({
        "type": "object",
        "required": ["name", "mode"],
        "properties": {
            "name": { "type": "string", "order": 0 },
            "mode": {
                "type": "object",
                "title": "Mode",
                "oneOf": [
                    {
                        "type": "object",
                        "required": ["connector_type", "api_key"],
                        "properties": {
                            "connector_type": { "type": "string", "const": "a" },
                            "api_key": { "type": "string", "title": "API Key" }
                        }
                    },
                    {
                        "type": "object",
                        "required": ["connector_type", "host"],
                        "properties": {
                            "connector_type": { "type": "string", "const": "b" },
                            "host": { "type": "string" },
                            "port": { "type": "integer" }
                        }
                    }
                ]
            }
        }
    }))
}

/// Three nested union levels: credentials → token_refresh → schedule.
#[allow(dead_code)]
pub fn create_nested_union_schema() -> SchemaNode {
    schema_from_json(serde_json::json!({
        "type": "object",
        "required": ["credentials"],
        "properties": {
            "credentials": {
                "type": "object",
                "oneOf": [
                    {
                        "type": "object",
                        "required": ["auth_type", "api_key"],
                        "properties": {
                            "auth_type": { "type": "string", "const": "key" },
                            "api_key": { "type": "string" }
                        }
                    },
                    {
                        "type": "object",
                        "required": ["auth_type", "token_refresh"],
                        "properties": {
                            "auth_type": { "type": "string", "const": "oauth" },
                            "token_refresh": {
                                "type": "object",
                                "oneOf": [
                                    {
                                        "type": "object",
                                        "required": ["mode"],
                                        "properties": {
                                            "mode": { "type": "string", "const": "never" }
                                        }
                                    },
                                    {
                                        "type": "object",
                                        "required": ["mode", "schedule"],
                                        "properties": {
                                            "mode": { "type": "string", "const": "scheduled" },
                                            "schedule": {
                                                "type": "object",
                                                "oneOf": [
                                                    {
                                                        "type": "object",
                                                        "required": ["cadence"],
                                                        "properties": {
                                                            "cadence": { "type": "string", "const": "hourly" }
                                                        }
                                                    },
                                                    {
                                                        "type": "object",
                                                        "required": ["cadence", "expression"],
                                                        "properties": {
                                                            "cadence": { "type": "string", "const": "cron" },
                                                            "expression": { "type": "string" }
                                                        }
                                                    }
                                                ]
                                            }
                                        }
                                    }
                                ]
                            }
                        }
                    }
                ]
            }
        }
    }))
}

/// `name` hinted at 0 next to an unhinted two-variant union on `x`.
#[allow(dead_code)]
pub fn create_name_mode_schema() -> SchemaNode {
    schema_from_json(serde_json::json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": { "type": "string", "order": 0 },
            "mode": {
                "type": "object",
                "oneOf": [
                    {
                        "type": "object",
                        "required": ["x"],
                        "properties": {
                            "x": { "type": "string", "const": "x" }
                        }
                    },
                    {
                        "type": "object",
                        "required": ["x"],
                        "properties": {
                            "x": { "type": "string", "const": "y" }
                        }
                    }
                ]
            }
        }
    }))
}

/// Scripted backend double: every lookup pops one canned response, records
/// its virtual timestamp, and bumps a call counter. The final script entry
/// is repeated once a queue runs dry, so a finished script keeps answering.
#[allow(dead_code)]
pub struct ScriptedApi {
    pub progress: Mutex<VecDeque<std::result::Result<Vec<ProgressEntry>, LookupError>>>,
    pub job_details: Mutex<VecDeque<std::result::Result<JobDetail, LookupError>>>,
    pub receipts: Mutex<VecDeque<std::result::Result<SubmitReceipt, LookupError>>>,
    pub progress_calls: AtomicUsize,
    pub job_calls: AtomicUsize,
    pub submitted: Mutex<Vec<Action>>,
    pub progress_times: Mutex<Vec<tokio::time::Instant>>,
}

#[allow(dead_code)]
impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(VecDeque::new()),
            job_details: Mutex::new(VecDeque::new()),
            receipts: Mutex::new(VecDeque::new()),
            progress_calls: AtomicUsize::new(0),
            job_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
            progress_times: Mutex::new(Vec::new()),
        }
    }

    pub fn push_progress(&self, response: std::result::Result<Vec<ProgressEntry>, LookupError>) {
        self.progress.lock().unwrap().push_back(response);
    }

    pub fn push_job_detail(&self, response: std::result::Result<JobDetail, LookupError>) {
        self.job_details.lock().unwrap().push_back(response);
    }

    pub fn push_receipt(&self, response: std::result::Result<SubmitReceipt, LookupError>) {
        self.receipts.lock().unwrap().push_back(response);
    }

    pub fn progress_call_count(&self) -> usize {
        self.progress_calls.load(Ordering::SeqCst)
    }

    pub fn job_call_count(&self) -> usize {
        self.job_calls.load(Ordering::SeqCst)
    }

    pub fn submitted_actions(&self) -> Vec<Action> {
        self.submitted.lock().unwrap().clone()
    }

    /// Gaps between consecutive progress lookups, in virtual time.
    pub fn progress_gaps(&self) -> Vec<Duration> {
        let times = self.progress_times.lock().unwrap();
        times.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    fn pop_or_repeat<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait::async_trait]
impl PipelineApi for ScriptedApi {
    async fn fetch_task_progress(
        &self,
        _task_id: &str,
    ) -> std::result::Result<Vec<ProgressEntry>, LookupError> {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        self.progress_times
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());
        Self::pop_or_repeat(&self.progress)
            .unwrap_or_else(|| Err(LookupError("progress script exhausted".to_string())))
    }

    async fn fetch_job_detail(
        &self,
        _job_id: &str,
    ) -> std::result::Result<JobDetail, LookupError> {
        self.job_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop_or_repeat(&self.job_details)
            .unwrap_or_else(|| Err(LookupError("job script exhausted".to_string())))
    }

    async fn fetch_connector_schema(
        &self,
        _connector_id: &str,
    ) -> std::result::Result<SchemaNode, LookupError> {
        Ok(create_flat_schema())
    }

    async fn submit_action(
        &self,
        action: Action,
    ) -> std::result::Result<SubmitReceipt, LookupError> {
        self.submitted.lock().unwrap().push(action);
        Self::pop_or_repeat(&self.receipts)
            .unwrap_or_else(|| Err(LookupError("no receipt scripted".to_string())))
    }
}

/// Progress log of a task whose execution job is already linked.
#[allow(dead_code)]
pub fn job_linked_progress(job_id: &str) -> Vec<ProgressEntry> {
    vec![
        ProgressEntry::awaiting(Some(1), "queued for execution"),
        ProgressEntry::job_linked(Some(2), "dispatched to runner", job_id),
    ]
}

/// Progress log still waiting on the enqueue marker alone.
#[allow(dead_code)]
pub fn short_progress() -> Vec<ProgressEntry> {
    vec![ProgressEntry::awaiting(Some(1), "queued for execution")]
}
