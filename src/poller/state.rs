use serde::{Deserialize, Serialize};

/// Lifecycle of a tracked task.
///
/// `Succeeded` and `Failed` are absorbing: once either is reached no further
/// polls are scheduled and the state never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    Pending,
    Polling,
    Succeeded,
    Failed,
}

impl PollStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollStatus::Succeeded | PollStatus::Failed)
    }
}

/// One line item of a task's progress log.
///
/// The wire form is duck-typed; deserialization folds it into a closed set
/// of variants keyed on which optional fields are present: an embedded job
/// id wins over a status string, and an entry carrying neither is still
/// awaiting execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProgressEntry", into = "RawProgressEntry")]
pub enum ProgressEntry {
    /// Nothing decided yet; keep polling.
    Awaiting { step: Option<u32>, message: String },
    /// A nested job now owns execution; its detail is the authoritative
    /// status source.
    JobLinked {
        step: Option<u32>,
        message: String,
        job_id: String,
    },
    /// The task resolved inline, without a nested job. The status string is
    /// opaque backend vocabulary.
    Terminal {
        step: Option<u32>,
        message: String,
        status: String,
    },
}

impl ProgressEntry {
    pub fn awaiting(step: Option<u32>, message: impl Into<String>) -> Self {
        ProgressEntry::Awaiting {
            step,
            message: message.into(),
        }
    }

    pub fn job_linked(step: Option<u32>, message: impl Into<String>, job_id: impl Into<String>) -> Self {
        ProgressEntry::JobLinked {
            step,
            message: message.into(),
            job_id: job_id.into(),
        }
    }

    pub fn terminal(step: Option<u32>, message: impl Into<String>, status: impl Into<String>) -> Self {
        ProgressEntry::Terminal {
            step,
            message: message.into(),
            status: status.into(),
        }
    }

    pub fn step(&self) -> Option<u32> {
        match self {
            ProgressEntry::Awaiting { step, .. }
            | ProgressEntry::JobLinked { step, .. }
            | ProgressEntry::Terminal { step, .. } => *step,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ProgressEntry::Awaiting { message, .. }
            | ProgressEntry::JobLinked { message, .. }
            | ProgressEntry::Terminal { message, .. } => message,
        }
    }

    /// Display form of the entry, `"<step>. <message>"` with the step prefix
    /// omitted when absent.
    pub fn log_line(&self) -> String {
        match self.step() {
            Some(step) => format!("{}. {}", step, self.message()),
            None => self.message().to_string(),
        }
    }
}

/// Wire shape of a progress entry.
#[derive(Serialize, Deserialize)]
struct RawProgressEntry {
    #[serde(default, alias = "stepnum", skip_serializing_if = "Option::is_none")]
    step: Option<u32>,
    #[serde(default)]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, alias = "embeddedJobId", skip_serializing_if = "Option::is_none")]
    job_id: Option<String>,
}

impl From<RawProgressEntry> for ProgressEntry {
    fn from(raw: RawProgressEntry) -> Self {
        match (raw.job_id, raw.status) {
            (Some(job_id), _) => ProgressEntry::JobLinked {
                step: raw.step,
                message: raw.message,
                job_id,
            },
            (None, Some(status)) => ProgressEntry::Terminal {
                step: raw.step,
                message: raw.message,
                status,
            },
            (None, None) => ProgressEntry::Awaiting {
                step: raw.step,
                message: raw.message,
            },
        }
    }
}

impl From<ProgressEntry> for RawProgressEntry {
    fn from(entry: ProgressEntry) -> Self {
        match entry {
            ProgressEntry::Awaiting { step, message } => RawProgressEntry {
                step,
                message,
                status: None,
                job_id: None,
            },
            ProgressEntry::JobLinked {
                step,
                message,
                job_id,
            } => RawProgressEntry {
                step,
                message,
                status: None,
                job_id: Some(job_id),
            },
            ProgressEntry::Terminal {
                step,
                message,
                status,
            } => RawProgressEntry {
                step,
                message,
                status: Some(status),
                job_id: None,
            },
        }
    }
}

/// Snapshot of a tracked task's progress, published on every poll step.
///
/// Owned by the session that created it; only the tracker's poll worker
/// mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollState {
    pub task_id: String,
    pub status: PollStatus,
    /// Latest progress log reported by the task collaborator.
    pub progress: Vec<ProgressEntry>,
    /// Opaque payload captured when the task succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    /// Execution logs captured from the nested job on failure.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failure_logs: Vec<String>,
}

impl PollState {
    pub(crate) fn pending(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status: PollStatus::Pending,
            progress: Vec::new(),
            result: None,
            failure_message: None,
            failure_logs: Vec::new(),
        }
    }

    pub(crate) fn succeed(&mut self, result: serde_json::Value) {
        self.status = PollStatus::Succeeded;
        self.result = Some(result);
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>, logs: Vec<String>) {
        self.status = PollStatus::Failed;
        self.failure_message = Some(message.into());
        self.failure_logs = logs;
    }

    /// The progress log as display lines.
    pub fn log_lines(&self) -> Vec<String> {
        self.progress.iter().map(ProgressEntry::log_line).collect()
    }
}
