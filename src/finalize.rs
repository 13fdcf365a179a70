//! Recording completed forms.

use crate::error::FinalizeError;
use crate::session::{Answers, SessionRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// A completed form: every answer collected along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_id: String,
    pub account: String,
    pub answers: Answers,
    /// The transaction kind the flow ended with, if it ended with one.
    pub transaction_kind: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Where completed submissions are written.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn persist(&self, submission: Submission) -> Result<(), FinalizeError>;
}

/// Keeps submissions in memory, in arrival order.
#[derive(Default)]
pub struct MemorySubmissionSink {
    rows: Mutex<Vec<Submission>>,
}

impl MemorySubmissionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl SubmissionSink for MemorySubmissionSink {
    async fn persist(&self, submission: Submission) -> Result<(), FinalizeError> {
        self.rows.lock().await.push(submission);
        Ok(())
    }
}

/// Persists the answers of a finished flow, then forgets its session.
#[derive(Clone)]
pub struct Finalizer {
    sink: Arc<dyn SubmissionSink>,
    sessions: SessionRepository,
}

impl Finalizer {
    pub fn new(sink: Arc<dyn SubmissionSink>, sessions: SessionRepository) -> Self {
        Self { sink, sessions }
    }

    /// Writes the submission. The session is only cleared once the write succeeded,
    /// so a failed write leaves the account where it was.
    pub async fn complete(
        &self,
        form_id: &str,
        account: &str,
        answers: Answers,
        transaction_kind: Option<String>,
    ) -> Result<(), FinalizeError> {
        let answer_count = answers.len();
        self.sink
            .persist(Submission {
                form_id: form_id.to_string(),
                account: account.to_string(),
                answers,
                transaction_kind,
                submitted_at: Utc::now(),
            })
            .await?;
        self.sessions.clear(form_id, account).await;
        info!(form_id, account, answer_count, "submission recorded");
        Ok(())
    }
}
