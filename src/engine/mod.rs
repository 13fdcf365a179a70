//! The form-flow state machine.
//!
//! Each request is stateless; the account's position in a form lives in the
//! session store between requests. A request either reads that position
//! (`describe`) or feeds it one value (`submit`), which ends in one of three
//! ways:
//!
//! * **transaction**: the step needs a signed transaction. Parameters are
//!   resolved from earlier answers, validated and dispatched, and only after a
//!   successful build is the submission written and the session cleared.
//! * **complete**: there is nothing left to ask. The submission is written and
//!   the session cleared.
//! * **advance**: the session moves to the successor and the client is told to
//!   follow the callback link.
//!
//! Two POSTs racing on the same (form, account) are not serialized; the last
//! session write wins.

mod builder;
mod request;

pub use builder::EngineBuilder;
pub use request::{RequestData, value_text};

use crate::config::EngineConfig;
use crate::dispatch::{Dispatcher, TransactionKind};
use crate::error::{DispatchError, FlowError};
use crate::finalize::Finalizer;
use crate::forms::FormSource;
use crate::protocol::{ActionDescription, ActionResponse, DEFAULT_COMPLETION_MESSAGE, describe_node};
use crate::resolver::resolve_parameters;
use crate::schema::{Form, Node, NodeKind, locate_next, locate_node, locate_start, process_input};
use crate::session::{Answers, Session, SessionRepository};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Returned instead of a transaction when demo mode is on.
pub const DEMO_COMPLETION_MESSAGE: &str =
    "Demo mode: your answers were recorded and no transaction was sent.";

const ADVANCE_MESSAGE: &str = "Answer saved. Continue to the next step.";

/// Drives one form per request against the injected stores.
pub struct FlowEngine {
    forms: Arc<dyn FormSource>,
    sessions: SessionRepository,
    dispatcher: Dispatcher,
    finalizer: Finalizer,
    config: EngineConfig,
}

/// How a valid step ends.
enum Step<'a> {
    /// `None` when the step demands a transaction but none is configured.
    WithTransaction(Option<&'a Node>),
    /// The end node that was reached, if there is one.
    Complete(Option<&'a Node>),
    Advance(&'a Node),
}

/// Everything a terminal or advancing step needs to write its result.
struct StepResult<'a> {
    form: &'a Form,
    account: &'a str,
    answers: Answers,
    retry_href: String,
}

impl FlowEngine {
    pub fn builder(forms: Arc<dyn FormSource>) -> EngineBuilder {
        EngineBuilder::new(forms)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionRepository {
        &self.sessions
    }

    /// Describes the step `account` is on, without changing anything.
    ///
    /// Without an account, or without a live session, this is the start node.
    #[instrument(skip(self))]
    pub async fn describe(
        &self,
        form_id: &str,
        account: Option<&str>,
    ) -> Result<ActionDescription, FlowError> {
        let form = self.load_form(form_id).await?;
        let session = match account {
            Some(account) => self.sessions.load(form_id, account).await,
            None => None,
        };

        let node = current_node(&form, session.as_ref())?;
        let next = locate_next(&form.schema, &node.id).and_then(|id| locate_node(&form.schema, id));
        let answers = session.map(|s| s.answers).unwrap_or_default();
        debug!(node_id = %node.id, "describing node");
        Ok(describe_node(&form, node, next, &answers, &self.config))
    }

    /// The description a client fetches through an intermediate step's callback link.
    pub async fn next_action(
        &self,
        form_id: &str,
        account: &str,
    ) -> Result<ActionDescription, FlowError> {
        self.describe(form_id, Some(account)).await
    }

    /// Feeds one submitted value to the account's current step.
    ///
    /// # Errors
    ///
    /// Only a missing form or node is raised as `FlowError`. Invalid input and
    /// failed transactions come back as `ActionResponse::Error`.
    #[instrument(skip(self, request))]
    pub async fn submit(
        &self,
        form_id: &str,
        request: RequestData,
    ) -> Result<ActionResponse, FlowError> {
        let form = self.load_form(form_id).await?;
        let retry_href = self.config.action_href(form_id);
        let Some(account) = request.account() else {
            return Ok(ActionResponse::error(
                "A wallet account is required to continue",
                retry_href,
            ));
        };

        let session = self.sessions.load(form_id, &account).await;
        let current_id = match &session {
            Some(session) => session.current_node_id.clone(),
            None => locate_start(&form.schema)
                .map(|n| n.id.clone())
                .ok_or_else(|| FlowError::NoValidNode(form_id.to_string()))?,
        };

        let value = request.value();
        let outcome = match process_input(
            &form.schema,
            &current_id,
            &value_text(value.as_ref()),
            self.config.demo_mode,
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                // The schema changed under a live session; let the next request start over.
                warn!(node_id = %current_id, "session points at a missing node, clearing it");
                self.sessions.clear(form_id, &account).await;
                return Err(e);
            }
        };
        if !outcome.is_valid {
            debug!(node_id = %current_id, "input rejected");
            let message = outcome
                .error
                .unwrap_or_else(|| "Invalid input".to_string());
            return Ok(ActionResponse::error(message, retry_href));
        }

        let current = locate_node(&form.schema, &current_id)
            .ok_or_else(|| FlowError::NodeNotFound(current_id.clone()))?;
        let next = match outcome.next_node_id.as_deref() {
            Some(id) => Some(
                locate_node(&form.schema, id)
                    .ok_or_else(|| FlowError::NodeNotFound(id.to_string()))?,
            ),
            None => None,
        };

        let mut answers = session.map(|s| s.answers).unwrap_or_default();
        if current.records_answer() {
            answers.insert(current.id.clone(), value.unwrap_or(Value::Null));
        }

        let result = StepResult {
            form: &form,
            account: &account,
            answers,
            retry_href,
        };
        match classify(current, next) {
            Step::WithTransaction(tx_node) => {
                self.finish_with_transaction(result, current, tx_node).await
            }
            Step::Complete(end) => self.finish_plain(result, end).await,
            Step::Advance(next) => self.advance(result, next).await,
        }
    }

    async fn finish_with_transaction(
        &self,
        result: StepResult<'_>,
        current: &Node,
        tx_node: Option<&Node>,
    ) -> Result<ActionResponse, FlowError> {
        let StepResult {
            form,
            account,
            answers,
            retry_href,
        } = result;
        let tx = tx_node.and_then(Node::as_transaction);

        if self.config.demo_mode {
            info!(form_id = %form.id, "demo mode, transaction dispatch skipped");
            let kind = tx.map(|t| t.kind.clone());
            return Ok(
                match self.finalizer.complete(&form.id, account, answers, kind).await {
                    Ok(()) => ActionResponse::post(DEMO_COMPLETION_MESSAGE, None),
                    Err(e) => {
                        warn!(error = %e, "demo submission could not be recorded");
                        ActionResponse::error(e.to_string(), retry_href)
                    }
                },
            );
        }

        let Some(tx) = tx else {
            let error = DispatchError::NoTransaction(current.id.clone());
            warn!(error = %error, "transaction required but not configured");
            return Ok(ActionResponse::error(error.to_string(), retry_href));
        };

        let params = resolve_parameters(&form.schema, &tx.parameters, &answers);
        let message = TransactionKind::from_tag(&tx.kind).summary(&params);
        let transaction = match self.dispatcher.dispatch(&tx.kind, account, params).await {
            Ok(transaction) => transaction,
            Err(e) => {
                warn!(kind = %tx.kind, error = %e, "transaction could not be built");
                return Ok(ActionResponse::error(e.to_string(), retry_href));
            }
        };

        match self
            .finalizer
            .complete(&form.id, account, answers, Some(tx.kind.clone()))
            .await
        {
            Ok(()) => Ok(ActionResponse::transaction(transaction, message)),
            Err(e) => {
                warn!(error = %e, "submission could not be recorded");
                Ok(ActionResponse::error(e.to_string(), retry_href))
            }
        }
    }

    async fn finish_plain(
        &self,
        result: StepResult<'_>,
        end: Option<&Node>,
    ) -> Result<ActionResponse, FlowError> {
        let message = end
            .and_then(|node| match &node.kind {
                NodeKind::End(data) => data.message.clone(),
                _ => None,
            })
            .unwrap_or_else(|| DEFAULT_COMPLETION_MESSAGE.to_string());

        match self
            .finalizer
            .complete(&result.form.id, result.account, result.answers, None)
            .await
        {
            Ok(()) => Ok(ActionResponse::post(message, None)),
            Err(e) => {
                warn!(error = %e, "submission could not be recorded");
                Ok(ActionResponse::error(e.to_string(), result.retry_href))
            }
        }
    }

    async fn advance(
        &self,
        result: StepResult<'_>,
        next: &Node,
    ) -> Result<ActionResponse, FlowError> {
        let session = Session {
            current_node_id: next.id.clone(),
            answers: result.answers,
        };
        // A failed write degrades like any store failure: the account simply
        // finds itself on the previous step next time.
        self.sessions
            .save(&result.form.id, result.account, &session)
            .await;
        debug!(next_node_id = %next.id, "session advanced");

        Ok(ActionResponse::post(
            ADVANCE_MESSAGE,
            Some(self.config.callback_href(&result.form.id)),
        ))
    }

    async fn load_form(&self, form_id: &str) -> Result<Arc<Form>, FlowError> {
        self.forms
            .load(form_id)
            .await
            .ok_or_else(|| FlowError::FormNotFound(form_id.to_string()))
    }
}

/// The session's node, or the start node when there is no session.
fn current_node<'a>(form: &'a Form, session: Option<&Session>) -> Result<&'a Node, FlowError> {
    let node_id = match session {
        Some(session) => Some(session.current_node_id.as_str()),
        None => locate_start(&form.schema).map(|n| n.id.as_str()),
    };
    node_id
        .and_then(|id| locate_node(&form.schema, id))
        .ok_or_else(|| FlowError::NoValidNode(form.id.clone()))
}

fn classify<'a>(current: &'a Node, next: Option<&'a Node>) -> Step<'a> {
    if current.as_transaction().is_some() {
        return Step::WithTransaction(Some(current));
    }
    if let Some(next) = next.filter(|n| n.as_transaction().is_some()) {
        return Step::WithTransaction(Some(next));
    }
    if current.requires_transaction {
        return Step::WithTransaction(None);
    }
    match next {
        None => Step::Complete(None),
        Some(node) if node.is_end() => Step::Complete(Some(node)),
        Some(node) => Step::Advance(node),
    }
}
