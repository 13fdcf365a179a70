//! Common test utilities: form fixtures, stub transaction builders and an engine harness.
use async_trait::async_trait;
use formflow::prelude::*;
use serde_json::{Value, json};
use std::result::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A well-formed base58 wallet used as the submitting account.
#[allow(dead_code)]
pub const ACCOUNT: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

/// A well-formed base58 address used as a transfer recipient.
#[allow(dead_code)]
pub const RECIPIENT: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

/// `start -> q1 (input, required) -> end`
#[allow(dead_code)]
pub const PROFILE_FORM_JSON: &str = r#"{
  "id": "profile",
  "title": "Profile",
  "description": "Tell us who you are",
  "schema": {
    "nodes": [
      { "id": "start", "type": "start", "data": {} },
      { "id": "q1", "type": "question",
        "data": { "label": "Your name", "questionType": "input",
                  "validation": { "required": true }, "parameterName": "name" } },
      { "id": "end", "type": "end", "data": { "message": "Thanks for signing up" } }
    ],
    "edges": [
      { "id": "e1", "source": "start", "target": "q1" },
      { "id": "e2", "source": "q1", "target": "end" }
    ]
  }
}"#;

/// `start -> choice (a, b) -> tx (transfer)`
#[allow(dead_code)]
pub const DONATION_FORM_JSON: &str = r#"{
  "id": "donation",
  "title": "Donate",
  "description": "Support the fund",
  "schema": {
    "nodes": [
      { "id": "start", "type": "start", "data": {} },
      { "id": "choice", "type": "question",
        "data": { "label": "Pick a tier", "questionType": "choice",
                  "validation": { "required": true },
                  "options": [ { "label": "Tier A", "value": "a" }, "b" ],
                  "parameterName": "tier" } },
      { "id": "tx", "type": "transaction",
        "data": { "transactionType": "transfer",
                  "parameters": { "recipient": "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin",
                                  "amount": "0.5" } } }
    ],
    "edges": [
      { "id": "e1", "source": "start", "target": "choice" },
      { "id": "e2", "source": "choice", "target": "tx" }
    ]
  }
}"#;

/// `start -> amount (input) -> pay (transfer with amount "{{amount}}")`
#[allow(dead_code)]
pub const TIP_FORM_JSON: &str = r#"{
  "id": "tip",
  "title": "Tip jar",
  "schema": {
    "nodes": [
      { "id": "start", "type": "start", "data": {} },
      { "id": "amount", "type": "question",
        "data": { "label": "How much?", "questionType": "input",
                  "validation": { "required": true }, "parameterName": "amount" } },
      { "id": "pay", "type": "transaction",
        "data": { "transactionType": "transferSol",
                  "parameters": { "recipient": "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin",
                                  "amount": "{{amount}}" } } }
    ],
    "edges": [
      { "id": "e1", "source": "start", "target": "amount" },
      { "id": "e2", "source": "amount", "target": "pay" }
    ]
  }
}"#;

/// `start -> name -> email`, with no end node: the flow completes after `email`.
#[allow(dead_code)]
pub const SURVEY_FORM_JSON: &str = r#"{
  "id": "survey",
  "title": "Survey",
  "schema": {
    "nodes": [
      { "id": "start", "type": "start", "data": { "title": "Quick survey" } },
      { "id": "name", "type": "question",
        "data": { "label": "Name", "validation": { "required": false } } },
      { "id": "email", "type": "question",
        "data": { "label": "Email", "questionType": "input",
                  "validation": { "required": true } } }
    ],
    "edges": [
      { "id": "e1", "source": "start", "target": "name" },
      { "id": "e2", "source": "name", "target": "email" }
    ]
  }
}"#;

/// `start -> q (requiresTransaction) -> end`, with no transaction node anywhere.
#[allow(dead_code)]
pub const ORPHAN_REQUIREMENT_FORM_JSON: &str = r#"{
  "id": "orphan",
  "title": "Orphan",
  "schema": {
    "nodes": [
      { "id": "start", "type": "start", "data": {} },
      { "id": "q", "type": "question",
        "data": { "label": "Anything", "requiresTransaction": true } },
      { "id": "end", "type": "end", "data": {} }
    ],
    "edges": [
      { "id": "e1", "source": "start", "target": "q" },
      { "id": "e2", "source": "q", "target": "end" }
    ]
  }
}"#;

/// `start -> step (choice: next, stop) -> end`. The option values share names with routing words.
#[allow(dead_code)]
pub const ROUTING_WORDS_FORM_JSON: &str = r#"{
  "id": "nx",
  "title": "Keep going?",
  "schema": {
    "nodes": [
      { "id": "start", "type": "start", "data": {} },
      { "id": "step", "type": "question",
        "data": { "label": "Continue", "questionType": "choice",
                  "validation": { "required": true }, "options": [ "next", "stop" ] } },
      { "id": "end", "type": "end", "data": { "message": "Done" } }
    ],
    "edges": [
      { "id": "e1", "source": "start", "target": "step" },
      { "id": "e2", "source": "step", "target": "end" }
    ]
  }
}"#;

/// `a -> b -> a`: every node is an edge target, so there is no start.
#[allow(dead_code)]
pub const CYCLIC_FORM_JSON: &str = r#"{
  "id": "loop",
  "title": "Loop",
  "schema": {
    "nodes": [
      { "id": "a", "type": "question", "data": { "label": "A" } },
      { "id": "b", "type": "question", "data": { "label": "B" } }
    ],
    "edges": [
      { "id": "e1", "source": "a", "target": "b" },
      { "id": "e2", "source": "b", "target": "a" }
    ]
  }
}"#;

#[allow(dead_code)]
pub fn load_form(json: &str) -> Form {
    Form::from_json(json).expect("fixture form should parse")
}

/// A POST body carrying `account` and `value` at the top level.
#[allow(dead_code)]
pub fn answer(value: impl Into<Value>) -> RequestData {
    RequestData::from_body(json!({ "account": ACCOUNT, "value": value.into() }))
}

/// A POST body carrying only the account, as a choice button would send.
#[allow(dead_code)]
pub fn account_only() -> RequestData {
    RequestData::from_body(json!({ "account": ACCOUNT }))
}

/// Records every build request and answers with a fixed transaction.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingBuilder {
    pub calls: Mutex<Vec<(String, String, ParamBag)>>,
}

#[allow(dead_code)]
pub const RECORDED_TRANSACTION: &str = "AQABAgMEBQYHCAk=";

#[allow(dead_code)]
impl RecordingBuilder {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_params(&self) -> Option<ParamBag> {
        self.calls.lock().unwrap().last().map(|(_, _, p)| p.clone())
    }
}

#[async_trait]
impl TransactionBuilder for RecordingBuilder {
    async fn create(
        &self,
        kind: &str,
        account: &str,
        params: &ParamBag,
    ) -> Result<String, DispatchError> {
        self.calls
            .lock()
            .unwrap()
            .push((kind.to_string(), account.to_string(), params.clone()));
        Ok(RECORDED_TRANSACTION.to_string())
    }
}

/// Always fails, like a builder whose RPC endpoint is down.
#[allow(dead_code)]
pub struct FailingBuilder;

#[async_trait]
impl TransactionBuilder for FailingBuilder {
    async fn create(&self, _: &str, _: &str, _: &ParamBag) -> Result<String, DispatchError> {
        Err(DispatchError::Build("rpc node unavailable".to_string()))
    }
}

/// Never answers within any reasonable timeout.
#[allow(dead_code)]
pub struct StalledBuilder;

#[async_trait]
impl TransactionBuilder for StalledBuilder {
    async fn create(&self, _: &str, _: &str, _: &ParamBag) -> Result<String, DispatchError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }
}

#[allow(dead_code)]
pub struct PanickingBuilder;

#[async_trait]
impl TransactionBuilder for PanickingBuilder {
    async fn create(&self, _: &str, _: &str, _: &ParamBag) -> Result<String, DispatchError> {
        panic!("builder bug");
    }
}

/// A session store that is permanently unreachable.
#[allow(dead_code)]
pub struct UnreachableStore;

#[async_trait]
impl SessionStore for UnreachableStore {
    async fn get(&self, _: &str) -> Option<String> {
        None
    }

    async fn set(&self, _: &str, _: String, _: Option<Duration>) -> Option<()> {
        None
    }

    async fn del(&self, _: &str) -> Option<u64> {
        None
    }
}

/// A submission sink whose writes always fail.
#[allow(dead_code)]
pub struct BrokenSink;

#[async_trait]
impl SubmissionSink for BrokenSink {
    async fn persist(&self, _: Submission) -> Result<(), FinalizeError> {
        Err(FinalizeError::Storage("disk full".to_string()))
    }
}

/// An engine over one form, with handles on its in-memory collaborators.
#[allow(dead_code)]
pub struct Harness {
    pub engine: FlowEngine,
    pub form_id: String,
    pub sessions: Arc<MemorySessionStore>,
    pub submissions: Arc<MemorySubmissionSink>,
    pub builder: Arc<RecordingBuilder>,
}

#[allow(dead_code)]
impl Harness {
    pub fn new(form_json: &str) -> Self {
        Self::with_config(form_json, EngineConfig::default())
    }

    pub fn with_config(form_json: &str, config: EngineConfig) -> Self {
        let form = load_form(form_json);
        let form_id = form.id.clone();
        let sessions = Arc::new(MemorySessionStore::new());
        let submissions = Arc::new(MemorySubmissionSink::new());
        let builder = Arc::new(RecordingBuilder::default());
        let engine = FlowEngine::builder(Arc::new(MemoryFormSource::new().with_form(form)))
            .with_session_store(sessions.clone())
            .with_submission_sink(submissions.clone())
            .with_transaction_builder(builder.clone())
            .with_config(config)
            .build();
        Self {
            engine,
            form_id,
            sessions,
            submissions,
            builder,
        }
    }

    pub async fn submit(&self, request: RequestData) -> ActionResponse {
        self.engine
            .submit(&self.form_id, request)
            .await
            .expect("form should exist")
    }

    pub async fn current_node(&self) -> Option<String> {
        self.engine
            .sessions()
            .load(&self.form_id, ACCOUNT)
            .await
            .map(|s| s.current_node_id)
    }

    pub async fn session(&self) -> Option<Session> {
        self.engine.sessions().load(&self.form_id, ACCOUNT).await
    }
}

/// An engine over one form with a custom transaction builder and memory stores.
#[allow(dead_code)]
pub fn engine_with_builder(
    form_json: &str,
    builder: Arc<dyn TransactionBuilder>,
    submissions: Arc<MemorySubmissionSink>,
    config: EngineConfig,
) -> FlowEngine {
    FlowEngine::builder(Arc::new(MemoryFormSource::new().with_form(load_form(form_json))))
        .with_submission_sink(submissions)
        .with_transaction_builder(builder)
        .with_config(config)
        .build()
}
