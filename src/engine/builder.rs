use super::FlowEngine;
use crate::config::EngineConfig;
use crate::dispatch::{Dispatcher, PayloadEchoBuilder, TransactionBuilder};
use crate::finalize::{Finalizer, MemorySubmissionSink, SubmissionSink};
use crate::forms::FormSource;
use crate::session::{MemorySessionStore, SessionRepository, SessionStore};
use std::sync::Arc;

/// Assembles a `FlowEngine` from its collaborators.
///
/// Anything not supplied falls back to an in-process implementation: a memory
/// session store, a memory submission sink, and the echo transaction builder.
pub struct EngineBuilder {
    forms: Arc<dyn FormSource>,
    session_store: Arc<dyn SessionStore>,
    submission_sink: Arc<dyn SubmissionSink>,
    transaction_builder: Arc<dyn TransactionBuilder>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new(forms: Arc<dyn FormSource>) -> Self {
        Self {
            forms,
            session_store: Arc::new(MemorySessionStore::new()),
            submission_sink: Arc::new(MemorySubmissionSink::new()),
            transaction_builder: Arc::new(PayloadEchoBuilder),
            config: EngineConfig::default(),
        }
    }

    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = store;
        self
    }

    pub fn with_submission_sink(mut self, sink: Arc<dyn SubmissionSink>) -> Self {
        self.submission_sink = sink;
        self
    }

    pub fn with_transaction_builder(mut self, builder: Arc<dyn TransactionBuilder>) -> Self {
        self.transaction_builder = builder;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> FlowEngine {
        let sessions = SessionRepository::new(
            self.session_store,
            self.config.session_prefix.clone(),
            self.config.session_ttl(),
        );
        FlowEngine {
            forms: self.forms,
            dispatcher: Dispatcher::new(self.transaction_builder, self.config.dispatch_timeout()),
            finalizer: Finalizer::new(self.submission_sink, sessions.clone()),
            sessions,
            config: self.config,
        }
    }
}
