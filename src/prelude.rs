//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the formflow
//! crate. Import it to wire up an engine without importing each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use formflow::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run_example() -> Result<()> {
//! let forms = MemoryFormSource::from_dir("forms")?;
//! let config = EngineConfig::from_file("formflow.json")?;
//! let engine = FlowEngine::builder(Arc::new(forms))
//!     .with_config(config)
//!     .build();
//!
//! let description = engine.describe("signup", None).await?;
//! println!("{}", description.title);
//! # Ok(())
//! # }
//! ```

// Engine
pub use crate::config::EngineConfig;
pub use crate::engine::{EngineBuilder, FlowEngine, RequestData};

// Form definitions
pub use crate::forms::{FormSource, MemoryFormSource};
pub use crate::schema::{
    ChoiceOption, Edge, EndData, Form, FormSchema, IntoSchema, Node, NodeKind, ParamBag,
    QuestionData, QuestionKind, StartData, TransactionData, Validation,
};

// Wire shapes
pub use crate::protocol::{ActionDescription, ActionResponse, LinkedAction};

// Pluggable backends
pub use crate::dispatch::{PayloadEchoBuilder, TransactionBuilder, TransactionKind};
pub use crate::finalize::{MemorySubmissionSink, Submission, SubmissionSink};
pub use crate::session::{Answers, MemorySessionStore, Session, SessionStore};

// Error types
pub use crate::error::{ConfigError, DispatchError, FinalizeError, FlowError, SchemaError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
