//! # FormFlow - Conversational Forms over Blockchain Actions
//!
//! **FormFlow** walks a user through a form one step per request. A form is a small
//! directed graph of nodes (start, question, transaction, end) authored in a visual
//! editor and stored as JSON. Each step is exposed as an *action*: a JSON description a
//! wallet client renders as buttons and text fields, and a POST endpoint that accepts
//! the answer. Flows that end in a transaction node hand back an unsigned,
//! base64-encoded transaction for the wallet to sign.
//!
//! ## Core Workflow
//!
//! The engine is stateless per request; all progress lives in a session store keyed
//! by form and wallet account. The primary workflow is:
//!
//! 1.  **Load Your Forms**: Parse stored form records into a [`schema::Form`], either
//!     from JSON with [`schema::Form::from_json`] or by implementing [`schema::IntoSchema`]
//!     for your own node format.
//! 2.  **Build an Engine**: Use [`FlowEngine::builder`](engine::FlowEngine::builder) to
//!     plug in a form source, a session store, a submission sink and a transaction builder.
//! 3.  **Serve**: Mount [`server::router`] under axum, or call
//!     [`describe`](engine::FlowEngine::describe) and [`submit`](engine::FlowEngine::submit)
//!     yourself.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formflow::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! const SCHEMA: &str = r#"{
//!   "id": "newsletter",
//!   "title": "Join the newsletter",
//!   "schema": {
//!     "nodes": [
//!       { "id": "start", "type": "start", "data": {} },
//!       { "id": "email", "type": "question",
//!         "data": { "label": "Your email", "questionType": "input",
//!                   "validation": { "required": true } } },
//!       { "id": "done", "type": "end", "data": { "message": "See you soon!" } }
//!     ],
//!     "edges": [
//!       { "id": "e1", "source": "start", "target": "email" },
//!       { "id": "e2", "source": "email", "target": "done" }
//!     ]
//!   }
//! }"#;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let form = Form::from_json(SCHEMA)?;
//!     let forms = MemoryFormSource::new().with_form(form);
//!     let engine = FlowEngine::builder(Arc::new(forms)).build();
//!
//!     // What the wallet renders first.
//!     let first = engine.describe("newsletter", None).await?;
//!     println!("{}", first.title);
//!
//!     // Leave the start node, then answer the question.
//!     let account = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
//!     for value in ["go", "me@example.com"] {
//!         let request = RequestData::from_body(json!({ "account": account, "value": value }));
//!         let response = engine.submit("newsletter", request).await?;
//!         println!("-> {}", response.message());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod finalize;
pub mod forms;
pub mod prelude;
pub mod protocol;
pub mod resolver;
pub mod schema;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
