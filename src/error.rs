use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while turning an authored schema into a `FormSchema`.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("Failed to parse schema JSON: {0}")]
    JsonParseError(String),

    #[error("Node '{node_id}' has an invalid '{field}' payload: {message}")]
    InvalidPayload {
        node_id: String,
        field: String,
        message: String,
    },

    #[error("Edge '{edge_id}' references node '{missing_node_id}', which is not in the schema")]
    DanglingEdge {
        edge_id: String,
        missing_node_id: String,
    },

    #[error("Node id '{0}' appears more than once")]
    DuplicateNode(String),
}

/// Fatal conditions raised to the caller instead of a protocol envelope.
///
/// Everything else a request can run into is folded into an error envelope
/// by the engine; these mean the addressed resource does not exist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Form '{0}' not found")]
    FormNotFound(String),

    #[error("Node not found: '{0}'")]
    NodeNotFound(String),

    #[error("No valid node in schema for form '{0}'")]
    NoValidNode(String),
}

/// Errors raised while validating or building the transaction of a terminal step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Missing required parameter '{field}' for {kind} transaction")]
    MissingField { kind: String, field: String },

    #[error("Parameter '{field}' is not a valid address: '{value}'")]
    InvalidAddress { field: String, value: String },

    #[error("Parameter '{field}' is not a valid amount: '{value}'")]
    InvalidAmount { field: String, value: String },

    #[error("Parameter '{field}' is invalid: {message}")]
    InvalidParameter { field: String, message: String },

    #[error("No transaction is configured for node '{0}'")]
    NoTransaction(String),

    #[error("Transaction builder failed: {0}")]
    Build(String),

    #[error("Transaction builder did not answer within {0:?}")]
    Timeout(Duration),
}

/// Errors raised while persisting a completed submission.
#[derive(Error, Debug, Clone)]
pub enum FinalizeError {
    #[error("Submission storage failed: {0}")]
    Storage(String),
}

/// Errors raised while loading engine configuration or form definitions from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
