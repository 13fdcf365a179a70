//! Pure lookups over an immutable `FormSchema`.
//!
//! Traversal is deliberately naive: the start node is the one no edge points
//! at, and a node's successor is the target of its first outgoing edge. A
//! schema with several start candidates or with cycles is walked as-is.

use super::definition::{FormSchema, Node};
use super::validate::{rejection_message, validate_input};
use crate::error::FlowError;
use ahash::AHashSet;

/// The result of feeding one raw value to the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// The successor to move to. `None` means the flow ends after this node.
    pub next_node_id: Option<String>,
    pub is_valid: bool,
    pub error: Option<String>,
}

/// Finds a node by exact id.
pub fn locate_node<'a>(schema: &'a FormSchema, id: &str) -> Option<&'a Node> {
    schema.nodes.iter().find(|n| n.id == id)
}

/// Finds the node no edge points at. Returns the first such node in list order.
pub fn locate_start(schema: &FormSchema) -> Option<&Node> {
    let targets: AHashSet<&str> = schema.edges.iter().map(|e| e.target.as_str()).collect();
    schema.nodes.iter().find(|n| !targets.contains(n.id.as_str()))
}

/// Returns the target of the first edge leaving `id`, in edge list order.
pub fn locate_next<'a>(schema: &'a FormSchema, id: &str) -> Option<&'a str> {
    schema
        .edges
        .iter()
        .find(|e| e.source == id)
        .map(|e| e.target.as_str())
}

/// Validates `raw` against the node `current_id` and reports where the flow goes next.
///
/// # Errors
///
/// Returns `FlowError::NodeNotFound` when `current_id` is not in the schema.
/// Invalid input is not an error; it is reported through `StepOutcome::is_valid`.
pub fn process_input(
    schema: &FormSchema,
    current_id: &str,
    raw: &str,
    demo_mode: bool,
) -> Result<StepOutcome, FlowError> {
    let node = locate_node(schema, current_id)
        .ok_or_else(|| FlowError::NodeNotFound(current_id.to_string()))?;

    if !validate_input(node, raw, demo_mode) {
        return Ok(StepOutcome {
            next_node_id: None,
            is_valid: false,
            error: Some(rejection_message(node, demo_mode)),
        });
    }

    Ok(StepOutcome {
        next_node_id: locate_next(schema, current_id).map(str::to_string),
        is_valid: true,
        error: None,
    })
}
