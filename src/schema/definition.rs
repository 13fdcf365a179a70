use crate::error::SchemaError;
use ahash::AHashSet;
use serde_json::{Map, Value};

/// A transaction node's parameter bag, stored exactly as authored.
pub type ParamBag = Map<String, Value>;

/// The complete, canonical graph of a form, ready to be walked.
/// This is the target structure for any authored-format conversion.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl FormSchema {
    /// Checks that node ids are unique and that every edge connects two existing nodes.
    ///
    /// The engine treats schema validity as a precondition and never calls this
    /// per request; it is meant for whoever stores the schema.
    pub fn check_edges(&self) -> Result<(), SchemaError> {
        let mut ids = AHashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(SchemaError::DuplicateNode(node.id.clone()));
            }
        }

        for edge in &self.edges {
            for end in [&edge.source, &edge.target] {
                if !ids.contains(end.as_str()) {
                    return Err(SchemaError::DanglingEdge {
                        edge_id: edge.id.clone(),
                        missing_node_id: end.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A single step of the form.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Forces the terminal-with-transaction branch when this node is answered.
    pub requires_transaction: bool,
}

impl Node {
    /// The authored type tag of the node.
    pub fn type_name(&self) -> &str {
        match &self.kind {
            NodeKind::Start(_) => "start",
            NodeKind::Question(_) => "question",
            NodeKind::Transaction(_) => "transaction",
            NodeKind::End(_) => "end",
            NodeKind::Unknown { type_name } => type_name,
        }
    }

    /// Whether a successful step on this node stores an answer.
    pub fn records_answer(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Question(_) | NodeKind::Transaction(_)
        )
    }

    pub fn as_transaction(&self) -> Option<&TransactionData> {
        match &self.kind {
            NodeKind::Transaction(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, NodeKind::End(_))
    }
}

/// Per-type node payloads.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Start(StartData),
    Question(QuestionData),
    Transaction(TransactionData),
    End(EndData),
    /// A type this engine does not know. Kept so it can still be rendered.
    Unknown { type_name: String },
}

#[derive(Debug, Clone, Default)]
pub struct StartData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuestionData {
    pub label: String,
    pub description: Option<String>,
    pub kind: QuestionKind,
    pub validation: Validation,
    pub options: Vec<ChoiceOption>,
    /// The name transaction parameters use to refer to this answer, as in `{{name}}`.
    pub parameter_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Input,
    Choice,
    Date,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct TransactionData {
    /// The transaction-kind tag handed to dispatch, e.g. `"transfer"`.
    pub kind: String,
    pub parameters: ParamBag,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EndData {
    pub title: Option<String>,
    pub message: Option<String>,
}

/// Defines the successor consulted for `source`.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A stored form: display defaults plus its graph.
#[derive(Debug, Clone)]
pub struct Form {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub schema: FormSchema,
}
