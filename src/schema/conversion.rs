use super::definition::*;
use super::raw::*;
use crate::error::SchemaError;
use serde::de::DeserializeOwned;
use tracing::warn;

/// A trait for authored formats that can be converted into a `FormSchema`.
///
/// The engine only ever walks the canonical `FormSchema`. Implement this on
/// your own structs to feed it graphs from a different editor or storage layout.
///
/// # Example
///
/// ```rust,no_run
/// use formflow::error::SchemaError;
/// use formflow::schema::{Edge, FormSchema, IntoSchema, Node, NodeKind};
///
/// struct Step { id: String }
/// struct Wizard { steps: Vec<Step> }
///
/// impl IntoSchema for Wizard {
///     fn into_schema(self) -> Result<FormSchema, SchemaError> {
///         let nodes: Vec<Node> = self
///             .steps
///             .iter()
///             .map(|s| Node {
///                 id: s.id.clone(),
///                 kind: NodeKind::End(Default::default()),
///                 requires_transaction: false,
///             })
///             .collect();
///         let edges = self
///             .steps
///             .windows(2)
///             .map(|w| Edge {
///                 id: format!("{}-{}", w[0].id, w[1].id),
///                 source: w[0].id.clone(),
///                 target: w[1].id.clone(),
///             })
///             .collect();
///         Ok(FormSchema { nodes, edges })
///     }
/// }
/// ```
pub trait IntoSchema {
    /// Consumes the object and converts it into a walkable form graph.
    fn into_schema(self) -> Result<FormSchema, SchemaError>;
}

impl IntoSchema for RawSchema {
    fn into_schema(self) -> Result<FormSchema, SchemaError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(convert_node)
            .collect::<Result<Vec<_>, _>>()?;

        let edges = self
            .edges
            .into_iter()
            .enumerate()
            .map(|(index, raw_edge)| Edge {
                id: raw_edge
                    .id
                    .unwrap_or_else(|| format!("e{}-{}-{}", index, raw_edge.source, raw_edge.target)),
                source: raw_edge.source,
                target: raw_edge.target,
            })
            .collect();

        Ok(FormSchema { nodes, edges })
    }
}

impl RawForm {
    pub fn into_form(self) -> Result<Form, SchemaError> {
        Ok(Form {
            id: self.id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            schema: self.schema.into_schema()?,
        })
    }
}

impl FormSchema {
    /// Parses the flow editor's JSON graph.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let raw: RawSchema =
            serde_json::from_str(json).map_err(|e| SchemaError::JsonParseError(e.to_string()))?;
        raw.into_schema()
    }
}

impl Form {
    /// Parses a form record (`{id, title, description, icon, schema}`).
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let raw: RawForm =
            serde_json::from_str(json).map_err(|e| SchemaError::JsonParseError(e.to_string()))?;
        raw.into_form()
    }
}

fn convert_node(raw: RawNode) -> Result<Node, SchemaError> {
    let data = if raw.data.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        raw.data
    };
    let common: RawCommonData = payload(&raw.id, "data", &data)?;

    let kind = match raw.node_type.as_str() {
        "start" => {
            let start: RawStartData = payload(&raw.id, "start", &data)?;
            NodeKind::Start(StartData {
                title: start.title,
                description: start.description,
                image: start.image,
            })
        }
        "question" => {
            let question: RawQuestionData = payload(&raw.id, "question", &data)?;
            NodeKind::Question(convert_question(&raw.id, question))
        }
        "transaction" => {
            let tx: RawTransactionData = payload(&raw.id, "transaction", &data)?;
            let kind = tx.transaction_type.ok_or_else(|| SchemaError::InvalidPayload {
                node_id: raw.id.clone(),
                field: "transactionType".to_string(),
                message: "transaction nodes must name a transaction type".to_string(),
            })?;
            NodeKind::Transaction(TransactionData {
                kind,
                parameters: tx.parameters,
                title: tx.title,
            })
        }
        "end" => {
            let end: RawEndData = payload(&raw.id, "end", &data)?;
            NodeKind::End(EndData {
                title: end.title,
                message: end.message,
            })
        }
        other => NodeKind::Unknown {
            type_name: other.to_string(),
        },
    };

    Ok(Node {
        id: raw.id,
        kind,
        requires_transaction: common.requires_transaction,
    })
}

fn convert_question(node_id: &str, raw: RawQuestionData) -> QuestionData {
    let kind = match raw.question_type.as_deref() {
        None | Some("input") | Some("text") => QuestionKind::Input,
        Some("choice") | Some("select") => QuestionKind::Choice,
        Some("date") => QuestionKind::Date,
        Some(other) => {
            warn!(node_id, question_type = other, "unknown question type, treating as input");
            QuestionKind::Input
        }
    };

    let options = raw
        .options
        .into_iter()
        .map(|option| match option {
            RawOption::Plain(value) => ChoiceOption {
                label: value.clone(),
                value,
            },
            RawOption::Labeled { label, value } => ChoiceOption {
                label: label.unwrap_or_else(|| value.clone()),
                value,
            },
        })
        .collect();

    QuestionData {
        label: raw.label.unwrap_or_default(),
        description: raw.description,
        kind,
        validation: Validation {
            required: raw.validation.required,
        },
        options,
        parameter_name: raw.parameter_name,
    }
}

fn payload<T: DeserializeOwned>(
    node_id: &str,
    field: &str,
    data: &serde_json::Value,
) -> Result<T, SchemaError> {
    T::deserialize(data).map_err(|e| SchemaError::InvalidPayload {
        node_id: node_id.to_string(),
        field: field.to_string(),
        message: e.to_string(),
    })
}
