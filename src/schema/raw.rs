use serde::Deserialize;

/// Node as stored by the flow editor, with its type-specific payload left untyped.
#[derive(Debug, Deserialize, Clone)]
pub struct RawNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Edge connecting two editor nodes
#[derive(Debug, Deserialize, Clone)]
pub struct RawEdge {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
}

/// Complete editor graph
#[derive(Debug, Deserialize, Clone)]
pub struct RawSchema {
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

/// A form record: display defaults plus the editor graph.
#[derive(Debug, Deserialize, Clone)]
pub struct RawForm {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "imageUrl", alias = "image")]
    pub icon: Option<String>,
    pub schema: RawSchema,
}

/// Fields every node payload may carry regardless of type.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawCommonData {
    #[serde(default, alias = "requiresTransaction")]
    pub requires_transaction: bool,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawStartData {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "imageUrl", alias = "icon")]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawQuestionData {
    #[serde(alias = "question")]
    pub label: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "questionType")]
    pub question_type: Option<String>,
    #[serde(default)]
    pub validation: RawValidation,
    #[serde(default)]
    pub options: Vec<RawOption>,
    #[serde(alias = "parameterName")]
    pub parameter_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawValidation {
    #[serde(default)]
    pub required: bool,
}

/// Options are authored either as bare strings or as label/value pairs.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawOption {
    Plain(String),
    Labeled {
        #[serde(default)]
        label: Option<String>,
        value: String,
    },
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawTransactionData {
    #[serde(alias = "transactionType")]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawEndData {
    pub title: Option<String>,
    pub message: Option<String>,
}
