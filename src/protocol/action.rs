use serde::{Deserialize, Serialize};

/// Whether a description still offers actions or marks the end of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionKind {
    Action,
    Completed,
}

/// What the client does when an action is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkedActionKind {
    /// The POST answers with a post envelope; nothing is signed.
    Post,
    /// The POST answers with a transaction to sign.
    Transaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Text,
    Date,
}

/// The body of a GET: one renderable step of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescription {
    #[serde(rename = "type")]
    pub kind: DescriptionKind,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
}

impl ActionDescription {
    /// The actions offered, empty for a completed description.
    pub fn actions(&self) -> &[LinkedAction] {
        self.links
            .as_ref()
            .map(|l| l.actions.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAction {
    #[serde(rename = "type")]
    pub kind: LinkedActionKind,
    pub href: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionParameter {
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    pub name: String,
    pub label: String,
    pub required: bool,
}
