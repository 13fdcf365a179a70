use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Post,
    Error,
}

/// The answer to a POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Transaction(TransactionEnvelope),
    Post(PostEnvelope),
    Error(ErrorEnvelope),
}

/// An unsigned transaction for the wallet to sign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionEnvelope {
    /// Base64-encoded serialized transaction.
    pub transaction: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostEnvelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<NextLinks>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextLinks {
    pub next: NextLink,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextLink {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub message: String,
    pub links: RetryLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryLinks {
    pub actions: Vec<RetryAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryAction {
    pub label: String,
    pub href: String,
}

impl ActionResponse {
    pub fn transaction(transaction: String, message: impl Into<String>) -> Self {
        ActionResponse::Transaction(TransactionEnvelope {
            transaction,
            message: message.into(),
        })
    }

    /// A post envelope. With `next_href`, the client follows it right away.
    pub fn post(message: impl Into<String>, next_href: Option<String>) -> Self {
        ActionResponse::Post(PostEnvelope {
            kind: EnvelopeKind::Post,
            message: message.into(),
            links: next_href.map(|href| NextLinks {
                next: NextLink {
                    kind: EnvelopeKind::Post,
                    href,
                },
            }),
        })
    }

    pub fn error(message: impl Into<String>, retry_href: impl Into<String>) -> Self {
        ActionResponse::Error(ErrorEnvelope {
            kind: EnvelopeKind::Error,
            message: message.into(),
            links: RetryLinks {
                actions: vec![RetryAction {
                    label: "Try again".to_string(),
                    href: retry_href.into(),
                }],
            },
        })
    }

    pub fn message(&self) -> &str {
        match self {
            ActionResponse::Transaction(t) => &t.message,
            ActionResponse::Post(p) => &p.message,
            ActionResponse::Error(e) => &e.message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ActionResponse::Error(_))
    }

    /// The callback link of an intermediate step, if any.
    pub fn next_href(&self) -> Option<&str> {
        match self {
            ActionResponse::Post(PostEnvelope {
                links: Some(links), ..
            }) => Some(&links.next.href),
            _ => None,
        }
    }
}
