use super::action::*;
use crate::config::EngineConfig;
use crate::dispatch::TransactionKind;
use crate::resolver::{mask_unresolved, resolve_parameters};
use crate::schema::{
    CONFIRM_SENTINEL, DEMO_CONFIRM_SENTINEL, Form, Node, NodeKind, QuestionData, QuestionKind,
};
use crate::session::Answers;

/// Shown by end nodes and plain completions that carry no message of their own.
pub const DEFAULT_COMPLETION_MESSAGE: &str = "Thank you! Your response has been recorded.";

/// The conventional parameter name every value-carrying action uses.
pub const VALUE_PARAMETER: &str = "value";

/// Renders a node as the protocol's action description.
///
/// `next` is only consulted for labels and for whether pressing the action
/// yields a transaction; `answers` only fill in a transaction's summary.
/// Describing never mutates anything.
pub fn describe_node(
    form: &Form,
    node: &Node,
    next: Option<&Node>,
    answers: &Answers,
    config: &EngineConfig,
) -> ActionDescription {
    let icon = form
        .icon
        .clone()
        .unwrap_or_else(|| config.default_icon.clone());
    let action_kind = linked_action_kind(node, next, config.demo_mode);

    match &node.kind {
        NodeKind::Start(start) => ActionDescription {
            kind: DescriptionKind::Action,
            icon: start.image.clone().unwrap_or(icon),
            title: start.title.clone().unwrap_or_else(|| form.title.clone()),
            description: start
                .description
                .clone()
                .unwrap_or_else(|| form.description.clone()),
            label: "Start".to_string(),
            disabled: false,
            links: Some(ActionLinks {
                actions: vec![LinkedAction {
                    kind: action_kind,
                    href: config.step_href(&form.id),
                    label: "Start".to_string(),
                    parameters: vec![value_parameter(
                        ParameterKind::Text,
                        "Type anything to begin",
                        true,
                    )],
                }],
            }),
        },

        NodeKind::End(end) => ActionDescription {
            kind: DescriptionKind::Completed,
            icon,
            title: end.title.clone().unwrap_or_else(|| form.title.clone()),
            description: end
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPLETION_MESSAGE.to_string()),
            label: "Completed".to_string(),
            disabled: true,
            links: None,
        },

        NodeKind::Transaction(tx) => {
            let params = resolve_parameters(&form.schema, &tx.parameters, answers);
            let summary =
                TransactionKind::from_tag(&tx.kind).summary(&mask_unresolved(&params));
            let (description, parameter_label) = if config.demo_mode {
                (
                    format!("Demo mode: no transaction will be sent. ({})", summary),
                    format!("Type '{}' to finish the demo", DEMO_CONFIRM_SENTINEL),
                )
            } else {
                (
                    summary,
                    format!("Type '{}' to approve", CONFIRM_SENTINEL),
                )
            };

            ActionDescription {
                kind: DescriptionKind::Action,
                icon,
                title: tx.title.clone().unwrap_or_else(|| form.title.clone()),
                description,
                label: "Confirm".to_string(),
                disabled: false,
                links: Some(ActionLinks {
                    actions: vec![LinkedAction {
                        kind: action_kind,
                        href: config.step_href(&form.id),
                        label: "Confirm".to_string(),
                        parameters: vec![value_parameter(
                            ParameterKind::Text,
                            &parameter_label,
                            true,
                        )],
                    }],
                }),
            }
        }

        NodeKind::Question(question) => {
            let actions = match question.kind {
                QuestionKind::Choice => question
                    .options
                    .iter()
                    .map(|option| LinkedAction {
                        kind: action_kind,
                        href: config.choice_href(&form.id, &option.value),
                        label: option.label.clone(),
                        parameters: Vec::new(),
                    })
                    .collect(),
                QuestionKind::Input | QuestionKind::Date => {
                    let parameter_kind = if question.kind == QuestionKind::Date {
                        ParameterKind::Date
                    } else {
                        ParameterKind::Text
                    };
                    vec![LinkedAction {
                        kind: action_kind,
                        href: config.step_href(&form.id),
                        label: step_label(node, next).to_string(),
                        parameters: vec![value_parameter(
                            parameter_kind,
                            &question.label,
                            question.validation.required,
                        )],
                    }]
                }
            };

            ActionDescription {
                kind: DescriptionKind::Action,
                icon,
                title: question_title(form, question),
                description: question
                    .description
                    .clone()
                    .unwrap_or_else(|| form.description.clone()),
                label: step_label(node, next).to_string(),
                disabled: false,
                links: Some(ActionLinks { actions }),
            }
        }

        NodeKind::Unknown { .. } => ActionDescription {
            kind: DescriptionKind::Action,
            icon,
            title: form.title.clone(),
            description: form.description.clone(),
            label: "Continue".to_string(),
            disabled: false,
            links: Some(ActionLinks {
                actions: vec![LinkedAction {
                    kind: action_kind,
                    href: config.action_href(&form.id),
                    label: "Continue".to_string(),
                    parameters: Vec::new(),
                }],
            }),
        },
    }
}

/// Pressing an action yields a transaction exactly when the engine would take
/// the transaction branch for this step.
fn linked_action_kind(node: &Node, next: Option<&Node>, demo_mode: bool) -> LinkedActionKind {
    if demo_mode {
        return LinkedActionKind::Post;
    }
    let next_is_transaction = next.is_some_and(|n| n.as_transaction().is_some());
    if node.as_transaction().is_some() || next_is_transaction || node.requires_transaction {
        LinkedActionKind::Transaction
    } else {
        LinkedActionKind::Post
    }
}

/// "Submit" when answering ends the flow, either by completing it or by
/// handing over to a transaction.
fn step_label(node: &Node, next: Option<&Node>) -> &'static str {
    if node.requires_transaction {
        return "Submit";
    }
    match next {
        Some(next) if !next.is_end() && next.as_transaction().is_none() => "Next",
        _ => "Submit",
    }
}

fn question_title(form: &Form, question: &QuestionData) -> String {
    if question.label.is_empty() {
        form.title.clone()
    } else {
        question.label.clone()
    }
}

fn value_parameter(kind: ParameterKind, label: &str, required: bool) -> ActionParameter {
    ActionParameter {
        kind,
        name: VALUE_PARAMETER.to_string(),
        label: label.to_string(),
        required,
    }
}
