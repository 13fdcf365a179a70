use super::definition::{Node, NodeKind, QuestionData, QuestionKind};
use itertools::Itertools;

/// The value a transaction step must receive to count as confirmed.
pub const CONFIRM_SENTINEL: &str = "confirm";
/// The confirmation value accepted instead while demo mode is on.
pub const DEMO_CONFIRM_SENTINEL: &str = "test";

pub fn confirm_sentinel(demo_mode: bool) -> &'static str {
    if demo_mode {
        DEMO_CONFIRM_SENTINEL
    } else {
        CONFIRM_SENTINEL
    }
}

/// Checks a raw value against the constraints the node declares.
pub fn validate_input(node: &Node, raw: &str, demo_mode: bool) -> bool {
    match &node.kind {
        NodeKind::Start(_) => true,
        NodeKind::Transaction(_) => raw == confirm_sentinel(demo_mode),
        NodeKind::Question(question) => validate_answer(question, raw),
        NodeKind::End(_) | NodeKind::Unknown { .. } => true,
    }
}

fn validate_answer(question: &QuestionData, raw: &str) -> bool {
    if !question.validation.required {
        return true;
    }
    match question.kind {
        QuestionKind::Input | QuestionKind::Date => !raw.trim().is_empty(),
        QuestionKind::Choice => question.options.iter().any(|o| o.value == raw),
    }
}

/// The user-facing explanation for a value `validate_input` rejected.
pub fn rejection_message(node: &Node, demo_mode: bool) -> String {
    match &node.kind {
        NodeKind::Transaction(_) => format!(
            "Type '{}' to approve this step",
            confirm_sentinel(demo_mode)
        ),
        NodeKind::Question(question) if question.kind == QuestionKind::Choice => format!(
            "Please choose one of: {}",
            question.options.iter().map(|o| &o.value).join(", ")
        ),
        NodeKind::Question(question) if !question.label.is_empty() => {
            format!("'{}' is required", question.label)
        }
        _ => "This field is required".to_string(),
    }
}
