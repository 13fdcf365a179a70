//! Substitution of `{{name}}` placeholders in transaction parameters.

use crate::schema::{FormSchema, NodeKind, ParamBag};
use crate::session::Answers;
use serde_json::Value;
use tracing::debug;

/// Returns `params` with every exact `{{name}}` string replaced by the answer
/// of the question whose parameter name is `name`.
///
/// Placeholders that do not resolve are left as they are. Rejecting them is
/// the job of dispatch-side validation, not of this function.
pub fn resolve_parameters(schema: &FormSchema, params: &ParamBag, answers: &Answers) -> ParamBag {
    params
        .iter()
        .map(|(key, value)| {
            let resolved = match value.as_str().and_then(placeholder_name) {
                Some(name) => match lookup_answer(schema, name, answers) {
                    Some(answer) => answer.clone(),
                    None => {
                        debug!(parameter = %key, placeholder = name, "placeholder left unresolved");
                        value.clone()
                    }
                },
                None => value.clone(),
            };
            (key.clone(), resolved)
        })
        .collect()
}

/// Replaces every placeholder still left in `params` with `?`, for display.
pub fn mask_unresolved(params: &ParamBag) -> ParamBag {
    params
        .iter()
        .map(|(key, value)| match value.as_str().and_then(placeholder_name) {
            Some(_) => (key.clone(), Value::String("?".to_string())),
            None => (key.clone(), value.clone()),
        })
        .collect()
}

/// Extracts `name` from a string that is exactly `{{name}}`.
pub fn placeholder_name(text: &str) -> Option<&str> {
    let name = text.strip_prefix("{{")?.strip_suffix("}}")?.trim();
    let mut chars = name.chars();
    let first = chars.next()?;
    let valid = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(name)
}

fn lookup_answer<'a>(schema: &FormSchema, name: &str, answers: &'a Answers) -> Option<&'a Value> {
    schema
        .nodes
        .iter()
        .find(|node| match &node.kind {
            NodeKind::Question(q) => q.parameter_name.as_deref() == Some(name),
            _ => false,
        })
        .and_then(|node| answers.get(&node.id))
}
