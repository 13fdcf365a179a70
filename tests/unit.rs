//! Unit tests for core FormFlow functionality.
mod common;
use common::*;
use formflow::engine::value_text;
use formflow::prelude::*;
use formflow::schema::{confirm_sentinel, locate_node, rejection_message, validate_input};
use serde_json::json;
use std::io::Write as _;
use std::time::Duration;

#[test]
fn test_error_display() {
    let err = FlowError::FormNotFound("signup".to_string());
    assert_eq!(err.to_string(), "Form 'signup' not found");

    let err = FlowError::NodeNotFound("q9".to_string());
    assert_eq!(err.to_string(), "Node not found: 'q9'");

    let err = DispatchError::MissingField {
        kind: "transfer".to_string(),
        field: "recipient".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Missing required parameter 'recipient' for transfer transaction"
    );

    let err = DispatchError::Build("rpc down".to_string());
    assert!(err.to_string().contains("rpc down"));

    let err = SchemaError::DanglingEdge {
        edge_id: "e1".to_string(),
        missing_node_id: "ghost".to_string(),
    };
    assert!(err.to_string().contains("e1"));
    assert!(err.to_string().contains("ghost"));

    let err = ConfigError::from(SchemaError::DuplicateNode("a".to_string()));
    assert!(err.to_string().contains("'a'"));
}

#[test]
fn test_value_precedence() {
    let body = json!({ "account": ACCOUNT, "value": "top", "data": { "value": "nested" } });

    let request = RequestData::from_body(body.clone());
    assert_eq!(request.value(), Some(json!("nested")));

    let request = RequestData::from_body(body).with_query("value", "query");
    assert_eq!(request.value(), Some(json!("query")));

    let request = RequestData::from_body(json!({ "value": "top", "data": { "value": null } }));
    assert_eq!(request.value(), Some(json!("top")));

    let request = RequestData::from_body(json!({ "value": null }));
    assert_eq!(request.value(), None);

    // A choice segment travels as the query value.
    let request = RequestData::default().with_choice("b");
    assert_eq!(request.value(), Some(json!("b")));
}

#[test]
fn test_account_lookup() {
    let request = RequestData::from_body(json!({ "account": "  " })).with_query("account", ACCOUNT);
    assert_eq!(request.account(), None);

    let request = RequestData::default().with_query("account", ACCOUNT);
    assert_eq!(request.account().as_deref(), Some(ACCOUNT));

    let request = RequestData::from_body(json!({ "account": RECIPIENT })).with_query("account", ACCOUNT);
    assert_eq!(request.account().as_deref(), Some(RECIPIENT));
}

#[test]
fn test_value_text() {
    assert_eq!(value_text(None), "");
    assert_eq!(value_text(Some(&json!(null))), "");
    assert_eq!(value_text(Some(&json!("a"))), "a");
    assert_eq!(value_text(Some(&json!(4.5))), "4.5");
    assert_eq!(value_text(Some(&json!(true))), "true");
}

#[test]
fn test_validate_input_per_node_kind() {
    let form = load_form(DONATION_FORM_JSON);
    let start = locate_node(&form.schema, "start").unwrap();
    let choice = locate_node(&form.schema, "choice").unwrap();
    let tx = locate_node(&form.schema, "tx").unwrap();

    assert!(validate_input(start, "", false));
    assert!(validate_input(choice, "a", false));
    assert!(!validate_input(choice, "A", false));
    assert!(!validate_input(choice, "", false));
    assert!(validate_input(tx, "confirm", false));
    assert!(!validate_input(tx, "test", false));
    assert!(validate_input(tx, "test", true));
    assert_eq!(confirm_sentinel(true), "test");

    let survey = load_form(SURVEY_FORM_JSON);
    let optional = locate_node(&survey.schema, "name").unwrap();
    let required = locate_node(&survey.schema, "email").unwrap();
    assert!(validate_input(optional, "", false));
    assert!(!validate_input(required, " \t", false));
    assert_eq!(rejection_message(required, false), "'Email' is required");
}

#[test]
fn test_config_defaults_and_builders() {
    let config = EngineConfig::default();
    assert!(!config.demo_mode);
    assert_eq!(config.session_ttl(), Duration::from_secs(1800));
    assert_eq!(config.dispatch_timeout(), Duration::from_secs(10));
    assert_eq!(config.action_href("a b"), "/api/actions/a%20b");
    assert_eq!(config.callback_href("f"), "/api/actions/f/step/next");
    assert_eq!(config.choice_href("f", "x/y"), "/api/actions/f/x%2Fy");

    let config = config
        .with_public_url("https://forms.example/")
        .with_dispatch_timeout(Duration::from_millis(250));
    assert_eq!(config.step_href("f"), "https://forms.example/api/actions/f?value={value}");
    assert_eq!(config.dispatch_timeout_ms, 250);
}

#[test]
fn test_config_from_file_keeps_defaults() {
    let path = std::env::temp_dir().join("formflow-config-test.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{ "demoMode": true, "sessionTtlSecs": 60 }}"#).unwrap();

    let config = EngineConfig::from_file(path.to_str().unwrap()).unwrap();
    assert!(config.demo_mode);
    assert_eq!(config.session_ttl_secs, 60);
    assert_eq!(config.action_path, "/api/actions");
    std::fs::remove_file(&path).ok();

    let err = EngineConfig::from_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_form_directory_loading() {
    let dir = std::env::temp_dir().join("formflow-forms-test");
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("profile.json"), PROFILE_FORM_JSON).unwrap();
    std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let source = MemoryFormSource::from_dir(&dir).unwrap();
    assert_eq!(source.len(), 1);
    let form = tokio_test::block_on(source.load("profile"));
    assert_eq!(form.map(|f| f.title.clone()).as_deref(), Some("Profile"));

    std::fs::write(dir.join("broken.json"), "{").unwrap();
    assert!(matches!(
        MemoryFormSource::from_dir(&dir),
        Err(ConfigError::Schema(SchemaError::JsonParseError(_)))
    ));
    std::fs::remove_dir_all(&dir).ok();
}
