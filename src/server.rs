//! HTTP surface for the engine: the action endpoints a wallet talks to.
//!
//! - `GET  {action_path}/:form_id` describes the current step
//! - `POST {action_path}/:form_id` submits a value
//! - `POST {action_path}/:form_id/:choice` submits a choice option from the path
//! - `POST {action_path}/:form_id/step/next` answers an intermediate step's callback
//! - `GET  /actions.json` maps site paths onto the action API

use crate::config::CALLBACK_SEGMENTS;
use crate::engine::{FlowEngine, RequestData};
use crate::error::FlowError;
use ahash::AHashMap;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

const ACTION_VERSION_HEADER: &str = "x-action-version";
const BLOCKCHAIN_IDS_HEADER: &str = "x-blockchain-ids";

/// Builds the router. All routes share one engine.
pub fn router(engine: Arc<FlowEngine>) -> Router {
    let base = engine.config().action_path.trim_end_matches('/').to_string();

    Router::new()
        .route("/actions.json", get(actions_rules))
        .route(&format!("{}/:form_id", base), get(get_action).post(post_action))
        .route(
            &format!("{}/:form_id/{}", base, CALLBACK_SEGMENTS),
            post(post_next_action),
        )
        .route(&format!("{}/:form_id/:choice", base), post(post_choice))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
                    .expose_headers([
                        HeaderName::from_static(ACTION_VERSION_HEADER),
                        HeaderName::from_static(BLOCKCHAIN_IDS_HEADER),
                    ]),
            ),
        )
        .with_state(engine)
}

async fn actions_rules(State(engine): State<Arc<FlowEngine>>) -> Json<Value> {
    let config = engine.config();
    let api = format!("{}{}", config.public_url, config.action_path);
    Json(json!({
        "rules": [
            { "pathPattern": "/forms/*", "apiPath": format!("{}/*", api) },
            { "pathPattern": format!("{}/**", config.action_path), "apiPath": format!("{}/**", api) },
        ]
    }))
}

async fn get_action(
    State(engine): State<Arc<FlowEngine>>,
    Path(form_id): Path<String>,
    Query(query): Query<AHashMap<String, String>>,
) -> Response {
    let account = query.get("account").map(String::as_str);
    match engine.describe(&form_id, account).await {
        Ok(description) => protocol_response(&engine, StatusCode::OK, &description),
        Err(e) => flow_error_response(e),
    }
}

async fn post_action(
    State(engine): State<Arc<FlowEngine>>,
    Path(form_id): Path<String>,
    Query(query): Query<AHashMap<String, String>>,
    body: Bytes,
) -> Response {
    let request = RequestData::new(query, parse_body(&body));
    submit(&engine, &form_id, request).await
}

async fn post_choice(
    State(engine): State<Arc<FlowEngine>>,
    Path((form_id, choice)): Path<(String, String)>,
    Query(query): Query<AHashMap<String, String>>,
    body: Bytes,
) -> Response {
    let request = RequestData::new(query, parse_body(&body)).with_choice(choice);
    submit(&engine, &form_id, request).await
}

async fn post_next_action(
    State(engine): State<Arc<FlowEngine>>,
    Path(form_id): Path<String>,
    Query(query): Query<AHashMap<String, String>>,
    body: Bytes,
) -> Response {
    let request = RequestData::new(query, parse_body(&body));
    let Some(account) = request.account() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "A wallet account is required to continue" })),
        )
            .into_response();
    };
    match engine.next_action(&form_id, &account).await {
        Ok(description) => protocol_response(&engine, StatusCode::OK, &description),
        Err(e) => flow_error_response(e),
    }
}

async fn submit(engine: &FlowEngine, form_id: &str, request: RequestData) -> Response {
    match engine.submit(form_id, request).await {
        Ok(envelope) => protocol_response(engine, StatusCode::OK, &envelope),
        Err(e) => flow_error_response(e),
    }
}

/// An empty or non-JSON body reads as `null`, which carries no value and no account.
fn parse_body(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring request body that is not JSON");
        Value::Null
    })
}

fn protocol_response<T: Serialize>(engine: &FlowEngine, status: StatusCode, body: &T) -> Response {
    let config = engine.config();
    let mut response = (status, Json(body)).into_response();
    let headers = response.headers_mut();
    for (name, value) in [
        (ACTION_VERSION_HEADER, &config.action_version),
        (BLOCKCHAIN_IDS_HEADER, &config.blockchain_ids),
    ] {
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
    response
}

fn flow_error_response(error: FlowError) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": error.to_string() })),
    )
        .into_response()
}
