//! Query and mutation handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use agent_mesh_core::registry::{Agent, Group, Message};
use agent_mesh_core::resolver::{self, Driver};
use agent_mesh_core::Error;
use serde::Deserialize;
use std::collections::HashMap;

use crate::state::AppState;

/// Core error wrapped for transport: maps the error taxonomy onto HTTP
/// status codes with a JSON body.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

pub async fn get_agents_handler(State(state): State<AppState>) -> Json<Vec<Agent>> {
    Json(resolver::agents(&state.platform))
}

pub async fn get_drivers_handler(State(state): State<AppState>) -> Json<Vec<Driver>> {
    Json(resolver::drivers(&state.platform))
}

pub async fn get_groups_handler(State(state): State<AppState>) -> Json<Vec<Group>> {
    Json(resolver::groups(&state.platform))
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub source: Option<String>,
    pub target: Option<String>,
}

pub async fn get_history_handler(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<Message>> {
    Json(resolver::history(
        &state.platform,
        params.source.as_deref(),
        params.target.as_deref(),
    ))
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub target: String,
    pub source: Option<String>,
    pub message: String,
}

pub async fn send_message_handler(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = resolver::send_message(
        &state.platform,
        &payload.target,
        payload.source.as_deref(),
        &payload.message,
    )?;
    Ok(Json(message))
}

#[derive(Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

pub async fn create_group_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Json<String>, ApiError> {
    let name = resolver::create_group(&state.platform, &payload.name, payload.members)?;
    Ok(Json(name))
}

#[derive(Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub driver: String,
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
}

pub async fn create_agent_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateAgentRequest>,
) -> Result<Json<Agent>, ApiError> {
    let agent = resolver::create_agent(
        &state.platform,
        &payload.name,
        &payload.driver,
        payload.config,
    )?;
    Ok(Json(agent))
}
