use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::{ApiResult, EventRequest, OkResponse};
use crate::app::state::AppState;
use crate::auth::Claims;
use crate::domain::Event;

use super::common::json_body;

// ==========================================
// 活动日历
// ==========================================

#[derive(Debug, Deserialize)]
pub struct EventRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/events?from=&to=
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventRangeQuery>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = state
        .event_api
        .list_events(query.from.as_deref(), query.to.as_deref())?;
    Ok(Json(events))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Event>> {
    Ok(Json(state.event_api.get_event(&id)?))
}

/// POST /api/events/admin
pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let request = json_body(payload)?;
    let event = state.event_api.create_event(&request, claims.id)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/admin/{id}
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<Json<Event>> {
    let request = json_body(payload)?;
    Ok(Json(state.event_api.update_event(&id, &request)?))
}

/// DELETE /api/events/admin/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OkResponse>> {
    Ok(Json(state.event_api.delete_event(&id)?))
}
