use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use perch_types::api::{CreateMessageRequest, UpdateMessageRequest};
use perch_types::models::Message;

use crate::{AppState, join_error, status_for};

pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Run blocking DB work off the async runtime
    let svc = state.messages.clone();
    let created = tokio::task::spawn_blocking(move || {
        svc.create_message(req.posted_by, &req.message_text, req.time_posted_epoch)
    })
    .await
    .map_err(join_error)?
    .map_err(status_for)?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_all_messages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    let svc = state.messages.clone();
    let messages = tokio::task::spawn_blocking(move || svc.get_all_messages())
        .await
        .map_err(join_error)?
        .map_err(status_for)?;

    Ok(Json(messages))
}

pub async fn get_message_by_id(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, StatusCode> {
    let svc = state.messages.clone();
    let message = tokio::task::spawn_blocking(move || svc.get_message_by_id(message_id))
        .await
        .map_err(join_error)?
        .map_err(status_for)?;

    Ok(found_or_empty(message))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Response, StatusCode> {
    let svc = state.messages.clone();
    let deleted = tokio::task::spawn_blocking(move || svc.delete_message(message_id))
        .await
        .map_err(join_error)?
        .map_err(status_for)?;

    Ok(found_or_empty(deleted))
}

pub async fn update_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let svc = state.messages.clone();
    let updated = tokio::task::spawn_blocking(move || {
        svc.update_message(message_id, &req.message_text)
    })
    .await
    .map_err(join_error)?
    .map_err(status_for)?;

    // Updating an id that does not exist is rejected like bad input
    match updated {
        Some(message) => Ok(Json(message)),
        None => Err(StatusCode::BAD_REQUEST),
    }
}

pub async fn get_messages_by_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let svc = state.messages.clone();
    let messages = tokio::task::spawn_blocking(move || svc.get_messages_by_account(account_id))
        .await
        .map_err(join_error)?
        .map_err(status_for)?;

    Ok(Json(messages))
}

/// Lookups and deletes treat a missing row as a normal outcome: 200 with
/// an empty body rather than an error status.
fn found_or_empty(message: Option<Message>) -> Response {
    match message {
        Some(message) => Json(message).into_response(),
        None => StatusCode::OK.into_response(),
    }
}
