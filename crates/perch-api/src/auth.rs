use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use perch_types::api::{LoginRequest, RegisterRequest};

use crate::{AppState, join_error, status_for};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Run blocking DB work off the async runtime
    let svc = state.accounts.clone();
    let created = tokio::task::spawn_blocking(move || svc.register(&req.username, &req.password))
        .await
        .map_err(join_error)?
        .map_err(status_for)?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let svc = state.accounts.clone();
    let account = tokio::task::spawn_blocking(move || svc.verify_login(&req.username, &req.password))
        .await
        .map_err(join_error)?
        .map_err(status_for)?;

    Ok(Json(account))
}
