pub mod auth;
pub mod messages;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use perch_service::accounts::AccountService;
use perch_service::error::ServiceError;
use perch_service::messages::MessageService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountService,
    pub messages: MessageService,
}

/// Assemble the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/messages", get(messages::get_all_messages))
        .route("/messages", post(messages::create_message))
        .route("/messages/{message_id}", get(messages::get_message_by_id))
        .route("/messages/{message_id}", delete(messages::delete_message))
        .route("/messages/{message_id}", patch(messages::update_message))
        .route("/accounts/{account_id}/messages", get(messages::get_messages_by_account))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Map a service failure to its HTTP status. Store failures are the only
/// unexpected case and the only one worth a log line.
pub(crate) fn status_for(err: ServiceError) -> StatusCode {
    match err {
        ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
        ServiceError::UsernameTaken => StatusCode::CONFLICT,
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::Store(err) => {
            error!("store failure: {:#}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn join_error(err: tokio::task::JoinError) -> StatusCode {
    error!("spawn_blocking join error: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}
