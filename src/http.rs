//! HTTP server exposing the mail store as a JSON REST API.

use crate::error::Error;
use crate::record::MailRecord;
use crate::store::MailStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

#[derive(Clone)]
struct AppState {
    store: Arc<MailStore>,
}

/// Build the router over `store`.
pub fn router(store: Arc<MailStore>) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(health_check))
        .route("/mail", post(create_mail))
        .route("/mail/{id}", get(get_mail).delete(delete_mail))
        .route("/mail/inbox/{recipient}", get(get_inbox))
        .route("/mail/sent/{sender}", get(get_sent))
        .fallback(not_found)
        .with_state(state)
}

/// Run the HTTP server until `shutdown` fires.
pub async fn run_http_server(
    listener: TcpListener,
    store: Arc<MailStore>,
    mut shutdown: broadcast::Receiver<()>,
) {
    if let Err(e) = axum::serve(listener, router(store))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
    {
        tracing::error!("HTTP server error: {e}");
    }
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn store_failure(e: &Error) -> Response {
    tracing::error!("mail store failure: {e}");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

async fn health_check(State(state): State<AppState>) -> Response {
    match state.store.count() {
        Ok(mail_count) => Json(json!({
            "status": "ok",
            "mail_count": mail_count
        }))
        .into_response(),
        Err(e) => store_failure(&e),
    }
}

async fn create_mail(
    State(state): State<AppState>,
    body: Result<Json<MailRecord>, JsonRejection>,
) -> Response {
    let entry = match body {
        Ok(Json(entry)) => entry,
        Err(rejection) => {
            tracing::warn!("rejected mail body: {}", rejection.body_text());
            return error_body(rejection.status(), rejection.body_text());
        }
    };

    match state.store.create(entry) {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(e) => store_failure(&e),
    }
}

async fn delete_mail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state.store.delete(&id).map_or_else(
        |e| store_failure(&e),
        |deleted| Json(json!({ "deleted": deleted })).into_response(),
    )
}

async fn get_mail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    state
        .store
        .get(&id)
        .map_or_else(|e| store_failure(&e), |mail| Json(mail).into_response())
}

async fn get_inbox(State(state): State<AppState>, Path(recipient): Path<String>) -> Response {
    state
        .store
        .list_by_recipient(&recipient)
        .map_or_else(|e| store_failure(&e), |mail| Json(mail).into_response())
}

async fn get_sent(State(state): State<AppState>, Path(sender): Path<String>) -> Response {
    state
        .store
        .list_by_sender(&sender)
        .map_or_else(|e| store_failure(&e), |mail| Json(mail).into_response())
}

async fn not_found() -> Response {
    error_body(StatusCode::NOT_FOUND, "not found")
}
