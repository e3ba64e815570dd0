use std::{any::Any, time::Duration};

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::{
    error::AppError,
    models::{RecordKind, SubmissionResponse},
    pages,
    state::AppState,
    store::Store,
    submission::{
        ApplicationPayload, IncidentPayload, InterestPayload, Submission, SuggestionPayload,
    },
};

pub fn router<S: Store>(state: AppState<S>) -> Router {
    let development = state.config.environment.is_development();

    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            RecordKind::Application.endpoint(),
            post(submit_handler::<S, ApplicationPayload>),
        )
        .route(
            RecordKind::Incident.endpoint(),
            post(submit_handler::<S, IncidentPayload>),
        )
        .route(
            RecordKind::Interest.endpoint(),
            post(submit_handler::<S, InterestPayload>),
        )
        .route(
            RecordKind::Suggestion.endpoint(),
            post(submit_handler::<S, SuggestionPayload>),
        )
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(move |panic| {
            panic_response(panic, development)
        }))
        .with_state(state)
}

/// Shared by all four endpoints: parse, check presence, insert once.
///
/// The body must be a JSON object; arrays and scalars are malformed even when
/// their elements line up with the payload fields.
pub async fn submit_handler<S: Store, P: Submission>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let kind = P::KIND;

    let payload: P = serde_json::from_slice::<Map<String, Value>>(&body)
        .and_then(|fields| serde_json::from_value(Value::Object(fields)))
        .map_err(|e| {
            warn!(%kind, error = %e, "Rejected malformed payload");
            AppError::MalformedPayload
        })?;

    debug!(%kind, ?payload, "Received submission");

    let record = payload.into_record().inspect_err(|e| {
        warn!(%kind, error = %e, "Rejected submission");
    })?;

    let id = state.store.create(record).await.map_err(|e| {
        error!(%kind, error = %e, "Failed to create record");

        AppError::Persistence {
            kind,
            details: state
                .config
                .environment
                .is_development()
                .then(|| e.to_string()),
        }
    })?;

    info!(%kind, %id, "Record created");

    Ok((StatusCode::CREATED, Json(SubmissionResponse::created(id))))
}

pub async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found()))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>, development: bool) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(%message, "Handler panicked");

    let detail = development.then_some(message.as_str());

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(pages::fallback(detail)),
    )
        .into_response()
}
