use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::dispatch::WebhookDispatcher;
use crate::error::AppError;
use crate::events;

use super::commands::{
    CreateWebhookCommand, CreateWebhookError, DeleteWebhookCommand, DeleteWebhookError,
    UpdateWebhookCommand, UpdateWebhookError,
};
use super::queries::{GetWebhookError, GetWebhookQuery, ListWebhooksError, ListWebhooksQuery};

/// State shared by the webhook management routes
#[derive(Clone)]
pub struct WebhooksState {
    pub db: PgPool,
    pub dispatcher: WebhookDispatcher,
}

pub fn webhooks_routes() -> Router<WebhooksState> {
    Router::new()
        .route("/", post(create_webhook).get(list_webhooks))
        .route("/events", get(available_events))
        .route(
            "/:webhook_id",
            get(get_webhook).put(update_webhook).delete(delete_webhook),
        )
        .route("/:webhook_id/test", post(test_webhook))
}

/// Event simulation triggers, mounted separately at `/simulate`
pub fn simulation_routes() -> Router<WebhookDispatcher> {
    Router::new()
        .route("/user-created", post(simulate_user_created))
        .route("/user-modified", post(simulate_user_modified))
        .route("/payment-completed", post(simulate_payment_completed))
}

/// List of event type names a webhook may subscribe to
async fn available_events() -> Response {
    let mut events: Vec<&str> = events::AVAILABLE_EVENTS.to_vec();
    events.sort_unstable();
    (StatusCode::OK, Json(ApiResponse::success(events))).into_response()
}

#[tracing::instrument(skip(state, command), fields(url = %command.url))]
async fn create_webhook(
    State(state): State<WebhooksState>,
    Json(command): Json<CreateWebhookCommand>,
) -> Result<Response, WebhookApiError> {
    let webhook = super::commands::create::handle(state.db, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(webhook))).into_response())
}

#[tracing::instrument(skip(state, query))]
async fn list_webhooks(
    State(state): State<WebhooksState>,
    Query(query): Query<ListWebhooksQuery>,
) -> Result<Response, WebhookApiError> {
    let webhooks = super::queries::list::handle(state.db, query).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(webhooks))).into_response())
}

#[tracing::instrument(skip(state), fields(webhook_id = %webhook_id))]
async fn get_webhook(
    State(state): State<WebhooksState>,
    Path(webhook_id): Path<Uuid>,
) -> Result<Response, WebhookApiError> {
    let webhook =
        super::queries::get::handle(state.db, GetWebhookQuery { id: webhook_id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(webhook))).into_response())
}

#[tracing::instrument(skip(state, command), fields(webhook_id = %webhook_id))]
async fn update_webhook(
    State(state): State<WebhooksState>,
    Path(webhook_id): Path<Uuid>,
    Json(mut command): Json<UpdateWebhookCommand>,
) -> Result<Response, WebhookApiError> {
    command.id = webhook_id;
    let webhook = super::commands::update::handle(state.db, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(webhook))).into_response())
}

#[tracing::instrument(skip(state), fields(webhook_id = %webhook_id))]
async fn delete_webhook(
    State(state): State<WebhooksState>,
    Path(webhook_id): Path<Uuid>,
) -> Result<Response, WebhookApiError> {
    super::commands::delete::handle(state.db, DeleteWebhookCommand { id: webhook_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Synchronous webhook test: one POST to the stored URL, blocking for the
/// structured outcome.
#[tracing::instrument(skip(state), fields(webhook_id = %webhook_id))]
async fn test_webhook(
    State(state): State<WebhooksState>,
    Path(webhook_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let webhook = super::queries::get::handle(state.db, GetWebhookQuery { id: webhook_id })
        .await
        .map_err(|e| match e {
            GetWebhookError::NotFound(id) => {
                AppError::NotFound(format!("Webhook with ID '{id}' not found"))
            },
            GetWebhookError::Database(e) => AppError::Database(e),
        })?;

    tracing::info!(webhook_id = %webhook.id, url = %webhook.url, "testing webhook");

    let outcome = state.dispatcher.test_delivery(&webhook.url).await;

    Ok((StatusCode::OK, Json(ApiResponse::success(outcome))).into_response())
}

async fn simulate_user_created(State(dispatcher): State<WebhookDispatcher>) -> Response {
    trigger_demo(dispatcher, events::USER_CREATED).await
}

async fn simulate_user_modified(State(dispatcher): State<WebhookDispatcher>) -> Response {
    trigger_demo(dispatcher, events::USER_MODIFIED).await
}

async fn simulate_payment_completed(State(dispatcher): State<WebhookDispatcher>) -> Response {
    trigger_demo(dispatcher, events::PAYMENT_COMPLETED).await
}

async fn trigger_demo(dispatcher: WebhookDispatcher, event_type: &str) -> Response {
    let payload = events::demo_payload(event_type).unwrap_or_default();
    dispatcher.trigger(event_type, payload).await;
    (StatusCode::OK, Json(json!({ "message": "Event triggered" }))).into_response()
}

#[derive(Debug)]
enum WebhookApiError {
    Create(CreateWebhookError),
    Update(UpdateWebhookError),
    Delete(DeleteWebhookError),
    Get(GetWebhookError),
    List(ListWebhooksError),
}

impl From<CreateWebhookError> for WebhookApiError {
    fn from(err: CreateWebhookError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateWebhookError> for WebhookApiError {
    fn from(err: UpdateWebhookError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteWebhookError> for WebhookApiError {
    fn from(err: DeleteWebhookError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetWebhookError> for WebhookApiError {
    fn from(err: GetWebhookError) -> Self {
        Self::Get(err)
    }
}

impl From<ListWebhooksError> for WebhookApiError {
    fn from(err: ListWebhooksError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            WebhookApiError::Create(CreateWebhookError::Validation(_))
            | WebhookApiError::Update(UpdateWebhookError::Validation(_))
            | WebhookApiError::Update(UpdateWebhookError::NoFieldsToUpdate)
            | WebhookApiError::List(ListWebhooksError::InvalidOffset)
            | WebhookApiError::List(ListWebhooksError::InvalidLimit) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            },

            WebhookApiError::Update(UpdateWebhookError::NotFound(_))
            | WebhookApiError::Delete(DeleteWebhookError::NotFound(_))
            | WebhookApiError::Get(GetWebhookError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            },

            WebhookApiError::Create(CreateWebhookError::Database(_))
            | WebhookApiError::Update(UpdateWebhookError::Database(_))
            | WebhookApiError::Delete(DeleteWebhookError::Database(_))
            | WebhookApiError::Get(GetWebhookError::Database(_))
            | WebhookApiError::List(ListWebhooksError::Database(_)) => {
                tracing::error!("Database error in webhook route: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response();
            },
        };

        let error = ErrorResponse::new(code, self.to_string());
        (status, Json(error)).into_response()
    }
}

impl std::fmt::Display for WebhookApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(e) => write!(f, "{}", e),
            Self::Update(e) => write!(f, "{}", e),
            Self::Delete(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::webhooks::validation::WebhookValidationError;

    #[test]
    fn test_error_display() {
        let err = WebhookApiError::Create(CreateWebhookError::Validation(
            WebhookValidationError::EventTypesRequired,
        ));
        assert!(err.to_string().contains("event type"));
    }

    #[test]
    fn test_routes_structure() {
        let router = webhooks_routes();
        assert!(format!("{:?}", router).contains("Router"));
        let router = simulation_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }
}
