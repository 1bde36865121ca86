use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use sqlx::PgPool;

use crate::api::response::ApiResponse;
use crate::error::AppError;

use super::commands::{self, CreateProductCommand, CreateProductError};
use super::queries::{self, ListProductsError, ListProductsQuery};

pub fn products_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/all", delete(delete_all_products))
}

#[tracing::instrument(skip(pool, query))]
async fn list_products(
    State(pool): State<PgPool>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Response, AppError> {
    let products = queries::list::handle(pool, query).await.map_err(|e| match e {
        ListProductsError::Database(e) => AppError::Database(e),
        other => AppError::BadRequest(other.to_string()),
    })?;

    Ok((StatusCode::OK, Json(ApiResponse::success(products))).into_response())
}

#[tracing::instrument(skip(pool, command), fields(sku = %command.sku))]
async fn create_product(
    State(pool): State<PgPool>,
    Json(command): Json<CreateProductCommand>,
) -> Result<Response, AppError> {
    let product = commands::create::handle(pool, command).await.map_err(|e| match e {
        CreateProductError::Database(e) => AppError::Database(e),
        other => AppError::BadRequest(other.to_string()),
    })?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_all_products(State(pool): State<PgPool>) -> Result<Response, AppError> {
    commands::delete_all::handle(pool).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
