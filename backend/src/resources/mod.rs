//! Generic entity CRUD
//!
//! Every administrative entity exposes the same four routes with the
//! same validation and envelope semantics. Instead of one router and
//! controller per entity, a [`Resource`] implementation acts as the
//! schema descriptor and the handlers below are written once.
//!
//! Route shape per entity:
//! - `GET    /all`        list every record
//! - `POST   /create`     validate payload, insert
//! - `PUT    /update/:id` validate id format, then payload, then existence
//! - `DELETE /delete/:id` validate id format, then existence

mod catalog;

pub use catalog::{Blog, Course, Employee, Event, School, Student, Teacher};

use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use blackboard_shared::types::{DataResponse, MessageResponse};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Schema descriptor for one administrative entity
///
/// The payload type carries the field-presence and format rules; the
/// four store methods hold the entity's SQL. Everything else — routing,
/// validation ordering, envelopes, status codes — is shared.
#[async_trait]
pub trait Resource: Serialize + Sized + Send + Sync + 'static {
    /// Lowercase name used in id-format error messages
    const NAME: &'static str;
    /// Capitalized name used in not-found and delete messages
    const TITLE: &'static str;

    /// Create/update request body
    type Payload: DeserializeOwned + Validate + Send + 'static;

    async fn fetch_all(pool: &PgPool) -> sqlx::Result<Vec<Self>>;
    async fn insert(pool: &PgPool, payload: Self::Payload) -> sqlx::Result<Self>;
    /// Full-replace update; `None` when no record has the id
    async fn update(pool: &PgPool, id: Uuid, payload: Self::Payload)
        -> sqlx::Result<Option<Self>>;
    /// `false` when no record had the id
    async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<bool>;
}

/// Build the router for one entity
pub fn resource_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/all", get(list_all::<R>))
        .route("/create", post(create::<R>))
        .route("/update/:id", put(update::<R>))
        .route("/delete/:id", delete(remove::<R>))
}

/// Id format is checked before any store access
fn parse_id<R: Resource>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::Validation(format!("Valid {} ID is required", R::NAME)))
}

async fn list_all<R: Resource>(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<R>>>> {
    let data = R::fetch_all(state.db()).await?;
    Ok(Json(DataResponse {
        success: true,
        data,
    }))
}

async fn create<R: Resource>(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<R::Payload>,
) -> ApiResult<(StatusCode, Json<DataResponse<R>>)> {
    let data = R::insert(state.db(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            success: true,
            data,
        }),
    ))
}

async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<R::Payload>,
) -> ApiResult<Json<DataResponse<R>>> {
    let id = parse_id::<R>(&id)?;

    let data = R::update(state.db(), id, payload)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", R::TITLE)))?;

    Ok(Json(DataResponse {
        success: true,
        data,
    }))
}

async fn remove<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id::<R>(&id)?;

    if !R::delete(state.db(), id).await? {
        return Err(ApiError::NotFound(format!("{} not found", R::TITLE)));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: format!("{} deleted successfully", R::TITLE),
    }))
}
