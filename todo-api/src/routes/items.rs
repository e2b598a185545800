use actix_web::{
    HttpResponse, Responder, ResponseError, delete, get,
    http::{StatusCode, header::ContentType},
    post, put,
    web::{Data, Json, Path},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::routes::ErrorMessage;
use crate::store::{Item, ItemStore, StoreError};

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("The item with id {0} was not found")]
    ItemNotFound(i64),

    #[error("The item title must not be empty")]
    EmptyTitle,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ItemError {
    fn to_message(&self) -> String {
        match self {
            // Do not expose internal database details in error messages
            ItemError::Store(StoreError::Database(_)) => "internal server error".to_string(),
            e => e.to_string(),
        }
    }
}

impl ResponseError for ItemError {
    fn status_code(&self) -> StatusCode {
        match self {
            ItemError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            ItemError::EmptyTitle => StatusCode::BAD_REQUEST,
            ItemError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = ErrorMessage {
            detail: self.to_message(),
        };
        let body =
            serde_json::to_string(&error_message).expect("failed to serialize error message");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    #[schema(example = "buy milk", required = true)]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    #[schema(example = "buy oat milk", required = true)]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadItemResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "buy milk")]
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ReadItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadItemsResponse {
    pub items: Vec<ReadItemResponse>,
}

/// Rejects empty or whitespace-only titles before they reach the store.
fn validate_title(title: &str) -> Result<&str, ItemError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ItemError::EmptyTitle);
    }

    Ok(title)
}

#[utoipa::path(
    summary = "List all items",
    responses(
        (status = 200, description = "Items returned successfully.", body = ReadItemsResponse),
        (status = 500, description = "Internal server error.", body = ErrorMessage),
    ),
    tag = "Items",
)]
#[get("/api/items")]
pub async fn read_all_items(store: Data<dyn ItemStore>) -> Result<impl Responder, ItemError> {
    let items = store
        .list_items()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ReadItemsResponse { items }))
}

#[utoipa::path(
    summary = "Read an item",
    params(
        ("item_id" = i64, Path, description = "Id of the item"),
    ),
    responses(
        (status = 200, description = "Item returned successfully.", body = ReadItemResponse),
        (status = 404, description = "Item not found.", body = ErrorMessage),
    ),
    tag = "Items",
)]
#[get("/api/items/{item_id}")]
pub async fn read_item(
    store: Data<dyn ItemStore>,
    item_id: Path<i64>,
) -> Result<impl Responder, ItemError> {
    let item_id = item_id.into_inner();
    let item = store
        .read_item(item_id)
        .await?
        .ok_or(ItemError::ItemNotFound(item_id))?;

    Ok(Json(ReadItemResponse::from(item)))
}

#[utoipa::path(
    summary = "Create an item",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created successfully.", body = ReadItemResponse),
        (status = 400, description = "Invalid item title.", body = ErrorMessage),
    ),
    tag = "Items",
)]
#[post("/api/items")]
pub async fn create_item(
    store: Data<dyn ItemStore>,
    item: Json<CreateItemRequest>,
) -> Result<impl Responder, ItemError> {
    let title = validate_title(&item.title)?;
    let item = store.create_item(title).await?;

    Ok(HttpResponse::Created().json(ReadItemResponse::from(item)))
}

#[utoipa::path(
    summary = "Update an item",
    params(
        ("item_id" = i64, Path, description = "Id of the item"),
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated successfully.", body = ReadItemResponse),
        (status = 404, description = "Item not found.", body = ErrorMessage),
    ),
    tag = "Items",
)]
#[put("/api/items/{item_id}")]
pub async fn update_item(
    store: Data<dyn ItemStore>,
    item_id: Path<i64>,
    item: Json<UpdateItemRequest>,
) -> Result<impl Responder, ItemError> {
    let item_id = item_id.into_inner();
    let title = validate_title(&item.title)?;
    let item = store
        .update_item(item_id, title)
        .await?
        .ok_or(ItemError::ItemNotFound(item_id))?;

    Ok(Json(ReadItemResponse::from(item)))
}

#[utoipa::path(
    summary = "Delete an item",
    params(
        ("item_id" = i64, Path, description = "Id of the item"),
    ),
    responses(
        (status = 204, description = "Item deleted successfully."),
        (status = 404, description = "Item not found.", body = ErrorMessage),
    ),
    tag = "Items",
)]
#[delete("/api/items/{item_id}")]
pub async fn delete_item(
    store: Data<dyn ItemStore>,
    item_id: Path<i64>,
) -> Result<impl Responder, ItemError> {
    let item_id = item_id.into_inner();
    let deleted = store.delete_item(item_id).await?;
    if !deleted {
        return Err(ItemError::ItemNotFound(item_id));
    }

    Ok(HttpResponse::NoContent().finish())
}
