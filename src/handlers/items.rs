use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalog::{Item, ItemInput};
use crate::domain::ListQuery;
use crate::errors::AppError;
use crate::AppState;

use super::categories::CategoryResponse;
use super::{blocking, ListParams, ListResponse};

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveItemRequest {
    pub id: Option<i32>,
    pub code: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    /// Decimal, as a string or a number, e.g. "12500"
    #[schema(value_type = Option<String>)]
    pub selling_price: Option<BigDecimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<SaveItemRequest> for ItemInput {
    fn from(r: SaveItemRequest) -> Self {
        ItemInput {
            id: r.id,
            code: r.code,
            category_id: r.category_id,
            name: r.name,
            description: r.description,
            selling_price: r.selling_price,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub code: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub selling_price: Option<BigDecimal>,
    pub is_active: bool,
    pub category: Option<CategoryResponse>,
}

impl From<Item> for ItemResponse {
    fn from(i: Item) -> Self {
        ItemResponse {
            id: i.id,
            code: i.code,
            category_id: i.category_id,
            name: i.name,
            description: i.description,
            selling_price: i.selling_price,
            is_active: i.is_active,
            category: i.category.map(Into::into),
        }
    }
}

/// GET /items
#[utoipa::path(
    get,
    path = "/items",
    params(ListParams),
    responses(
        (status = 200, description = "Matching items", body = ListResponse<ItemResponse>),
    ),
    tag = "items"
)]
pub async fn list_items(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let query = ListQuery::from(query.into_inner());
    let q = query.clone();
    let page = blocking(move || state.catalog.list_items(&q)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<ItemResponse>::from_page(page, &query)))
}

/// GET /items/{id}
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 404, description = "Item not found", body = super::ErrorResponse),
    ),
    tag = "items"
)]
pub async fn get_item(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let item = blocking(move || state.catalog.get_item(id)).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// POST /items
///
/// Item codes are unique; reusing one answers 409.
#[utoipa::path(
    post,
    path = "/items",
    request_body = SaveItemRequest,
    responses(
        (status = 200, description = "Item saved", body = ItemResponse),
        (status = 400, description = "Invalid input", body = super::ErrorResponse),
        (status = 404, description = "Item not found", body = super::ErrorResponse),
        (status = 409, description = "Duplicate code or unknown category", body = super::ErrorResponse),
    ),
    tag = "items"
)]
pub async fn save_item(
    state: web::Data<AppState>,
    body: web::Json<SaveItemRequest>,
) -> Result<HttpResponse, AppError> {
    let input = ItemInput::from(body.into_inner());
    let saved = blocking(move || state.catalog.save_item(input)).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(saved)))
}
