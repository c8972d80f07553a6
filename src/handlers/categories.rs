use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalog::{Category, CategoryInput};
use crate::domain::ListQuery;
use crate::errors::AppError;
use crate::AppState;

use super::{blocking, ListParams, ListResponse};

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveCategoryRequest {
    /// Omit to create a new category.
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<SaveCategoryRequest> for CategoryInput {
    fn from(r: SaveCategoryRequest) -> Self {
        CategoryInput {
            id: r.id,
            name: r.name,
            description: r.description,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
            description: c.description,
            is_active: c.is_active,
        }
    }
}

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    params(ListParams),
    responses(
        (status = 200, description = "Matching categories", body = ListResponse<CategoryResponse>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let query = ListQuery::from(query.into_inner());
    let q = query.clone();
    let page = blocking(move || state.catalog.list_categories(&q)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<CategoryResponse>::from_page(page, &query)))
}

/// GET /categories/{id}
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found", body = super::ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = blocking(move || state.catalog.get_category(id)).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// POST /categories
///
/// Inserts when `id` is absent, otherwise replaces the stored fields.
#[utoipa::path(
    post,
    path = "/categories",
    request_body = SaveCategoryRequest,
    responses(
        (status = 200, description = "Category saved", body = CategoryResponse),
        (status = 400, description = "Invalid input", body = super::ErrorResponse),
        (status = 404, description = "Category not found", body = super::ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn save_category(
    state: web::Data<AppState>,
    body: web::Json<SaveCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let input = CategoryInput::from(body.into_inner());
    let saved = blocking(move || state.catalog.save_category(input)).await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(saved)))
}
