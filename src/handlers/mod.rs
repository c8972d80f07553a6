pub mod categories;
pub mod images;
pub mod items;
pub mod market_places;
pub mod orders;

use actix_web::web;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::domain::errors::DomainError;
use crate::domain::{ListQuery, Page};
use crate::errors::AppError;

/// Runs a blocking store call on the blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f).await??)
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    /// Space separated keywords; each must match.
    pub q: Option<String>,
    /// Number of items per page. Defaults to 20, maximum 100.
    pub limit: Option<i64>,
    /// Number of items to skip. Defaults to 0.
    pub offset: Option<i64>,
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        ListQuery::new(p.q.as_deref(), p.limit, p.offset)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> ListResponse<T> {
    pub fn from_page<D>(page: Page<D>, query: &ListQuery) -> Self
    where
        T: From<D>,
    {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            total: page.total,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        categories::list_categories,
        categories::get_category,
        categories::save_category,
        items::list_items,
        items::get_item,
        items::save_item,
        images::upload_image,
        images::list_images,
        images::download_image,
        images::delete_image,
        market_places::list_market_places,
        market_places::get_market_place,
        market_places::save_market_place,
        orders::list_orders,
        orders::get_order,
        orders::save_order,
        orders::delete_order,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "categories", description = "Item categories"),
        (name = "items", description = "Items and their images"),
        (name = "market-places", description = "Market places"),
        (name = "orders", description = "Purchases and sales")
    )
)]
pub struct ApiDoc;
