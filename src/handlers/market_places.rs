use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::catalog::{MarketPlace, MarketPlaceInput};
use crate::domain::ListQuery;
use crate::errors::AppError;
use crate::AppState;

use super::{blocking, ListParams, ListResponse};

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveMarketPlaceRequest {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<SaveMarketPlaceRequest> for MarketPlaceInput {
    fn from(r: SaveMarketPlaceRequest) -> Self {
        MarketPlaceInput {
            id: r.id,
            name: r.name,
            description: r.description,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarketPlaceResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<MarketPlace> for MarketPlaceResponse {
    fn from(m: MarketPlace) -> Self {
        MarketPlaceResponse {
            id: m.id,
            name: m.name,
            description: m.description,
            is_active: m.is_active,
        }
    }
}

/// GET /market-places
///
/// Every keyword in `q` must appear in the name or the description.
#[utoipa::path(
    get,
    path = "/market-places",
    params(ListParams),
    responses(
        (status = 200, description = "Matching market places", body = ListResponse<MarketPlaceResponse>),
    ),
    tag = "market-places"
)]
pub async fn list_market_places(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let query = ListQuery::from(query.into_inner());
    let q = query.clone();
    let page = blocking(move || state.catalog.list_market_places(&q)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<MarketPlaceResponse>::from_page(page, &query)))
}

/// GET /market-places/{id}
#[utoipa::path(
    get,
    path = "/market-places/{id}",
    params(("id" = i32, Path, description = "Market place id")),
    responses(
        (status = 200, description = "Market place found", body = MarketPlaceResponse),
        (status = 404, description = "Market place not found", body = super::ErrorResponse),
    ),
    tag = "market-places"
)]
pub async fn get_market_place(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let found = blocking(move || state.catalog.get_market_place(id)).await?;
    Ok(HttpResponse::Ok().json(MarketPlaceResponse::from(found)))
}

/// POST /market-places
#[utoipa::path(
    post,
    path = "/market-places",
    request_body = SaveMarketPlaceRequest,
    responses(
        (status = 200, description = "Market place saved", body = MarketPlaceResponse),
        (status = 400, description = "Invalid input", body = super::ErrorResponse),
        (status = 404, description = "Market place not found", body = super::ErrorResponse),
    ),
    tag = "market-places"
)]
pub async fn save_market_place(
    state: web::Data<AppState>,
    body: web::Json<SaveMarketPlaceRequest>,
) -> Result<HttpResponse, AppError> {
    let input = MarketPlaceInput::from(body.into_inner());
    let saved = blocking(move || state.catalog.save_market_place(input)).await?;
    Ok(HttpResponse::Ok().json(MarketPlaceResponse::from(saved)))
}
