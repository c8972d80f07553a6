use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    ItemRef, LineInput, MarketPlaceRef, OrderHeader, OrderInput, OrderKind, OrderLineView,
    OrderView,
};
use crate::domain::ListQuery;
use crate::errors::AppError;
use crate::AppState;

use super::{blocking, ListParams, ListResponse};

/// The collection an order lives in, taken from the first path segment.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderCollection {
    Purchases,
    Sales,
}

impl From<OrderCollection> for OrderKind {
    fn from(c: OrderCollection) -> Self {
        match c {
            OrderCollection::Purchases => OrderKind::Purchase,
            OrderCollection::Sales => OrderKind::Sales,
        }
    }
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveOrderLineRequest {
    /// Id of an existing line of this order; omit for a new line.
    pub id: Option<i32>,
    pub item_id: i32,
    /// Decimal as a string or a number, e.g. "2.5". Defaults to 0.
    #[serde(default)]
    #[schema(value_type = String)]
    pub quantity: BigDecimal,
    #[serde(default)]
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveOrderRequest {
    /// Omit to create a new order.
    pub id: Option<i32>,
    pub code: String,
    pub market_place_id: Option<i32>,
    pub date: NaiveDate,
    /// The complete set of lines. Stored lines left out are deleted.
    #[serde(default)]
    pub lines: Vec<SaveOrderLineRequest>,
}

impl From<SaveOrderRequest> for OrderInput {
    fn from(r: SaveOrderRequest) -> Self {
        OrderInput {
            id: r.id,
            header: OrderHeader {
                code: r.code,
                market_place_id: r.market_place_id,
                date: r.date,
            },
            lines: r
                .lines
                .into_iter()
                .map(|l| LineInput {
                    id: l.id,
                    item_id: l.item_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemRefResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
}

impl From<ItemRef> for ItemRefResponse {
    fn from(i: ItemRef) -> Self {
        ItemRefResponse {
            id: i.id,
            code: i.code,
            name: i.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarketPlaceRefResponse {
    pub id: i32,
    pub name: String,
}

impl From<MarketPlaceRef> for MarketPlaceRefResponse {
    fn from(m: MarketPlaceRef) -> Self {
        MarketPlaceRefResponse {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i32,
    pub item_id: i32,
    #[schema(value_type = String)]
    pub quantity: BigDecimal,
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
    pub item: Option<ItemRefResponse>,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        OrderLineResponse {
            id: l.id,
            item_id: l.item_id,
            quantity: l.quantity,
            unit_price: l.unit_price,
            item: l.item.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub code: String,
    pub market_place_id: Option<i32>,
    pub date: NaiveDate,
    pub market_place: Option<MarketPlaceRefResponse>,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        OrderResponse {
            id: o.id,
            code: o.code,
            market_place_id: o.market_place_id,
            date: o.date,
            market_place: o.market_place.map(Into::into),
            lines: o.lines.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /{collection}
///
/// Newest first, without lines. `q` matches the order code or the market
/// place name.
#[utoipa::path(
    get,
    path = "/{collection}",
    params(
        ("collection" = OrderCollection, Path, description = "purchases or sales"),
        ListParams,
    ),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListResponse<OrderResponse>),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    path: web::Path<OrderCollection>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let kind = OrderKind::from(path.into_inner());
    let query = ListQuery::from(query.into_inner());
    let q = query.clone();
    let page = blocking(move || state.orders.list_orders(kind, &q)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<OrderResponse>::from_page(page, &query)))
}

/// GET /{collection}/{id}
///
/// Returns the order together with its lines.
#[utoipa::path(
    get,
    path = "/{collection}/{id}",
    params(
        ("collection" = OrderCollection, Path, description = "purchases or sales"),
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found", body = super::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<(OrderCollection, i32)>,
) -> Result<HttpResponse, AppError> {
    let (collection, id) = path.into_inner();
    let kind = OrderKind::from(collection);

    let order = blocking(move || state.orders.get_order(kind, id)).await?;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(DomainError::not_found(kind.entity(), id).into()),
    }
}

/// POST /{collection}
///
/// Creates the order when `id` is absent. Otherwise updates it and makes its
/// stored lines match `lines`: lines with an id are updated, lines without
/// one are inserted and stored lines not mentioned are deleted. Everything
/// happens in one transaction; on any error nothing is changed.
#[utoipa::path(
    post,
    path = "/{collection}",
    params(("collection" = OrderCollection, Path, description = "purchases or sales")),
    request_body = SaveOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid input or line id", body = super::ErrorResponse),
        (status = 404, description = "Order not found", body = super::ErrorResponse),
        (status = 409, description = "Rejected by a database constraint", body = super::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn save_order(
    state: web::Data<AppState>,
    path: web::Path<OrderCollection>,
    body: web::Json<SaveOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let kind = OrderKind::from(path.into_inner());
    let input = OrderInput::from(body.into_inner());

    let saved = blocking(move || state.orders.save_order(kind, input)).await?;

    let body = OrderResponse::from(saved.order);
    if saved.summary.created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

/// DELETE /{collection}/{id}
///
/// Deletes the order and, through the foreign key cascade, its lines.
#[utoipa::path(
    delete,
    path = "/{collection}/{id}",
    params(
        ("collection" = OrderCollection, Path, description = "purchases or sales"),
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found", body = super::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<(OrderCollection, i32)>,
) -> Result<HttpResponse, AppError> {
    let (collection, id) = path.into_inner();
    let kind = OrderKind::from(collection);
    blocking(move || state.orders.delete_order(kind, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
