//! Read-only GraphQL view of the item catalog, served at `POST /graphql`.

use actix_web::{web, HttpResponse};
use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema, SimpleObject};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::domain::catalog::Item;
use crate::AppState;

pub type StockSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

#[derive(Debug, SimpleObject)]
pub struct ItemObject {
    pub id: i32,
    pub code: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    /// Decimal rendered as a string to keep its precision.
    pub selling_price: Option<String>,
    pub is_active: bool,
}

impl From<Item> for ItemObject {
    fn from(i: Item) -> Self {
        ItemObject {
            id: i.id,
            code: i.code,
            category_id: i.category_id,
            name: i.name,
            description: i.description,
            selling_price: i.selling_price.map(|p| p.to_string()),
            is_active: i.is_active,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All items, or only the one with `id`.
    async fn items(
        &self,
        ctx: &Context<'_>,
        id: Option<i32>,
    ) -> async_graphql::Result<Vec<ItemObject>> {
        let state = ctx.data::<web::Data<AppState>>()?.clone();
        let items = web::block(move || state.catalog.items_by_id(id))
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?
            .map_err(|e| {
                log::error!("graphql items query failed: {}", e);
                async_graphql::Error::new(e.to_string())
            })?;
        Ok(items.into_iter().map(ItemObject::from).collect())
    }
}

pub fn build_schema(state: web::Data<AppState>) -> StockSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(state)
        .finish()
}

pub async fn graphql_handler(
    schema: web::Data<StockSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// GET /graphql answers with the schema in SDL.
pub async fn graphql_sdl(schema: web::Data<StockSchema>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(schema.sdl())
}
