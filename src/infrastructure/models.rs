use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::catalog::{Category, Item, ItemImageInfo, MarketPlace};
use crate::domain::order::{ItemRef, MarketPlaceRef};
use crate::schema::{item_categories, item_images, items, market_places, order_lines, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = item_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = item_categories)]
#[diesel(treat_none_as_null = true)]
pub struct CategoryChanges {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Category {
            id: r.id,
            name: r.name,
            description: r.description,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub id: i32,
    pub code: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub selling_price: Option<BigDecimal>,
    pub is_active: bool,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = items)]
#[diesel(treat_none_as_null = true)]
pub struct ItemChanges {
    pub code: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub selling_price: Option<BigDecimal>,
    pub is_active: bool,
}

impl ItemRow {
    pub fn into_item(self, category: Option<Category>) -> Item {
        Item {
            id: self.id,
            code: self.code,
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            selling_price: self.selling_price,
            is_active: self.is_active,
            category,
        }
    }
}

/// The columns of `items` an order line needs to show what it refers to.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRefRow {
    pub id: i32,
    pub code: String,
    pub name: String,
}

impl From<ItemRefRow> for ItemRef {
    fn from(r: ItemRefRow) -> Self {
        ItemRef {
            id: r.id,
            code: r.code,
            name: r.name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = item_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemImageInfoRow {
    pub id: i32,
    pub item_id: i32,
    pub content_type: String,
    pub original_file_name: Option<String>,
    #[diesel(select_expression = diesel::dsl::sql::<diesel::sql_types::Int4>("octet_length(content)"))]
    #[diesel(select_expression_type = diesel::expression::SqlLiteral<diesel::sql_types::Int4>)]
    pub size: i32,
}

impl From<ItemImageInfoRow> for ItemImageInfo {
    fn from(r: ItemImageInfoRow) -> Self {
        ItemImageInfo {
            id: r.id,
            item_id: r.item_id,
            content_type: r.content_type,
            original_file_name: r.original_file_name,
            size: r.size,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = item_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemImageContentRow {
    pub content_type: String,
    pub original_file_name: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = item_images)]
pub struct NewItemImageRow {
    pub item_id: i32,
    pub content_type: String,
    pub content: Vec<u8>,
    pub original_file_name: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = market_places)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MarketPlaceRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = market_places)]
#[diesel(treat_none_as_null = true)]
pub struct MarketPlaceChanges {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<MarketPlaceRow> for MarketPlace {
    fn from(r: MarketPlaceRow) -> Self {
        MarketPlace {
            id: r.id,
            name: r.name,
            description: r.description,
            is_active: r.is_active,
        }
    }
}

impl From<MarketPlaceRow> for MarketPlaceRef {
    fn from(r: MarketPlaceRow) -> Self {
        MarketPlaceRef {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub kind: String,
    pub code: String,
    pub market_place_id: Option<i32>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub kind: &'a str,
    pub code: &'a str,
    pub market_place_id: Option<i32>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow<'a> {
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: &'a BigDecimal,
    pub unit_price: &'a BigDecimal,
}
