use std::collections::HashMap;

use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{
    Category, CategoryInput, Item, ItemImageContent, ItemImageInfo, ItemInput, MarketPlace,
    MarketPlaceInput, NewItemImage,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::{
    CategoryRepository, ItemImageRepository, ItemRepository, MarketPlaceRepository,
};
use crate::domain::{ListQuery, Page};
use crate::schema::{item_categories, item_images, items, market_places};

use super::models::{
    CategoryChanges, CategoryRow, ItemChanges, ItemImageContentRow, ItemImageInfoRow, ItemRow,
    MarketPlaceChanges, MarketPlaceRow, NewItemImageRow,
};

/// Every keyword has to match at least one of the searched columns.
fn filtered_categories<'a>(query: &ListQuery) -> item_categories::BoxedQuery<'a, Pg> {
    let mut q = item_categories::table.into_boxed();
    for pattern in query.patterns() {
        q = q.filter(
            item_categories::name.ilike(pattern.clone()).or(item_categories::description
                .assume_not_null()
                .ilike(pattern)),
        );
    }
    q
}

fn filtered_items<'a>(query: &ListQuery) -> items::BoxedQuery<'a, Pg> {
    let mut q = items::table.into_boxed();
    for pattern in query.patterns() {
        q = q.filter(
            items::code
                .ilike(pattern.clone())
                .or(items::name.ilike(pattern.clone()))
                .or(items::description.assume_not_null().ilike(pattern)),
        );
    }
    q
}

fn filtered_market_places<'a>(query: &ListQuery) -> market_places::BoxedQuery<'a, Pg> {
    let mut q = market_places::table.into_boxed();
    for pattern in query.patterns() {
        q = q.filter(
            market_places::name.ilike(pattern.clone()).or(market_places::description
                .assume_not_null()
                .ilike(pattern)),
        );
    }
    q
}

/// Resolves the category of each item with one extra query.
fn with_categories(conn: &mut PgConnection, rows: Vec<ItemRow>) -> Result<Vec<Item>, DomainError> {
    let ids: Vec<i32> = rows.iter().filter_map(|i| i.category_id).collect();
    let categories: HashMap<i32, Category> = if ids.is_empty() {
        HashMap::new()
    } else {
        item_categories::table
            .filter(item_categories::id.eq_any(ids))
            .select(CategoryRow::as_select())
            .load(conn)?
            .into_iter()
            .map(|c| (c.id, c.into()))
            .collect()
    };
    Ok(rows
        .into_iter()
        .map(|row| {
            let category = row.category_id.and_then(|id| categories.get(&id).cloned());
            row.into_item(category)
        })
        .collect())
}

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CategoryRepository for DieselCatalogRepository {
    fn list_categories(&self, query: &ListQuery) -> Result<Page<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered_categories(query).count().get_result(conn)?;
            let rows = filtered_categories(query)
                .select(CategoryRow::as_select())
                .order(item_categories::name.asc())
                .limit(query.limit)
                .offset(query.offset)
                .load(conn)?;
            Ok(Page {
                items: rows.into_iter().map(Into::into).collect(),
                total,
            })
        })
    }

    fn find_category(&self, id: i32) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = item_categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn save_category(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;
        let changes = CategoryChanges {
            name: input.name,
            description: input.description,
            is_active: input.is_active,
        };
        let row = match input.id {
            Some(id) => diesel::update(item_categories::table.find(id))
                .set(&changes)
                .returning(CategoryRow::as_returning())
                .get_result(&mut conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found("Category", id))?,
            None => diesel::insert_into(item_categories::table)
                .values(&changes)
                .returning(CategoryRow::as_returning())
                .get_result(&mut conn)?,
        };
        Ok(row.into())
    }
}

impl ItemRepository for DieselCatalogRepository {
    fn list_items(&self, query: &ListQuery) -> Result<Page<Item>, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered_items(query).count().get_result(conn)?;
            let rows = filtered_items(query)
                .select(ItemRow::as_select())
                .order(items::code.asc())
                .limit(query.limit)
                .offset(query.offset)
                .load(conn)?;
            Ok(Page {
                items: with_categories(conn, rows)?,
                total,
            })
        })
    }

    fn all_items(&self) -> Result<Vec<Item>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = items::table
            .select(ItemRow::as_select())
            .order(items::id.asc())
            .load(&mut conn)?;
        with_categories(&mut conn, rows)
    }

    fn find_item(&self, id: i32) -> Result<Option<Item>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = items::table
            .find(id)
            .select(ItemRow::as_select())
            .first(&mut conn)
            .optional()?;
        match row {
            Some(row) => Ok(with_categories(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn save_item(&self, input: ItemInput) -> Result<Item, DomainError> {
        let mut conn = self.pool.get()?;
        let changes = ItemChanges {
            code: input.code,
            category_id: input.category_id,
            name: input.name,
            description: input.description,
            selling_price: input.selling_price,
            is_active: input.is_active,
        };
        let row = match input.id {
            Some(id) => diesel::update(items::table.find(id))
                .set(&changes)
                .returning(ItemRow::as_returning())
                .get_result(&mut conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found("Item", id))?,
            None => diesel::insert_into(items::table)
                .values(&changes)
                .returning(ItemRow::as_returning())
                .get_result(&mut conn)?,
        };
        Ok(with_categories(&mut conn, vec![row])?.remove(0))
    }
}

impl MarketPlaceRepository for DieselCatalogRepository {
    fn list_market_places(&self, query: &ListQuery) -> Result<Page<MarketPlace>, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered_market_places(query).count().get_result(conn)?;
            let rows = filtered_market_places(query)
                .select(MarketPlaceRow::as_select())
                .order(market_places::name.asc())
                .limit(query.limit)
                .offset(query.offset)
                .load(conn)?;
            Ok(Page {
                items: rows.into_iter().map(Into::into).collect(),
                total,
            })
        })
    }

    fn find_market_place(&self, id: i32) -> Result<Option<MarketPlace>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = market_places::table
            .find(id)
            .select(MarketPlaceRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn save_market_place(&self, input: MarketPlaceInput) -> Result<MarketPlace, DomainError> {
        let mut conn = self.pool.get()?;
        let changes = MarketPlaceChanges {
            name: input.name,
            description: input.description,
            is_active: input.is_active,
        };
        let row = match input.id {
            Some(id) => diesel::update(market_places::table.find(id))
                .set(&changes)
                .returning(MarketPlaceRow::as_returning())
                .get_result(&mut conn)
                .optional()?
                .ok_or_else(|| DomainError::not_found("MarketPlace", id))?,
            None => diesel::insert_into(market_places::table)
                .values(&changes)
                .returning(MarketPlaceRow::as_returning())
                .get_result(&mut conn)?,
        };
        Ok(row.into())
    }
}

impl ItemImageRepository for DieselCatalogRepository {
    fn add_image(&self, image: NewItemImage) -> Result<ItemImageInfo, DomainError> {
        let mut conn = self.pool.get()?;
        let row = diesel::insert_into(item_images::table)
            .values(&NewItemImageRow {
                item_id: image.item_id,
                content_type: image.content_type,
                content: image.content,
                original_file_name: image.original_file_name,
            })
            .returning(ItemImageInfoRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn list_images(&self, item_id: i32) -> Result<Vec<ItemImageInfo>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = item_images::table
            .filter(item_images::item_id.eq(item_id))
            .select(ItemImageInfoRow::as_select())
            .order(item_images::id.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn image_content(&self, id: i32) -> Result<Option<ItemImageContent>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = item_images::table
            .find(id)
            .select(ItemImageContentRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(|r| ItemImageContent {
            content_type: r.content_type,
            original_file_name: r.original_file_name,
            content: r.content,
        }))
    }

    fn delete_image(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(item_images::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
