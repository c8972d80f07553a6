use std::collections::HashMap;

use chrono::Utc;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    LineInput, MarketPlaceRef, OrderHeader, OrderInput, OrderKind, OrderLineView, OrderView,
};
use crate::domain::ports::{OrderRepository, SavedOrder};
use crate::domain::reconcile::{reconcile, OrderLedger};
use crate::domain::{ListQuery, Page};
use crate::schema::{items, market_places, order_lines, orders};

use super::models::{
    ItemRefRow, MarketPlaceRow, NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow,
};

// ── Ledger ────────────────────────────────────────────────────────────────────

/// [`OrderLedger`] over a connection that is already inside a transaction.
pub struct DieselLedger<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> DieselLedger<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl OrderLedger for DieselLedger<'_> {
    fn insert_order(&mut self, kind: OrderKind, header: &OrderHeader) -> Result<i32, DomainError> {
        let id = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                kind: kind.as_str(),
                code: &header.code,
                market_place_id: header.market_place_id,
                date: header.date,
            })
            .returning(orders::id)
            .get_result(self.conn)?;
        Ok(id)
    }

    fn update_order(
        &mut self,
        kind: OrderKind,
        id: i32,
        header: &OrderHeader,
    ) -> Result<bool, DomainError> {
        let updated = diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::kind.eq(kind.as_str())),
        )
        .set((
            orders::code.eq(&header.code),
            orders::market_place_id.eq(header.market_place_id),
            orders::date.eq(header.date),
            orders::updated_at.eq(Utc::now()),
        ))
        .execute(self.conn)?;
        Ok(updated == 1)
    }

    fn line_ids(&mut self, order_id: i32) -> Result<Vec<i32>, DomainError> {
        let ids = order_lines::table
            .filter(order_lines::order_id.eq(order_id))
            .select(order_lines::id)
            .load(self.conn)?;
        Ok(ids)
    }

    fn insert_lines(
        &mut self,
        order_id: i32,
        lines: &[&LineInput],
    ) -> Result<Vec<i32>, DomainError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<NewOrderLineRow> = lines
            .iter()
            .map(|l| NewOrderLineRow {
                order_id,
                item_id: l.item_id,
                quantity: &l.quantity,
                unit_price: &l.unit_price,
            })
            .collect();
        let ids = diesel::insert_into(order_lines::table)
            .values(&rows)
            .returning(order_lines::id)
            .get_results(self.conn)?;
        Ok(ids)
    }

    fn update_line(
        &mut self,
        order_id: i32,
        line_id: i32,
        line: &LineInput,
    ) -> Result<(), DomainError> {
        let updated = diesel::update(
            order_lines::table
                .filter(order_lines::id.eq(line_id))
                .filter(order_lines::order_id.eq(order_id)),
        )
        .set((
            order_lines::item_id.eq(line.item_id),
            order_lines::quantity.eq(&line.quantity),
            order_lines::unit_price.eq(&line.unit_price),
        ))
        .execute(self.conn)?;
        if updated == 0 {
            return Err(DomainError::InvalidLineReference(line_id));
        }
        Ok(())
    }

    fn delete_lines(&mut self, order_id: i32, line_ids: &[i32]) -> Result<usize, DomainError> {
        if line_ids.is_empty() {
            return Ok(0);
        }
        let deleted = diesel::delete(
            order_lines::table
                .filter(order_lines::order_id.eq(order_id))
                .filter(order_lines::id.eq_any(line_ids)),
        )
        .execute(self.conn)?;
        Ok(deleted)
    }
}

// ── Reads ─────────────────────────────────────────────────────────────────────

fn filtered_orders<'a>(kind: OrderKind, query: &ListQuery) -> orders::BoxedQuery<'a, Pg> {
    let mut q = orders::table
        .filter(orders::kind.eq(kind.as_str()))
        .into_boxed();
    for pattern in query.patterns() {
        let by_market_place = market_places::table
            .filter(market_places::name.ilike(pattern.clone()))
            .select(market_places::id.nullable());
        q = q.filter(
            orders::code
                .ilike(pattern)
                .or(orders::market_place_id.eq_any(by_market_place)),
        );
    }
    q
}

fn market_place_refs(
    conn: &mut PgConnection,
    rows: &[OrderRow],
) -> Result<HashMap<i32, MarketPlaceRef>, DomainError> {
    let ids: Vec<i32> = rows.iter().filter_map(|o| o.market_place_id).collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let found = market_places::table
        .filter(market_places::id.eq_any(ids))
        .select(MarketPlaceRow::as_select())
        .load(conn)?;
    Ok(found.into_iter().map(|m| (m.id, m.into())).collect())
}

fn to_view(
    row: OrderRow,
    market_place: Option<MarketPlaceRef>,
    lines: Vec<OrderLineView>,
) -> Result<OrderView, DomainError> {
    Ok(OrderView {
        id: row.id,
        kind: row.kind.parse()?,
        code: row.code,
        market_place_id: row.market_place_id,
        date: row.date,
        market_place,
        lines,
    })
}

/// Loads an order with its lines, items and market place resolved.
fn load_order(
    conn: &mut PgConnection,
    kind: OrderKind,
    id: i32,
) -> Result<Option<OrderView>, DomainError> {
    let order = orders::table
        .filter(orders::id.eq(id))
        .filter(orders::kind.eq(kind.as_str()))
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };

    let lines = OrderLineRow::belonging_to(&order)
        .select(OrderLineRow::as_select())
        .order(order_lines::id.asc())
        .load(conn)?;

    let item_ids: Vec<i32> = lines.iter().map(|l| l.item_id).collect();
    let item_refs: HashMap<i32, ItemRefRow> = if item_ids.is_empty() {
        HashMap::new()
    } else {
        items::table
            .filter(items::id.eq_any(item_ids))
            .select(ItemRefRow::as_select())
            .load(conn)?
            .into_iter()
            .map(|i| (i.id, i))
            .collect()
    };

    let mut market_place = market_place_refs(conn, std::slice::from_ref(&order))?;
    let market_place = order.market_place_id.and_then(|id| market_place.remove(&id));

    let lines = lines
        .into_iter()
        .map(|l| OrderLineView {
            id: l.id,
            item_id: l.item_id,
            item: item_refs.get(&l.item_id).cloned().map(Into::into),
            quantity: l.quantity,
            unit_price: l.unit_price,
        })
        .collect();

    to_view(order, market_place, lines).map(Some)
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn save(&self, kind: OrderKind, input: OrderInput) -> Result<SavedOrder, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let summary = reconcile(&mut DieselLedger::new(conn), kind, &input)?;
            let order = load_order(conn, kind, summary.order_id)?
                .ok_or_else(|| DomainError::not_found(kind.entity(), summary.order_id))?;
            Ok(SavedOrder { order, summary })
        })
    }

    fn find_by_id(&self, kind: OrderKind, id: i32) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_order(&mut conn, kind, id)
    }

    fn list(&self, kind: OrderKind, query: &ListQuery) -> Result<Page<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered_orders(kind, query).count().get_result(conn)?;

            let rows = filtered_orders(kind, query)
                .select(OrderRow::as_select())
                .order((orders::date.desc(), orders::id.desc()))
                .limit(query.limit)
                .offset(query.offset)
                .load(conn)?;

            let market_places = market_place_refs(conn, &rows)?;
            let items = rows
                .into_iter()
                .map(|o| {
                    let market_place = o
                        .market_place_id
                        .and_then(|id| market_places.get(&id).cloned());
                    to_view(o, market_place, vec![])
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Page { items, total })
        })
    }

    fn delete(&self, kind: OrderKind, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::kind.eq(kind.as_str())),
        )
        .execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
