use crate::domain::errors::DomainError;
use crate::domain::order::{OrderInput, OrderKind, OrderView};
use crate::domain::ports::{OrderRepository, SavedOrder};
use crate::domain::{ListQuery, Page};

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn save_order(&self, kind: OrderKind, input: OrderInput) -> Result<SavedOrder, DomainError> {
        input.validate()?;
        let code = input.header.code.clone();

        let saved = self.repo.save(kind, input).map_err(|e| {
            log::warn!("{} '{}' rejected: {}", kind.entity(), code, e);
            e
        })?;

        let s = &saved.summary;
        log::info!(
            "{} {} '{}' {}: {} updated, {} inserted, {} deleted",
            kind.entity(),
            s.order_id,
            code,
            if s.created { "created" } else { "reconciled" },
            s.updated,
            s.inserted.len(),
            s.deleted
        );
        Ok(saved)
    }

    pub fn get_order(&self, kind: OrderKind, id: i32) -> Result<Option<OrderView>, DomainError> {
        self.repo.find_by_id(kind, id)
    }

    pub fn list_orders(
        &self,
        kind: OrderKind,
        query: &ListQuery,
    ) -> Result<Page<OrderView>, DomainError> {
        self.repo.list(kind, query)
    }

    pub fn delete_order(&self, kind: OrderKind, id: i32) -> Result<(), DomainError> {
        if self.repo.delete(kind, id)? {
            log::info!("{} {} deleted", kind.entity(), id);
            Ok(())
        } else {
            Err(DomainError::not_found(kind.entity(), id))
        }
    }
}
