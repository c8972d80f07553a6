//! Synchronises the persisted lines of an order with a submitted list.
//!
//! Lines carrying an id are updated in place, lines without one are
//! inserted, and every previously persisted line the submission leaves out
//! is deleted. [`reconcile`] issues all of its writes through an
//! [`OrderLedger`], which the caller is expected to scope to a single store
//! transaction: any error returned here must roll the whole call back.

use std::collections::{BTreeSet, HashSet};

use super::errors::DomainError;
use super::order::{LineInput, OrderHeader, OrderInput, OrderKind};

/// Write access to orders and their lines within one transaction.
pub trait OrderLedger {
    fn insert_order(&mut self, kind: OrderKind, header: &OrderHeader) -> Result<i32, DomainError>;

    /// Returns `false` when no order of `kind` has this id.
    fn update_order(
        &mut self,
        kind: OrderKind,
        id: i32,
        header: &OrderHeader,
    ) -> Result<bool, DomainError>;

    fn line_ids(&mut self, order_id: i32) -> Result<Vec<i32>, DomainError>;

    /// Inserts the lines in the given order and returns their new ids.
    fn insert_lines(&mut self, order_id: i32, lines: &[&LineInput])
        -> Result<Vec<i32>, DomainError>;

    fn update_line(
        &mut self,
        order_id: i32,
        line_id: i32,
        line: &LineInput,
    ) -> Result<(), DomainError>;

    fn delete_lines(&mut self, order_id: i32, line_ids: &[i32]) -> Result<usize, DomainError>;
}

/// What a single reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub order_id: i32,
    pub created: bool,
    pub updated: usize,
    pub inserted: Vec<i32>,
    pub deleted: usize,
}

/// The partition of a submission against the persisted line ids.
#[derive(Debug, PartialEq)]
pub struct LinePlan<'a> {
    pub updates: Vec<(i32, &'a LineInput)>,
    pub inserts: Vec<&'a LineInput>,
    pub deletes: Vec<i32>,
}

/// Rejects a submission naming the same line id twice.
pub fn check_duplicates(lines: &[LineInput]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for id in lines.iter().filter_map(|l| l.id) {
        if !seen.insert(id) {
            return Err(DomainError::DuplicateLineReference(id));
        }
    }
    Ok(())
}

/// Mark-and-sweep over the existing ids: every submitted id must be in
/// `existing` and is removed from it, and whatever is left gets deleted.
pub fn plan_lines<'a>(existing: &[i32], lines: &'a [LineInput]) -> Result<LinePlan<'a>, DomainError> {
    let mut remaining: BTreeSet<i32> = existing.iter().copied().collect();
    let mut updates = Vec::new();
    let mut inserts = Vec::new();

    for line in lines {
        match line.id {
            Some(id) => {
                if !remaining.remove(&id) {
                    return Err(if existing.contains(&id) {
                        DomainError::DuplicateLineReference(id)
                    } else {
                        DomainError::InvalidLineReference(id)
                    });
                }
                updates.push((id, line));
            }
            None => inserts.push(line),
        }
    }

    Ok(LinePlan {
        updates,
        inserts,
        deletes: remaining.into_iter().collect(),
    })
}

/// Creates or updates an order of `kind` and brings its lines in line with
/// `input.lines`.
pub fn reconcile<L>(
    ledger: &mut L,
    kind: OrderKind,
    input: &OrderInput,
) -> Result<ReconcileSummary, DomainError>
where
    L: OrderLedger + ?Sized,
{
    check_duplicates(&input.lines)?;

    let Some(order_id) = input.id else {
        if let Some(id) = input.lines.iter().find_map(|l| l.id) {
            return Err(DomainError::InvalidLineReference(id));
        }
        let order_id = ledger.insert_order(kind, &input.header)?;
        let lines: Vec<&LineInput> = input.lines.iter().collect();
        let inserted = ledger.insert_lines(order_id, &lines)?;
        return Ok(ReconcileSummary {
            order_id,
            created: true,
            inserted,
            ..Default::default()
        });
    };

    if !ledger.update_order(kind, order_id, &input.header)? {
        return Err(DomainError::not_found(kind.entity(), order_id));
    }

    let existing = ledger.line_ids(order_id)?;
    let plan = plan_lines(&existing, &input.lines)?;

    for (line_id, line) in &plan.updates {
        ledger.update_line(order_id, *line_id, line)?;
    }
    let inserted = ledger.insert_lines(order_id, &plan.inserts)?;
    let deleted = ledger.delete_lines(order_id, &plan.deletes)?;

    Ok(ReconcileSummary {
        order_id,
        created: false,
        updated: plan.updates.len(),
        inserted,
        deleted,
    })
}
