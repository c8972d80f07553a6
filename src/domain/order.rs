use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;

use super::check_amount;
use super::errors::DomainError;

pub const MAX_CODE_LEN: usize = 50;

/// Purchases and sales share one table pair, told apart by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    Purchase,
    Sales,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "PURCHASE",
            OrderKind::Sales => "SALES",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "Purchase",
            OrderKind::Sales => "Sales",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PURCHASE" => Ok(OrderKind::Purchase),
            "SALES" => Ok(OrderKind::Sales),
            other => Err(DomainError::Internal(format!("unknown order kind '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderHeader {
    pub code: String,
    pub market_place_id: Option<i32>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineInput {
    pub id: Option<i32>,
    pub item_id: i32,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderInput {
    pub id: Option<i32>,
    pub header: OrderHeader,
    pub lines: Vec<LineInput>,
}

impl OrderInput {
    /// Field-level checks that do not need the store.
    pub fn validate(&self) -> Result<(), DomainError> {
        let code = &self.header.code;
        if code.trim().is_empty() {
            return Err(DomainError::InvalidInput("code must not be empty".into()));
        }
        // Stored as given, so surrounding blanks count towards the column width.
        if code.chars().count() > MAX_CODE_LEN {
            return Err(DomainError::InvalidInput(format!(
                "code must be at most {} characters",
                MAX_CODE_LEN
            )));
        }
        for (index, line) in self.lines.iter().enumerate() {
            if line.quantity < BigDecimal::zero() {
                return Err(DomainError::InvalidInput(format!(
                    "line {}: quantity must not be negative",
                    index
                )));
            }
            if line.unit_price < BigDecimal::zero() {
                return Err(DomainError::InvalidInput(format!(
                    "line {}: unit_price must not be negative",
                    index
                )));
            }
            check_amount(&format!("line {}: quantity", index), &line.quantity)?;
            check_amount(&format!("line {}: unit_price", index), &line.unit_price)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRef {
    pub id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketPlaceRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineView {
    pub id: i32,
    pub item_id: i32,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    pub item: Option<ItemRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub id: i32,
    pub kind: OrderKind,
    pub code: String,
    pub market_place_id: Option<i32>,
    pub date: NaiveDate,
    pub market_place: Option<MarketPlaceRef>,
    pub lines: Vec<OrderLineView>,
}
