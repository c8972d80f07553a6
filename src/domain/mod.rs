pub mod catalog;
pub mod errors;
pub mod order;
pub mod ports;
pub mod reconcile;

use bigdecimal::BigDecimal;

use errors::DomainError;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Integer digits left by the `NUMERIC(20, 2)` amount columns.
pub const AMOUNT_INTEGER_DIGITS: u32 = 18;

/// Rejects amounts the `NUMERIC(20, 2)` columns cannot hold once rounded to
/// two fractional digits.
pub fn check_amount(field: &str, value: &BigDecimal) -> Result<(), DomainError> {
    let limit = BigDecimal::from(10u64.pow(AMOUNT_INTEGER_DIGITS));
    if value.abs().round(2) >= limit {
        return Err(DomainError::InvalidInput(format!(
            "{} must be less than 10^{} in magnitude",
            field, AMOUNT_INTEGER_DIGITS
        )));
    }
    Ok(())
}

/// Keyword search plus offset pagination shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub keywords: Vec<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    /// Splits `q` on whitespace; `limit` is clamped to `1..=MAX_LIMIT` and a
    /// negative `offset` becomes zero.
    pub fn new(q: Option<&str>, limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            keywords: q
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// `ILIKE` patterns for each keyword, with `%` and `_` escaped.
    pub fn patterns(&self) -> Vec<String> {
        self.keywords
            .iter()
            .map(|k| {
                let escaped = k
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
