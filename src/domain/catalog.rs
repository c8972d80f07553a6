use bigdecimal::BigDecimal;

use super::check_amount;
use super::errors::DomainError;

pub const MAX_CATEGORY_NAME_LEN: usize = 100;
pub const MAX_ITEM_CODE_LEN: usize = 50;
pub const MAX_ITEM_NAME_LEN: usize = 100;
pub const MAX_MARKET_PLACE_NAME_LEN: usize = 50;
pub const MAX_CONTENT_TYPE_LEN: usize = 50;
pub const MAX_FILE_NAME_LEN: usize = 255;
pub const MAX_IMAGE_BYTES: usize = 10_000_000;

fn check_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidInput(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max {
        return Err(DomainError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInput {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl CategoryInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_text("name", &self.name, MAX_CATEGORY_NAME_LEN)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i32,
    pub code: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub selling_price: Option<BigDecimal>,
    pub is_active: bool,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    pub id: Option<i32>,
    pub code: String,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub selling_price: Option<BigDecimal>,
    pub is_active: bool,
}

impl ItemInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_text("code", &self.code, MAX_ITEM_CODE_LEN)?;
        check_text("name", &self.name, MAX_ITEM_NAME_LEN)?;
        if let Some(price) = &self.selling_price {
            check_amount("selling_price", price)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketPlace {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketPlaceInput {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl MarketPlaceInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_text("name", &self.name, MAX_MARKET_PLACE_NAME_LEN)
    }
}

/// Image metadata; the content is only loaded on download.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemImageInfo {
    pub id: i32,
    pub item_id: i32,
    pub content_type: String,
    pub original_file_name: Option<String>,
    pub size: i32,
}

#[derive(Debug, Clone)]
pub struct ItemImageContent {
    pub content_type: String,
    pub original_file_name: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NewItemImage {
    pub item_id: i32,
    pub content_type: String,
    pub original_file_name: Option<String>,
    pub content: Vec<u8>,
}

impl NewItemImage {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.is_empty() {
            return Err(DomainError::InvalidInput("image content is empty".into()));
        }
        if self.content.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::InvalidInput(format!(
                "image must be at most {} bytes",
                MAX_IMAGE_BYTES
            )));
        }
        check_text("content_type", &self.content_type, MAX_CONTENT_TYPE_LEN)?;
        if let Some(name) = &self.original_file_name {
            check_text("filename", name, MAX_FILE_NAME_LEN)?;
        }
        Ok(())
    }
}
