use super::catalog::{
    Category, CategoryInput, Item, ItemImageContent, ItemImageInfo, ItemInput, MarketPlace,
    MarketPlaceInput, NewItemImage,
};
use super::errors::DomainError;
use super::order::{OrderInput, OrderKind, OrderView};
use super::reconcile::ReconcileSummary;
use super::{ListQuery, Page};

#[derive(Debug, Clone)]
pub struct SavedOrder {
    pub order: OrderView,
    pub summary: ReconcileSummary,
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Reconciles `input` and re-reads the order, all in one transaction.
    fn save(&self, kind: OrderKind, input: OrderInput) -> Result<SavedOrder, DomainError>;
    fn find_by_id(&self, kind: OrderKind, id: i32) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, kind: OrderKind, query: &ListQuery) -> Result<Page<OrderView>, DomainError>;
    /// Returns `false` if there was nothing to delete.
    fn delete(&self, kind: OrderKind, id: i32) -> Result<bool, DomainError>;
}

pub trait CategoryRepository: Send + Sync + 'static {
    fn list_categories(&self, query: &ListQuery) -> Result<Page<Category>, DomainError>;
    fn find_category(&self, id: i32) -> Result<Option<Category>, DomainError>;
    fn save_category(&self, input: CategoryInput) -> Result<Category, DomainError>;
}

pub trait ItemRepository: Send + Sync + 'static {
    fn list_items(&self, query: &ListQuery) -> Result<Page<Item>, DomainError>;
    fn all_items(&self) -> Result<Vec<Item>, DomainError>;
    fn find_item(&self, id: i32) -> Result<Option<Item>, DomainError>;
    fn save_item(&self, input: ItemInput) -> Result<Item, DomainError>;
}

pub trait MarketPlaceRepository: Send + Sync + 'static {
    fn list_market_places(&self, query: &ListQuery) -> Result<Page<MarketPlace>, DomainError>;
    fn find_market_place(&self, id: i32) -> Result<Option<MarketPlace>, DomainError>;
    fn save_market_place(&self, input: MarketPlaceInput) -> Result<MarketPlace, DomainError>;
}

pub trait ItemImageRepository: Send + Sync + 'static {
    fn add_image(&self, image: NewItemImage) -> Result<ItemImageInfo, DomainError>;
    fn list_images(&self, item_id: i32) -> Result<Vec<ItemImageInfo>, DomainError>;
    fn image_content(&self, id: i32) -> Result<Option<ItemImageContent>, DomainError>;
    fn delete_image(&self, id: i32) -> Result<bool, DomainError>;
}
