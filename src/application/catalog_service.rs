use crate::domain::catalog::{
    Category, CategoryInput, Item, ItemImageContent, ItemImageInfo, ItemInput, MarketPlace,
    MarketPlaceInput, NewItemImage,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::{
    CategoryRepository, ItemImageRepository, ItemRepository, MarketPlaceRepository,
};
use crate::domain::{ListQuery, Page};

/// Categories, items, their images and market places.
pub struct CatalogService<R> {
    repo: R,
}

impl<R> CatalogService<R>
where
    R: CategoryRepository + ItemRepository + MarketPlaceRepository + ItemImageRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_categories(&self, query: &ListQuery) -> Result<Page<Category>, DomainError> {
        self.repo.list_categories(query)
    }

    pub fn get_category(&self, id: i32) -> Result<Category, DomainError> {
        self.repo
            .find_category(id)?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub fn save_category(&self, input: CategoryInput) -> Result<Category, DomainError> {
        input.validate()?;
        self.repo.save_category(input)
    }

    pub fn list_items(&self, query: &ListQuery) -> Result<Page<Item>, DomainError> {
        self.repo.list_items(query)
    }

    /// Every item, or just the one with `id`.
    pub fn items_by_id(&self, id: Option<i32>) -> Result<Vec<Item>, DomainError> {
        match id {
            Some(id) => Ok(self.repo.find_item(id)?.into_iter().collect()),
            None => self.repo.all_items(),
        }
    }

    pub fn get_item(&self, id: i32) -> Result<Item, DomainError> {
        self.repo
            .find_item(id)?
            .ok_or_else(|| DomainError::not_found("Item", id))
    }

    pub fn save_item(&self, input: ItemInput) -> Result<Item, DomainError> {
        input.validate()?;
        self.repo.save_item(input)
    }

    pub fn list_market_places(&self, query: &ListQuery) -> Result<Page<MarketPlace>, DomainError> {
        self.repo.list_market_places(query)
    }

    pub fn get_market_place(&self, id: i32) -> Result<MarketPlace, DomainError> {
        self.repo
            .find_market_place(id)?
            .ok_or_else(|| DomainError::not_found("MarketPlace", id))
    }

    pub fn save_market_place(&self, input: MarketPlaceInput) -> Result<MarketPlace, DomainError> {
        input.validate()?;
        self.repo.save_market_place(input)
    }

    pub fn add_image(&self, image: NewItemImage) -> Result<ItemImageInfo, DomainError> {
        image.validate()?;
        self.get_item(image.item_id)?;
        let info = self.repo.add_image(image)?;
        log::info!(
            "Stored image {} ({} bytes) for item {}",
            info.id,
            info.size,
            info.item_id
        );
        Ok(info)
    }

    pub fn list_images(&self, item_id: i32) -> Result<Vec<ItemImageInfo>, DomainError> {
        self.get_item(item_id)?;
        self.repo.list_images(item_id)
    }

    pub fn image_content(&self, id: i32) -> Result<ItemImageContent, DomainError> {
        self.repo
            .image_content(id)?
            .ok_or_else(|| DomainError::not_found("ItemImage", id))
    }

    pub fn delete_image(&self, id: i32) -> Result<(), DomainError> {
        if self.repo.delete_image(id)? {
            Ok(())
        } else {
            Err(DomainError::not_found("ItemImage", id))
        }
    }
}
