//! Products, product categories and the product submission workflow.

pub mod entity;
pub mod fixtures;
pub mod schema;
pub mod service;

use async_trait::async_trait;

pub use entity::{
    CreateCategoryInput, CreateProductInput, Product, ProductCategory, ProductFilter,
    SubmissionStatus, UpdateCategoryInput, UpdateProductInput,
};
pub use schema::{ProductMutation, ProductQuery};
pub use service::ProductService;

use crate::aspects::{seed_collection, seed_indexed, Services};
use crate::error::Result;
use crate::platform::{Aspect, NavItem, ProductSection, ProfileTab, Registrar, Route};
use crate::search::Indexable;

pub const ASPECT_ID: &str = "products";

pub struct ProductsAspect;

#[async_trait]
impl Aspect for ProductsAspect {
    fn id(&self) -> &'static str {
        ASPECT_ID
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["people"]
    }

    fn register(&self, shell: &mut Registrar<'_>) -> Result<()> {
        shell
            .route(Route::new("/products", "products"))
            .route(Route::new("/products/new", "product-new").authenticated())
            .route(Route::new("/products/:productId", "product"))
            .route(Route::new("/categories/:slug", "category"))
            .navigation(NavItem::new("Products", "/products"))
            .search_type(Product::SEARCH_TYPE, "Products", "/products/:productId");
        shell.profile_tab(ProfileTab::new("products", "Products", "listProducts"))?;
        shell.product_section(ProductSection::new("overview", "Overview", "getProduct"))?;
        Ok(())
    }

    async fn seed(&self, services: &Services) -> Result<usize> {
        let products = &services.products;
        Ok(seed_collection(&products.categories, fixtures::categories()).await?.len()
            + seed_indexed(&products.products, &services.search, fixtures::products()).await?)
    }
}
