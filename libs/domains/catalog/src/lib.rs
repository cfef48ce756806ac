//! Catalog Domain
//!
//! Categories and the products they own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, audit events
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← Name uniqueness, category existence checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Traits + in-memory and PostgreSQL implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, request DTOs, validation
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers,
//!     repository::InMemoryCatalogRepository,
//!     service::{CategoryService, ProductService},
//! };
//!
//! let repository = InMemoryCatalogRepository::new();
//! let categories = CategoryService::new(repository.clone());
//! let products = ProductService::new(repository.clone(), repository);
//!
//! let router = handlers::router(categories, products);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use models::{
    Category, CategoryDraft, CreateCategory, CreateProduct, Product, ProductDraft,
    UpdateCategory, UpdateProduct,
};
pub use postgres::PgCatalogRepository;
pub use repository::{CategoryRepository, InMemoryCatalogRepository, ProductRepository};
pub use service::{CategoryService, ProductService};
