use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{CatalogError, CatalogResult};

pub const CATEGORY_NAME_MAX_LEN: usize = 100;
pub const PRODUCT_NAME_MAX_LEN: usize = 255;

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Product entity, always owned by exactly one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category_id: i64,
}

/// Validated category fields, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
}

/// Validated product fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub category_id: i64,
}

/// DTO for creating a category
///
/// Fields are optional on the wire so that a missing field is reported as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: Option<String>,
}

/// DTO for renaming a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
}

/// DTO for creating a product under a category given in the path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// DTO for updating a product
///
/// `name` and `price` are replaced; `categoryId` moves the product when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
}

fn violation(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn check_name(errors: &mut ValidationErrors, name: Option<&str>, max_len: usize) {
    match name {
        None => errors.add("name", violation("required", "Name is required")),
        Some(name) if name.trim().is_empty() => {
            errors.add("name", violation("required", "Name is required"))
        }
        Some(name) if name.chars().count() > max_len => errors.add(
            "name",
            violation(
                "length",
                format!("Name must be less than or equal to {} characters", max_len),
            ),
        ),
        Some(_) => {}
    }
}

fn check_price(errors: &mut ValidationErrors, price: Option<f64>) {
    match price {
        None => errors.add("price", violation("required", "Price is required")),
        Some(price) if !price.is_finite() => {
            errors.add("price", violation("finite", "Price must be a finite number"))
        }
        Some(price) if price < 0.0 => errors.add(
            "price",
            violation("range", "Price must be greater than or equal to 0"),
        ),
        Some(_) => {}
    }
}

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Validate for CreateCategory {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, self.name.as_deref(), CATEGORY_NAME_MAX_LEN);
        into_result(errors)
    }
}

impl Validate for UpdateCategory {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, self.name.as_deref(), CATEGORY_NAME_MAX_LEN);
        into_result(errors)
    }
}

impl Validate for CreateProduct {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, self.name.as_deref(), PRODUCT_NAME_MAX_LEN);
        check_price(&mut errors, self.price);
        into_result(errors)
    }
}

impl Validate for UpdateProduct {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, self.name.as_deref(), PRODUCT_NAME_MAX_LEN);
        check_price(&mut errors, self.price);
        if matches!(self.category_id, Some(id) if id <= 0) {
            errors.add(
                "categoryId",
                violation("range", "Category ID must be a positive number"),
            );
        }
        into_result(errors)
    }
}

impl CreateCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Validates and yields the fields to persist.
    pub fn into_draft(self) -> CatalogResult<CategoryDraft> {
        self.validate()?;
        let name = self.name.ok_or_else(missing("name"))?;
        Ok(CategoryDraft { name })
    }
}

impl UpdateCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Validates and yields the new name.
    pub fn into_name(self) -> CatalogResult<String> {
        self.validate()?;
        self.name.ok_or_else(missing("name"))
    }
}

impl CreateProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
        }
    }

    /// Validates and yields the fields to persist under `category_id`.
    pub fn into_draft(self, category_id: i64) -> CatalogResult<ProductDraft> {
        self.validate()?;
        Ok(ProductDraft {
            name: self.name.ok_or_else(missing("name"))?,
            price: self.price.ok_or_else(missing("price"))?,
            category_id,
        })
    }
}

impl UpdateProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Validates and yields `(name, price, new_category_id)`.
    pub fn into_fields(self) -> CatalogResult<(String, f64, Option<i64>)> {
        self.validate()?;
        Ok((
            self.name.ok_or_else(missing("name"))?,
            self.price.ok_or_else(missing("price"))?,
            self.category_id,
        ))
    }
}

impl Product {
    /// Replaces name and price, and owner when `category_id` is given.
    pub fn apply_update(&mut self, name: String, price: f64, category_id: Option<i64>) {
        self.name = name;
        self.price = price;
        if let Some(category_id) = category_id {
            self.category_id = category_id;
        }
    }
}

fn missing(field: &'static str) -> impl FnOnce() -> CatalogError {
    move || CatalogError::Internal(format!("validated field '{}' is missing", field))
}
