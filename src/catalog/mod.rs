//! # Product Catalog Input
//!
//! Product records arrive from an external catalog as opaque input data. The
//! only validation applied here is the caption fallback chain used by the
//! slide renderer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Caption substituted when a product carries no usable text
pub const PLACEHOLDER_CAPTION: &str = "No Title";

/// One product descriptor. Identity is list position only; the pipeline never
/// mutates these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    pub fn new(title: Option<String>, description: Option<String>) -> Self {
        Self { title, description }
    }

    /// Caption text for this product: `title` if non-empty, else
    /// `description`, else the fixed placeholder. Whitespace-only fields count
    /// as empty.
    pub fn caption(&self) -> &str {
        non_blank(&self.title)
            .or_else(|| non_blank(&self.description))
            .unwrap_or(PLACEHOLDER_CAPTION)
    }

    /// True when neither field carries usable text
    pub fn is_captionless(&self) -> bool {
        non_blank(&self.title).is_none() && non_blank(&self.description).is_none()
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Load an ordered product list from a JSON array file
pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<Product>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|_| CatalogError::ReadFailed { path: path.display().to_string() })?;

    let products: Vec<Product> = serde_json::from_str(&content)
        .map_err(|e| CatalogError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    Ok(products)
}
