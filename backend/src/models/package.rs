use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PackageId;

/// A tour package as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourPackage {
    pub id: PackageId,
    pub title: String,
    pub destination: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    pub duration_days: u32,
    pub price_per_person: Decimal,
    /// Average review score on a 0-5 scale.
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Loosely-typed inclusions as stored by the content editors.
    /// See [`crate::inclusions`] for the normalised form.
    #[serde(default)]
    pub inclusions: serde_json::Value,
}

impl TourPackage {
    /// Minimal package with no optional metadata.
    pub fn new(
        id: PackageId,
        title: impl Into<String>,
        destination: impl Into<String>,
        duration_days: u32,
        price_per_person: Decimal,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            destination: destination.into(),
            category: None,
            description: String::new(),
            duration_days,
            price_per_person,
            rating: None,
            image_url: None,
            inclusions: serde_json::Value::Null,
        }
    }
}
