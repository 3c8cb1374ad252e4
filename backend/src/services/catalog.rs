//! Client-side filtering and sorting of the package catalog.
//!
//! The catalog is small enough to hold in memory, so queries run over the
//! already-fetched list. All sorts are stable.

use std::cmp::Ordering;
use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PackageId, TourPackage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageSort {
    /// Order as delivered by the data source.
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
    RatingHighToLow,
    TitleAToZ,
    DurationShortToLong,
}

/// Filter and sort options for the package list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageQuery {
    /// Case-insensitive substring over title, destination and description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub sort: PackageSort,
}

impl PackageQuery {
    pub fn matches(&self, package: &TourPackage) -> bool {
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            let hit = [&package.title, &package.destination, &package.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(destination) = self.destination.as_deref() {
            if !package.destination.eq_ignore_ascii_case(destination.trim()) {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            let same = package
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category.trim()));
            if !same {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| package.price_per_person < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| package.price_per_person > max) {
            return false;
        }

        true
    }

    /// Apply filters then sort.
    pub fn apply(&self, packages: &[TourPackage]) -> Vec<TourPackage> {
        let mut matched: Vec<TourPackage> =
            packages.iter().filter(|p| self.matches(p)).cloned().collect();
        sort_packages(&mut matched, self.sort);
        matched
    }
}

pub fn sort_packages(packages: &mut [TourPackage], sort: PackageSort) {
    match sort {
        PackageSort::Featured => {}
        PackageSort::PriceLowToHigh => packages.sort_by(|a, b| a.price_per_person.cmp(&b.price_per_person)),
        PackageSort::PriceHighToLow => packages.sort_by(|a, b| b.price_per_person.cmp(&a.price_per_person)),
        PackageSort::RatingHighToLow => packages.sort_by(|a, b| compare_rating_desc(a.rating, b.rating)),
        PackageSort::TitleAToZ => {
            packages.sort_by_cached_key(|p| p.title.to_lowercase());
        }
        PackageSort::DurationShortToLong => packages.sort_by_key(|p| p.duration_days),
    }
}

/// Rated packages first, highest score first; unrated keep their order at the end.
fn compare_rating_desc(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct destinations in first-seen order, for filter chips.
pub fn destinations(packages: &[TourPackage]) -> Vec<String> {
    let mut seen = HashSet::new();
    packages
        .iter()
        .filter(|p| seen.insert(p.destination.to_lowercase()))
        .map(|p| p.destination.clone())
        .collect()
}

/// Keep only packages whose id is in `favorites`, preserving catalog order.
pub fn only_favorites(packages: &[TourPackage], favorites: &[PackageId]) -> Vec<TourPackage> {
    let wanted: HashSet<PackageId> = favorites.iter().copied().collect();
    packages
        .iter()
        .filter(|p| wanted.contains(&p.id))
        .cloned()
        .collect()
}
