//! Pure filtering and ordering of marketplace listings.
//!
//! The criteria are applied in a fixed order, each step narrowing the
//! running set; unset (or zero/empty, mirroring the legacy UI's "no
//! selection" sentinels) criteria are no-ops. Sorting is always descending
//! with missing values last. The input slice is never mutated.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{Offer, Property};

/// Optional criteria for narrowing and ordering a set of listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingCriteria {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub type_label: Option<String>,
    pub status: Option<String>,
    pub min_bedrooms: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: Option<String>,
}

impl ListingCriteria {
    /// Criteria matching everything, in insertion order.
    pub fn any() -> Self {
        Self::default()
    }
}

/// A named field's value as seen by the sorter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn render(&self) -> String {
        match self {
            FieldValue::Number(value) => value.to_string(),
            FieldValue::Text(value) => value.clone(),
        }
    }
}

/// Records the filter knows how to narrow and sort. Accessors default to
/// `None` so record types without a given attribute are simply excluded
/// whenever that criterion is active.
pub trait Filterable {
    fn location(&self) -> Option<&str> {
        None
    }
    fn type_label(&self) -> Option<&'static str> {
        None
    }
    fn status_label(&self) -> Option<&'static str> {
        None
    }
    fn bedrooms(&self) -> Option<u32> {
        None
    }
    fn price(&self) -> Option<f64> {
        None
    }
    /// Resolve a named field for sorting; `None` sorts last.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl Filterable for Property {
    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn type_label(&self) -> Option<&'static str> {
        Some(self.property_type.label())
    }

    fn status_label(&self) -> Option<&'static str> {
        Some(self.status.label())
    }

    fn bedrooms(&self) -> Option<u32> {
        self.features.bedrooms
    }

    fn price(&self) -> Option<f64> {
        self.price
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "price" => self.price.map(FieldValue::Number),
            "size" => self.size.map(FieldValue::Number),
            "bedrooms" => self.features.bedrooms.map(|n| FieldValue::Number(n as f64)),
            "bathrooms" => self.features.bathrooms.map(|n| FieldValue::Number(n as f64)),
            "title" => Some(FieldValue::Text(self.title.clone())),
            "location" => self.location.clone().map(FieldValue::Text),
            "type" => Some(FieldValue::Text(self.property_type.label().to_string())),
            "status" => Some(FieldValue::Text(self.status.label().to_string())),
            "createdAt" => Some(FieldValue::Text(self.created_at.to_rfc3339())),
            "updatedAt" => Some(FieldValue::Text(self.updated_at.to_rfc3339())),
            _ => None,
        }
    }
}

impl Filterable for Offer {
    fn status_label(&self) -> Option<&'static str> {
        Some(self.status.label())
    }

    fn price(&self) -> Option<f64> {
        Some(self.amount)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "amount" | "price" => Some(FieldValue::Number(self.amount)),
            "status" => Some(FieldValue::Text(self.status.label().to_string())),
            "createdAt" => Some(FieldValue::Text(self.created_at.to_rfc3339())),
            _ => None,
        }
    }
}

/// Apply `criteria` to `records`, returning the filtered, ordered sequence.
pub fn filter_records<T: Filterable + Clone>(records: &[T], criteria: &ListingCriteria) -> Vec<T> {
    let mut filtered: Vec<T> = records.to_vec();

    if let Some(search) = active_text(&criteria.location) {
        let needle = search.to_lowercase();
        filtered.retain(|record| {
            record
                .location()
                .is_some_and(|location| location.to_lowercase().contains(&needle))
        });
    }

    if let Some(wanted) = active_text(&criteria.type_label) {
        filtered.retain(|record| record.type_label() == Some(wanted));
    }

    if let Some(wanted) = active_text(&criteria.status) {
        filtered.retain(|record| record.status_label() == Some(wanted));
    }

    if let Some(minimum) = criteria.min_bedrooms.filter(|minimum| *minimum > 0) {
        filtered.retain(|record| record.bedrooms().is_some_and(|count| count >= minimum));
    }

    if let Some(floor) = criteria.min_price.filter(|floor| *floor > 0.0) {
        filtered.retain(|record| record.price().is_some_and(|price| price >= floor));
    }

    if let Some(ceiling) = criteria.max_price.filter(|ceiling| *ceiling > 0.0) {
        filtered.retain(|record| record.price().is_some_and(|price| price <= ceiling));
    }

    if let Some(sort_field) = active_text(&criteria.sort_by) {
        filtered.sort_by(|a, b| compare_descending(a.field(sort_field), b.field(sort_field)));
    }

    filtered
}

fn active_text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Descending comparison with missing values last regardless of direction.
/// Numbers compare numerically; everything else compares lexicographically
/// on its rendered form.
fn compare_descending(a: Option<FieldValue>, b: Option<FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(FieldValue::Number(x)), Some(FieldValue::Number(y))) => {
            y.partial_cmp(&x).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => y.render().cmp(&x.render()),
    }
}
