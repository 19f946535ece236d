use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Property, PropertyDraft, PropertyFeatures, PropertyId, PropertyPatch, PropertyStatus,
    PropertyType, SellerId, ValidationError,
};
use super::store::{OfferStore, PropertyStore, SellerStore, StoreError};

/// CRUD surface for listings, including the explicit offer cascade on
/// deletion (the legacy service leaned on ORM annotations for this).
pub struct PropertyCatalogService<P, S, O> {
    properties: Arc<P>,
    sellers: Arc<S>,
    offers: Arc<O>,
}

impl<P, S, O> PropertyCatalogService<P, S, O>
where
    P: PropertyStore + 'static,
    S: SellerStore + 'static,
    O: OfferStore + 'static,
{
    pub fn new(properties: Arc<P>, sellers: Arc<S>, offers: Arc<O>) -> Self {
        Self {
            properties,
            sellers,
            offers,
        }
    }

    /// Create a listing. The owner must resolve to an existing seller; new
    /// listings default to FOR_SALE and the OTHER type.
    pub fn create(&self, draft: PropertyDraft) -> Result<Property, CatalogError> {
        let owner_id = SellerId(
            draft
                .owner_id
                .filter(|id| !id.is_empty())
                .ok_or(ValidationError::MissingField("ownerId"))?,
        );
        if self.sellers.fetch(&owner_id)?.is_none() {
            return Err(ValidationError::UnknownSeller(owner_id.0).into());
        }

        let title = draft
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or(ValidationError::MissingField("title"))?;

        if draft.price.is_some_and(|price| price < 0.0) {
            return Err(ValidationError::NegativePrice.into());
        }
        if draft.size.is_some_and(|size| size < 0.0) {
            return Err(ValidationError::NegativeSize.into());
        }

        let property_type = parse_type(draft.property_type)?.unwrap_or(PropertyType::Other);
        let status = parse_status(draft.status)?.unwrap_or(PropertyStatus::ForSale);

        let now = Utc::now();
        let property = Property {
            id: PropertyId::generate(),
            owner_id,
            title,
            description: draft.description,
            location: draft.location,
            price: draft.price,
            size: draft.size,
            property_type,
            status,
            features: draft.features.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        Ok(self.properties.insert(property)?)
    }

    /// Partial update; absent fields are left untouched. Non-positive price
    /// and size values are ignored rather than rejected, matching the
    /// legacy update semantics.
    pub fn update(&self, id: &PropertyId, patch: PropertyPatch) -> Result<Property, CatalogError> {
        let mut property = self.properties.fetch(id)?.ok_or(CatalogError::NotFound)?;

        if let Some(title) = patch.title {
            property.title = title;
        }
        if let Some(description) = patch.description {
            property.description = Some(description);
        }
        if let Some(location) = patch.location {
            property.location = Some(location);
        }
        if let Some(price) = patch.price.filter(|price| *price > 0.0) {
            property.price = Some(price);
        }
        if let Some(size) = patch.size.filter(|size| *size > 0.0) {
            property.size = Some(size);
        }
        if let Some(property_type) = parse_type(patch.property_type)? {
            property.property_type = property_type;
        }
        if let Some(status) = parse_status(patch.status)? {
            property.status = status;
        }
        if let Some(features) = patch.features {
            property.features = merge_features(property.features, features);
        }

        property.updated_at = Utc::now();
        self.properties.update(property.clone())?;
        Ok(property)
    }

    pub fn get(&self, id: &PropertyId) -> Result<Property, CatalogError> {
        self.properties.fetch(id)?.ok_or(CatalogError::NotFound)
    }

    pub fn all(&self) -> Result<Vec<Property>, CatalogError> {
        Ok(self.properties.all()?)
    }

    /// Delete a listing and every offer that references it. The offer
    /// cascade is best-effort per offer so one bad record cannot strand
    /// the deletion.
    pub fn delete(&self, id: &PropertyId) -> Result<(), CatalogError> {
        if self.properties.fetch(id)?.is_none() {
            return Err(CatalogError::NotFound);
        }

        match self.offers.all() {
            Ok(offers) => {
                let mut removed = 0usize;
                for offer in offers.iter().filter(|offer| offer.property_id == *id) {
                    match self.offers.delete(&offer.id) {
                        Ok(()) => removed += 1,
                        Err(err) => {
                            warn!(offer_id = %offer.id, error = %err, "failed to cascade-delete offer")
                        }
                    }
                }
                if removed > 0 {
                    info!(property_id = %id, removed, "cascade-deleted offers for property");
                }
            }
            Err(err) => {
                warn!(property_id = %id, error = %err, "could not enumerate offers for cascade delete")
            }
        }

        Ok(self.properties.delete(id)?)
    }

    /// Case-insensitive substring search on location; an absent or empty
    /// term returns every listing.
    pub fn search_by_location(&self, term: Option<&str>) -> Result<Vec<Property>, CatalogError> {
        let properties = self.properties.all()?;
        let Some(term) = term.map(str::trim).filter(|term| !term.is_empty()) else {
            return Ok(properties);
        };
        let needle = term.to_lowercase();
        Ok(properties
            .into_iter()
            .filter(|property| {
                property
                    .location
                    .as_deref()
                    .is_some_and(|location| location.to_lowercase().contains(&needle))
            })
            .collect())
    }
}

fn parse_type(raw: Option<String>) -> Result<Option<PropertyType>, ValidationError> {
    match raw.filter(|value| !value.is_empty()) {
        Some(value) => PropertyType::parse_label(&value)
            .map(Some)
            .ok_or(ValidationError::UnknownPropertyType(value)),
        None => Ok(None),
    }
}

fn parse_status(raw: Option<String>) -> Result<Option<PropertyStatus>, ValidationError> {
    match raw.filter(|value| !value.is_empty()) {
        Some(value) => PropertyStatus::parse_label(&value)
            .map(Some)
            .ok_or(ValidationError::UnknownPropertyStatus(value)),
        None => Ok(None),
    }
}

fn merge_features(current: PropertyFeatures, incoming: PropertyFeatures) -> PropertyFeatures {
    PropertyFeatures {
        bedrooms: incoming.bedrooms.or(current.bedrooms),
        bathrooms: incoming.bathrooms.or(current.bathrooms),
        has_garage: incoming.has_garage,
        has_pool: incoming.has_pool,
        has_garden: incoming.has_garden,
    }
}

/// Error raised by the property catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Property not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}
