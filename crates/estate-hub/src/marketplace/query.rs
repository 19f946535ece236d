use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use super::domain::{BuyerId, Offer, Property, PropertyId, SellerId};
use super::filter::{filter_records, ListingCriteria};
use super::store::{OfferStore, PropertyStore};

/// Read-side composition of the entity store and the listing filter.
///
/// Every query is a scan; the legacy service kept no secondary indexes and
/// this engine preserves that. Store failures follow the source's
/// log-and-continue policy and come back as empty results.
pub struct MarketplaceQueryService<P, O> {
    properties: Arc<P>,
    offers: Arc<O>,
}

impl<P, O> MarketplaceQueryService<P, O>
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
{
    pub fn new(properties: Arc<P>, offers: Arc<O>) -> Self {
        Self { properties, offers }
    }

    /// Every offer the buyer has submitted, in store order.
    pub fn offers_for_buyer(&self, buyer_id: &BuyerId) -> Vec<Offer> {
        self.scan_offers("offers_for_buyer")
            .into_iter()
            .filter(|offer| offer.buyer_id == *buyer_id)
            .collect()
    }

    /// Every offer on any property the seller owns: resolve the owned
    /// property id set, then filter the offer scan against it.
    pub fn offers_for_seller_properties(&self, seller_id: &SellerId) -> Vec<Offer> {
        let owned: HashSet<PropertyId> = match self.properties.all() {
            Ok(properties) => properties
                .into_iter()
                .filter(|property| property.owner_id == *seller_id)
                .map(|property| property.id)
                .collect(),
            Err(err) => {
                warn!(seller_id = %seller_id, error = %err, "property scan failed, returning no offers");
                return Vec::new();
            }
        };

        if owned.is_empty() {
            return Vec::new();
        }

        self.scan_offers("offers_for_seller_properties")
            .into_iter()
            .filter(|offer| owned.contains(&offer.property_id))
            .collect()
    }

    /// Every offer on one property.
    pub fn offers_for_property(&self, property_id: &PropertyId) -> Vec<Offer> {
        self.scan_offers("offers_for_property")
            .into_iter()
            .filter(|offer| offer.property_id == *property_id)
            .collect()
    }

    /// The buyer-facing view of listings: full scan narrowed and ordered by
    /// the listing filter.
    pub fn filtered_listings(&self, criteria: &ListingCriteria) -> Vec<Property> {
        match self.properties.all() {
            Ok(properties) => filter_records(&properties, criteria),
            Err(err) => {
                warn!(error = %err, "property scan failed, returning no listings");
                Vec::new()
            }
        }
    }

    fn scan_offers(&self, operation: &'static str) -> Vec<Offer> {
        match self.offers.all() {
            Ok(offers) => offers,
            Err(err) => {
                warn!(operation, error = %err, "offer scan failed, returning empty result");
                Vec::new()
            }
        }
    }
}
