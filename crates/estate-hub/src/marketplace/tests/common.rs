use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::config::NotificationConfig;
use crate::marketplace::domain::{
    Buyer, BuyerId, Offer, OfferDraft, OfferId, Property, PropertyFeatures,
    PropertyId, PropertyStatus, PropertyType, Seller, SellerId,
};
use crate::marketplace::notify::{
    NotificationError, NotificationGateway, OfferStatusNotification,
};
use crate::marketplace::store::{
    BuyerStore, OfferStore, PropertyStore, SellerStore, StoreError,
};
use crate::marketplace::{MarketplaceApi, MarketplaceStores};

macro_rules! memory_store {
    ($store:ident, $trait:ident, $record:ty, $id:ty) => {
        #[derive(Default, Clone)]
        pub(super) struct $store {
            pub(super) records: Arc<Mutex<HashMap<$id, $record>>>,
        }

        impl $trait for $store {
            fn insert(&self, record: $record) -> Result<$record, StoreError> {
                let mut guard = self.records.lock().expect("store mutex poisoned");
                if guard.contains_key(&record.id) {
                    return Err(StoreError::Conflict);
                }
                guard.insert(record.id.clone(), record.clone());
                Ok(record)
            }

            fn update(&self, record: $record) -> Result<(), StoreError> {
                self.records
                    .lock()
                    .expect("store mutex poisoned")
                    .insert(record.id.clone(), record);
                Ok(())
            }

            fn fetch(&self, id: &$id) -> Result<Option<$record>, StoreError> {
                Ok(self
                    .records
                    .lock()
                    .expect("store mutex poisoned")
                    .get(id)
                    .cloned())
            }

            fn delete(&self, id: &$id) -> Result<(), StoreError> {
                self.records
                    .lock()
                    .expect("store mutex poisoned")
                    .remove(id)
                    .map(|_| ())
                    .ok_or(StoreError::NotFound)
            }

            fn all(&self) -> Result<Vec<$record>, StoreError> {
                Ok(self
                    .records
                    .lock()
                    .expect("store mutex poisoned")
                    .values()
                    .cloned()
                    .collect())
            }
        }
    };
}

memory_store!(MemoryProperties, PropertyStore, Property, PropertyId);
memory_store!(MemoryOffers, OfferStore, Offer, OfferId);
memory_store!(MemoryBuyers, BuyerStore, Buyer, BuyerId);
memory_store!(MemorySellers, SellerStore, Seller, SellerId);

/// Offer store where every operation fails, for 500-path tests.
pub(super) struct UnavailableOffers;

impl OfferStore for UnavailableOffers {
    fn insert(&self, _offer: Offer) -> Result<Offer, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _offer: Offer) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &OfferId) -> Result<Option<Offer>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &OfferId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Offer>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Property store where every operation fails.
pub(super) struct UnavailableProperties;

impl PropertyStore for UnavailableProperties {
    fn insert(&self, _property: Property) -> Result<Property, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _property: Property) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PropertyId) -> Result<Option<Property>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &PropertyId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Property>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Gateway that records every notification it receives.
#[derive(Default, Clone)]
pub(super) struct RecordingGateway {
    sent: Arc<Mutex<Vec<OfferStatusNotification>>>,
}

impl RecordingGateway {
    pub(super) fn sent(&self) -> Vec<OfferStatusNotification> {
        self.sent.lock().expect("gateway mutex poisoned").clone()
    }
}

impl NotificationGateway for RecordingGateway {
    fn notify(&self, notification: &OfferStatusNotification) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("gateway mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

/// Gateway whose transport always fails.
pub(super) struct FailingGateway;

impl NotificationGateway for FailingGateway {
    fn notify(&self, _notification: &OfferStatusNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp unreachable".to_string()))
    }
}

pub(super) fn sample_seller() -> Seller {
    Seller {
        id: SellerId("seller-1".to_string()),
        first_name: "Nadia".to_string(),
        last_name: "Keller".to_string(),
        email: "nadia@sellers.example".to_string(),
        username: "nadia".to_string(),
        password: "secret".to_string(),
    }
}

pub(super) fn sample_buyer() -> Buyer {
    Buyer {
        id: BuyerId("buyer-1".to_string()),
        first_name: "Lena".to_string(),
        last_name: "Moser".to_string(),
        email: "lena@buyers.example".to_string(),
        username: "lena".to_string(),
        password: "secret".to_string(),
        budget: 750_000.0,
    }
}

pub(super) fn listed_property(id: &str, location: &str, price: Option<f64>) -> Property {
    let now = Utc::now();
    Property {
        id: PropertyId(id.to_string()),
        owner_id: SellerId("seller-1".to_string()),
        title: format!("Listing {id}"),
        description: None,
        location: Some(location.to_string()),
        price,
        size: Some(82.0),
        property_type: PropertyType::Apartment,
        status: PropertyStatus::ForSale,
        features: PropertyFeatures {
            bedrooms: Some(3),
            bathrooms: Some(1),
            has_garage: false,
            has_pool: false,
            has_garden: false,
        },
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn offer_draft(property: &str, buyer: &str, amount: f64) -> OfferDraft {
    OfferDraft {
        property_id: Some(property.to_string()),
        buyer_id: Some(buyer.to_string()),
        amount: Some(amount),
        message: None,
    }
}

pub(super) struct Stores {
    pub(super) properties: Arc<MemoryProperties>,
    pub(super) offers: Arc<MemoryOffers>,
    pub(super) buyers: Arc<MemoryBuyers>,
    pub(super) sellers: Arc<MemorySellers>,
}

/// Stores pre-loaded with one seller, one buyer, and one FOR_SALE listing
/// in Geneva at 450k.
pub(super) fn seeded_stores() -> Stores {
    let stores = Stores {
        properties: Arc::new(MemoryProperties::default()),
        offers: Arc::new(MemoryOffers::default()),
        buyers: Arc::new(MemoryBuyers::default()),
        sellers: Arc::new(MemorySellers::default()),
    };
    stores.sellers.insert(sample_seller()).expect("seed seller");
    stores.buyers.insert(sample_buyer()).expect("seed buyer");
    stores
        .properties
        .insert(listed_property("prop-geneva", "Geneva", Some(450_000.0)))
        .expect("seed property");
    stores
}

pub(super) fn api_with_gateway<N: NotificationGateway + 'static>(
    stores: &Stores,
    gateway: Arc<N>,
) -> Arc<MarketplaceApi<MemoryProperties, MemoryOffers, MemoryBuyers, MemorySellers, N>> {
    Arc::new(MarketplaceApi::new(
        MarketplaceStores {
            properties: stores.properties.clone(),
            offers: stores.offers.clone(),
            buyers: stores.buyers.clone(),
            sellers: stores.sellers.clone(),
        },
        gateway,
        NotificationConfig::default(),
    ))
}

pub(super) fn build_marketplace() -> (
    Arc<MarketplaceApi<MemoryProperties, MemoryOffers, MemoryBuyers, MemorySellers, RecordingGateway>>,
    Stores,
    Arc<RecordingGateway>,
) {
    let stores = seeded_stores();
    let gateway = Arc::new(RecordingGateway::default());
    let api = api_with_gateway(&stores, gateway.clone());
    (api, stores, gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
