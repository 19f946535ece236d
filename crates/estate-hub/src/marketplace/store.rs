use super::domain::{Buyer, BuyerId, Offer, OfferId, Property, PropertyId, Seller, SellerId};

/// Error enumeration for entity store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for listed properties so the coordinator and query
/// service can be exercised against in-memory fakes.
pub trait PropertyStore: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, StoreError>;
    fn update(&self, property: Property) -> Result<(), StoreError>;
    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, StoreError>;
    fn delete(&self, id: &PropertyId) -> Result<(), StoreError>;
    fn all(&self) -> Result<Vec<Property>, StoreError>;
}

/// Storage abstraction for purchase offers. There is deliberately no
/// buyer-side or property-side index; callers scan `all()` the way the
/// legacy service did.
pub trait OfferStore: Send + Sync {
    fn insert(&self, offer: Offer) -> Result<Offer, StoreError>;
    fn update(&self, offer: Offer) -> Result<(), StoreError>;
    fn fetch(&self, id: &OfferId) -> Result<Option<Offer>, StoreError>;
    fn delete(&self, id: &OfferId) -> Result<(), StoreError>;
    fn all(&self) -> Result<Vec<Offer>, StoreError>;
}

/// Storage abstraction for buyer accounts.
pub trait BuyerStore: Send + Sync {
    fn insert(&self, buyer: Buyer) -> Result<Buyer, StoreError>;
    fn update(&self, buyer: Buyer) -> Result<(), StoreError>;
    fn fetch(&self, id: &BuyerId) -> Result<Option<Buyer>, StoreError>;
    fn delete(&self, id: &BuyerId) -> Result<(), StoreError>;
    fn all(&self) -> Result<Vec<Buyer>, StoreError>;
}

/// Storage abstraction for seller accounts.
pub trait SellerStore: Send + Sync {
    fn insert(&self, seller: Seller) -> Result<Seller, StoreError>;
    fn update(&self, seller: Seller) -> Result<(), StoreError>;
    fn fetch(&self, id: &SellerId) -> Result<Option<Seller>, StoreError>;
    fn delete(&self, id: &SellerId) -> Result<(), StoreError>;
    fn all(&self) -> Result<Vec<Seller>, StoreError>;
}
