//! Offer lifecycle and listing consistency engine.
//!
//! The marketplace is split along the seams the HTTP surface exposes:
//! [`offers`] drives the offer state machine and the SOLD cascade,
//! [`properties`] owns listing CRUD, [`accounts`] registers buyers and
//! sellers, [`query`] serves the read side through the [`filter`] module,
//! and [`router`] maps everything onto REST routes. Persistence and
//! notification transports stay behind the [`store`] and [`notify`] traits.

pub mod accounts;
pub mod domain;
pub mod filter;
pub mod notify;
pub mod offers;
pub mod properties;
pub mod query;
pub mod router;
pub mod store;

pub use accounts::{AccountDirectory, AccountError};
pub use domain::{
    Buyer, BuyerDraft, BuyerId, Offer, OfferDraft, OfferId, OfferStatus, Property, PropertyDraft,
    PropertyFeatures, PropertyId, PropertyPatch, PropertyStatus, PropertyType, Seller, SellerDraft,
    SellerId, ValidationError,
};
pub use filter::{filter_records, Filterable, ListingCriteria};
pub use notify::{NotificationError, NotificationGateway, OfferStatusNotification};
pub use offers::{OfferLifecycleService, OfferServiceError, TransitionOutcome};
pub use properties::{CatalogError, PropertyCatalogService};
pub use query::MarketplaceQueryService;
pub use router::{marketplace_router, MarketplaceApi, MarketplaceStores};
pub use store::{BuyerStore, OfferStore, PropertyStore, SellerStore, StoreError};

#[cfg(test)]
mod tests;
