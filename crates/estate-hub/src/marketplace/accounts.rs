use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    Buyer, BuyerDraft, BuyerId, Seller, SellerDraft, SellerId, ValidationError,
};
use super::store::{BuyerStore, OfferStore, PropertyStore, SellerStore, StoreError};

/// Minimal registry for buyer and seller accounts. Login and session
/// handling live outside this engine; what matters here is that offers and
/// listings can resolve their references and that removals cascade.
pub struct AccountDirectory<B, S, P, O> {
    buyers: Arc<B>,
    sellers: Arc<S>,
    properties: Arc<P>,
    offers: Arc<O>,
}

impl<B, S, P, O> AccountDirectory<B, S, P, O>
where
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
{
    pub fn new(buyers: Arc<B>, sellers: Arc<S>, properties: Arc<P>, offers: Arc<O>) -> Self {
        Self {
            buyers,
            sellers,
            properties,
            offers,
        }
    }

    /// Register a buyer. Email is required and the declared budget must be
    /// positive.
    pub fn register_buyer(&self, draft: BuyerDraft) -> Result<Buyer, AccountError> {
        let email = draft
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(ValidationError::MissingField("email"))?;
        let budget = draft
            .budget
            .ok_or(ValidationError::MissingField("budget"))?;
        if budget <= 0.0 {
            return Err(ValidationError::NonPositiveBudget.into());
        }

        let buyer = Buyer {
            id: BuyerId::generate(),
            first_name: draft.first_name.unwrap_or_default(),
            last_name: draft.last_name.unwrap_or_default(),
            email,
            username: draft.username.unwrap_or_default(),
            password: draft.password.unwrap_or_default(),
            budget,
        };
        Ok(self.buyers.insert(buyer)?)
    }

    /// Register a seller. Email is required.
    pub fn register_seller(&self, draft: SellerDraft) -> Result<Seller, AccountError> {
        let email = draft
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or(ValidationError::MissingField("email"))?;

        let seller = Seller {
            id: SellerId::generate(),
            first_name: draft.first_name.unwrap_or_default(),
            last_name: draft.last_name.unwrap_or_default(),
            email,
            username: draft.username.unwrap_or_default(),
            password: draft.password.unwrap_or_default(),
        };
        Ok(self.sellers.insert(seller)?)
    }

    pub fn buyer(&self, id: &BuyerId) -> Result<Buyer, AccountError> {
        self.buyers.fetch(id)?.ok_or(AccountError::BuyerNotFound)
    }

    pub fn seller(&self, id: &SellerId) -> Result<Seller, AccountError> {
        self.sellers.fetch(id)?.ok_or(AccountError::SellerNotFound)
    }

    /// Replace a buyer's budget; the new value must be positive.
    pub fn update_budget(&self, id: &BuyerId, budget: f64) -> Result<Buyer, AccountError> {
        if budget <= 0.0 {
            return Err(ValidationError::NonPositiveBudget.into());
        }
        let mut buyer = self.buyers.fetch(id)?.ok_or(AccountError::BuyerNotFound)?;
        buyer.budget = budget;
        self.buyers.update(buyer.clone())?;
        Ok(buyer)
    }

    /// Remove a buyer together with every offer they submitted.
    pub fn remove_buyer(&self, id: &BuyerId) -> Result<(), AccountError> {
        if self.buyers.fetch(id)?.is_none() {
            return Err(AccountError::BuyerNotFound);
        }

        match self.offers.all() {
            Ok(offers) => {
                for offer in offers.iter().filter(|offer| offer.buyer_id == *id) {
                    if let Err(err) = self.offers.delete(&offer.id) {
                        warn!(offer_id = %offer.id, error = %err, "failed to cascade-delete buyer offer");
                    }
                }
            }
            Err(err) => {
                warn!(buyer_id = %id, error = %err, "could not enumerate offers for buyer removal")
            }
        }

        Ok(self.buyers.delete(id)?)
    }

    /// Remove a seller, their listings, and the offers on those listings.
    pub fn remove_seller(&self, id: &SellerId) -> Result<(), AccountError> {
        if self.sellers.fetch(id)?.is_none() {
            return Err(AccountError::SellerNotFound);
        }

        let owned: Vec<_> = match self.properties.all() {
            Ok(properties) => properties
                .into_iter()
                .filter(|property| property.owner_id == *id)
                .collect(),
            Err(err) => {
                warn!(seller_id = %id, error = %err, "could not enumerate properties for seller removal");
                Vec::new()
            }
        };

        if !owned.is_empty() {
            let offers = self.offers.all().unwrap_or_else(|err| {
                warn!(seller_id = %id, error = %err, "could not enumerate offers for seller removal");
                Vec::new()
            });
            for property in &owned {
                for offer in offers.iter().filter(|offer| offer.property_id == property.id) {
                    if let Err(err) = self.offers.delete(&offer.id) {
                        warn!(offer_id = %offer.id, error = %err, "failed to cascade-delete offer");
                    }
                }
                if let Err(err) = self.properties.delete(&property.id) {
                    warn!(property_id = %property.id, error = %err, "failed to cascade-delete property");
                }
            }
            info!(seller_id = %id, listings = owned.len(), "cascade-deleted seller listings");
        }

        Ok(self.sellers.delete(id)?)
    }
}

/// Error raised by the account directory.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Buyer not found")]
    BuyerNotFound,
    #[error("Seller not found")]
    SellerNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}
