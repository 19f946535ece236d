use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::NotificationConfig;

use super::domain::{
    BuyerId, Offer, OfferDraft, OfferId, OfferStatus, Property, PropertyId, PropertyStatus,
    ValidationError,
};
use super::notify::{NotificationGateway, OfferStatusNotification};
use super::store::{BuyerStore, OfferStore, PropertyStore, StoreError};

/// Coordinates the offer state machine: creation-time validation, the
/// PENDING → {ACCEPTED, REJECTED, WITHDRAWN} transitions, the SOLD cascade
/// onto the referenced property, and best-effort status notifications.
pub struct OfferLifecycleService<P, O, B, N> {
    properties: Arc<P>,
    offers: Arc<O>,
    buyers: Arc<B>,
    gateway: Arc<N>,
    notifications: NotificationConfig,
    // One lock per property so two transitions racing toward the same
    // listing serialize instead of both observing FOR_SALE.
    transition_locks: Mutex<HashMap<PropertyId, Arc<Mutex<()>>>>,
}

/// Result of a status transition. `property` carries the post-cascade
/// listing when the transition was an acceptance and the cascade succeeded;
/// `notification_sent` is advisory only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub offer: Offer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<Property>,
    pub notification_sent: bool,
}

impl<P, O, B, N> OfferLifecycleService<P, O, B, N>
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    N: NotificationGateway + 'static,
{
    pub fn new(
        properties: Arc<P>,
        offers: Arc<O>,
        buyers: Arc<B>,
        gateway: Arc<N>,
        notifications: NotificationConfig,
    ) -> Self {
        Self {
            properties,
            offers,
            buyers,
            gateway,
            notifications,
            transition_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Validate and persist a new PENDING offer.
    ///
    /// Validation is deliberately minimal: a positive amount and two
    /// resolvable references. No budget check is performed.
    pub fn create(&self, draft: OfferDraft) -> Result<Offer, OfferServiceError> {
        let property_id = PropertyId(
            draft
                .property_id
                .ok_or(ValidationError::MissingField("propertyId"))?,
        );
        let buyer_id = BuyerId(
            draft
                .buyer_id
                .ok_or(ValidationError::MissingField("buyerId"))?,
        );
        let amount = draft
            .amount
            .ok_or(ValidationError::MissingField("amount"))?;
        if amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        if self.properties.fetch(&property_id)?.is_none() {
            return Err(ValidationError::UnknownProperty(property_id.0).into());
        }
        if self.buyers.fetch(&buyer_id)?.is_none() {
            return Err(ValidationError::UnknownBuyer(buyer_id.0).into());
        }

        let offer = Offer {
            id: OfferId::generate(),
            property_id,
            buyer_id,
            amount,
            message: draft.message,
            status: OfferStatus::Pending,
            created_at: Utc::now(),
        };

        Ok(self.offers.insert(offer)?)
    }

    /// Apply a status transition and cascade acceptance into the listing.
    ///
    /// The raw target is parsed here so unrecognized values surface as
    /// validation errors. A terminal offer rejects any further transition;
    /// re-applying PENDING to a pending offer is accepted as a no-op
    /// transition, as the legacy service did. The offer update and the SOLD
    /// cascade run under the per-property lock; cascade and notification
    /// failures are logged and surfaced as advisory, never as errors.
    pub fn transition(
        &self,
        offer_id: &OfferId,
        target: &str,
    ) -> Result<TransitionOutcome, OfferServiceError> {
        let target = OfferStatus::parse_label(target)
            .ok_or_else(|| ValidationError::UnknownOfferStatus(target.to_string()))?;

        let offer = self
            .offers
            .fetch(offer_id)?
            .ok_or(OfferServiceError::NotFound)?;

        let lock = self.property_lock(&offer.property_id);
        let _guard = lock.lock().expect("transition mutex poisoned");

        // Re-read under the lock; a racing transition may have landed.
        let mut offer = self
            .offers
            .fetch(offer_id)?
            .ok_or(OfferServiceError::NotFound)?;
        let old_status = offer.status;

        if old_status.is_terminal() {
            return Err(OfferServiceError::InvalidTransition {
                offer: offer_id.clone(),
                from: old_status,
                to: target,
            });
        }

        offer.status = target;
        self.offers.update(offer.clone())?;

        let property = if target == OfferStatus::Accepted {
            self.cascade_sold(&offer.property_id)
        } else {
            None
        };

        let notification_sent = self.dispatch_notification(&offer, old_status);

        Ok(TransitionOutcome {
            offer,
            property,
            notification_sent,
        })
    }

    /// Remove an offer unconditionally.
    pub fn delete(&self, offer_id: &OfferId) -> Result<(), OfferServiceError> {
        if self.offers.fetch(offer_id)?.is_none() {
            return Err(OfferServiceError::NotFound);
        }
        Ok(self.offers.delete(offer_id)?)
    }

    pub fn get(&self, offer_id: &OfferId) -> Result<Offer, OfferServiceError> {
        self.offers
            .fetch(offer_id)?
            .ok_or(OfferServiceError::NotFound)
    }

    pub fn all(&self) -> Result<Vec<Offer>, OfferServiceError> {
        Ok(self.offers.all()?)
    }

    fn property_lock(&self, property_id: &PropertyId) -> Arc<Mutex<()>> {
        let mut locks = self
            .transition_locks
            .lock()
            .expect("lock table mutex poisoned");
        locks
            .entry(property_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Best-effort consistency link from acceptance to availability. A
    /// missing property or store failure is logged, not fatal to the offer
    /// transition that already committed.
    fn cascade_sold(&self, property_id: &PropertyId) -> Option<Property> {
        match self.properties.fetch(property_id) {
            Ok(Some(mut property)) => {
                property.status = PropertyStatus::Sold;
                property.updated_at = Utc::now();
                match self.properties.update(property.clone()) {
                    Ok(()) => {
                        info!(%property_id, "property marked as SOLD");
                        Some(property)
                    }
                    Err(err) => {
                        warn!(%property_id, error = %err, "failed to persist SOLD cascade");
                        None
                    }
                }
            }
            Ok(None) => {
                warn!(%property_id, "accepted offer references a missing property");
                None
            }
            Err(err) => {
                warn!(%property_id, error = %err, "could not load property for SOLD cascade");
                None
            }
        }
    }

    /// Resolve the buyer's email (falling back to the configured default)
    /// and invoke the gateway. Returns the advisory sent flag.
    fn dispatch_notification(&self, offer: &Offer, old_status: OfferStatus) -> bool {
        let recipient = match self.buyers.fetch(&offer.buyer_id) {
            Ok(Some(buyer)) if !buyer.email.is_empty() => buyer.email,
            Ok(_) => {
                warn!(buyer_id = %offer.buyer_id, "buyer email unavailable, using fallback recipient");
                self.notifications.fallback_recipient.clone()
            }
            Err(err) => {
                warn!(buyer_id = %offer.buyer_id, error = %err, "buyer lookup failed, using fallback recipient");
                self.notifications.fallback_recipient.clone()
            }
        };

        let notification = OfferStatusNotification {
            offer_id: offer.id.clone(),
            property_id: offer.property_id.clone(),
            old_status,
            new_status: offer.status,
            recipient,
            seller_copy: self.notifications.seller_copy.clone(),
        };

        match self.gateway.notify(&notification) {
            Ok(()) => true,
            Err(err) => {
                warn!(offer_id = %offer.id, error = %err, "offer status notification failed");
                false
            }
        }
    }
}

/// Error raised by the offer lifecycle coordinator.
#[derive(Debug, thiserror::Error)]
pub enum OfferServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Offer not found")]
    NotFound,
    #[error("offer {offer} is already {from} and cannot move to {to}")]
    InvalidTransition {
        offer: OfferId,
        from: OfferStatus,
        to: OfferStatus,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
