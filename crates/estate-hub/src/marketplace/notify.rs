use serde::{Deserialize, Serialize};

use super::domain::{OfferId, OfferStatus, PropertyId};

/// Payload handed to the notification gateway whenever an offer changes
/// status. The buyer is the primary recipient; the seller address receives
/// a copy, matching the legacy email service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferStatusNotification {
    pub offer_id: OfferId,
    pub property_id: PropertyId,
    pub old_status: OfferStatus,
    pub new_status: OfferStatus,
    pub recipient: String,
    pub seller_copy: String,
}

/// Trait describing the outbound notification hook (e-mail or similar).
///
/// Implementations must bound their own latency by
/// [`NotificationConfig::timeout`](crate::config::NotificationConfig);
/// failures are advisory and never roll back an offer transition.
pub trait NotificationGateway: Send + Sync {
    fn notify(&self, notification: &OfferStatusNotification) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("notification timed out after {0} ms")]
    Timeout(u64),
}
