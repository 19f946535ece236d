use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use estate_hub::marketplace::{
    Buyer, BuyerId, BuyerStore, NotificationError, NotificationGateway, Offer, OfferId,
    OfferStatusNotification, OfferStore, Property, PropertyId, PropertyStore, Seller, SellerId,
    SellerStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

macro_rules! in_memory_store {
    ($store:ident, $trait:ident, $record:ty, $id:ty) => {
        #[derive(Default, Clone)]
        pub(crate) struct $store {
            records: Arc<Mutex<HashMap<$id, $record>>>,
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
                let mut guard = self.records.lock().expect("store mutex poisoned");
                if guard.contains_key(&record.id) {
                    guard.insert(record.id.clone(), record);
                    Ok(())
                } else {
                    Err(StoreError::NotFound)
                }
            }

            fn fetch(&self, id: &$id) -> Result<Option<$record>, StoreError> {
                let guard = self.records.lock().expect("store mutex poisoned");
                Ok(guard.get(id).cloned())
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
                let guard = self.records.lock().expect("store mutex poisoned");
                Ok(guard.values().cloned().collect())
            }
        }
    };
}

in_memory_store!(InMemoryProperties, PropertyStore, Property, PropertyId);
in_memory_store!(InMemoryOffers, OfferStore, Offer, OfferId);
in_memory_store!(InMemoryBuyers, BuyerStore, Buyer, BuyerId);
in_memory_store!(InMemorySellers, SellerStore, Seller, SellerId);

/// Stand-in for the outbound e-mail transport: records the notification and
/// emits a structured log line. Swapped for a real SMTP gateway in
/// deployments that send mail.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotificationGateway {
    events: Arc<Mutex<Vec<OfferStatusNotification>>>,
}

impl LoggingNotificationGateway {
    pub(crate) fn events(&self) -> Vec<OfferStatusNotification> {
        self.events.lock().expect("gateway mutex poisoned").clone()
    }
}

impl NotificationGateway for LoggingNotificationGateway {
    fn notify(&self, notification: &OfferStatusNotification) -> Result<(), NotificationError> {
        info!(
            offer_id = %notification.offer_id,
            recipient = %notification.recipient,
            old = %notification.old_status,
            new = %notification.new_status,
            "offer status notification dispatched"
        );
        self.events
            .lock()
            .expect("gateway mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}
