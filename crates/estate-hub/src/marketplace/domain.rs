use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for listed properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Identifier wrapper for purchase offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub String);

/// Identifier wrapper for buyer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuyerId(pub String);

/// Identifier wrapper for seller accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SellerId(pub String);

macro_rules! opaque_id {
    ($name:ident) => {
        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(PropertyId);
opaque_id!(OfferId);
opaque_id!(BuyerId);
opaque_id!(SellerId);

/// Property categories carried over from the legacy listing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Studio,
    Loft,
    Townhouse,
    Condo,
    Commercial,
    Office,
    Other,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::Apartment => "APARTMENT",
            PropertyType::House => "HOUSE",
            PropertyType::Villa => "VILLA",
            PropertyType::Studio => "STUDIO",
            PropertyType::Loft => "LOFT",
            PropertyType::Townhouse => "TOWNHOUSE",
            PropertyType::Condo => "CONDO",
            PropertyType::Commercial => "COMMERCIAL",
            PropertyType::Office => "OFFICE",
            PropertyType::Other => "OTHER",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value {
            "APARTMENT" => Some(PropertyType::Apartment),
            "HOUSE" => Some(PropertyType::House),
            "VILLA" => Some(PropertyType::Villa),
            "STUDIO" => Some(PropertyType::Studio),
            "LOFT" => Some(PropertyType::Loft),
            "TOWNHOUSE" => Some(PropertyType::Townhouse),
            "CONDO" => Some(PropertyType::Condo),
            "COMMERCIAL" => Some(PropertyType::Commercial),
            "OFFICE" => Some(PropertyType::Office),
            "OTHER" => Some(PropertyType::Other),
            _ => None,
        }
    }
}

/// Availability of a listed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    ForSale,
    Pending,
    Sold,
    OffMarket,
}

impl PropertyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyStatus::ForSale => "FOR_SALE",
            PropertyStatus::Pending => "PENDING",
            PropertyStatus::Sold => "SOLD",
            PropertyStatus::OffMarket => "OFF_MARKET",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value {
            "FOR_SALE" => Some(PropertyStatus::ForSale),
            "PENDING" => Some(PropertyStatus::Pending),
            "SOLD" => Some(PropertyStatus::Sold),
            "OFF_MARKET" => Some(PropertyStatus::OffMarket),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of a purchase offer.
///
/// `Pending` is the only state with outgoing transitions; the other three
/// are terminal and an offer never leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl OfferStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OfferStatus::Pending => "PENDING",
            OfferStatus::Accepted => "ACCEPTED",
            OfferStatus::Rejected => "REJECTED",
            OfferStatus::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(OfferStatus::Pending),
            "ACCEPTED" => Some(OfferStatus::Accepted),
            "REJECTED" => Some(OfferStatus::Rejected),
            "WITHDRAWN" => Some(OfferStatus::Withdrawn),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, OfferStatus::Pending)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Nested feature block of a listing. Bedrooms and bathrooms stay optional
/// because imported listings frequently omit them, and the listing filter
/// excludes records without the feature when a minimum is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyFeatures {
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub has_garage: bool,
    pub has_pool: bool,
    pub has_garden: bool,
}

/// A listed property. Serializes in the legacy wire shape (camelCase keys,
/// `propertyId`, nested `features`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "propertyId")]
    pub id: PropertyId,
    pub owner_id: SellerId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    #[serde(default)]
    pub features: PropertyFeatures,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A buyer's purchase offer on a property. `amount` is validated at
/// creation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "offerId")]
    pub id: OfferId,
    pub property_id: PropertyId,
    pub buyer_id: BuyerId,
    pub amount: f64,
    #[serde(default)]
    pub message: Option<String>,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

/// Buyer account. The password is stored for the out-of-scope login flow but
/// never serialized back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    #[serde(rename = "buyerId")]
    pub id: BuyerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub budget: f64,
}

/// Seller account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    #[serde(rename = "sellerId")]
    pub id: SellerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Incoming payload for offer creation. Everything is optional so malformed
/// requests surface as 400 validation errors rather than body rejections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferDraft {
    pub property_id: Option<String>,
    pub buyer_id: Option<String>,
    pub amount: Option<f64>,
    pub message: Option<String>,
}

/// Incoming payload for property creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDraft {
    pub owner_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub size: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub features: Option<PropertyFeatures>,
}

/// Partial update for a property; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub size: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub features: Option<PropertyFeatures>,
}

/// Incoming payload for buyer registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuyerDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub budget: Option<f64>,
}

/// Incoming payload for seller registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SellerDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request-level validation failures. All of these map to HTTP 400.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Budget must be positive")]
    NonPositiveBudget,
    #[error("Price must not be negative")]
    NegativePrice,
    #[error("Size must not be negative")]
    NegativeSize,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid status '{0}'. Use: PENDING, ACCEPTED, REJECTED, WITHDRAWN")]
    UnknownOfferStatus(String),
    #[error("Invalid property type '{0}'")]
    UnknownPropertyType(String),
    #[error("Invalid property status '{0}'")]
    UnknownPropertyStatus(String),
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),
    #[error("Unknown buyer '{0}'")]
    UnknownBuyer(String),
    #[error("Invalid owner ID '{0}'")]
    UnknownSeller(String),
}
