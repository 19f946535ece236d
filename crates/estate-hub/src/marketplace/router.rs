use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::NotificationConfig;

use super::accounts::{AccountDirectory, AccountError};
use super::domain::{
    BuyerDraft, BuyerId, Offer, OfferDraft, OfferId, Property, PropertyDraft, PropertyId,
    PropertyPatch, SellerDraft, SellerId, ValidationError,
};
use super::filter::ListingCriteria;
use super::notify::NotificationGateway;
use super::offers::{OfferLifecycleService, OfferServiceError};
use super::properties::{CatalogError, PropertyCatalogService};
use super::query::MarketplaceQueryService;
use super::store::{BuyerStore, OfferStore, PropertyStore, SellerStore, StoreError};

/// The composed marketplace services behind the HTTP surface. One instance
/// is built at process start from the injected stores and gateway; no
/// ambient singletons.
pub struct MarketplaceApi<P, O, B, S, N> {
    pub offers: OfferLifecycleService<P, O, B, N>,
    pub catalog: PropertyCatalogService<P, S, O>,
    pub queries: MarketplaceQueryService<P, O>,
    pub accounts: AccountDirectory<B, S, P, O>,
}

/// Store handles shared by every service.
pub struct MarketplaceStores<P, O, B, S> {
    pub properties: Arc<P>,
    pub offers: Arc<O>,
    pub buyers: Arc<B>,
    pub sellers: Arc<S>,
}

impl<P, O, B, S, N> MarketplaceApi<P, O, B, S, N>
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    pub fn new(
        stores: MarketplaceStores<P, O, B, S>,
        gateway: Arc<N>,
        notifications: NotificationConfig,
    ) -> Self {
        let MarketplaceStores {
            properties,
            offers,
            buyers,
            sellers,
        } = stores;

        Self {
            offers: OfferLifecycleService::new(
                properties.clone(),
                offers.clone(),
                buyers.clone(),
                gateway,
                notifications,
            ),
            catalog: PropertyCatalogService::new(
                properties.clone(),
                sellers.clone(),
                offers.clone(),
            ),
            queries: MarketplaceQueryService::new(properties.clone(), offers.clone()),
            accounts: AccountDirectory::new(buyers, sellers, properties, offers),
        }
    }
}

/// Router builder exposing the marketplace REST surface.
pub fn marketplace_router<P, O, B, S, N>(api: Arc<MarketplaceApi<P, O, B, S, N>>) -> Router
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    Router::new()
        .route(
            "/offers",
            post(create_offer_handler::<P, O, B, S, N>).get(list_offers_handler::<P, O, B, S, N>),
        )
        .route(
            "/offers/:id",
            get(get_offer_handler::<P, O, B, S, N>).delete(delete_offer_handler::<P, O, B, S, N>),
        )
        .route(
            "/offers/:id/status",
            put(update_offer_status_handler::<P, O, B, S, N>),
        )
        .route(
            "/offers/property/:property_id",
            get(offers_for_property_handler::<P, O, B, S, N>),
        )
        .route(
            "/offers/buyer/:buyer_id",
            get(offers_for_buyer_handler::<P, O, B, S, N>),
        )
        .route(
            "/offers/seller/:seller_id",
            get(offers_for_seller_handler::<P, O, B, S, N>),
        )
        .route(
            "/properties",
            post(create_property_handler::<P, O, B, S, N>)
                .get(list_properties_handler::<P, O, B, S, N>),
        )
        .route(
            "/properties/search",
            get(search_properties_handler::<P, O, B, S, N>),
        )
        .route(
            "/properties/filter",
            post(filter_properties_handler::<P, O, B, S, N>),
        )
        .route(
            "/properties/:id",
            get(get_property_handler::<P, O, B, S, N>)
                .put(update_property_handler::<P, O, B, S, N>)
                .delete(delete_property_handler::<P, O, B, S, N>),
        )
        .route("/buyers", post(register_buyer_handler::<P, O, B, S, N>))
        .route(
            "/buyers/:id",
            get(get_buyer_handler::<P, O, B, S, N>).delete(delete_buyer_handler::<P, O, B, S, N>),
        )
        .route(
            "/buyers/:id/budget",
            put(update_budget_handler::<P, O, B, S, N>),
        )
        .route("/sellers", post(register_seller_handler::<P, O, B, S, N>))
        .route(
            "/sellers/:id",
            get(get_seller_handler::<P, O, B, S, N>).delete(delete_seller_handler::<P, O, B, S, N>),
        )
        .with_state(api)
}

/// Body of `PUT /offers/{id}/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// Body of `PUT /buyers/{id}/budget`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetUpdateRequest {
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LocationQuery {
    pub(crate) location: Option<String>,
}

/// Wire shape of a successful status transition: the updated offer, the
/// advisory notification flag, and a human-readable summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransitionResponse {
    offer: Offer,
    #[serde(skip_serializing_if = "Option::is_none")]
    property: Option<Property>,
    email_notification_sent: bool,
    message: &'static str,
}

pub(crate) async fn create_offer_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    axum::Json(draft): axum::Json<OfferDraft>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.offers.create(draft) {
        Ok(offer) => (StatusCode::CREATED, axum::Json(offer)).into_response(),
        Err(err) => offer_error_response(err),
    }
}

pub(crate) async fn list_offers_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.offers.all() {
        Ok(offers) => (StatusCode::OK, axum::Json(offers)).into_response(),
        Err(err) => offer_error_response(err),
    }
}

pub(crate) async fn get_offer_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.offers.get(&OfferId(id)) {
        Ok(offer) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Err(err) => offer_error_response(err),
    }
}

pub(crate) async fn update_offer_status_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    let Some(status) = request.status else {
        return validation_response(&ValidationError::MissingField("status"));
    };

    match api.offers.transition(&OfferId(id), &status) {
        Ok(outcome) => {
            let message = if outcome.notification_sent {
                "Offer status updated and email notification sent"
            } else {
                "Offer status updated but email notification failed"
            };
            let body = TransitionResponse {
                offer: outcome.offer,
                property: outcome.property,
                email_notification_sent: outcome.notification_sent,
                message,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => offer_error_response(err),
    }
}

pub(crate) async fn delete_offer_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.offers.delete(&OfferId(id)) {
        Ok(()) => message_response("Offer deleted successfully"),
        Err(err) => offer_error_response(err),
    }
}

pub(crate) async fn offers_for_property_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(property_id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    let offers = api.queries.offers_for_property(&PropertyId(property_id));
    (StatusCode::OK, axum::Json(offers)).into_response()
}

pub(crate) async fn offers_for_buyer_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(buyer_id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    let offers = api.queries.offers_for_buyer(&BuyerId(buyer_id));
    (StatusCode::OK, axum::Json(offers)).into_response()
}

pub(crate) async fn offers_for_seller_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(seller_id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    let offers = api
        .queries
        .offers_for_seller_properties(&SellerId(seller_id));
    (StatusCode::OK, axum::Json(offers)).into_response()
}

pub(crate) async fn create_property_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    axum::Json(draft): axum::Json<PropertyDraft>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.catalog.create(draft) {
        Ok(property) => (StatusCode::CREATED, axum::Json(property)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn list_properties_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.catalog.all() {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn get_property_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.catalog.get(&PropertyId(id)) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn update_property_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
    axum::Json(patch): axum::Json<PropertyPatch>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.catalog.update(&PropertyId(id), patch) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn delete_property_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.catalog.delete(&PropertyId(id)) {
        Ok(()) => message_response("Property deleted successfully"),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn search_properties_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Query(query): Query<LocationQuery>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.catalog.search_by_location(query.location.as_deref()) {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn filter_properties_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    axum::Json(criteria): axum::Json<ListingCriteria>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    let listings = api.queries.filtered_listings(&criteria);
    (StatusCode::OK, axum::Json(listings)).into_response()
}

pub(crate) async fn register_buyer_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    axum::Json(draft): axum::Json<BuyerDraft>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.accounts.register_buyer(draft) {
        Ok(buyer) => (StatusCode::CREATED, axum::Json(buyer)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn get_buyer_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.accounts.buyer(&BuyerId(id)) {
        Ok(buyer) => (StatusCode::OK, axum::Json(buyer)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn update_budget_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<BudgetUpdateRequest>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    let Some(budget) = request.budget else {
        return validation_response(&ValidationError::MissingField("budget"));
    };
    match api.accounts.update_budget(&BuyerId(id), budget) {
        Ok(buyer) => (StatusCode::OK, axum::Json(buyer)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn delete_buyer_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.accounts.remove_buyer(&BuyerId(id)) {
        Ok(()) => message_response("Buyer deleted successfully"),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn register_seller_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    axum::Json(draft): axum::Json<SellerDraft>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.accounts.register_seller(draft) {
        Ok(seller) => (StatusCode::CREATED, axum::Json(seller)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn get_seller_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.accounts.seller(&SellerId(id)) {
        Ok(seller) => (StatusCode::OK, axum::Json(seller)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn delete_seller_handler<P, O, B, S, N>(
    State(api): State<Arc<MarketplaceApi<P, O, B, S, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: PropertyStore + 'static,
    O: OfferStore + 'static,
    B: BuyerStore + 'static,
    S: SellerStore + 'static,
    N: NotificationGateway + 'static,
{
    match api.accounts.remove_seller(&SellerId(id)) {
        Ok(()) => message_response("Seller deleted successfully"),
        Err(err) => account_error_response(err),
    }
}

fn message_response(message: &'static str) -> Response {
    (StatusCode::OK, axum::Json(json!({ "message": message }))).into_response()
}

fn validation_response(err: &ValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

fn store_error_response(err: StoreError) -> Response {
    let status = match err {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Conflict => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}

fn offer_error_response(err: OfferServiceError) -> Response {
    match err {
        OfferServiceError::Validation(err) => validation_response(&err),
        OfferServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "Offer not found" })),
        )
            .into_response(),
        OfferServiceError::InvalidTransition { .. } => (
            StatusCode::CONFLICT,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        OfferServiceError::Store(err) => store_error_response(err),
    }
}

fn catalog_error_response(err: CatalogError) -> Response {
    match err {
        CatalogError::Validation(err) => validation_response(&err),
        CatalogError::NotFound => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "Property not found" })),
        )
            .into_response(),
        CatalogError::Store(err) => store_error_response(err),
    }
}

fn account_error_response(err: AccountError) -> Response {
    match err {
        AccountError::Validation(err) => validation_response(&err),
        AccountError::BuyerNotFound => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "Buyer not found" })),
        )
            .into_response(),
        AccountError::SellerNotFound => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "Seller not found" })),
        )
            .into_response(),
        AccountError::Store(err) => store_error_response(err),
    }
}
