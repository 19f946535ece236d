use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::config::NotificationConfig;
use crate::marketplace::store::PropertyStore;
use crate::marketplace::{marketplace_router, MarketplaceApi, MarketplaceStores};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn offer_creation_route_returns_created() {
    let (api, _, _) = build_marketplace();
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "POST",
            "/offers",
            json!({"propertyId": "prop-geneva", "buyerId": "buyer-1", "amount": 430000.0}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload.get("offerId").is_some());
    assert_eq!(payload.get("status"), Some(&json!("PENDING")));
}

#[tokio::test]
async fn offer_creation_route_rejects_missing_amount() {
    let (api, _, _) = build_marketplace();
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "POST",
            "/offers",
            json!({"propertyId": "prop-geneva", "buyerId": "buyer-1"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("error"), Some(&json!("amount is required")));
}

#[tokio::test]
async fn status_route_reports_sent_notification_and_cascade() {
    let (api, _, _) = build_marketplace();
    let offer = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 430_000.0))
        .expect("offer created");
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/offers/{}/status", offer.id),
            json!({"status": "ACCEPTED"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["offer"]["status"], json!("ACCEPTED"));
    assert_eq!(payload["emailNotificationSent"], json!(true));
    assert_eq!(
        payload["message"],
        json!("Offer status updated and email notification sent")
    );
    assert_eq!(payload["property"]["status"], json!("SOLD"));
}

#[tokio::test]
async fn status_route_reports_failed_notification() {
    let stores = seeded_stores();
    let api = api_with_gateway(&stores, Arc::new(FailingGateway));
    let offer = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 430_000.0))
        .expect("offer created");
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/offers/{}/status", offer.id),
            json!({"status": "REJECTED"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["emailNotificationSent"], json!(false));
    assert_eq!(
        payload["message"],
        json!("Offer status updated but email notification failed")
    );
}

#[tokio::test]
async fn status_route_requires_the_status_field() {
    let (api, _, _) = build_marketplace();
    let offer = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 430_000.0))
        .expect("offer created");
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/offers/{}/status", offer.id),
            json!({}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("error"), Some(&json!("status is required")));
}

#[tokio::test]
async fn status_route_rejects_unknown_labels() {
    let (api, _, _) = build_marketplace();
    let offer = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 430_000.0))
        .expect("offer created");
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/offers/{}/status", offer.id),
            json!({"status": "APPROVED"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("error"),
        Some(&json!(
            "Invalid status 'APPROVED'. Use: PENDING, ACCEPTED, REJECTED, WITHDRAWN"
        ))
    );
}

#[tokio::test]
async fn status_route_returns_conflict_for_terminal_offers() {
    let (api, _, _) = build_marketplace();
    let offer = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 430_000.0))
        .expect("offer created");
    api.offers
        .transition(&offer.id, "WITHDRAWN")
        .expect("first transition");
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/offers/{}/status", offer.id),
            json!({"status": "ACCEPTED"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_offer_returns_not_found() {
    let (api, _, _) = build_marketplace();
    let router = marketplace_router(api);

    let response = router
        .oneshot(bare_request("GET", "/offers/offer-ghost"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("error"), Some(&json!("Offer not found")));
}

#[tokio::test]
async fn offer_deletion_returns_confirmation_message() {
    let (api, _, _) = build_marketplace();
    let offer = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 430_000.0))
        .expect("offer created");
    let router = marketplace_router(api);

    let response = router
        .oneshot(bare_request("DELETE", &format!("/offers/{}", offer.id)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("message"),
        Some(&json!("Offer deleted successfully"))
    );
}

#[tokio::test]
async fn filter_route_applies_listing_criteria() {
    let (api, stores, _) = build_marketplace();
    stores
        .properties
        .insert(listed_property("prop-zurich", "Zurich", Some(900_000.0)))
        .expect("second listing");
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "POST",
            "/properties/filter",
            json!({"minPrice": 600000.0, "sortBy": "price"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let listings = payload.as_array().expect("array response");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["propertyId"], json!("prop-zurich"));
}

#[tokio::test]
async fn search_route_matches_location_substrings() {
    let (api, _, _) = build_marketplace();
    let router = marketplace_router(api);

    let response = router
        .oneshot(bare_request("GET", "/properties/search?location=gen"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().expect("array response").len(), 1);
}

#[tokio::test]
async fn unavailable_store_maps_to_internal_error() {
    let stores = seeded_stores();
    let api = Arc::new(MarketplaceApi::new(
        MarketplaceStores {
            properties: stores.properties.clone(),
            offers: Arc::new(UnavailableOffers),
            buyers: stores.buyers.clone(),
            sellers: stores.sellers.clone(),
        },
        Arc::new(RecordingGateway::default()),
        NotificationConfig::default(),
    ));
    let router = marketplace_router(api);

    let response = router
        .oneshot(bare_request("GET", "/offers"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn buyer_registration_never_echoes_the_password() {
    let (api, _, _) = build_marketplace();
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request(
            "POST",
            "/buyers",
            json!({
                "firstName": "Marc",
                "email": "marc@buyers.example",
                "password": "secret",
                "budget": 500000.0
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload.get("buyerId").is_some());
    assert!(payload.get("password").is_none());
}

#[tokio::test]
async fn budget_route_requires_the_budget_field() {
    let (api, _, _) = build_marketplace();
    let router = marketplace_router(api);

    let response = router
        .oneshot(json_request("PUT", "/buyers/buyer-1/budget", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("error"), Some(&json!("budget is required")));
}
