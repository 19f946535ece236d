use std::collections::HashSet;
use std::sync::Arc;

use super::common::*;
use crate::marketplace::domain::{Buyer, BuyerId, PropertyId, SellerId};
use crate::marketplace::filter::ListingCriteria;
use crate::marketplace::query::MarketplaceQueryService;
use crate::marketplace::store::{BuyerStore, PropertyStore};

#[test]
fn buyer_query_returns_only_their_offers() {
    let (api, stores, _) = build_marketplace();
    let other = Buyer {
        id: BuyerId("buyer-2".to_string()),
        email: "marc@buyers.example".to_string(),
        ..sample_buyer()
    };
    stores.buyers.insert(other).expect("second buyer");

    let mine = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 100.0))
        .expect("offer");
    api.offers
        .create(offer_draft("prop-geneva", "buyer-2", 200.0))
        .expect("other offer");

    let offers = api.queries.offers_for_buyer(&BuyerId("buyer-1".to_string()));
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].id, mine.id);
}

#[test]
fn seller_query_spans_every_owned_listing() {
    let (api, stores, _) = build_marketplace();
    stores
        .properties
        .insert(listed_property("prop-zurich", "Zurich", Some(900_000.0)))
        .expect("second listing");
    let mut foreign = listed_property("prop-bern", "Bern", Some(300_000.0));
    foreign.owner_id = SellerId("seller-2".to_string());
    stores.properties.insert(foreign).expect("foreign listing");

    let a = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 100.0))
        .expect("offer");
    let b = api
        .offers
        .create(offer_draft("prop-zurich", "buyer-1", 200.0))
        .expect("offer");
    api.offers
        .create(offer_draft("prop-bern", "buyer-1", 300.0))
        .expect("offer on foreign listing");

    let offers = api
        .queries
        .offers_for_seller_properties(&SellerId("seller-1".to_string()));
    let ids: HashSet<_> = offers.iter().map(|offer| offer.id.clone()).collect();
    assert_eq!(ids, HashSet::from([a.id, b.id]));
}

#[test]
fn seller_without_listings_gets_no_offers() {
    let (api, _, _) = build_marketplace();
    api.offers
        .create(offer_draft("prop-geneva", "buyer-1", 100.0))
        .expect("offer");

    let offers = api
        .queries
        .offers_for_seller_properties(&SellerId("seller-ghost".to_string()));
    assert!(offers.is_empty());
}

#[test]
fn property_query_filters_by_listing() {
    let (api, stores, _) = build_marketplace();
    stores
        .properties
        .insert(listed_property("prop-zurich", "Zurich", Some(900_000.0)))
        .expect("second listing");

    let wanted = api
        .offers
        .create(offer_draft("prop-geneva", "buyer-1", 100.0))
        .expect("offer");
    api.offers
        .create(offer_draft("prop-zurich", "buyer-1", 200.0))
        .expect("other offer");

    let offers = api
        .queries
        .offers_for_property(&PropertyId("prop-geneva".to_string()));
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].id, wanted.id);
}

#[test]
fn filtered_listings_run_through_the_listing_filter() {
    let (api, stores, _) = build_marketplace();
    stores
        .properties
        .insert(listed_property("prop-zurich", "Zurich", Some(900_000.0)))
        .expect("second listing");

    let listings = api.queries.filtered_listings(&ListingCriteria {
        min_price: Some(600_000.0),
        ..ListingCriteria::any()
    });

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id.0, "prop-zurich");
}

#[test]
fn store_failures_degrade_to_empty_results() {
    let queries = MarketplaceQueryService::new(
        Arc::new(UnavailableProperties),
        Arc::new(UnavailableOffers),
    );

    assert!(queries
        .offers_for_buyer(&BuyerId("buyer-1".to_string()))
        .is_empty());
    assert!(queries
        .offers_for_seller_properties(&SellerId("seller-1".to_string()))
        .is_empty());
    assert!(queries
        .filtered_listings(&ListingCriteria::any())
        .is_empty());
}
