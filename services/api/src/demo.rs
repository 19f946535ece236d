use crate::infra::{
    InMemoryBuyers, InMemoryOffers, InMemoryProperties, InMemorySellers,
    LoggingNotificationGateway,
};
use clap::Args;
use estate_hub::config::NotificationConfig;
use estate_hub::error::AppError;
use estate_hub::marketplace::{
    BuyerDraft, ListingCriteria, MarketplaceApi, MarketplaceStores, PropertyDraft, SellerDraft,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Location for the demo listing
    #[arg(long, default_value = "Geneva")]
    pub(crate) location: String,
    /// Asking price for the demo listing
    #[arg(long, default_value_t = 450_000.0)]
    pub(crate) price: f64,
    /// Offer amount; defaults to 95% of the asking price
    #[arg(long)]
    pub(crate) amount: Option<f64>,
    /// Target status applied to the offer (PENDING, ACCEPTED, REJECTED, WITHDRAWN)
    #[arg(long, default_value = "ACCEPTED")]
    pub(crate) decision: String,
    /// Stop after listing creation; skip the offer walkthrough
    #[arg(long)]
    pub(crate) skip_offer: bool,
}

/// Console walkthrough of the marketplace: register accounts, list a
/// property, browse it through the filter, then run one offer through the
/// state machine.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let gateway = Arc::new(LoggingNotificationGateway::default());
    let api = MarketplaceApi::new(
        MarketplaceStores {
            properties: Arc::new(InMemoryProperties::default()),
            offers: Arc::new(InMemoryOffers::default()),
            buyers: Arc::new(InMemoryBuyers::default()),
            sellers: Arc::new(InMemorySellers::default()),
        },
        gateway.clone(),
        NotificationConfig::default(),
    );

    println!("RealEstateHub offer lifecycle demo");

    let seller = match api.accounts.register_seller(SellerDraft {
        first_name: Some("Nadia".to_string()),
        last_name: Some("Keller".to_string()),
        email: Some("nadia@sellers.example".to_string()),
        username: Some("nadia".to_string()),
        password: Some("demo".to_string()),
    }) {
        Ok(seller) => seller,
        Err(err) => {
            println!("  Seller registration rejected: {err}");
            return Ok(());
        }
    };
    println!("- Registered seller {} ({})", seller.id, seller.email);

    let buyer = match api.accounts.register_buyer(BuyerDraft {
        first_name: Some("Lena".to_string()),
        last_name: Some("Moser".to_string()),
        email: Some("lena@buyers.example".to_string()),
        username: Some("lena".to_string()),
        password: Some("demo".to_string()),
        budget: Some(args.price * 1.2),
    }) {
        Ok(buyer) => buyer,
        Err(err) => {
            println!("  Buyer registration rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Registered buyer {} with budget {:.0}",
        buyer.id, buyer.budget
    );

    let property = match api.catalog.create(PropertyDraft {
        owner_id: Some(seller.id.0.clone()),
        title: Some(format!("Bright flat in {}", args.location)),
        description: Some("Demo listing".to_string()),
        location: Some(args.location.clone()),
        price: Some(args.price),
        size: Some(95.0),
        ..PropertyDraft::default()
    }) {
        Ok(property) => property,
        Err(err) => {
            println!("  Listing rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Listed property {} in {} at {:.0} ({})",
        property.id,
        args.location,
        args.price,
        property.status.label()
    );

    let listings = api.queries.filtered_listings(&ListingCriteria {
        location: Some(args.location.clone()),
        sort_by: Some("price".to_string()),
        ..ListingCriteria::any()
    });
    println!("- Filter for '{}' returns {} listing(s)", args.location, listings.len());

    if args.skip_offer {
        return Ok(());
    }

    let amount = args.amount.unwrap_or(args.price * 0.95);
    let offer = match api.offers.create(estate_hub::marketplace::OfferDraft {
        property_id: Some(property.id.0.clone()),
        buyer_id: Some(buyer.id.0.clone()),
        amount: Some(amount),
        message: Some("Ready to close quickly".to_string()),
    }) {
        Ok(offer) => offer,
        Err(err) => {
            println!("  Offer rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Submitted offer {} at {:.0} ({})",
        offer.id,
        amount,
        offer.status.label()
    );

    let outcome = match api.offers.transition(&offer.id, &args.decision) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Transition refused: {err}");
            return Ok(());
        }
    };
    println!(
        "- Offer moved to {} | notification sent: {}",
        outcome.offer.status.label(),
        outcome.notification_sent
    );
    if let Some(listing) = &outcome.property {
        println!("- Listing is now {}", listing.status.label());
    }

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => println!("  Transition payload:\n{json}"),
        Err(err) => println!("  Transition payload unavailable: {err}"),
    }

    let events = gateway.events();
    if events.is_empty() {
        println!("  Notifications: none dispatched");
    } else {
        println!("  Notifications:");
        for event in events {
            println!(
                "    - {} -> {} ({} to {})",
                event.offer_id, event.recipient, event.old_status, event.new_status
            );
        }
    }

    Ok(())
}
