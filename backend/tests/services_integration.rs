//! Service-layer flows against the in-memory repository.

mod support;

use rust_decimal::Decimal;
use support::*;
use tour_booking::availability::DateSelector;
use tour_booking::db::services::{
    favorite_packages, list_bookings, load_availability, sign_in, store_booking,
    toggle_favorite, AvailabilityLoad,
};
use tour_booking::db::{get_package, list_packages, PackageRepository};
use tour_booking::inclusions::{normalize_inclusions, InclusionEntry};
use tour_booking::models::{
    BookingStatus, ContactDetails, InstallmentOption, PaymentMethod, TourPackage,
};
use tour_booking::services::{build_intent, Checkout, PackageQuery, PackageSort};
use tour_booking::session::{SessionContext, SessionRegistry};

#[tokio::test]
async fn test_availability_states_per_package() {
    let repo = seeded_repository();

    let bromo = load_availability(&repo, BROMO).await.unwrap().into_set();
    assert_eq!(bromo.len(), 2);
    assert!(!bromo.all_fully_booked());

    let komodo = load_availability(&repo, KOMODO).await.unwrap().into_set();
    assert!(komodo.all_fully_booked());

    assert_eq!(
        load_availability(&repo, TOBA).await.unwrap(),
        AvailabilityLoad::NoDates
    );
}

#[tokio::test]
async fn test_refetch_clears_selection() {
    let repo = seeded_repository();
    let set = load_availability(&repo, BROMO).await.unwrap().into_set();
    let mut selector = DateSelector::new(set);
    selector.select_day(d(2025, 9, 10));
    assert!(selector.selection().is_selected());

    let refetched = load_availability(&repo, BROMO).await.unwrap().into_set();
    selector.replace_availability(refetched);
    assert!(!selector.selection().is_selected());
}

#[tokio::test]
async fn test_catalog_query_over_repository() {
    let repo = seeded_repository();
    let all = list_packages(&repo).await.unwrap();

    let query = PackageQuery {
        sort: PackageSort::PriceLowToHigh,
        ..Default::default()
    };
    let titles: Vec<_> = query.apply(&all).into_iter().map(|p| p.title).collect();
    assert_eq!(titles, ["Lake Toba Retreat", "Bromo Sunrise", "Komodo Sailing"]);

    let query = PackageQuery {
        search: Some("java".into()),
        ..Default::default()
    };
    assert_eq!(query.apply(&all).len(), 1);
}

#[tokio::test]
async fn test_package_inclusions_normalise() {
    let repo = seeded_repository();
    let bromo: TourPackage = get_package(&repo, BROMO).await.unwrap();
    let entries = normalize_inclusions(&bromo.inclusions);
    assert_eq!(
        entries,
        vec![
            InclusionEntry::item("Hotel"),
            InclusionEntry::item_with_detail("Jeep", "4x4 with driver"),
        ]
    );
}

#[tokio::test]
async fn test_sign_in_favorite_and_book() {
    let repo = seeded_repository();
    let registry = SessionRegistry::default();
    let context = SessionContext::new();

    let session = sign_in(&repo, &registry, TRAVELLER_EMAIL).await.unwrap();
    context.sign_in(session);
    let session = context.require().unwrap();

    assert!(toggle_favorite(&repo, &session, KOMODO).await.unwrap());
    assert_eq!(favorite_packages(&repo, &session).await.unwrap()[0].id, KOMODO);

    let package = repo.get_package(BROMO).await.unwrap();
    let mut selector =
        DateSelector::new(load_availability(&repo, BROMO).await.unwrap().into_set());
    selector.select_day(d(2025, 9, 12));
    let intent = build_intent(&package, &selector, 3).unwrap();
    assert_eq!(intent.subtotal, Decimal::from(450));

    let mut checkout = Checkout::new(intent);
    checkout
        .submit_contact(ContactDetails {
            full_name: "Ayu Lestari".into(),
            email: TRAVELLER_EMAIL.into(),
            phone: "+62 812 3456 789".into(),
        })
        .unwrap();
    checkout
        .choose_payment_method(PaymentMethod::CreditCard)
        .unwrap();
    checkout
        .choose_installments(InstallmentOption::Monthly { months: 6 })
        .unwrap();
    let record = checkout.confirm(session.user_id()).unwrap();
    assert_eq!(record.amount_per_installment, Decimal::from(75));

    let stored = store_booking(&repo, &record).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    assert!(stored.id.is_some());

    // Resubmitting the same checkout does not create a second booking.
    let again = store_booking(&repo, &record).await.unwrap();
    assert_eq!(again.id, stored.id);
    assert_eq!(list_bookings(&repo, &session).await.unwrap().len(), 1);

    context.sign_out();
    assert!(context.require().is_err());
}

#[tokio::test]
async fn test_source_failure_is_retryable() {
    let repo = seeded_repository();
    repo.set_healthy(false);
    let err = load_availability(&repo, BROMO).await.unwrap_err();
    assert!(err.is_retryable());
}
