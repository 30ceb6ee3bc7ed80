//! Tests for the booking workflows, driving the service through mocked
//! ports.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use mockall::Sequence;

use money::Money;

use super::*;
use crate::domain::apartment::ApartmentStatus;
use crate::domain::booking::ConfirmationCode;
use crate::domain::error::ErrorCode;
use crate::domain::ports::{
    MockApartmentRepository, MockBookingRepository, MockConfirmationCodes, MockGuestRepository,
    MockPricingRuleRepository,
};
use crate::domain::pricing_rule::{PricingRule, PricingRuleId};

type TestService = BookingService<
    MockApartmentRepository,
    MockBookingRepository,
    MockGuestRepository,
    MockPricingRuleRepository,
    MockConfirmationCodes,
>;

fn service(
    apartments: MockApartmentRepository,
    bookings: MockBookingRepository,
    guests: MockGuestRepository,
    rules: MockPricingRuleRepository,
    codes: MockConfirmationCodes,
) -> TestService {
    BookingService::new(
        Arc::new(apartments),
        Arc::new(bookings),
        Arc::new(guests),
        Arc::new(rules),
        Arc::new(codes),
        BookingPolicy::default(),
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn stay(start: NaiveDate, end: NaiveDate) -> StayRange {
    StayRange::new(start, end).expect("valid range")
}

fn sample_apartment() -> Apartment {
    Apartment {
        id: ApartmentId::random(),
        name: "Spacious 2BR with Balcony".to_owned(),
        description: "Two-bedroom apartment overlooking the park.".to_owned(),
        max_guests: 4,
        base_price_per_night: Money::from_minor(8_000),
        photos: Vec::new(),
        amenities: BTreeMap::new(),
        status: ApartmentStatus::Active,
        created_at: Utc::now(),
    }
}

fn summer_rule(apartment: &Apartment) -> PricingRule {
    PricingRule {
        id: PricingRuleId::random(),
        apartment_id: apartment.id,
        name: "Summer High Season".to_owned(),
        start_date: date(2025, 6, 1),
        end_date: date(2025, 9, 15),
        price_per_night: Money::from_minor(12_000),
        min_stay_nights: Some(3),
        priority: 10,
        active: true,
        created_at: Utc::now(),
    }
}

fn sample_guest() -> Guest {
    Guest {
        id: GuestId::random(),
        first_name: "Jane".to_owned(),
        last_name: "Smith".to_owned(),
        email: crate::domain::guest::EmailAddress::new("jane.smith@example.com")
            .expect("valid email"),
        phone: "+9876543210".to_owned(),
        notes: None,
        created_at: Utc::now(),
    }
}

fn existing_booking(apartment: &Apartment, range: StayRange) -> Booking {
    Booking {
        id: BookingId::random(),
        apartment_id: apartment.id,
        guest_id: GuestId::random(),
        confirmation_code: ConfirmationCode::new("EXIST001").expect("valid code"),
        stay: range,
        guest_count: 2,
        total_price: Money::from_minor(24_000),
        status: BookingStatus::Confirmed,
        notes: None,
        created_at: Utc::now(),
    }
}

fn apartments_returning(apartment: &Apartment) -> MockApartmentRepository {
    let found = apartment.clone();
    let mut apartments = MockApartmentRepository::new();
    apartments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    apartments
}

fn codes_returning(code: &str) -> MockConfirmationCodes {
    let minted = ConfirmationCode::new(code).expect("valid code");
    let mut codes = MockConfirmationCodes::new();
    codes
        .expect_generate()
        .returning(move || Ok(minted.clone()));
    codes
}

fn request_for(apartment: &Apartment, guest: &Guest, range: StayRange) -> NewBookingRequest {
    NewBookingRequest {
        apartment_id: apartment.id,
        stay: range,
        guest_count: 2,
        guest: GuestSelector::Existing(guest.id),
        notes: None,
    }
}

#[tokio::test]
async fn create_persists_pending_booking_at_quoted_total() {
    let apartment = sample_apartment();
    let guest = sample_guest();
    let rule = summer_rule(&apartment);

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    bookings
        .expect_insert()
        .times(1)
        .withf(|booking: &Booking| {
            booking.status == BookingStatus::Pending
                && booking.total_price == Money::from_minor(36_000)
                && booking.confirmation_code.as_str() == "BK7XQ2MN"
        })
        .returning(|_| Ok(()));

    let mut guests = MockGuestRepository::new();
    let found = guest.clone();
    guests
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(move |_| Ok(vec![rule.clone()]));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        guests,
        rules,
        codes_returning("BK7XQ2MN"),
    );
    let created = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 6, 10), date(2025, 6, 13)),
        ))
        .await
        .expect("booking succeeds");

    assert_eq!(created.booking.total_price.to_string(), "360.00");
    assert_eq!(created.quote.nights.len(), 3);
    assert_eq!(created.guest.id, guest.id);
}

#[tokio::test]
async fn create_rejects_guest_counts_over_capacity() {
    let apartment = sample_apartment();
    let guest = sample_guest();

    let svc = service(
        apartments_returning(&apartment),
        MockBookingRepository::new(),
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let mut request = request_for(&apartment, &guest, stay(date(2025, 6, 10), date(2025, 6, 13)));
    request.guest_count = 5;

    let error = svc.create_booking(request).await.expect_err("over capacity");
    assert_eq!(
        error,
        Error::CapacityExceeded {
            max_guests: 4,
            requested: 5,
        },
    );
}

#[tokio::test]
async fn create_rejects_zero_guests_before_touching_storage() {
    let apartment = sample_apartment();
    let guest = sample_guest();

    let svc = service(
        MockApartmentRepository::new(),
        MockBookingRepository::new(),
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let mut request = request_for(&apartment, &guest, stay(date(2025, 6, 10), date(2025, 6, 13)));
    request.guest_count = 0;

    let error = svc.create_booking(request).await.expect_err("zero guests");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn create_surfaces_every_conflicting_booking() {
    let apartment = sample_apartment();
    let guest = sample_guest();
    let blocking = existing_booking(&apartment, stay(date(2025, 6, 11), date(2025, 6, 14)));
    let blocking_id = blocking.id;

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .returning(move |_| Ok(vec![blocking.clone()]));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let error = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 6, 10), date(2025, 6, 13)),
        ))
        .await
        .expect_err("dates unavailable");

    match error {
        Error::DateConflict { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].id, blocking_id);
        }
        other => panic!("expected DateConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn create_enforces_minimum_stay_from_the_first_night() {
    let apartment = sample_apartment();
    let guest = sample_guest();
    let rule = summer_rule(&apartment);

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .returning(|_| Ok(Vec::new()));
    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(move |_| Ok(vec![rule.clone()]));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        MockGuestRepository::new(),
        rules,
        MockConfirmationCodes::new(),
    );
    let error = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 6, 10), date(2025, 6, 12)),
        ))
        .await
        .expect_err("minimum stay enforced");

    assert_eq!(
        error,
        Error::MinimumStayViolation {
            required_nights: 3,
            requested_nights: 2,
        },
    );
}

#[tokio::test]
async fn create_registers_a_new_guest_on_first_booking() {
    let apartment = sample_apartment();
    let draft = GuestDraft {
        first_name: "John".to_owned(),
        last_name: "Doe".to_owned(),
        email: crate::domain::guest::EmailAddress::new("john.doe@example.com")
            .expect("valid email"),
        phone: "+1234567890".to_owned(),
        notes: None,
    };

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .returning(|_| Ok(Vec::new()));
    bookings.expect_insert().times(1).returning(|_| Ok(()));

    let mut guests = MockGuestRepository::new();
    guests.expect_find_by_email().returning(|_| Ok(None));
    guests.expect_insert().times(1).returning(|_| Ok(()));

    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(|_| Ok(Vec::new()));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        guests,
        rules,
        codes_returning("BK7XQ2MN"),
    );
    let created = svc
        .create_booking(NewBookingRequest {
            apartment_id: apartment.id,
            stay: stay(date(2025, 3, 1), date(2025, 3, 4)),
            guest_count: 2,
            guest: GuestSelector::New(draft),
            notes: None,
        })
        .await
        .expect("booking succeeds");

    assert_eq!(created.guest.email.as_str(), "john.doe@example.com");
    // three nights at the 80.00 base price
    assert_eq!(created.booking.total_price, Money::from_minor(24_000));
}

#[tokio::test]
async fn create_reuses_the_guest_matched_by_email() {
    let apartment = sample_apartment();
    let guest = sample_guest();
    let draft = GuestDraft {
        first_name: guest.first_name.clone(),
        last_name: guest.last_name.clone(),
        email: guest.email.clone(),
        phone: guest.phone.clone(),
        notes: None,
    };

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .returning(|_| Ok(Vec::new()));
    bookings.expect_insert().returning(|_| Ok(()));

    let mut guests = MockGuestRepository::new();
    let found = guest.clone();
    guests
        .expect_find_by_email()
        .returning(move |_| Ok(Some(found.clone())));

    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(|_| Ok(Vec::new()));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        guests,
        rules,
        codes_returning("BK7XQ2MN"),
    );
    let created = svc
        .create_booking(NewBookingRequest {
            apartment_id: apartment.id,
            stay: stay(date(2025, 3, 1), date(2025, 3, 3)),
            guest_count: 1,
            guest: GuestSelector::New(draft),
            notes: None,
        })
        .await
        .expect("booking succeeds");

    assert_eq!(created.guest.id, guest.id);
}

#[tokio::test]
async fn create_rejects_unknown_guest_ids() {
    let apartment = sample_apartment();
    let guest = sample_guest();

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .returning(|_| Ok(Vec::new()));
    let mut guests = MockGuestRepository::new();
    guests.expect_find_by_id().returning(|_| Ok(None));
    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(|_| Ok(Vec::new()));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        guests,
        rules,
        codes_returning("BK7XQ2MN"),
    );
    let error = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 3, 1), date(2025, 3, 3)),
        ))
        .await
        .expect_err("unknown guest");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn create_rejects_inactive_apartments() {
    let mut apartment = sample_apartment();
    apartment.status = ApartmentStatus::Inactive;
    let guest = sample_guest();

    let svc = service(
        apartments_returning(&apartment),
        MockBookingRepository::new(),
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let error = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 6, 10), date(2025, 6, 13)),
        ))
        .await
        .expect_err("inactive apartment");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn losing_the_commit_race_retries_once_then_reports_the_conflict() {
    let apartment = sample_apartment();
    let guest = sample_guest();
    let winner = existing_booking(&apartment, stay(date(2025, 6, 10), date(2025, 6, 13)));
    let winner_ref = crate::domain::booking::BookingRef::from(&winner);

    let mut seq = Sequence::new();
    let mut bookings = MockBookingRepository::new();
    // First attempt sees no conflict, then loses at insert time.
    bookings
        .expect_list_blocking_for_apartment()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Vec::new()));
    let overlap = winner_ref.clone();
    bookings
        .expect_insert()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| {
            Err(BookingRepositoryError::stay_overlap(vec![overlap.clone()]))
        });
    // The retry re-checks availability and now sees the winning booking.
    let committed = winner.clone();
    bookings
        .expect_list_blocking_for_apartment()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(vec![committed.clone()]));

    let mut guests = MockGuestRepository::new();
    let found = guest.clone();
    guests
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(|_| Ok(Vec::new()));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        guests,
        rules,
        codes_returning("BK7XQ2MN"),
    );
    let error = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 6, 10), date(2025, 6, 13)),
        ))
        .await
        .expect_err("lost the race");

    match error {
        Error::DateConflict { conflicts } => assert_eq!(conflicts, vec![winner_ref]),
        other => panic!("expected DateConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_confirmation_codes_retry_with_a_fresh_code() {
    let apartment = sample_apartment();
    let guest = sample_guest();

    let mut seq = Sequence::new();
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .times(2)
        .returning(|_| Ok(Vec::new()));
    bookings
        .expect_insert()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            Err(BookingRepositoryError::duplicate_confirmation_code(
                "BK7XQ2MN",
            ))
        });
    bookings
        .expect_insert()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let mut guests = MockGuestRepository::new();
    let found = guest.clone();
    guests
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(|_| Ok(Vec::new()));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        guests,
        rules,
        codes_returning("BK7XQ2MN"),
    );
    let created = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 3, 1), date(2025, 3, 3)),
        ))
        .await
        .expect("retry succeeds");

    assert_eq!(created.booking.status, BookingStatus::Pending);
}

#[tokio::test]
async fn storage_failures_propagate_without_retry() {
    let apartment = sample_apartment();
    let guest = sample_guest();

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .times(1)
        .returning(|_| Err(BookingRepositoryError::connection("refused")));

    let svc = service(
        apartments_returning(&apartment),
        bookings,
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let error = svc
        .create_booking(request_for(
            &apartment,
            &guest,
            stay(date(2025, 3, 1), date(2025, 3, 3)),
        ))
        .await
        .expect_err("storage down");

    assert_eq!(error.code(), ErrorCode::Storage);
}

#[tokio::test]
async fn quote_is_served_without_booking_anything() {
    let apartment = sample_apartment();
    let rule = summer_rule(&apartment);

    let mut rules = MockPricingRuleRepository::new();
    rules
        .expect_list_active_for_apartment()
        .returning(move |_| Ok(vec![rule.clone()]));

    let svc = service(
        apartments_returning(&apartment),
        MockBookingRepository::new(),
        MockGuestRepository::new(),
        rules,
        MockConfirmationCodes::new(),
    );
    let quote = svc
        .quote(&apartment.id, &stay(date(2025, 6, 10), date(2025, 6, 13)))
        .await
        .expect("quote succeeds");

    assert_eq!(quote.total, Money::from_minor(36_000));
}

#[tokio::test]
async fn availability_excludes_the_booking_being_edited() {
    let apartment = sample_apartment();
    let booking = existing_booking(&apartment, stay(date(2025, 6, 1), date(2025, 6, 5)));
    let booking_id = booking.id;

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list_blocking_for_apartment()
        .returning(move |_| Ok(vec![booking.clone()]));

    let svc = service(
        MockApartmentRepository::new(),
        bookings,
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let report = svc
        .availability(
            &apartment.id,
            &stay(date(2025, 6, 2), date(2025, 6, 6)),
            Some(booking_id),
        )
        .await
        .expect("availability succeeds");

    assert!(report.is_available());
}

#[tokio::test]
async fn pending_bookings_can_be_confirmed() {
    let apartment = sample_apartment();
    let mut booking = existing_booking(&apartment, stay(date(2025, 6, 1), date(2025, 6, 5)));
    booking.status = BookingStatus::Pending;
    let booking_id = booking.id;

    let mut bookings = MockBookingRepository::new();
    let found = booking.clone();
    bookings
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    bookings
        .expect_update_status()
        .times(1)
        .withf(move |id, status| *id == booking_id && *status == BookingStatus::Confirmed)
        .returning(|_, _| Ok(()));

    let svc = service(
        MockApartmentRepository::new(),
        bookings,
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let confirmed = svc
        .confirm_booking(&booking_id)
        .await
        .expect("confirmation succeeds");
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn terminal_bookings_reject_further_transitions() {
    let apartment = sample_apartment();
    let mut booking = existing_booking(&apartment, stay(date(2025, 6, 1), date(2025, 6, 5)));
    booking.status = BookingStatus::Completed;
    let booking_id = booking.id;

    let mut bookings = MockBookingRepository::new();
    let found = booking.clone();
    bookings
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let svc = service(
        MockApartmentRepository::new(),
        bookings,
        MockGuestRepository::new(),
        MockPricingRuleRepository::new(),
        MockConfirmationCodes::new(),
    );
    let error = svc
        .cancel_booking(&booking_id)
        .await
        .expect_err("completed stays cannot be cancelled");
    assert_eq!(error.code(), ErrorCode::Conflict);
}
