//! In-memory reference implementation of the persistence ports.
//!
//! A single `RwLock` over all tables keeps every mutation atomic: the
//! booking-insert backstop (overlap and confirmation-code checks) runs
//! under the same write guard as the write itself, which is exactly the
//! exclusion-constraint discipline a database adapter must provide.
//! Record validation happens here, at the persistence boundary.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::apartment::{Apartment, ApartmentId};
use crate::domain::availability::check_availability;
use crate::domain::booking::{Booking, BookingId, BookingStatus, ConfirmationCode};
use crate::domain::guest::{EmailAddress, Guest, GuestId};
use crate::domain::ports::{
    ApartmentRepository, ApartmentRepositoryError, BookingRepository, BookingRepositoryError,
    GuestRepository, GuestRepositoryError, PricingRuleRepository, PricingRuleRepositoryError,
};
use crate::domain::pricing_rule::{PricingRule, PricingRuleId};

#[derive(Debug, Default)]
struct Tables {
    apartments: HashMap<ApartmentId, Apartment>,
    guests: HashMap<GuestId, Guest>,
    bookings: HashMap<BookingId, Booking>,
    rules: HashMap<PricingRuleId, PricingRule>,
}

/// In-memory store implementing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApartmentRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &ApartmentId,
    ) -> Result<Option<Apartment>, ApartmentRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.apartments.get(id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Apartment>, ApartmentRepositoryError> {
        let tables = self.tables.read().await;
        let mut active: Vec<Apartment> = tables
            .apartments
            .values()
            .filter(|apartment| apartment.status.is_bookable())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(active)
    }

    async fn insert(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        apartment
            .validate()
            .map_err(|err| ApartmentRepositoryError::query(err.to_string()))?;
        let mut tables = self.tables.write().await;
        if tables.apartments.contains_key(&apartment.id) {
            return Err(ApartmentRepositoryError::query(format!(
                "apartment {} already exists",
                apartment.id
            )));
        }
        tables.apartments.insert(apartment.id, apartment.clone());
        Ok(())
    }

    async fn update(&self, apartment: &Apartment) -> Result<(), ApartmentRepositoryError> {
        apartment
            .validate()
            .map_err(|err| ApartmentRepositoryError::query(err.to_string()))?;
        let mut tables = self.tables.write().await;
        if !tables.apartments.contains_key(&apartment.id) {
            return Err(ApartmentRepositoryError::query(format!(
                "apartment {} does not exist",
                apartment.id
            )));
        }
        tables.apartments.insert(apartment.id, apartment.clone());
        Ok(())
    }

    async fn delete(&self, id: &ApartmentId) -> Result<(), ApartmentRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.apartments.remove(id).is_none() {
            return Err(ApartmentRepositoryError::query(format!(
                "apartment {id} does not exist"
            )));
        }
        // Owned children cannot outlive the apartment.
        tables
            .bookings
            .retain(|_, booking| booking.apartment_id != *id);
        tables.rules.retain(|_, rule| rule.apartment_id != *id);
        Ok(())
    }
}

#[async_trait]
impl GuestRepository for InMemoryStore {
    async fn find_by_id(&self, id: &GuestId) -> Result<Option<Guest>, GuestRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.guests.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Guest>, GuestRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .guests
            .values()
            .find(|guest| guest.email == *email)
            .cloned())
    }

    async fn insert(&self, guest: &Guest) -> Result<(), GuestRepositoryError> {
        guest
            .validate()
            .map_err(|err| GuestRepositoryError::query(err.to_string()))?;
        let mut tables = self.tables.write().await;
        if tables.guests.contains_key(&guest.id) {
            return Err(GuestRepositoryError::query(format!(
                "guest {} already exists",
                guest.id
            )));
        }
        if tables.guests.values().any(|other| other.email == guest.email) {
            return Err(GuestRepositoryError::duplicate_email(guest.email.as_str()));
        }
        tables.guests.insert(guest.id, guest.clone());
        Ok(())
    }

    async fn update(&self, guest: &Guest) -> Result<(), GuestRepositoryError> {
        guest
            .validate()
            .map_err(|err| GuestRepositoryError::query(err.to_string()))?;
        let mut tables = self.tables.write().await;
        if !tables.guests.contains_key(&guest.id) {
            return Err(GuestRepositoryError::query(format!(
                "guest {} does not exist",
                guest.id
            )));
        }
        let email_taken = tables
            .guests
            .values()
            .any(|other| other.id != guest.id && other.email == guest.email);
        if email_taken {
            return Err(GuestRepositoryError::duplicate_email(guest.email.as_str()));
        }
        tables.guests.insert(guest.id, guest.clone());
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.get(id).cloned())
    }

    async fn find_by_confirmation_code(
        &self,
        code: &ConfirmationCode,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .values()
            .find(|booking| booking.confirmation_code == *code)
            .cloned())
    }

    async fn list_blocking_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .values()
            .filter(|booking| booking.apartment_id == *apartment_id)
            .filter(|booking| booking.status.blocks_availability())
            .cloned()
            .collect())
    }

    async fn list_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|booking| booking.apartment_id == *apartment_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.stay.start().cmp(&b.stay.start()).then(a.id.cmp(&b.id)));
        Ok(bookings)
    }

    async fn insert(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        booking
            .validate()
            .map_err(|err| BookingRepositoryError::query(err.to_string()))?;
        let mut tables = self.tables.write().await;
        if !tables.apartments.contains_key(&booking.apartment_id) {
            return Err(BookingRepositoryError::query(format!(
                "apartment {} does not exist",
                booking.apartment_id
            )));
        }
        if tables.bookings.contains_key(&booking.id) {
            return Err(BookingRepositoryError::query(format!(
                "booking {} already exists",
                booking.id
            )));
        }
        let code_taken = tables
            .bookings
            .values()
            .any(|other| other.confirmation_code == booking.confirmation_code);
        if code_taken {
            return Err(BookingRepositoryError::duplicate_confirmation_code(
                booking.confirmation_code.as_str(),
            ));
        }
        // Exclusion backstop: reject writes overlapping blocking bookings.
        let existing: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|other| other.apartment_id == booking.apartment_id)
            .cloned()
            .collect();
        let report = check_availability(booking.apartment_id, &booking.stay, &existing, None);
        if !report.is_available() {
            return Err(BookingRepositoryError::stay_overlap(report.conflicts));
        }
        tables.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<(), BookingRepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.bookings.get_mut(id) {
            Some(booking) => {
                booking.status = status;
                Ok(())
            }
            None => Err(BookingRepositoryError::not_found(id.to_string())),
        }
    }
}

#[async_trait]
impl PricingRuleRepository for InMemoryStore {
    async fn list_active_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<PricingRule>, PricingRuleRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rules
            .values()
            .filter(|rule| rule.apartment_id == *apartment_id && rule.active)
            .cloned()
            .collect())
    }

    async fn list_for_apartment(
        &self,
        apartment_id: &ApartmentId,
    ) -> Result<Vec<PricingRule>, PricingRuleRepositoryError> {
        let tables = self.tables.read().await;
        let mut rules: Vec<PricingRule> = tables
            .rules
            .values()
            .filter(|rule| rule.apartment_id == *apartment_id)
            .cloned()
            .collect();
        rules.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rules)
    }

    async fn insert(&self, rule: &PricingRule) -> Result<(), PricingRuleRepositoryError> {
        rule.validate()
            .map_err(|err| PricingRuleRepositoryError::query(err.to_string()))?;
        let mut tables = self.tables.write().await;
        if !tables.apartments.contains_key(&rule.apartment_id) {
            return Err(PricingRuleRepositoryError::query(format!(
                "apartment {} does not exist",
                rule.apartment_id
            )));
        }
        if tables.rules.contains_key(&rule.id) {
            return Err(PricingRuleRepositoryError::query(format!(
                "pricing rule {} already exists",
                rule.id
            )));
        }
        tables.rules.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn update(&self, rule: &PricingRule) -> Result<(), PricingRuleRepositoryError> {
        rule.validate()
            .map_err(|err| PricingRuleRepositoryError::query(err.to_string()))?;
        let mut tables = self.tables.write().await;
        if !tables.rules.contains_key(&rule.id) {
            return Err(PricingRuleRepositoryError::query(format!(
                "pricing rule {} does not exist",
                rule.id
            )));
        }
        tables.rules.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn delete(&self, id: &PricingRuleId) -> Result<(), PricingRuleRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.rules.remove(id).is_none() {
            return Err(PricingRuleRepositoryError::query(format!(
                "pricing rule {id} does not exist"
            )));
        }
        Ok(())
    }
}
