//! Storage abstraction shared by the HTTP layer.
//!
//! [`PgStore`](crate::postgres::PgStore) is the production backend;
//! [`MemoryStore`](crate::memory::MemoryStore) keeps everything behind one
//! lock and backs local development and tests. Both enforce the same booking
//! rules: a slot is claimed atomically, so at most one confirmed booking can
//! exist per slot.

use async_trait::async_trait;
use bookit_core::{
    errors::{BookitError, BookitResult},
    models::{
        booking::{Booking, NewBooking},
        experience::{Experience, ExperienceSummary, ExperienceUpdate, NewExperience, NewSlot, Slot},
        promo::{NewPromo, Promo},
    },
};
use mockall::automock;
use uuid::Uuid;

#[automock]
#[async_trait]
pub trait Store: Send + Sync {
    /// Catalog listing without slots, optionally filtered by a search term.
    async fn list_experiences(&self, search: Option<String>) -> BookitResult<Vec<ExperienceSummary>>;

    async fn get_experience(&self, id: Uuid) -> BookitResult<Option<Experience>>;

    async fn create_experience(&self, experience: NewExperience) -> BookitResult<Experience>;

    async fn update_experience(
        &self,
        id: Uuid,
        update: ExperienceUpdate,
    ) -> BookitResult<Option<Experience>>;

    /// Deletes the experience and its slots. Bookings are left untouched.
    async fn delete_experience(&self, id: Uuid) -> BookitResult<bool>;

    async fn add_slots(&self, experience_id: Uuid, slots: Vec<NewSlot>) -> BookitResult<Experience>;

    async fn count_experiences(&self) -> BookitResult<i64>;

    /// All bookings, newest first.
    async fn list_bookings(&self) -> BookitResult<Vec<Booking>>;

    async fn get_booking(&self, id: Uuid) -> BookitResult<Option<Booking>>;

    /// Reserves the requested slot and records a confirmed booking.
    ///
    /// Fails with `NotFound` for an unknown experience or slot, `Conflict`
    /// when the slot is taken and `Validation` when the slot cannot seat
    /// the party. Nothing is written unless the booking is confirmed, except
    /// that a slot found to carry a stale confirmed booking stays claimed.
    async fn create_booking(&self, booking: NewBooking) -> BookitResult<Booking>;

    /// Marks a confirmed booking cancelled and releases its slot.
    async fn cancel_booking(&self, id: Uuid) -> BookitResult<Booking>;

    /// All promos ordered by code.
    async fn list_promos(&self) -> BookitResult<Vec<Promo>>;

    async fn find_active_promo(&self, code: String) -> BookitResult<Option<Promo>>;

    async fn create_promo(&self, promo: NewPromo) -> BookitResult<Promo>;
}

pub(crate) fn experience_not_found() -> BookitError {
    BookitError::NotFound("Experience not found".to_string())
}

pub(crate) fn slot_not_found() -> BookitError {
    BookitError::NotFound("Slot not found".to_string())
}

pub(crate) fn slot_unavailable() -> BookitError {
    BookitError::Conflict("Slot is not available".to_string())
}

pub(crate) fn slot_already_booked() -> BookitError {
    BookitError::Conflict("Slot already booked".to_string())
}

pub(crate) fn slot_exists(date: &str, time: &str) -> BookitError {
    BookitError::Conflict(format!("Slot {date} {time} already exists"))
}

pub(crate) fn over_capacity(slot: &Slot, guests: i32) -> BookitError {
    BookitError::Validation(format!(
        "Slot {} {} seats at most {} guests, {} requested",
        slot.date, slot.time, slot.max_participants, guests
    ))
}

pub(crate) fn booking_not_found() -> BookitError {
    BookitError::NotFound("Booking not found".to_string())
}

pub(crate) fn booking_already_cancelled() -> BookitError {
    BookitError::Conflict("Booking is already cancelled".to_string())
}

pub(crate) fn promo_exists(code: &str) -> BookitError {
    BookitError::Conflict(format!("Promo code {code} already exists"))
}
