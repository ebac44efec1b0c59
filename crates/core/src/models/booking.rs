use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MAX_CODE_LENGTH, MAX_TEXT_LENGTH, bounded, promo::normalize_code};
use crate::pricing::Quote;
use crate::errors::{BookitError, BookitResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(BookitError::Validation(format!(
                "Unknown booking status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub experience_id: Uuid,
    pub experience_title: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub selected_date: String,
    pub selected_time: String,
    pub number_of_guests: i32,
    pub promo_code: Option<String>,
    pub discount: i64,
    pub total_amount: i64,
    pub booking_status: BookingStatus,
    pub booking_date: DateTime<Utc>,
}

impl Booking {
    pub fn is_confirmed_for(&self, experience_id: Uuid, date: &str, time: &str) -> bool {
        self.booking_status == BookingStatus::Confirmed
            && self.experience_id == experience_id
            && self.selected_date == date
            && self.selected_time == time
    }
}

/// Checkout payload. Every field defaults so that missing fields surface as
/// a single validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingRequest {
    pub experience_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub selected_date: String,
    pub selected_time: String,
    pub number_of_guests: Option<i32>,
    pub promo_code: Option<String>,
}

/// A validated booking request, ready to be reserved against a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub experience_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub selected_date: String,
    pub selected_time: String,
    pub number_of_guests: i32,
    pub promo_code: Option<String>,
}

impl CreateBookingRequest {
    pub fn validate(&self) -> BookitResult<NewBooking> {
        let fields = [
            &self.experience_id,
            &self.user_name,
            &self.user_email,
            &self.user_phone,
            &self.selected_date,
            &self.selected_time,
        ];
        if fields.iter().any(|f| f.trim().is_empty()) || self.number_of_guests.is_none() {
            return Err(BookitError::Validation(
                "Missing required fields".to_string(),
            ));
        }

        let experience_id = Uuid::parse_str(self.experience_id.trim()).map_err(|_| {
            BookitError::Validation(format!("Invalid experience id '{}'", self.experience_id))
        })?;

        let number_of_guests = self.number_of_guests.unwrap_or_default();
        if number_of_guests < 1 {
            return Err(BookitError::Validation(
                "numberOfGuests must be at least 1".to_string(),
            ));
        }

        let user_email = self.user_email.trim().to_string();
        if !user_email.contains('@') {
            return Err(BookitError::Validation(format!(
                "Invalid email address '{user_email}'"
            )));
        }

        let promo_code = self
            .promo_code
            .as_deref()
            .map(normalize_code)
            .filter(|code| !code.is_empty());

        Ok(NewBooking {
            experience_id,
            user_name: bounded(self.user_name.trim().to_string(), "userName", MAX_TEXT_LENGTH)?,
            user_email: bounded(user_email, "userEmail", MAX_TEXT_LENGTH)?,
            user_phone: bounded(self.user_phone.trim().to_string(), "userPhone", MAX_CODE_LENGTH)?,
            selected_date: self.selected_date.trim().to_string(),
            selected_time: self.selected_time.trim().to_string(),
            number_of_guests,
            promo_code,
        })
    }
}

impl NewBooking {
    /// Turns the request into a confirmed booking priced by `quote`.
    ///
    /// `promo_code` is only kept when a promo actually applied.
    pub fn confirm(self, experience_title: &str, quote: Quote, promo_applied: bool) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            experience_id: self.experience_id,
            experience_title: experience_title.to_string(),
            user_name: self.user_name,
            user_email: self.user_email,
            user_phone: self.user_phone,
            selected_date: self.selected_date,
            selected_time: self.selected_time,
            number_of_guests: self.number_of_guests,
            promo_code: self.promo_code.filter(|_| promo_applied),
            discount: quote.discount,
            total_amount: quote.total,
            booking_status: BookingStatus::Confirmed,
            booking_date: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking_id: Uuid,
    pub message: String,
    pub booking: Booking,
}

impl From<Booking> for CreateBookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            success: true,
            booking_id: booking.id,
            message: "Booking confirmed successfully".to_string(),
            booking,
        }
    }
}
