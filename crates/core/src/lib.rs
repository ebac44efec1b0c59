//! # Bookit Core
//!
//! Domain types shared by the storage and HTTP layers: experiences and their
//! slots, bookings, promo codes, the pricing rules applied at checkout and the
//! common error type.

pub mod errors;
pub mod models;
pub mod pricing;
