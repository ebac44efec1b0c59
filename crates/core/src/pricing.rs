//! Checkout pricing.
//!
//! All amounts are integer currency units. The subtotal is `price × guests`;
//! a promo discount is always clamped to `[0, subtotal]` so the total can never
//! go negative.

use serde::{Deserialize, Serialize};

use crate::models::promo::{DiscountType, Promo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

/// Discount a promo grants on `subtotal`.
///
/// Percentage promos take `floor(subtotal × rate / 100)`; flat promos take
/// `min(value, subtotal)`.
pub fn discount_for(promo: &Promo, subtotal: i64) -> i64 {
    if subtotal <= 0 {
        return 0;
    }

    let discount = match promo.discount_type {
        DiscountType::Percentage => {
            let scaled = i128::from(subtotal) * i128::from(promo.discount_value);
            i64::try_from(scaled.div_euclid(100)).unwrap_or(i64::MAX)
        }
        DiscountType::Flat => promo.discount_value.min(subtotal),
    };

    discount.clamp(0, subtotal)
}

pub fn quote(price: i64, guests: i32, promo: Option<&Promo>) -> Quote {
    let subtotal = price.saturating_mul(i64::from(guests.max(0)));
    let discount = promo.map_or(0, |promo| discount_for(promo, subtotal));

    Quote {
        subtotal,
        discount,
        total: subtotal - discount,
    }
}
