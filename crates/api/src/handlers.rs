pub mod booking;
pub mod experience;
pub mod promo;
