#[path = "../test_utils.rs"]
mod test_utils;

mod experience_test;
mod middleware_test;
mod promo_test;
