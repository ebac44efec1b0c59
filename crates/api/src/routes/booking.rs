use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers::booking};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/bookings",
            get(booking::list_bookings).post(booking::create_booking),
        )
        .route("/bookings/:id", get(booking::get_booking))
        .route("/bookings/:id/cancel", post(booking::cancel_booking))
}
