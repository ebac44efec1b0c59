use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers::promo};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/promo", get(promo::list_promos).post(promo::create_promo))
        .route("/promo/validate", post(promo::validate_promo))
}
