use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers::experience};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/experiences",
            get(experience::list_experiences).post(experience::create_experience),
        )
        .route(
            "/experiences/:id",
            get(experience::get_experience)
                .put(experience::update_experience)
                .delete(experience::delete_experience),
        )
        .route("/experiences/:id/slots", post(experience::add_slots))
}
