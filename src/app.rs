use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/toggle/:index", post(handlers::toggle_form))
        .route("/api/grid", get(handlers::get_grid))
        .route("/api/toggle", post(handlers::toggle))
        .with_state(state)
}
