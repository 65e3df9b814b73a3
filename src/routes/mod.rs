use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod contact;
pub mod doc;
pub mod health;
pub mod hotels;
pub mod params;
pub mod reservations;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/hotels", hotels::router())
        .nest("/reservations", reservations::router())
        .nest("/contact", contact::router())
        .nest("/admin", admin::router())
}
