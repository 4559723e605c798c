//! HTTP route configuration.

pub mod health;
pub mod realtime;
pub mod rooms;

use actix_web::web;

/// Routes that live outside the /api scopes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
}
