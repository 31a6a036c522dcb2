//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod json;
pub mod payments;
pub mod schemas;
pub mod state;
pub mod users;

pub use error::ApiResult;

/// Register the API routes and the JSON extractor configuration.
///
/// Shared state (`HttpState`, `HealthState`) is expected as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use payments_api::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json::json_config())
        .service(users::list_users)
        .service(users::create_user)
        .service(payments::create_payment)
        .service(health::ready)
        .service(health::live);
}
