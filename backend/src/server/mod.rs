//! Server construction and middleware wiring.

mod config;
mod shutdown;

pub use config::ServerConfig;
pub use shutdown::{run_until_shutdown, shutdown_signal};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use payments_api::Trace;
#[cfg(debug_assertions)]
use payments_api::doc::ApiDoc;
use payments_api::domain::{PaymentService, UserService};
use payments_api::inbound::http::configure;
use payments_api::inbound::http::health::HealthState;
use payments_api::inbound::http::state::{HttpState, HttpStatePorts};
use payments_api::outbound::persistence::{DieselPaymentRepository, DieselUserRepository};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_http_state(config: &ServerConfig) -> HttpState {
    let payments = PaymentService::new(Arc::new(DieselPaymentRepository::new(
        config.db_pool.clone(),
    )))
    .with_amount_policy(config.amount_policy)
    .with_conflict_retry(config.conflict_retry);
    let users = Arc::new(UserService::new(Arc::new(DieselUserRepository::new(
        config.db_pool.clone(),
    ))));

    HttpState::new(HttpStatePorts {
        payments: Arc::new(payments),
        users: users.clone(),
        users_command: users,
    })
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Actix's own signal handling is disabled; callers drive shutdown through
/// [`run_until_shutdown`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let shutdown_secs = config.shutdown_timeout.as_secs().max(1);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .disable_signals()
    .shutdown_timeout(shutdown_secs)
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
