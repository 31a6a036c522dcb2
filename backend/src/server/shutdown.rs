//! Graceful shutdown driven by an explicit future and a deadline.
//!
//! Once the shutdown future resolves the liveness probe flips to 503, the
//! listener stops accepting connections and in-flight requests get until the
//! deadline to finish. Requests still running after that are abandoned.

use std::future::Future;
use std::time::Duration;

use actix_web::dev::Server;
use actix_web::web;
use tracing::{info, warn};

use payments_api::inbound::http::health::HealthState;

/// Failure while running or stopping the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("in-flight requests still running after {grace:?}")]
    DeadlineExceeded { grace: Duration },
    #[error("http server failed: {0}")]
    Server(#[from] std::io::Error),
}

/// Run `server` until `shutdown` resolves, then drain within `grace`.
///
/// Returns early with the server's own result if it stops by itself.
///
/// # Errors
/// [`ShutdownError::DeadlineExceeded`] when draining outlives `grace`;
/// [`ShutdownError::Server`] when the server fails.
pub async fn run_until_shutdown<F>(
    server: Server,
    health_state: web::Data<HealthState>,
    shutdown: F,
    grace: Duration,
) -> Result<(), ShutdownError>
where
    F: Future<Output = ()>,
{
    let handle = server.handle();
    let mut server = std::pin::pin!(server);

    tokio::select! {
        result = &mut server => return result.map_err(ShutdownError::from),
        () = shutdown => {}
    }

    info!(grace_ms = grace.as_millis(), "shutdown requested; draining connections");
    health_state.mark_unhealthy();

    let drain = async {
        handle.stop(true).await;
        server.await
    };
    match tokio::time::timeout(grace, drain).await {
        Ok(result) => {
            info!("server stopped");
            result.map_err(ShutdownError::from)
        }
        Err(_elapsed) => {
            warn!(grace_ms = grace.as_millis(), "shutdown deadline exceeded");
            Err(ShutdownError::DeadlineExceeded { grace })
        }
    }
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use actix_web::{App, HttpResponse, HttpServer};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::sync::{Notify, oneshot};

    use super::*;

    fn slow_server(started: Arc<Notify>) -> (Server, SocketAddr) {
        let http = HttpServer::new(move || {
            let started = Arc::clone(&started);
            App::new().route(
                "/slow",
                web::get().to(move || {
                    let started = Arc::clone(&started);
                    async move {
                        started.notify_one();
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        HttpResponse::Ok().finish()
                    }
                }),
            )
        })
        .workers(1)
        .disable_signals()
        .shutdown_timeout(60)
        .bind(("127.0.0.1", 0))
        .expect("bind ephemeral port");
        let addr = *http.addrs().first().expect("bound address");
        (http.run(), addr)
    }

    #[actix_web::test]
    async fn idle_server_stops_within_deadline() {
        let (server, _addr) = slow_server(Arc::new(Notify::new()));
        let health = web::Data::new(HealthState::new());
        health.mark_ready();

        let result = run_until_shutdown(
            server,
            health.clone(),
            std::future::ready(()),
            Duration::from_secs(5),
        )
        .await;

        assert!(result.is_ok(), "unexpected shutdown error: {result:?}");
        assert!(!health.is_alive());
    }

    #[actix_web::test]
    async fn in_flight_request_past_deadline_is_an_error() {
        let started = Arc::new(Notify::new());
        let (server, addr) = slow_server(Arc::clone(&started));
        let health = web::Data::new(HealthState::new());
        let (trigger, triggered) = oneshot::channel::<()>();

        let mut stream = TcpStream::connect(addr).await.expect("connect");
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .expect("send request");

        let waiter = Arc::clone(&started);
        actix_web::rt::spawn(async move {
            waiter.notified().await;
            trigger.send(()).expect("shutdown receiver alive");
        });

        let result = run_until_shutdown(
            server,
            health.clone(),
            async {
                triggered.await.ok();
            },
            Duration::from_millis(200),
        )
        .await;

        assert!(matches!(
            result,
            Err(ShutdownError::DeadlineExceeded { .. })
        ));
        assert!(!health.is_alive());
    }
}
