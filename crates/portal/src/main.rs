//! Countersign Signing Portal
//!
//! Serves the public `/contracts/{token}/sign` page and its JSON endpoints,
//! backed by the onboarding backend's REST API.

use std::{process, time::Duration};

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use countersign_app::{config::ApiConfig, context::AppContext, logging};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod contracts;
mod extensions;
mod healthcheck;
mod request;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

fn router(state: std::sync::Arc<State>) -> Router {
    Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(state))
        .hoop(request::request_logging)
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(contracts::router())
}

/// Countersign portal entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("failed to initialize logging: {init_error}");
        }

        process::exit(1);
    }

    let addr = config.socket_addr();
    let slow_request_threshold = Duration::from_millis(config.server.slow_request_threshold_ms);

    let app = match AppContext::from_api_config(ApiConfig::from(config.api)) {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = router(State::shared(app, slow_request_threshold));

    let doc = OpenApi::new("Countersign Portal", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;
}
