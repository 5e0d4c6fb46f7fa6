use std::future::Future;
use std::net::SocketAddr;

use clipnote_api_server::ApiService;
use shared::error::CommonError;
use tower_http::cors::CorsLayer;
use tracing::info;

pub struct StartAxumServerParams {
    pub host: String,
    pub port: u16,
    pub system_shutdown_signal_rx: tokio::sync::broadcast::Receiver<()>,
    pub api_service: ApiService,
}

/// Starts the Axum server
pub async fn start_axum_server(
    params: StartAxumServerParams,
) -> Result<
    (
        impl Future<Output = Result<(), std::io::Error>>,
        axum_server::Handle,
        SocketAddr,
    ),
    CommonError,
> {
    let mut system_shutdown_signal_rx = params.system_shutdown_signal_rx;
    let addr: SocketAddr = format!("{}:{}", params.host, params.port)
        .parse()
        .map_err(|e| CommonError::AddrParseError { source: e })?;

    info!("Starting server on {}", addr);

    let handle = axum_server::Handle::new();

    let api_router = clipnote_api_server::router::initiate_api_router(params.api_service)?;

    // CORS open to any origin, matching the gateway's public surface
    let router = api_router.layer(CorsLayer::permissive());

    info!("Router initiated");

    let server_fut = axum_server::bind(addr)
        .handle(handle.clone())
        .serve(router.into_make_service());

    let handle_clone = handle.clone();

    tokio::spawn(async move {
        let _ = system_shutdown_signal_rx.recv().await;

        info!("Shutting down axum server, waiting for in-flight requests to complete...");

        // Stops accepting new connections, waits for in-flight requests
        handle_clone.graceful_shutdown(Some(std::time::Duration::from_secs(30)));

        info!("Axum server shut down gracefully");
    });

    info!("Server bound");
    Ok((server_fut, handle, addr))
}
