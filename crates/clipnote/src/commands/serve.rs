use std::env;

use clap::Args;
use clipnote_api_server::{ApiService, repository::setup_repository};
use shared::error::CommonError;
use tracing::{error, info};
use url::Url;

use crate::server::{StartAxumServerParams, start_axum_server};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Args)]
pub struct ServeParams {
    /// Host to bind, defaults to the HOST env var
    #[arg(long)]
    pub host: Option<String>,
    /// Port to bind, defaults to the PORT env var
    #[arg(long)]
    pub port: Option<u16>,
}

fn resolve_port(params_port: Option<u16>) -> Result<u16, CommonError> {
    if let Some(port) = params_port {
        return Ok(port);
    }
    match env::var("PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|e| CommonError::InvalidRequest {
                msg: format!("invalid PORT value: {value}"),
                source: Some(e.into()),
            }),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

pub async fn cmd_serve(params: ServeParams) -> Result<(), CommonError> {
    let host = params
        .host
        .unwrap_or_else(|| env::var("HOST").unwrap_or(DEFAULT_HOST.to_string()));
    let port = resolve_port(params.port)?;

    let store_url = Url::parse(env::var("STORE_URL")?.as_str())?;
    let auth_token = env::var("STORE_AUTH_TOKEN").ok();

    let (_db, _conn, repository) = setup_repository(&store_url, &auth_token).await?;
    let api_service = ApiService::new(repository);

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel::<()>(1);

    let (server_fut, _handle, addr) = start_axum_server(StartAxumServerParams {
        host,
        port,
        system_shutdown_signal_rx: shutdown_rx,
        api_service,
    })
    .await?;

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
            return;
        }
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    info!("clipnote listening on {addr}");

    server_fut.await?;
    Ok(())
}

#[cfg(test)]
mod unit_test {
    use super::*;

    #[test]
    fn test_resolve_port_prefers_cli_arg() {
        assert_eq!(resolve_port(Some(8080)).unwrap(), 8080);
    }

    #[test]
    fn test_resolve_port_defaults_without_env() {
        // PORT is not set in the test environment
        if env::var("PORT").is_err() {
            assert_eq!(resolve_port(None).unwrap(), DEFAULT_PORT);
        }
    }
}
