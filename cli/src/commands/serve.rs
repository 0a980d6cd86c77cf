use finguard_core::api::AppConfig;
use finguard_plugins::services::build_services;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::commands::cli::ServeArgs;
use crate::error::CliError;
use crate::http::{
    server::{start_server, ServerConfig},
    AppState,
};

/// CLI flags win over `[http_server]`.
pub fn server_config(args: &ServeArgs, cfg: &AppConfig) -> ServerConfig {
    ServerConfig {
        host: args
            .host
            .clone()
            .unwrap_or_else(|| cfg.http_server.host.clone()),
        port: args.port.unwrap_or(cfg.http_server.port),
    }
}

pub async fn handle_serve(args: ServeArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let session_id = args
        .session_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let config = server_config(&args, cfg);
    let services = build_services(cfg)?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = AppState::new(
        session_id,
        services.pipeline,
        services.backend.is_degraded(),
        shutdown_tx,
    );

    start_server(config, state)
        .await
        .map_err(|e| CliError::Command(e.to_string()))?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut cfg = AppConfig::default();
        cfg.http_server.port = 9000;
        let args = ServeArgs {
            host: Some("0.0.0.0".into()),
            port: None,
            session_id: None,
        };
        let sc = server_config(&args, &cfg);
        assert_eq!(sc.host, "0.0.0.0");
        assert_eq!(sc.port, 9000);
    }
}
