use std::sync::Arc;

use anyhow::Result;
use nutriplan_llm::{OpenRouterClient, OpenRouterConfig};
use nutriplan_mealplan::{GenerationSettings, MealPlanGenerator};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::routes::AppState;

/// Build the application state from configuration.
pub fn app_state(config: &crate::config::Config) -> Result<AppState> {
    let client = OpenRouterClient::new(OpenRouterConfig {
        api_key: config.llm.api_key.to_owned(),
        base_url: config.llm.base_url.to_owned(),
        site_url: config.site.url.to_owned(),
        site_name: config.site.name.to_owned(),
        timeout: config.llm.timeout(),
    })?;

    let generator = MealPlanGenerator::new(
        Arc::new(client),
        GenerationSettings {
            model: config.llm.model.to_owned(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        },
    );

    Ok(AppState { generator })
}

pub async fn serve(
    config: crate::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting nutriplan server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    if !config.has_api_key() {
        tracing::warn!(
            "No completion service API key configured; meal plan requests will fail until OPENROUTER_API_KEY is set"
        );
    }

    let state = app_state(&config)?;

    tracing::info!(
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        "Completion service configured"
    );

    let app = crate::routes::router(state)
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    let shutdown_signal = async {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!("failed to install SIGTERM handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C signal");
            },
            _ = terminate => {
                tracing::info!("Received SIGTERM signal");
            },
        }

        tracing::info!("Starting graceful shutdown...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}
