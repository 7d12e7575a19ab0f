use request_bot::create_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fallback_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&fallback_level)),
        )
        .init();

    let (state, app) = create_app().await?;
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "request-bot listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
