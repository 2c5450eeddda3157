use pagebridge::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "pagebridge=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Unknown fault: log it and stop rather than keep serving in a bad state.
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "uncaught panic, exiting");
        std::process::exit(1);
    }));

    let config = AppConfig::from_env()?;
    let app_state = AppState::init(config.clone()).await?;

    let router = app::build_app(app_state);
    app::serve(router, &config).await
}
