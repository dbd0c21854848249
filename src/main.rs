use axum::Router;
use loopwalk::config::Config;
use loopwalk::services::loop_generator::LoopRouteGenerator;
use loopwalk::services::mapbox::{AuthMode, MapboxClient, RoutingProvider};
use loopwalk::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loopwalk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting loop route server");
    tracing::info!(
        policy = config.loop_generator.tolerance_policy.as_str(),
        max_attempts = config.loop_generator.max_attempts,
        winding_factor = config.loop_generator.winding_factor,
        "Configuration loaded successfully"
    );

    let routing: Arc<dyn RoutingProvider> = if let Some(ref base_url) = config.mapbox_base_url {
        tracing::info!("Using directions proxy at {}", base_url);
        Arc::new(MapboxClient::with_config(
            config.mapbox_api_key.clone(),
            base_url.clone(),
            AuthMode::BearerHeader,
        ))
    } else {
        Arc::new(MapboxClient::new(config.mapbox_api_key.clone()))
    };

    let state = Arc::new(AppState {
        loop_generator: LoopRouteGenerator::new(routing, config.loop_generator.clone()),
    });

    // Build router with CORS and tracing
    let mut app = Router::new().nest("/api/v1", loopwalk::routes::create_router(state));

    if let Some(ref dir) = config.static_dir {
        tracing::info!("Serving static files from {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }

    let app = app
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
