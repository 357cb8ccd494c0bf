use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safety_core::events::{AlertSimulator, EventBus, FeedEvent, FeedSimulator, NEW_ALERT};
use safety_core::{SafetyApi, SafetyService};

mod assistant;
mod assistant_routes;
mod config;
mod routes;

use assistant::AssistantClient;
use assistant_routes::AssistantState;
use config::GatewayConfig;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "safety_gateway=debug,safety_core=info,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;

    let service = Arc::new(SafetyService::with_seed_data());
    let api = SafetyApi::new(service.clone()).with_latency(config.latency);
    tracing::info!("   Facade latency: {:?}", api.latency());

    if config.simulation {
        let feed = Arc::new(EventBus::<FeedEvent>::new());
        feed.subscribe(NEW_ALERT, |event: &FeedEvent| {
            tracing::info!(location = %event.location, "Live feed: {}", event.message);
        });

        AlertSimulator::new(service.clone(), config.sim_seed).spawn(AlertSimulator::PERIOD);
        FeedSimulator::new(feed, config.sim_seed).spawn(FeedSimulator::PERIOD);
    } else {
        tracing::info!("   Event simulation disabled");
    }

    let assistant = AssistantClient::new(config.assistant.clone())?;
    match assistant.provider() {
        Some(provider) => tracing::info!("   Assistant provider: {}", provider.name()),
        None => tracing::warn!("   No AI API key set - assistant will use fallback replies"),
    }

    let api_routes = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", routes::safety_routes(AppState { api }))
        .nest(
            "/api",
            assistant_routes::assistant_routes(AssistantState {
                client: Arc::new(assistant),
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!("Tourist safety gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_routes).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "safety-gateway",
        "time": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
