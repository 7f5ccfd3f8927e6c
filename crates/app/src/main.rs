mod events;
mod problem;
mod router;
mod telemetry;

use std::{net::SocketAddr, sync::Arc};

use cookit_core::RecipeState;
use cookit_util::{load_env_file, AppConfig};
use tracing::info;

use crate::events::RatingHub;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let recipes = Arc::new(RecipeState::new());
    let ratings = RatingHub::new(config.rating_events_capacity);
    info!(
        stage = "app",
        recipes = recipes.catalog().len(),
        "catalog loaded"
    );

    let state = router::AppState::new(metrics, recipes, ratings, config.sse_heartbeat_secs);

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .await
        .map_err(|err| err.into())
}
