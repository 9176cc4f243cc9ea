use std::sync::Arc;

use tracing::{Level, info};

use common::storage::s3::S3ObjectStore;
use common::vision::openai::OpenAiVision;

use server::config::AppConfig;
use server::state::AppState;
use server::utils::fetch;
use server::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    database::ensure_schema(&db).await?;

    let store = S3ObjectStore::new(&config.storage)?;
    let vision = OpenAiVision::new(config.vision.clone());
    let http = fetch::http_client()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        store: Arc::new(store),
        vision: Arc::new(vision),
        http,
        config,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
