use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use widget_layout::AppState;
use widget_layout::catalog;
use widget_layout::config::AppConfig;
use widget_layout::router::build_router;
use widget_layout::template_db::TemplateDb;
use widget_layout::template_service::TemplateService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = &config.logging.level;
            EnvFilter::new(format!("widget_layout={level},tower_http={level}"))
        }))
        .init();

    let base_templates = catalog::load_base_templates(&config.catalogs.base_templates_source()?)?;
    let widget_mappings = catalog::load_widget_mappings(&config.catalogs.widget_mapping_source()?)?;

    let store = Arc::new(TemplateDb::open(&config.database.path)?);
    tracing::info!("template db opened at {}", config.database.path);

    let service = TemplateService::new(store, Arc::new(base_templates), Arc::new(widget_mappings));
    let state = AppState {
        service: Arc::new(service),
    };

    let app = build_router(state, &config.server.api_prefix);

    let addr = config.listen_addr();
    tracing::info!(
        "widget-layout listening on {addr}, api mounted at {:?}",
        config.server.api_prefix
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
