//! Applies the template schema to the configured database and exits.

use tracing_subscriber::EnvFilter;

use widget_layout::config::AppConfig;
use widget_layout::template_db::TemplateDb;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("widget_layout=info")),
        )
        .init();

    TemplateDb::open(&config.database.path)?;
    tracing::info!("schema applied to {}", config.database.path);
    Ok(())
}
