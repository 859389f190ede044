use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::handlers;

/// Template routes, relative to the versioned prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::templates::list_templates))
        .route(
            "/{id}",
            get(handlers::templates::get_template)
                .patch(handlers::templates::update_template)
                .delete(handlers::templates::delete_template),
        )
        .route("/{id}/copy", post(handlers::templates::copy_template))
        .route("/{id}/default", post(handlers::templates::set_default_template))
        .route("/{id}/reset", post(handlers::templates::reset_template))
        // Base template catalog
        .route(
            "/base-templates",
            get(handlers::base_templates::list_base_templates),
        )
        .route(
            "/base-templates/{name}",
            get(handlers::base_templates::get_base_template),
        )
        .route(
            "/base-templates/{name}/fork",
            get(handlers::base_templates::fork_base_template),
        )
        // Widget mapping
        .route(
            "/widget-mapping",
            get(handlers::widget_mapping::get_widget_mapping),
        )
}

/// Builds the application router. An empty prefix (or `/`) mounts the API at the root.
pub fn build_router(state: AppState, prefix: &str) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let app = Router::new().route("/healthz", get(handlers::health::healthz));
    let app = if prefix.is_empty() {
        app.merge(api_routes())
    } else {
        // A nested "/" only matches the bare prefix.
        app.route(
            &format!("{prefix}/"),
            get(handlers::templates::list_templates),
        )
        .nest(prefix, api_routes())
    };

    app.fallback(handlers::error::route_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
