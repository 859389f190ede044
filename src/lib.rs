pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod store;
pub mod template_db;
pub mod template_service;

use std::sync::Arc;

use template_service::TemplateService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TemplateService>,
}
