pub mod base_templates;
pub mod error;
pub mod health;
pub mod identity;
pub mod templates;
pub mod widget_mapping;
