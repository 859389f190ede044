pub mod response;
pub mod template;
pub mod widget_item;
pub mod widget_mapping;
