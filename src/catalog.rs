//! Startup catalogs: base dashboard templates and widget mappings.
//!
//! Both are parsed once from a JSON array and then only read. The service
//! consumes them through [`BaseTemplateCatalog`] and [`WidgetMappingCatalog`]
//! so tests can hand it alternate catalogs.

use std::collections::BTreeMap;

use crate::models::template::BaseWidgetDashboardTemplate;
use crate::models::widget_mapping::WidgetModuleFederationMetadata;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse base widget dashboard templates: {0}")]
    BaseTemplates(#[source] serde_json::Error),
    #[error("failed to parse widget mappings: {0}")]
    WidgetMappings(#[source] serde_json::Error),
}

pub trait BaseTemplateCatalog: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&BaseWidgetDashboardTemplate>;
    /// All entries, ordered by name.
    fn all(&self) -> Vec<&BaseWidgetDashboardTemplate>;
}

pub trait WidgetMappingCatalog: Send + Sync {
    fn all(&self) -> &BTreeMap<String, WidgetModuleFederationMetadata>;
}

#[derive(Debug, Clone, Default)]
pub struct BaseTemplateRegistry {
    templates: BTreeMap<String, BaseWidgetDashboardTemplate>,
}

impl BaseTemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry with the same name.
    pub fn add(&mut self, base: BaseWidgetDashboardTemplate) {
        self.templates.insert(base.name.clone(), base);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<BaseWidgetDashboardTemplate> for BaseTemplateRegistry {
    fn from_iter<I: IntoIterator<Item = BaseWidgetDashboardTemplate>>(iter: I) -> Self {
        let mut registry = Self::new();
        for base in iter {
            registry.add(base);
        }
        registry
    }
}

impl BaseTemplateCatalog for BaseTemplateRegistry {
    fn lookup(&self, name: &str) -> Option<&BaseWidgetDashboardTemplate> {
        self.templates.get(name)
    }

    fn all(&self) -> Vec<&BaseWidgetDashboardTemplate> {
        self.templates.values().collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WidgetMappingRegistry {
    mappings: BTreeMap<String, WidgetModuleFederationMetadata>,
}

impl WidgetMappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the mapping under its composite key, replacing any previous one.
    pub fn add(&mut self, mapping: WidgetModuleFederationMetadata) {
        self.mappings.insert(mapping.widget_key(), mapping);
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl FromIterator<WidgetModuleFederationMetadata> for WidgetMappingRegistry {
    fn from_iter<I: IntoIterator<Item = WidgetModuleFederationMetadata>>(iter: I) -> Self {
        let mut registry = Self::new();
        for mapping in iter {
            registry.add(mapping);
        }
        registry
    }
}

impl WidgetMappingCatalog for WidgetMappingRegistry {
    fn all(&self) -> &BTreeMap<String, WidgetModuleFederationMetadata> {
        &self.mappings
    }
}

/// Parses the base template catalog. An empty string means no entries.
pub fn load_base_templates(config: &str) -> Result<BaseTemplateRegistry, CatalogError> {
    if config.trim().is_empty() {
        tracing::info!("no base widget dashboard templates configured");
        return Ok(BaseTemplateRegistry::new());
    }
    let bases: Vec<BaseWidgetDashboardTemplate> =
        serde_json::from_str(config).map_err(CatalogError::BaseTemplates)?;
    let registry: BaseTemplateRegistry = bases.into_iter().collect();
    tracing::info!("loaded {} base widget dashboard templates", registry.len());
    Ok(registry)
}

/// Parses the widget mapping catalog. An empty string means no entries.
pub fn load_widget_mappings(config: &str) -> Result<WidgetMappingRegistry, CatalogError> {
    if config.trim().is_empty() {
        tracing::info!("no widget mappings configured");
        return Ok(WidgetMappingRegistry::new());
    }
    let mappings: Vec<WidgetModuleFederationMetadata> =
        serde_json::from_str(config).map_err(CatalogError::WidgetMappings)?;
    let registry: WidgetMappingRegistry = mappings.into_iter().collect();
    tracing::info!("loaded {} widget mappings", registry.len());
    Ok(registry)
}
