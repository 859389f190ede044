use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::widget_item::WidgetItem;

/// Links a personal template to the base catalog entry it was seeded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTemplateBase {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

/// The four responsive layouts of a template. All four are required, any may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTemplateConfig {
    pub sm: Vec<WidgetItem>,
    pub md: Vec<WidgetItem>,
    pub lg: Vec<WidgetItem>,
    pub xl: Vec<WidgetItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 4] = [Breakpoint::Sm, Breakpoint::Md, Breakpoint::Lg, Breakpoint::Xl];

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }
}

impl DashboardTemplateConfig {
    pub fn items(&self, breakpoint: Breakpoint) -> &[WidgetItem] {
        match breakpoint {
            Breakpoint::Sm => &self.sm,
            Breakpoint::Md => &self.md,
            Breakpoint::Lg => &self.lg,
            Breakpoint::Xl => &self.xl,
        }
    }

    pub fn widget_count(&self) -> usize {
        Breakpoint::ALL.iter().map(|bp| self.items(*bp).len()).sum()
    }
}

/// A persisted, user-owned dashboard template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTemplate {
    pub id: i64,
    pub user_id: String,
    pub template_base: DashboardTemplateBase,
    pub template_config: DashboardTemplateConfig,
    pub default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A template that has not been persisted yet (no id, no timestamps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDashboardTemplate {
    pub user_id: String,
    pub template_base: DashboardTemplateBase,
    pub template_config: DashboardTemplateConfig,
    pub default: bool,
}

impl DashboardTemplate {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Copy of this template for another owner. The copy is never the default.
    pub fn copy_for(&self, user_id: &str) -> NewDashboardTemplate {
        NewDashboardTemplate {
            user_id: user_id.to_string(),
            template_base: self.template_base.clone(),
            template_config: self.template_config.clone(),
            default: false,
        }
    }
}

/// Catalog-provided blueprint used to seed personal templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseWidgetDashboardTemplate {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    pub template_config: DashboardTemplateConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_ref: Option<String>,
}

impl BaseWidgetDashboardTemplate {
    /// Unsaved personal template forked from this base.
    pub fn to_dashboard_template(&self, user_id: &str) -> NewDashboardTemplate {
        NewDashboardTemplate {
            user_id: user_id.to_string(),
            template_base: DashboardTemplateBase {
                name: self.name.clone(),
                display_name: self.display_name.clone(),
            },
            template_config: self.template_config.clone(),
            default: false,
        }
    }
}

/// PATCH body. Clients send a whole template; only the layout is read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub template_config: DashboardTemplateConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesParams {
    pub dashboard_type: Option<String>,
}
