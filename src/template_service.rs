//! Template lifecycle: list, get, update, delete, copy, reset, fork and
//! set-default over the user's persisted dashboard templates.
//!
//! Every operation that touches a single template loads it by id and then
//! checks that the caller owns it. Copy is the exception: any template may be
//! copied, and the copy belongs to the caller.
//!
//! At most one template per (user, base name) carries the default flag. The
//! two paths that set it (set-default and auto-provision) clear the user's
//! other defaults for that base name inside the same transaction.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use anyhow::anyhow;
use axum::http::StatusCode;

use crate::catalog::{BaseTemplateCatalog, WidgetMappingCatalog};
use crate::error::{TemplateError, TemplateResult};
use crate::models::template::{
    BaseWidgetDashboardTemplate, Breakpoint, DashboardTemplate, DashboardTemplateConfig,
    NewDashboardTemplate,
};
use crate::models::widget_mapping::WidgetModuleFederationMetadata;
use crate::store::TemplateStore;

/// Result of listing a user's templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Found(Vec<DashboardTemplate>),
    /// Nothing matched the requested dashboard type, so a default template
    /// was forked from the base catalog and persisted.
    Provisioned(DashboardTemplate),
}

impl ListOutcome {
    /// Auto-provisioning reports 404 while still delivering the new template.
    pub fn status(&self) -> StatusCode {
        match self {
            ListOutcome::Found(_) => StatusCode::OK,
            ListOutcome::Provisioned(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn into_templates(self) -> Vec<DashboardTemplate> {
        match self {
            ListOutcome::Found(templates) => templates,
            ListOutcome::Provisioned(template) => vec![template],
        }
    }
}

pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
    base_templates: Arc<dyn BaseTemplateCatalog>,
    widget_mappings: Arc<dyn WidgetMappingCatalog>,
}

fn store_failure(err: anyhow::Error, action: impl Display) -> TemplateError {
    tracing::error!("failed to {action}: {err:#}");
    TemplateError::Internal(err.context(format!("failed to {action}")))
}

fn ensure_identity(user_id: &str) -> TemplateResult<()> {
    if user_id.trim().is_empty() {
        tracing::warn!("request without a user identity");
        return Err(TemplateError::BadRequest("missing user identity".to_string()));
    }
    Ok(())
}

fn validate_config(config: &DashboardTemplateConfig) -> TemplateResult<()> {
    for bp in Breakpoint::ALL {
        for item in config.items(bp) {
            item.validate().map_err(|e| {
                tracing::warn!(breakpoint = bp.as_str(), "rejected template layout: {e}");
                TemplateError::BadRequest(e.to_string())
            })?;
        }
    }
    Ok(())
}

impl TemplateService {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        base_templates: Arc<dyn BaseTemplateCatalog>,
        widget_mappings: Arc<dyn WidgetMappingCatalog>,
    ) -> Self {
        Self {
            store,
            base_templates,
            widget_mappings,
        }
    }

    /// Loads a template by id and checks that `user_id` owns it.
    fn load_owned(&self, id: i64, user_id: &str) -> TemplateResult<DashboardTemplate> {
        let template = self
            .store
            .first_by_id(id)
            .map_err(|e| store_failure(e, format_args!("load dashboard template {id}")))?
            .ok_or_else(|| {
                tracing::warn!(template_id = id, "dashboard template not found");
                TemplateError::NotFound { id }
            })?;

        if !template.is_owned_by(user_id) {
            tracing::warn!(
                template_id = id,
                user_id,
                owner = %template.user_id,
                "user is not authorized to access dashboard template"
            );
            return Err(TemplateError::Forbidden {
                id,
                user_id: user_id.to_string(),
            });
        }
        Ok(template)
    }

    fn lookup_base(&self, name: &str) -> TemplateResult<&BaseWidgetDashboardTemplate> {
        self.base_templates.lookup(name).ok_or_else(|| {
            tracing::warn!(base_name = name, "base template not found");
            TemplateError::BaseTemplateNotFound {
                name: name.to_string(),
            }
        })
    }

    fn create(&self, template: &NewDashboardTemplate) -> TemplateResult<DashboardTemplate> {
        self.store.create(template).map_err(|e| {
            store_failure(
                e,
                format_args!("create dashboard template from base {}", template.template_base.name),
            )
        })
    }

    /// Persists `template` as the user's only default for its base name,
    /// unless a template for that base appeared since the caller's read.
    fn provision_default(&self, template: &NewDashboardTemplate) -> TemplateResult<ListOutcome> {
        let user_id = template.user_id.as_str();
        let base_name = template.template_base.name.as_str();
        let mut outcome = None;
        self.store
            .run_in_transaction(&mut |tx| {
                let existing = tx.list_for_base(user_id, base_name)?;
                if !existing.is_empty() {
                    outcome = Some(ListOutcome::Found(existing));
                    return Ok(());
                }
                tx.clear_defaults(user_id, base_name)?;
                outcome = Some(ListOutcome::Provisioned(tx.create(template)?));
                Ok(())
            })
            .map_err(|e| {
                store_failure(e, format_args!("provision default template from base {base_name}"))
            })?;
        outcome.ok_or_else(|| TemplateError::Internal(anyhow!("provisioning produced no outcome")))
    }

    /// Lists the caller's templates, optionally narrowed to one dashboard type.
    ///
    /// When a dashboard type is given and the caller has no template for it,
    /// the matching base template is forked, marked default and returned as
    /// [`ListOutcome::Provisioned`].
    pub fn list_for_user(
        &self,
        user_id: &str,
        dashboard_type: Option<&str>,
    ) -> TemplateResult<ListOutcome> {
        ensure_identity(user_id)?;
        let templates = self
            .store
            .list_by_user(user_id, dashboard_type)
            .map_err(|e| store_failure(e, format_args!("list dashboard templates for user {user_id}")))?;

        let Some(base_name) = dashboard_type else {
            tracing::debug!(user_id, count = templates.len(), "listed dashboard templates");
            return Ok(ListOutcome::Found(templates));
        };
        if !templates.is_empty() {
            tracing::debug!(user_id, base_name, count = templates.len(), "listed dashboard templates");
            return Ok(ListOutcome::Found(templates));
        }

        let mut template = self.lookup_base(base_name)?.to_dashboard_template(user_id);
        template.default = true;
        let outcome = self.provision_default(&template)?;
        match &outcome {
            ListOutcome::Provisioned(created) => tracing::info!(
                template_id = created.id,
                user_id,
                base_name,
                "auto-provisioned default dashboard template"
            ),
            ListOutcome::Found(templates) => tracing::debug!(
                user_id,
                base_name,
                count = templates.len(),
                "template for base created concurrently, skipped provisioning"
            ),
        }
        Ok(outcome)
    }

    pub fn get_by_id(&self, id: i64, user_id: &str) -> TemplateResult<DashboardTemplate> {
        ensure_identity(user_id)?;
        self.store
            .find_by_id_for_user(id, user_id)
            .map_err(|e| store_failure(e, format_args!("load dashboard template {id}")))?
            .ok_or_else(|| {
                tracing::warn!(template_id = id, user_id, "dashboard template not found");
                TemplateError::NotFound { id }
            })
    }

    /// Replaces the layout. Base, default flag and owner are left untouched.
    pub fn update_by_id(
        &self,
        id: i64,
        config: DashboardTemplateConfig,
        user_id: &str,
    ) -> TemplateResult<DashboardTemplate> {
        ensure_identity(user_id)?;
        validate_config(&config)?;
        let mut template = self.load_owned(id, user_id)?;
        template.template_config = config;
        let saved = self
            .store
            .save(&template)
            .map_err(|e| store_failure(e, format_args!("update dashboard template {id}")))?;
        tracing::info!(
            template_id = id,
            user_id,
            widgets = saved.template_config.widget_count(),
            "updated dashboard template"
        );
        Ok(saved)
    }

    /// Permanently removes the template; there is no restore.
    pub fn delete_by_id(&self, id: i64, user_id: &str) -> TemplateResult<()> {
        ensure_identity(user_id)?;
        let template = self.load_owned(id, user_id)?;
        let deleted = self
            .store
            .delete_permanent(template.id)
            .map_err(|e| store_failure(e, format_args!("delete dashboard template {id}")))?;
        if !deleted {
            tracing::warn!(template_id = id, "dashboard template vanished before delete");
            return Err(TemplateError::NotFound { id });
        }
        tracing::info!(template_id = id, user_id, "deleted dashboard template");
        Ok(())
    }

    /// Copies any user's template into a new, non-default template owned by the caller.
    pub fn copy_by_id(&self, id: i64, user_id: &str) -> TemplateResult<DashboardTemplate> {
        ensure_identity(user_id)?;
        let source = self
            .store
            .first_by_id(id)
            .map_err(|e| store_failure(e, format_args!("load dashboard template {id}")))?
            .ok_or_else(|| {
                tracing::warn!(template_id = id, "dashboard template not found");
                TemplateError::NotFound { id }
            })?;

        let created = self.create(&source.copy_for(user_id))?;
        tracing::info!(
            template_id = created.id,
            source_id = id,
            user_id,
            "copied dashboard template"
        );
        Ok(created)
    }

    /// Restores the layout of the base template the template was forked from.
    pub fn reset_by_id(&self, id: i64, user_id: &str) -> TemplateResult<DashboardTemplate> {
        ensure_identity(user_id)?;
        let mut template = self.load_owned(id, user_id)?;
        let base = self.lookup_base(&template.template_base.name)?;
        template.template_config = base.template_config.clone();

        let saved = self
            .store
            .save(&template)
            .map_err(|e| store_failure(e, format_args!("reset dashboard template {id}")))?;
        tracing::info!(
            template_id = id,
            user_id,
            base_name = %saved.template_base.name,
            widgets = saved.template_config.widget_count(),
            "reset dashboard template to base"
        );
        Ok(saved)
    }

    /// Creates a personal, non-default copy of a base template.
    pub fn fork_base(&self, base_name: &str, user_id: &str) -> TemplateResult<DashboardTemplate> {
        ensure_identity(user_id)?;
        let base = self.lookup_base(base_name)?;
        let created = self.create(&base.to_dashboard_template(user_id))?;
        tracing::info!(
            template_id = created.id,
            user_id,
            base_name,
            "forked base template"
        );
        Ok(created)
    }

    /// Makes this template the caller's default for its base name, clearing
    /// any previous default in the same transaction. The layout is not rewritten.
    pub fn set_default_by_id(&self, id: i64, user_id: &str) -> TemplateResult<DashboardTemplate> {
        ensure_identity(user_id)?;
        let template = self.load_owned(id, user_id)?;
        let base_name = template.template_base.name.as_str();

        let mut marked = None;
        let mut vanished = false;
        let result = self.store.run_in_transaction(&mut |tx| {
            tx.clear_defaults(user_id, base_name)?;
            match tx.mark_default(id, user_id)? {
                Some(updated) => {
                    marked = Some(updated);
                    Ok(())
                }
                None => {
                    vanished = true;
                    anyhow::bail!("dashboard template {id} vanished before it was marked default")
                }
            }
        });
        if vanished {
            tracing::warn!(template_id = id, "dashboard template deleted while changing default");
            return Err(TemplateError::NotFound { id });
        }
        result.map_err(|e| store_failure(e, format_args!("change default dashboard template to {id}")))?;
        let saved =
            marked.ok_or_else(|| TemplateError::Internal(anyhow!("marked template was not returned")))?;

        tracing::info!(
            template_id = id,
            user_id,
            base_name = %saved.template_base.name,
            "changed default dashboard template"
        );
        Ok(saved)
    }

    pub fn base_templates(&self) -> Vec<BaseWidgetDashboardTemplate> {
        self.base_templates.all().into_iter().cloned().collect()
    }

    pub fn base_template(&self, name: &str) -> TemplateResult<BaseWidgetDashboardTemplate> {
        self.lookup_base(name).cloned()
    }

    pub fn widget_mappings(&self) -> BTreeMap<String, WidgetModuleFederationMetadata> {
        let mappings = self.widget_mappings.all().clone();
        tracing::debug!("retrieved {} widget mappings", mappings.len());
        mappings
    }
}
