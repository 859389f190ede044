use crate::models::template::{DashboardTemplate, NewDashboardTemplate};

/// Writes available inside [`TemplateStore::run_in_transaction`].
pub trait TemplateWriter {
    /// Templates of `user_id` with this base name, ordered by id.
    fn list_for_base(&self, user_id: &str, base_name: &str) -> anyhow::Result<Vec<DashboardTemplate>>;
    /// Clears the default flag on every template of `user_id` with this base name.
    fn clear_defaults(&self, user_id: &str, base_name: &str) -> anyhow::Result<usize>;
    /// Sets the default flag on one template, leaving its layout alone.
    /// `None` when no such template belongs to `user_id`.
    fn mark_default(&self, id: i64, user_id: &str) -> anyhow::Result<Option<DashboardTemplate>>;
    fn create(&self, template: &NewDashboardTemplate) -> anyhow::Result<DashboardTemplate>;
}

/// Persistence boundary of the template service.
///
/// Lookups return `Ok(None)` when no row matches; `Err` is reserved for
/// storage failures.
pub trait TemplateStore: Send + Sync {
    fn find_by_id_for_user(
        &self,
        id: i64,
        user_id: &str,
    ) -> anyhow::Result<Option<DashboardTemplate>>;

    /// Templates owned by `user_id`, optionally restricted to one base name, ordered by id.
    fn list_by_user(
        &self,
        user_id: &str,
        base_name: Option<&str>,
    ) -> anyhow::Result<Vec<DashboardTemplate>>;

    /// Unscoped lookup, used before the ownership check.
    fn first_by_id(&self, id: i64) -> anyhow::Result<Option<DashboardTemplate>>;

    fn create(&self, template: &NewDashboardTemplate) -> anyhow::Result<DashboardTemplate>;

    /// Overwrites base, layout and default flag, bumps `updated_at`, returns the stored row.
    fn save(&self, template: &DashboardTemplate) -> anyhow::Result<DashboardTemplate>;

    /// Hard delete. Returns whether a row was removed.
    fn delete_permanent(&self, id: i64) -> anyhow::Result<bool>;

    /// Runs `work` atomically: if it returns `Err`, none of its writes are kept.
    fn run_in_transaction(
        &self,
        work: &mut dyn FnMut(&dyn TemplateWriter) -> anyhow::Result<()>,
    ) -> anyhow::Result<()>;
}
