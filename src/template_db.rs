use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail};
use chrono::Utc;
use rusqlite::{Connection, Row, params};

use crate::models::template::{
    DashboardTemplate, DashboardTemplateBase, DashboardTemplateConfig, NewDashboardTemplate,
};
use crate::models::widget_item::WidgetItem;
use crate::store::{TemplateStore, TemplateWriter};

const TEMPLATE_COLUMNS: &str = "id, user_id, base_name, base_display_name, is_default, \
     sm, md, lg, xl, created_at, updated_at";

/// SQLite-backed template store.
pub struct TemplateDb {
    conn: Mutex<Connection>,
}

impl TemplateDb {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS dashboard_templates (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id           TEXT NOT NULL CHECK(user_id <> ''),
                base_name         TEXT NOT NULL,
                base_display_name TEXT NOT NULL DEFAULT '',
                is_default        INTEGER NOT NULL DEFAULT 0,
                sm                TEXT NOT NULL DEFAULT '[]',
                md                TEXT NOT NULL DEFAULT '[]',
                lg                TEXT NOT NULL DEFAULT '[]',
                xl                TEXT NOT NULL DEFAULT '[]',
                created_at        TEXT NOT NULL,
                updated_at        TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_templates_user ON dashboard_templates(user_id);
            CREATE INDEX IF NOT EXISTS idx_templates_user_base ON dashboard_templates(user_id, base_name);
            ",
        )?;
        Ok(())
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("template db connection mutex poisoned"))
    }
}

fn layout_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<WidgetItem>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<DashboardTemplate> {
    Ok(DashboardTemplate {
        id: row.get(0)?,
        user_id: row.get(1)?,
        template_base: DashboardTemplateBase {
            name: row.get(2)?,
            display_name: row.get(3)?,
        },
        default: row.get(4)?,
        template_config: DashboardTemplateConfig {
            sm: layout_column(row, 5)?,
            md: layout_column(row, 6)?,
            lg: layout_column(row, 7)?,
            xl: layout_column(row, 8)?,
        },
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn encode_layouts(config: &DashboardTemplateConfig) -> anyhow::Result<[String; 4]> {
    Ok([
        serde_json::to_string(&config.sm)?,
        serde_json::to_string(&config.md)?,
        serde_json::to_string(&config.lg)?,
        serde_json::to_string(&config.xl)?,
    ])
}

// Shared by the plain and transactional paths; a `Transaction` derefs to `Connection`.

fn get_on(conn: &Connection, id: i64) -> anyhow::Result<Option<DashboardTemplate>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM dashboard_templates WHERE id = ?1"
    ))?;
    let mut rows = stmt.query_map(params![id], template_from_row)?;
    Ok(rows.next().transpose()?)
}

fn create_on(conn: &Connection, template: &NewDashboardTemplate) -> anyhow::Result<DashboardTemplate> {
    let [sm, md, lg, xl] = encode_layouts(&template.template_config)?;
    let now = Utc::now();
    conn.execute(
        "INSERT INTO dashboard_templates \
         (user_id, base_name, base_display_name, is_default, sm, md, lg, xl, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            template.user_id,
            template.template_base.name,
            template.template_base.display_name,
            template.default,
            sm,
            md,
            lg,
            xl,
            now,
            now
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_on(conn, id)?.ok_or_else(|| anyhow!("failed to read created dashboard template {id}"))
}

fn save_on(conn: &Connection, template: &DashboardTemplate) -> anyhow::Result<DashboardTemplate> {
    let [sm, md, lg, xl] = encode_layouts(&template.template_config)?;
    let count = conn.execute(
        "UPDATE dashboard_templates SET base_name = ?2, base_display_name = ?3, is_default = ?4, \
         sm = ?5, md = ?6, lg = ?7, xl = ?8, updated_at = ?9 WHERE id = ?1",
        params![
            template.id,
            template.template_base.name,
            template.template_base.display_name,
            template.default,
            sm,
            md,
            lg,
            xl,
            Utc::now()
        ],
    )?;
    if count == 0 {
        bail!("dashboard template {} no longer exists", template.id);
    }
    get_on(conn, template.id)?
        .ok_or_else(|| anyhow!("failed to read saved dashboard template {}", template.id))
}

fn list_on(
    conn: &Connection,
    user_id: &str,
    base_name: Option<&str>,
) -> anyhow::Result<Vec<DashboardTemplate>> {
    let rows = match base_name {
        Some(name) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TEMPLATE_COLUMNS} FROM dashboard_templates \
                 WHERE user_id = ?1 AND base_name = ?2 ORDER BY id ASC"
            ))?;
            stmt.query_map(params![user_id, name], template_from_row)?
                .collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TEMPLATE_COLUMNS} FROM dashboard_templates \
                 WHERE user_id = ?1 ORDER BY id ASC"
            ))?;
            stmt.query_map(params![user_id], template_from_row)?
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(rows)
}

fn mark_default_on(
    conn: &Connection,
    id: i64,
    user_id: &str,
) -> anyhow::Result<Option<DashboardTemplate>> {
    let count = conn.execute(
        "UPDATE dashboard_templates SET is_default = 1, updated_at = ?3 \
         WHERE id = ?1 AND user_id = ?2",
        params![id, user_id, Utc::now()],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_on(conn, id)
}

fn clear_defaults_on(conn: &Connection, user_id: &str, base_name: &str) -> anyhow::Result<usize> {
    let count = conn.execute(
        "UPDATE dashboard_templates SET is_default = 0, updated_at = ?3 \
         WHERE user_id = ?1 AND base_name = ?2 AND is_default = 1",
        params![user_id, base_name, Utc::now()],
    )?;
    Ok(count)
}

struct TxWriter<'a> {
    conn: &'a Connection,
}

impl TemplateWriter for TxWriter<'_> {
    fn list_for_base(&self, user_id: &str, base_name: &str) -> anyhow::Result<Vec<DashboardTemplate>> {
        list_on(self.conn, user_id, Some(base_name))
    }

    fn clear_defaults(&self, user_id: &str, base_name: &str) -> anyhow::Result<usize> {
        clear_defaults_on(self.conn, user_id, base_name)
    }

    fn mark_default(&self, id: i64, user_id: &str) -> anyhow::Result<Option<DashboardTemplate>> {
        mark_default_on(self.conn, id, user_id)
    }

    fn create(&self, template: &NewDashboardTemplate) -> anyhow::Result<DashboardTemplate> {
        create_on(self.conn, template)
    }
}

impl TemplateStore for TemplateDb {
    fn find_by_id_for_user(
        &self,
        id: i64,
        user_id: &str,
    ) -> anyhow::Result<Option<DashboardTemplate>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM dashboard_templates WHERE id = ?1 AND user_id = ?2"
        ))?;
        let mut rows = stmt.query_map(params![id, user_id], template_from_row)?;
        Ok(rows.next().transpose()?)
    }

    fn list_by_user(
        &self,
        user_id: &str,
        base_name: Option<&str>,
    ) -> anyhow::Result<Vec<DashboardTemplate>> {
        let conn = self.lock()?;
        list_on(&conn, user_id, base_name)
    }

    fn first_by_id(&self, id: i64) -> anyhow::Result<Option<DashboardTemplate>> {
        let conn = self.lock()?;
        get_on(&conn, id)
    }

    fn create(&self, template: &NewDashboardTemplate) -> anyhow::Result<DashboardTemplate> {
        let conn = self.lock()?;
        create_on(&conn, template)
    }

    fn save(&self, template: &DashboardTemplate) -> anyhow::Result<DashboardTemplate> {
        let conn = self.lock()?;
        save_on(&conn, template)
    }

    fn delete_permanent(&self, id: i64) -> anyhow::Result<bool> {
        let conn = self.lock()?;
        let count = conn.execute("DELETE FROM dashboard_templates WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }

    fn run_in_transaction(
        &self,
        work: &mut dyn FnMut(&dyn TemplateWriter) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        work(&TxWriter { conn: &tx })?;
        tx.commit()?;
        Ok(())
    }
}
