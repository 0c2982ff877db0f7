use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};

use super::schema::SCHEMA;
use super::{SeedReport, Store};
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .inspect_err(|e| tracing::error!("Invalid date in database: '{}' - {}", s, e))
        .ok()
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_profiles(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_else(|e| {
        tracing::error!("Invalid profile list in database: '{}' - {}", s, e);
        vec![COMMON_PROFILE.to_string()]
    })
}

fn status_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentStatus> {
    Ok(DocumentStatus {
        document_id: row.get(0)?,
        is_complete: row.get(1)?,
        completed_at: row
            .get::<_, Option<String>>(2)?
            .map(|s| parse_datetime(&s)),
        notes: row.get(3)?,
        due_date: row.get::<_, Option<String>>(4)?.and_then(|s| parse_date(&s)),
    })
}

fn upsert_permit_type(tx: &Transaction<'_>, permit: &PermitType, sort_order: usize) -> Result<()> {
    tx.execute(
        "INSERT INTO permit_types
             (id, name_fr, name_en, description, official_url, cost, last_verified, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
             name_fr = excluded.name_fr,
             name_en = excluded.name_en,
             description = excluded.description,
             official_url = excluded.official_url,
             cost = excluded.cost,
             last_verified = excluded.last_verified,
             sort_order = excluded.sort_order",
        params![
            permit.id,
            permit.name_fr,
            permit.name_en,
            permit.description,
            permit.official_url,
            permit.cost,
            permit.last_verified,
            sort_order as i64,
        ],
    )?;
    Ok(())
}

/// Adds `permit_types.sort_order` to databases created before it existed.
fn ensure_permit_sort_column(conn: &Connection) -> Result<()> {
    let present: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM pragma_table_info('permit_types') WHERE name = 'sort_order'",
        [],
        |row| row.get(0),
    )?;
    if !present {
        conn.execute(
            "ALTER TABLE permit_types ADD COLUMN sort_order INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
    }
    Ok(())
}

fn upsert_document(tx: &Transaction<'_>, doc: &DocumentDefinition) -> Result<()> {
    tx.execute(
        "INSERT INTO documents
             (id, permit_type, name_fr, name_en, description, category, profiles,
              link, link_text, validity_days, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(id) DO UPDATE SET
             permit_type = excluded.permit_type,
             name_fr = excluded.name_fr,
             name_en = excluded.name_en,
             description = excluded.description,
             category = excluded.category,
             profiles = excluded.profiles,
             link = excluded.link,
             link_text = excluded.link_text,
             validity_days = excluded.validity_days,
             sort_order = excluded.sort_order",
        params![
            doc.id,
            doc.permit_type,
            doc.name_fr,
            doc.name_en,
            doc.description,
            doc.category,
            serde_json::to_string(&doc.profiles)?,
            doc.link,
            doc.link_text,
            doc.validity_days,
            doc.sort_order,
        ],
    )?;
    Ok(())
}

/// Deletes rows of `table` whose id is not in `keep`. Returns how many went.
fn delete_stale(tx: &Transaction<'_>, table: &str, keep: &HashSet<&str>) -> Result<usize> {
    let existing: Vec<String> = {
        let mut stmt = tx.prepare(&format!("SELECT id FROM {table}"))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()?
    };

    let mut removed = 0;
    for id in existing.iter().filter(|id| !keep.contains(id.as_str())) {
        removed += tx.execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![id])?;
    }
    Ok(removed)
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)?;
        ensure_permit_sort_column(&conn)?;
        conn.execute(
            "INSERT OR IGNORE INTO user_settings (id, selected_profiles, updated_at)
             VALUES (1, ?1, ?2)",
            params![
                serde_json::to_string(&[COMMON_PROFILE])?,
                format_datetime(&Utc::now())
            ],
        )?;
        Ok(())
    }

    fn seed(&self, catalog: &Catalog) -> Result<SeedReport> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut report = SeedReport::default();

        for (index, permit) in catalog.permit_types().iter().enumerate() {
            upsert_permit_type(&tx, permit, index)?;
            report.permit_types += 1;
        }

        for doc in catalog.all_documents() {
            upsert_document(&tx, doc)?;
            report.documents += 1;

            report.statuses_created += tx.execute(
                "INSERT OR IGNORE INTO document_status (document_id, is_complete) VALUES (?1, 0)",
                params![doc.id],
            )?;
        }

        let permit_ids: HashSet<&str> = catalog.permit_types().iter().map(|p| p.id.as_str()).collect();
        let document_ids: HashSet<&str> = catalog.all_documents().map(|d| d.id.as_str()).collect();
        report.documents_removed = delete_stale(&tx, "documents", &document_ids)?;
        delete_stale(&tx, "permit_types", &permit_ids)?;

        tx.commit()?;
        Ok(report)
    }

    // Permit type operations

    fn list_permit_types(&self) -> Result<Vec<PermitType>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name_fr, name_en, description, official_url, cost, last_verified
             FROM permit_types ORDER BY sort_order, id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(PermitType {
                id: row.get(0)?,
                name_fr: row.get(1)?,
                name_en: row.get(2)?,
                description: row.get(3)?,
                official_url: row.get(4)?,
                cost: row.get(5)?,
                last_verified: row.get(6)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn permit_type_exists(&self, id: &str) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM permit_types WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn list_documents(&self, permit_type: &str) -> Result<Vec<DocumentDefinition>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, permit_type, name_fr, name_en, description, category, profiles,
                    link, link_text, validity_days, sort_order
             FROM documents WHERE permit_type = ?1 ORDER BY sort_order, rowid",
        )?;

        let rows = stmt.query_map(params![permit_type], |row| {
            Ok(DocumentDefinition {
                id: row.get(0)?,
                permit_type: row.get(1)?,
                name_fr: row.get(2)?,
                name_en: row.get(3)?,
                description: row.get(4)?,
                category: row.get(5)?,
                profiles: parse_profiles(&row.get::<_, String>(6)?),
                link: row.get(7)?,
                link_text: row.get(8)?,
                validity_days: row.get(9)?,
                sort_order: row.get(10)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Status operations

    fn get_status(&self, document_id: &str) -> Result<Option<DocumentStatus>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT document_id, is_complete, completed_at, notes, due_date
             FROM document_status WHERE document_id = ?1",
            params![document_id],
            status_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_statuses(&self, permit_type: &str) -> Result<Vec<DocumentStatus>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT ds.document_id, ds.is_complete, ds.completed_at, ds.notes, ds.due_date
             FROM document_status ds
             JOIN documents d ON d.id = ds.document_id
             WHERE d.permit_type = ?1
             ORDER BY d.sort_order",
        )?;

        let rows = stmt.query_map(params![permit_type], status_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn mark_complete(&self, document_id: &str) -> Result<bool> {
        // An already complete document keeps its original completion time.
        let rows = self.conn().execute(
            "UPDATE document_status
             SET is_complete = 1, completed_at = COALESCE(completed_at, ?1)
             WHERE document_id = ?2",
            params![format_datetime(&Utc::now()), document_id],
        )?;
        Ok(rows > 0)
    }

    fn mark_incomplete(&self, document_id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE document_status SET is_complete = 0, completed_at = NULL WHERE document_id = ?1",
            params![document_id],
        )?;
        Ok(rows > 0)
    }

    fn set_notes(&self, document_id: &str, notes: &str) -> Result<bool> {
        let notes = (!notes.is_empty()).then_some(notes);
        let rows = self.conn().execute(
            "UPDATE document_status SET notes = ?1 WHERE document_id = ?2",
            params![notes, document_id],
        )?;
        Ok(rows > 0)
    }

    fn set_due_date(&self, document_id: &str, due_date: Option<NaiveDate>) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE document_status SET due_date = ?1 WHERE document_id = ?2",
            params![due_date.as_ref().map(format_date), document_id],
        )?;
        Ok(rows > 0)
    }

    fn reset_all(&self, permit_type: &str) -> Result<bool> {
        if !self.permit_type_exists(permit_type)? {
            return Ok(false);
        }

        self.conn().execute(
            "UPDATE document_status
             SET is_complete = 0, completed_at = NULL, notes = NULL, due_date = NULL
             WHERE document_id IN (SELECT id FROM documents WHERE permit_type = ?1)",
            params![permit_type],
        )?;
        Ok(true)
    }

    // Settings operations

    fn get_settings(&self) -> Result<UserSettings> {
        let conn = self.conn();
        conn.query_row(
            "SELECT selected_profiles, updated_at FROM user_settings WHERE id = 1",
            [],
            |row| {
                Ok(UserSettings {
                    selected_profiles: parse_profiles(&row.get::<_, String>(0)?),
                    updated_at: parse_datetime(&row.get::<_, String>(1)?),
                })
            },
        )
        .optional()?
        .ok_or(Error::NotFound)
    }

    fn set_selected_profiles(&self, profiles: &[String]) -> Result<UserSettings> {
        let settings = UserSettings {
            selected_profiles: normalize_profiles(profiles),
            updated_at: Utc::now(),
        };

        self.conn().execute(
            "INSERT INTO user_settings (id, selected_profiles, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                 selected_profiles = excluded.selected_profiles,
                 updated_at = excluded.updated_at",
            params![
                serde_json::to_string(&settings.selected_profiles)?,
                format_datetime(&settings.updated_at),
            ],
        )?;

        Ok(settings)
    }
}
