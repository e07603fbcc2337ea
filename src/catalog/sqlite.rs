//! SQLite-backed release catalog.
//!
//! Reads the two-table layout used by existing release databases:
//!
//! ```sql
//! CREATE TABLE FirmwareLibraries (ID INTEGER PRIMARY KEY, name TEXT);
//! CREATE TABLE ReleaseNotes (
//!     version TEXT, release_notes TEXT, release_date TEXT,
//!     security, cve TEXT, IDLibraries INTEGER
//! );
//! ```
//!
//! `security` may hold text, an integer or NULL; it is kept as a flag token
//! the same way the JSON catalog keeps it.

use super::ReleaseCatalog;
use crate::error::{CatalogErrorKind, CheckerError, Result};
use crate::model::ReleaseRecord;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

const LIBRARY_ID_QUERY: &str =
    r#"SELECT ID FROM "FirmwareLibraries" WHERE LOWER(name) = LOWER(?1)"#;

const RELEASES_QUERY: &str = r#"
    SELECT version, release_notes, release_date, security, cve
    FROM "ReleaseNotes"
    WHERE "IDLibraries" = ?1
    ORDER BY COALESCE(release_date, '') ASC, version ASC
"#;

const LIBRARY_NAMES_QUERY: &str = r#"SELECT name FROM "FirmwareLibraries""#;

const REQUIRED_TABLES: [&str; 2] = ["FirmwareLibraries", "ReleaseNotes"];

/// Release catalog read from a SQLite database.
#[derive(Debug)]
pub struct SqliteCatalog {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open a catalog database read-only.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CheckerError::catalog(
                "loading catalog",
                CatalogErrorKind::NotFound(path.to_path_buf()),
            ));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| database_error(path, &e))?;

        for table in REQUIRED_TABLES {
            let present = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |_| Ok(()),
                )
                .optional()
                .map_err(|e| database_error(path, &e))?
                .is_some();
            if !present {
                return Err(CheckerError::catalog(
                    format!("loading {}", path.display()),
                    CatalogErrorKind::InvalidDocument(format!("missing table {table}")),
                ));
            }
        }

        tracing::debug!("Opened release catalog database {}", path.display());
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
        })
    }

    /// Wrap an already open connection without checking its schema.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            path: None,
            conn: Mutex::new(conn),
        }
    }

    /// File the catalog was opened from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn query_releases(&self, name: &str) -> rusqlite::Result<Vec<ReleaseRecord>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(id) = conn
            .query_row(LIBRARY_ID_QUERY, [name], |row| row.get::<_, Value>(0))
            .optional()?
        else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(RELEASES_QUERY)?;
        let rows = stmt.query_map([id], |row| {
            Ok(ReleaseRecord {
                version: text_token(row.get_ref(0)?).unwrap_or_default(),
                release_notes: text_token(row.get_ref(1)?).unwrap_or_default(),
                release_date: text_token(row.get_ref(2)?),
                security_flag: text_token(row.get_ref(3)?),
                cve: text_token(row.get_ref(4)?).unwrap_or_default(),
            })
        })?;
        rows.collect()
    }

    fn query_names(&self) -> rusqlite::Result<Vec<String>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare(LIBRARY_NAMES_QUERY)?;
        let names = stmt
            .query_map([], |row| Ok(text_token(row.get_ref(0)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names
            .into_iter()
            .flatten()
            .filter(|n| !n.trim().is_empty())
            .collect())
    }

    fn label(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "in-memory".to_string(), |p| p.display().to_string())
    }
}

impl ReleaseCatalog for SqliteCatalog {
    fn releases_for_library(&self, name: &str) -> Vec<ReleaseRecord> {
        self.query_releases(name).unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to read releases of {} from {}: {}",
                name,
                self.label(),
                e
            );
            Vec::new()
        })
    }

    fn library_names(&self) -> Vec<String> {
        self.query_names().unwrap_or_else(|e| {
            tracing::warn!("Failed to list libraries in {}: {}", self.label(), e);
            Vec::new()
        })
    }
}

/// Column value as text; NULL and blobs have no token.
fn text_token(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

fn database_error(path: &Path, err: &rusqlite::Error) -> CheckerError {
    CheckerError::catalog(
        format!("opening {}", path.display()),
        CatalogErrorKind::Database(err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatestVersion;

    const SCHEMA: &str = r#"
        CREATE TABLE "FirmwareLibraries" (ID INTEGER PRIMARY KEY, name TEXT);
        CREATE TABLE "ReleaseNotes" (
            version TEXT, release_notes TEXT, release_date TEXT,
            security, cve TEXT, IDLibraries INTEGER
        );
        INSERT INTO "FirmwareLibraries" VALUES (1, 'FreeRTOS'), (2, 'LwIP'), (3, '');
        INSERT INTO "ReleaseNotes" VALUES
            ('V10.4.3', 'Kernel fixes', '2020-12-15', 'true', 'CVE-2021-31571', 1),
            ('V10.4.4', NULL, '2021-05-28', 1, NULL, 1),
            ('V10.4.6', 'Maintenance', '2021-11-13', 0, '', 1),
            ('V10.5.0', 'Undated', NULL, NULL, '', 1),
            ('2.1.3', 'Bug fixes', '2021-11-10', 'false', '', 2);
    "#;

    fn write_database(dir: &Path) -> PathBuf {
        let path = dir.join("releases.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        path
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SqliteCatalog::open(&write_database(dir.path())).unwrap();

        assert_eq!(catalog.releases_for_library("freertos").len(), 4);
        assert_eq!(catalog.releases_for_library("FREERTOS").len(), 4);
        assert_eq!(catalog.releases_for_library("lwip").len(), 1);
        assert!(catalog.releases_for_library("Zephyr").is_empty());
    }

    #[test]
    fn test_columns_map_like_the_json_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SqliteCatalog::open(&write_database(dir.path())).unwrap();
        let releases = catalog.releases_for_library("FreeRTOS");
        let find = |v: &str| releases.iter().find(|r| r.version == v).unwrap();

        let first = find("V10.4.3");
        assert_eq!(first.security_flag.as_deref(), Some("true"));
        assert_eq!(first.cve, "CVE-2021-31571");
        assert!(first.is_security_release());

        let integer_flag = find("V10.4.4");
        assert_eq!(integer_flag.security_flag.as_deref(), Some("1"));
        assert!(integer_flag.is_security_release());
        assert_eq!(integer_flag.release_notes, "");
        assert_eq!(integer_flag.cve, "");

        assert!(!find("V10.4.6").is_security_release());

        let undated = find("V10.5.0");
        assert_eq!(undated.security_flag, None);
        assert_eq!(undated.date(), None);
    }

    #[test]
    fn test_latest_known_version_puts_undated_last() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SqliteCatalog::open(&write_database(dir.path())).unwrap();
        assert_eq!(
            catalog.latest_known_version("FreeRTOS"),
            LatestVersion::Known("10.5.0".to_string())
        );
    }

    #[test]
    fn test_library_names_skip_blank_entries() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SqliteCatalog::open(&write_database(dir.path())).unwrap();
        assert_eq!(
            catalog.library_names(),
            vec!["FreeRTOS".to_string(), "LwIP".to_string()]
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = SqliteCatalog::open(Path::new("/nonexistent/releases.db")).unwrap_err();
        assert!(matches!(
            err,
            CheckerError::Catalog {
                source: CatalogErrorKind::NotFound(_),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_table_is_rejected_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch(r#"CREATE TABLE "FirmwareLibraries" (ID INTEGER, name TEXT);"#)
            .unwrap();

        let err = SqliteCatalog::open(&path).unwrap_err();
        assert!(err.to_string().contains("partial.db"));
    }

    #[test]
    fn test_non_database_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, "this is not a database file at all, just some text").unwrap();
        assert!(SqliteCatalog::open(&path).is_err());
    }

    #[test]
    fn test_read_failures_degrade_to_empty() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"CREATE TABLE "FirmwareLibraries" (ID INTEGER PRIMARY KEY, name TEXT);
               INSERT INTO "FirmwareLibraries" VALUES (1, 'FatFs');"#,
        )
        .unwrap();
        let catalog = SqliteCatalog::from_connection(conn);

        assert!(catalog.releases_for_library("FatFs").is_empty());
        assert_eq!(catalog.library_names(), vec!["FatFs".to_string()]);

        let empty = SqliteCatalog::from_connection(Connection::open_in_memory().unwrap());
        assert!(empty.library_names().is_empty());
        assert!(empty.releases_for_library("FatFs").is_empty());
    }
}
