use crate::libspeaking::error::{Error, Lookup, Result};
use crate::libspeaking::table::SpeakingTest;
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Row};
use std::path::Path;
use std::time::Instant;

/// A titled copy of a content table kept in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakingMock {
    pub id: i64,
    pub title: String,
    pub created_at: String,
    pub content: SpeakingTest,
}

impl SpeakingMock {
    pub fn add(connection: &Connection, title: &str, content: &SpeakingTest) -> Result<i64> {
        let questions = content.to_json()?;
        match connection.execute(
            "INSERT INTO SpeakingMock(title, questions) VALUES (?1, ?2)",
            params![title, questions],
        ) {
            Ok(_) => {
                let id = connection.last_insert_rowid();
                debug!("[DB] Created new SpeakingMock {} '{}'", id, title);
                Ok(id)
            }
            Err(err) => {
                error!("[DB] Error while creating new SpeakingMock: {:?}", err);
                Err(err.into())
            }
        }
    }

    pub fn get_by_id(connection: &Connection, id: i64) -> Result<SpeakingMock> {
        let mut statement =
            connection.prepare("SELECT * FROM SpeakingMock WHERE id = :id LIMIT 1")?;
        let row = statement
            .query_row(&[(":id", &id)], Self::columns)
            .optional()?
            .ok_or(Error::NotFound {
                kind: Lookup::Mock,
                key: id,
            })?;

        Self::from_columns(row)
    }

    pub fn get_all(connection: &Connection) -> Result<Vec<SpeakingMock>> {
        let mut statement = connection.prepare("SELECT * FROM SpeakingMock ORDER BY id")?;
        let rows = statement.query_map([], Self::columns)?;

        rows.map(|row| Self::from_columns(row?)).collect()
    }

    /// Replace the title, the content, or both. Returns the stored result.
    pub fn update(
        connection: &Connection,
        id: i64,
        title: Option<&str>,
        content: Option<&SpeakingTest>,
    ) -> Result<SpeakingMock> {
        // an empty title leaves the stored one alone
        let title = title.filter(|t| !t.trim().is_empty());
        let questions = content.map(SpeakingTest::to_json).transpose()?;
        let changed = connection.execute(
            "UPDATE SpeakingMock SET title = COALESCE(?2, title), questions = COALESCE(?3, questions) \
             WHERE id = ?1",
            params![id, title, questions],
        )?;
        if changed == 0 {
            warn!("[DB] No SpeakingMock {} to update", id);
            return Err(Error::NotFound {
                kind: Lookup::Mock,
                key: id,
            });
        }
        debug!("[DB] Updated SpeakingMock {}", id);
        Self::get_by_id(connection, id)
    }

    pub fn delete(connection: &Connection, id: i64) -> Result<()> {
        match connection.execute("DELETE FROM SpeakingMock WHERE id = ?1", params![id]) {
            Ok(0) => Err(Error::NotFound {
                kind: Lookup::Mock,
                key: id,
            }),
            Ok(_) => {
                debug!("[DB] Deleted SpeakingMock {}", id);
                Ok(())
            }
            Err(err) => {
                error!("[DB] Error while deleting SpeakingMock {}: {:?}", id, err);
                Err(err.into())
            }
        }
    }

    pub fn count(connection: &Connection) -> Result<i64> {
        Ok(connection.query_row("SELECT COUNT(*) FROM SpeakingMock", [], |row| row.get(0))?)
    }

    fn columns(row: &Row) -> rusqlite::Result<(i64, String, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn from_columns(
        (id, title, questions, created_at): (i64, String, String, String),
    ) -> Result<SpeakingMock> {
        let content = SpeakingTest::from_json_str(&questions).map_err(|err| {
            error!("[DB] SpeakingMock {} holds invalid content: {}", id, err);
            err
        })?;
        Ok(SpeakingMock {
            id,
            title,
            created_at,
            content,
        })
    }
}

pub fn create_or_open(src: &Path) -> Result<Connection> {
    if src.exists() {
        info!("[DB] Opening existing Database");
        open_db(src)
    } else {
        info!("[DB] Creating new Database");
        create_db(src)
    }
}

pub fn create_db(dest: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = open_in_memory()?;
    match db.backup(DatabaseName::Main, dest, None) {
        Ok(_) => {
            debug!(
                "[DB] Creating and Saving took {} ms.",
                now.elapsed().as_millis()
            );
            // keep working on the file, not the in-memory copy
            close_db(db)?;
            open_db(dest)
        }
        Err(err) => {
            warn!("[DB] Failed to create database file: {}", err);
            close_db(db)?;
            Err(err.into())
        }
    }
}

pub fn open_db(src: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = Connection::open(src)?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

/// A fresh schema in memory.
pub fn open_in_memory() -> Result<Connection> {
    init_db(Connection::open_in_memory()?)
}

pub fn close_db(connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    match connection.close() {
        Ok(_) => Ok(()),
        Err((conn, _)) => {
            error!("[DB] Cannot close connection. Retrying...");
            conn.close().map_err(|(_, err)| {
                error!("[DB] Cannot close connection! Giving up.");
                err.into()
            })
        }
    }
}

fn init_db(conn: Connection) -> Result<Connection> {
    info!("[DB INIT] Creating tables");
    conn.execute(
        "CREATE TABLE SpeakingMock (
              id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
              title TEXT NOT NULL,
              questions TEXT NOT NULL,
              createdAt TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        (),
    )?;
    info!("[DB INIT] Created table SpeakingMock");
    info!("[DB INIT] Database Creation Successful!");

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> SpeakingTest {
        SpeakingTest::embedded().unwrap()
    }

    #[test]
    fn add_then_get() {
        let conn = open_in_memory().unwrap();
        let id = SpeakingMock::add(&conn, "Mock #1", &content()).unwrap();
        let mock = SpeakingMock::get_by_id(&conn, id).unwrap();
        assert_eq!(mock.id, id);
        assert_eq!(mock.title, "Mock #1");
        assert_eq!(mock.content, content());
        assert!(!mock.created_at.is_empty());
    }

    #[test]
    fn missing_id_is_not_found() {
        let conn = open_in_memory().unwrap();
        let err = SpeakingMock::get_by_id(&conn, 42).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                kind: Lookup::Mock,
                key: 42
            }
        ));
        assert!(SpeakingMock::delete(&conn, 42).unwrap_err().is_not_found());
        assert!(SpeakingMock::update(&conn, 42, Some("x"), None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn update_title_keeps_content() {
        let conn = open_in_memory().unwrap();
        let id = SpeakingMock::add(&conn, "Draft", &content()).unwrap();
        let updated = SpeakingMock::update(&conn, id, Some("Final"), None).unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, content());
    }

    #[test]
    fn empty_title_is_ignored_on_update() {
        let conn = open_in_memory().unwrap();
        let id = SpeakingMock::add(&conn, "Keep", &content()).unwrap();
        let updated = SpeakingMock::update(&conn, id, Some(""), None).unwrap();
        assert_eq!(updated.title, "Keep");
    }

    #[test]
    fn get_all_in_insert_order_and_delete() {
        let conn = open_in_memory().unwrap();
        let first = SpeakingMock::add(&conn, "A", &content()).unwrap();
        let second = SpeakingMock::add(&conn, "B", &content()).unwrap();

        let titles: Vec<String> = SpeakingMock::get_all(&conn)
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["A", "B"]);

        SpeakingMock::delete(&conn, first).unwrap();
        assert_eq!(SpeakingMock::count(&conn).unwrap(), 1);
        assert_eq!(SpeakingMock::get_by_id(&conn, second).unwrap().title, "B");
    }

    #[test]
    fn corrupted_row_is_malformed() {
        let conn = open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO SpeakingMock(title, questions) VALUES ('bad', ?1)",
            params![r#"{"images": {"img1": "", "img2": "", "img1Alt": "", "img2Alt": ""}, "questions": [{"number": 2}]}"#],
        )
        .unwrap();
        let id = conn.last_insert_rowid();
        assert!(SpeakingMock::get_by_id(&conn, id).unwrap_err().is_malformed());
    }

    #[test]
    fn create_or_open_persists_between_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speakingmock.db");

        let conn = create_or_open(&path).unwrap();
        let id = SpeakingMock::add(&conn, "Saved", &content()).unwrap();
        close_db(conn).unwrap();

        let conn = create_or_open(&path).unwrap();
        assert_eq!(SpeakingMock::get_by_id(&conn, id).unwrap().title, "Saved");
        close_db(conn).unwrap();
    }
}
