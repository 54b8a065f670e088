//! Persistent gesture → action table backed by SQLite.
//!
//! The schema is fixed so that existing `gestures.db` files open unchanged:
//!
//! ```text
//! gestures(id INTEGER PRIMARY KEY AUTOINCREMENT,
//!          gesture_name TEXT UNIQUE,
//!          action_type TEXT,
//!          action TEXT)
//! ```
//!
//! Every operation opens its own connection and closes it on return. There
//! is no transaction spanning two calls.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::action::{ActionDescriptor, ActionType};
use crate::error::Result;
use crate::gesture::GestureName;

/// Runtime view of the table: action type metadata is folded into the
/// descriptor tag.
pub type GestureTable = BTreeMap<GestureName, ActionDescriptor>;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS gestures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    gesture_name TEXT UNIQUE,
    action_type TEXT,
    action TEXT
)";

// ---------------------------------------------------------------------------
// GestureTableEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureTableEntry {
    pub gesture: GestureName,
    /// `None` when the stored label is not one of the known types.
    pub action_type: Option<ActionType>,
    pub action: ActionDescriptor,
}

// ---------------------------------------------------------------------------
// GestureStore
// ---------------------------------------------------------------------------

pub struct GestureStore {
    path: PathBuf,
}

impl GestureStore {
    /// Open or create the database at `path` and make sure the table exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            path: path.to_path_buf(),
        };
        store.connect()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Insert or overwrite the entry for `gesture`.
    ///
    /// The action text is tagged by `action_type` before it is written, so an
    /// unknown accessibility command or a blank action never reaches the table.
    pub fn upsert(
        &self,
        gesture: GestureName,
        action_type: ActionType,
        action: &str,
    ) -> Result<ActionDescriptor> {
        let descriptor = ActionDescriptor::for_type(action_type, action)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO gestures (gesture_name, action_type, action)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(gesture_name) DO UPDATE SET
                action_type = excluded.action_type,
                action = excluded.action",
            params![gesture.as_str(), action_type.label(), descriptor.to_string()],
        )?;
        tracing::debug!(gesture = %gesture, action = %descriptor, "gesture saved");
        Ok(descriptor)
    }

    /// All entries, in insertion order.
    ///
    /// Rows keyed by a name outside the known gesture set are skipped.
    pub fn list(&self) -> Result<Vec<GestureTableEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT gesture_name, action_type, action FROM gestures ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (name, type_label, text) = row?;
            let name = name.unwrap_or_default();
            let Ok(gesture) = name.parse::<GestureName>() else {
                tracing::warn!(gesture = %name, "skipping row with unknown gesture name");
                continue;
            };
            let type_label = type_label.unwrap_or_default();
            let text = text.unwrap_or_default();
            entries.push(GestureTableEntry {
                gesture,
                action_type: type_label.parse().ok(),
                action: ActionDescriptor::from_stored(&type_label, &text),
            });
        }
        Ok(entries)
    }

    /// Bulk read for the acquisition loop.
    pub fn load_all(&self) -> Result<GestureTable> {
        Ok(self
            .list()?
            .into_iter()
            .map(|e| (e.gesture, e.action))
            .collect())
    }

    /// Delete the entry for `gesture`. Returns whether a row existed.
    pub fn remove(&self, gesture: GestureName) -> Result<bool> {
        let conn = self.connect()?;
        let n = conn.execute(
            "DELETE FROM gestures WHERE gesture_name = ?1",
            params![gesture.as_str()],
        )?;
        Ok(n > 0)
    }

    /// Delete every entry. Returns the number of rows removed.
    pub fn clear_all(&self) -> Result<usize> {
        let conn = self.connect()?;
        let n = conn.execute("DELETE FROM gestures", [])?;
        tracing::info!(removed = n, "gesture table cleared");
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::AccessibilityCommand;
    use crate::error::HandkeysError;
    use tempfile::TempDir;

    fn open_tmp() -> (TempDir, GestureStore) {
        let dir = TempDir::new().unwrap();
        let store = GestureStore::open(&dir.path().join("gestures.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn upsert_then_load_all_round_trips() {
        let (_dir, store) = open_tmp();
        store
            .upsert(GestureName::FistClosed, ActionType::Accessibility, "Scroll Up")
            .unwrap();

        let table = store.load_all().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[&GestureName::FistClosed].to_string(), "Scroll Up");
        assert_eq!(
            table[&GestureName::FistClosed],
            ActionDescriptor::Accessibility(AccessibilityCommand::ScrollUp)
        );
    }

    #[test]
    fn second_upsert_overwrites() {
        let (_dir, store) = open_tmp();
        store
            .upsert(GestureName::FistClosed, ActionType::Accessibility, "Scroll Up")
            .unwrap();
        store
            .upsert(GestureName::FistClosed, ActionType::OpenApp, "/usr/bin/code")
            .unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action_type, Some(ActionType::OpenApp));
        assert_eq!(entries[0].action, ActionDescriptor::Launch("/usr/bin/code".into()));
    }

    #[test]
    fn clear_all_empties_table() {
        let (_dir, store) = open_tmp();
        store
            .upsert(GestureName::FistClosed, ActionType::Accessibility, "Zoom In")
            .unwrap();
        store
            .upsert(GestureName::OneFingerUp, ActionType::Accessibility, "Volume Up")
            .unwrap();

        assert_eq!(store.clear_all().unwrap(), 2);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn remove_reports_whether_row_existed() {
        let (_dir, store) = open_tmp();
        store
            .upsert(GestureName::HandUp, ActionType::OpenApp, "/usr/bin/xterm")
            .unwrap();
        assert!(store.remove(GestureName::HandUp).unwrap());
        assert!(!store.remove(GestureName::HandUp).unwrap());
    }

    #[test]
    fn rejected_action_is_not_written() {
        let (_dir, store) = open_tmp();
        let err = store.upsert(GestureName::FistOpened, ActionType::Accessibility, "Do The Thing");
        assert!(matches!(err, Err(HandkeysError::UnknownCommand(_))));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn reads_rows_written_by_other_tools() {
        let (_dir, store) = open_tmp();
        let conn = Connection::open(store.path()).unwrap();
        conn.execute(
            "INSERT INTO gestures (gesture_name, action_type, action) VALUES (?1, ?2, ?3)",
            params!["fist_opened", "whatever", "/usr/bin/firefox"],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO gestures (gesture_name, action_type, action) VALUES (?1, ?2, ?3)",
            params!["thumbs_up", "Open App", "/usr/bin/xterm"],
        )
        .unwrap();

        let table = store.load_all().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table[&GestureName::FistOpened],
            ActionDescriptor::Launch("/usr/bin/firefox".into())
        );
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/gestures.db");
        GestureStore::open(&path)
            .unwrap()
            .upsert(GestureName::OneFingerDown, ActionType::Accessibility, "Volume Down")
            .unwrap();

        let table = GestureStore::open(&path).unwrap().load_all().unwrap();
        assert_eq!(table[&GestureName::OneFingerDown].to_string(), "Volume Down");
    }
}
