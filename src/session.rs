use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the single durable session entry inside the data directory.
pub const SESSION_FILE: &str = "scamkadr_user.json";

/// The authenticated identity cached between runs. Saved verbatim from the
/// auth/profile responses; absence of a stored copy means signed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub user_id: String,
    pub email: String,
    pub is_creator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One-entry durable store. Handed to controllers explicitly; nothing else
/// in the client persists state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session, if any. Total: a missing file, unreadable
    /// content, or a failed parse all mean "signed out", never an error.
    pub fn restore(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::debug!(
                    component = "session",
                    path = %self.path.display(),
                    error = %err,
                    "stored session is unreadable, treating as signed out"
                );
                None
            }
        }
    }

    /// Serialize and overwrite the stored session.
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(session)?)?;
        Ok(())
    }

    /// Remove the stored session. Removing an already-absent entry is fine.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store(prefix: &str) -> SessionStore {
        SessionStore::new(std::env::temp_dir().join(format!("{}-{}", prefix, Uuid::new_v4())))
    }

    fn sample_session() -> Session {
        Session {
            id: 7,
            user_id: "#1007".to_string(),
            email: "a@b.com".to_string(),
            is_creator: false,
            avatar_url: None,
        }
    }

    #[test]
    fn save_then_restore_roundtrips() {
        let store = temp_store("session-roundtrip");
        let session = sample_session();

        store.save(&session).expect("save session");
        assert_eq!(store.restore(), Some(session));

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn restore_without_saved_session_is_none() {
        let store = temp_store("session-missing");
        assert_eq!(store.restore(), None);
    }

    #[test]
    fn restore_of_corrupted_entry_is_none() {
        let store = temp_store("session-corrupt");
        fs::create_dir_all(store.path().parent().expect("parent dir")).expect("create dir");
        fs::write(store.path(), "{not json!!").expect("write garbage");

        assert_eq!(store.restore(), None);

        let _ = fs::remove_file(store.path());
    }

    #[test]
    fn clear_removes_the_entry() {
        let store = temp_store("session-clear");
        store.save(&sample_session()).expect("save session");

        store.clear().expect("clear session");
        assert_eq!(store.restore(), None);
    }

    #[test]
    fn clear_of_absent_entry_is_ok() {
        let store = temp_store("session-clear-absent");
        store.clear().expect("clear absent session");
    }

    #[test]
    fn save_overwrites_previous_session() {
        let store = temp_store("session-overwrite");
        store.save(&sample_session()).expect("save first");

        let updated = Session {
            avatar_url: Some("https://cdn.example.com/a.jpg".to_string()),
            ..sample_session()
        };
        store.save(&updated).expect("save second");

        assert_eq!(store.restore(), Some(updated));

        let _ = fs::remove_file(store.path());
    }
}
