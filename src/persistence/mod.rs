use crate::models::Cookie;
use crate::Result;
use std::fs;
use std::path::PathBuf;

/// Durable home for the session cookie snapshot between runs
///
/// A stored session is an all-or-nothing artifact: it is loaded wholesale,
/// overwritten wholesale after a fresh login, and discarded wholesale when
/// the site rejects it. Absence is a normal "no session yet" condition.
pub trait SessionStore: Send + Sync {
    /// Returns the stored cookie set, or `None` when there is no usable one
    fn load(&self) -> Option<Vec<Cookie>>;

    /// Overwrites any previous snapshot
    fn save(&self, cookies: &[Cookie]) -> Result<()>;

    /// Removes the snapshot; a missing artifact is not an error
    fn clear(&self);
}

/// One JSON file holding the serialized cookie set
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Vec<Cookie>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return None,
        };

        match serde_json::from_str::<Vec<Cookie>>(&raw) {
            Ok(cookies) => {
                // Expiry is ultimately the site's call, but a snapshot whose
                // cookies have all lapsed is worth a debug hint
                if let Some(newest) = cookies.iter().filter_map(|c| c.expiry).max() {
                    if newest < chrono::Utc::now().timestamp() {
                        tracing::debug!(
                            "Stored session cookies expired at {}, expecting a fresh login",
                            newest
                        );
                    }
                }
                Some(cookies)
            }
            Err(e) => {
                // Unreadable snapshot is treated the same as no snapshot
                tracing::warn!(
                    "Ignoring corrupt session file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&self, cookies: &[Cookie]) -> Result<()> {
        let raw = serde_json::to_string_pretty(cookies)?;
        fs::write(&self.path, raw)?;
        tracing::debug!(
            "Saved {} session cookies to {}",
            cookies.len(),
            self.path.display()
        );
        Ok(())
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove session file {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("cookies.json"))
    }

    #[test]
    fn test_load_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().is_none());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let cookies = vec![
            Cookie::new("sid", "tok"),
            Cookie {
                domain: Some(".boostingfactory.com".to_string()),
                expiry: Some(1893456000),
                ..Cookie::new("remember", "yes")
            },
        ];

        store.save(&cookies).unwrap();
        assert_eq!(store.load(), Some(cookies));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&[Cookie::new("old", "1")]).unwrap();
        store.save(&[Cookie::new("new", "2")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "new");
    }

    #[test]
    fn test_corrupt_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(dir.path().join("cookies.json"), "not json {").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&[Cookie::new("sid", "tok")]).unwrap();
        store.clear();
        assert!(store.load().is_none());

        // Clearing again must not panic or warn about anything fatal
        store.clear();
    }
}
