/*
[INPUT]:  Bearer tokens and a storage directory
[OUTPUT]: Persistent single-key credential storage
[POS]:    Auth layer - host-side token persistence
[UPDATE]: When the storage format or file location changes
*/

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage key for the bearer token
const TOKEN_KEY: &str = "access_token";

/// Persists the bearer credential in a single-key JSON file.
///
/// The hosting application reads the token once per process start and hands
/// it to the client; nothing else in the system touches this file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store backed by an explicit file path
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Default location: `./.finsight-config/credentials.json`
    pub fn default_path() -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(base_dir.join(".finsight-config").join("credentials.json"))
    }

    /// Load the stored token, if any
    pub fn load(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let map: BTreeMap<String, String> = serde_json::from_str(&content).ok()?;
        map.get(TOKEN_KEY).cloned()
    }

    /// Store a token, creating the directory if needed
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let mut map = BTreeMap::new();
        map.insert(TOKEN_KEY.to_string(), token.to_string());
        let content = serde_json::to_string_pretty(&map)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, content)?;

        restrict_permissions(&self.path)
    }

    /// Remove the stored token; idempotent
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> (PathBuf, CredentialStore) {
        let mut dir = std::env::temp_dir();
        dir.push(format!("finsight-test-{}", Uuid::new_v4()));
        let store = CredentialStore::new(dir.join("credentials.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let (dir, store) = temp_store();
        assert!(store.load().is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let (dir, store) = temp_store();

        store.save("jwt-token").unwrap();
        assert_eq!(store.load().as_deref(), Some("jwt-token"));

        store.clear().unwrap();
        assert!(store.load().is_none());

        // clear is idempotent
        store.clear().unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = temp_store();
        store.save("jwt-token").unwrap();

        let mode = fs::metadata(dir.join("credentials.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);

        let _ = fs::remove_dir_all(dir);
    }
}
