// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token persisted in a single file between CLI invocations.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use keeper_config::model::SessionConfig;
use keeper_core::{AuthToken, KeeperError, TokenStore};
use tracing::debug;

/// File-backed [`TokenStore`]. On Unix the file is created with mode 0600.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.resolved_token_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, what: &str, e: std::io::Error) -> KeeperError {
        KeeperError::TokenUnavailable(format!("{what} {}: {e}", self.path.display()))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<AuthToken, KeeperError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(KeeperError::TokenUnavailable("not logged in".to_string()));
            }
            Err(e) => return Err(self.unavailable("cannot read", e)),
        };

        let token = content.trim();
        if token.is_empty() {
            return Err(KeeperError::TokenUnavailable(format!(
                "token file {} is empty",
                self.path.display()
            )));
        }
        Ok(AuthToken::new(token))
    }

    fn save(&self, token: &AuthToken) -> Result<(), KeeperError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.unavailable("cannot create", e))?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| self.unavailable("cannot write", e))?;

        // mode() only applies on creation; tighten a pre-existing file too.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.unavailable("cannot restrict", e))?;
        }

        file.write_all(token.expose().as_bytes())
            .map_err(|e| self.unavailable("cannot write", e))?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    fn remove(&self) -> Result<(), KeeperError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.unavailable("cannot remove", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("nested/keeper/token"))
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&AuthToken::new("jwt.abc.def")).unwrap();
        assert_eq!(store.load().unwrap().expose(), "jwt.abc.def");
    }

    #[test]
    fn save_overwrites_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&AuthToken::new("a-much-longer-first-token")).unwrap();
        store.save(&AuthToken::new("second")).unwrap();
        assert_eq!(store.load().unwrap().expose(), "second");
    }

    #[test]
    fn missing_file_is_token_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_in(&dir).load().unwrap_err();
        assert!(matches!(err, KeeperError::TokenUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn blank_file_is_token_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, " \n").unwrap();
        assert!(matches!(
            FileTokenStore::new(&path).load(),
            Err(KeeperError::TokenUnavailable(_))
        ));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&AuthToken::new("t")).unwrap();
        store.remove().unwrap();
        store.remove().unwrap();
        assert!(store.load().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        FileTokenStore::new(&path).save(&AuthToken::new("new")).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
