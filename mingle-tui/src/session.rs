use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use mingle_types::User;

/// An authenticated session: the logged-in user and their bearer token, as
/// returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Manages session storage in the user's home directory.
///
/// The session is stored as JSON in `~/.mingle/session.json` with 0600
/// permissions so only the owner can read the token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    /// Creates a new SessionStore with the default path
    /// `~/.mingle/session.json`.
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        let mingle_dir = home_dir.join(".mingle");
        let file_path = mingle_dir.join("session.json");

        Ok(Self { file_path })
    }

    /// Loads the persisted session.
    ///
    /// - `Ok(Some(session))` if the file exists and holds a valid session
    /// - `Ok(None)` if the file doesn't exist or its contents are invalid
    /// - `Err(_)` only if the file exists but cannot be read
    pub fn load(&self) -> Result<Option<AuthSession>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.file_path).context("Failed to read session file")?;

        if content.trim().is_empty() {
            log::warn!("Session file is empty, treating as no session");
            return Ok(None);
        }

        let session: AuthSession = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Session file is corrupted ({}), treating as no session", e);
                return Ok(None);
            }
        };

        // Bearer tokens have a sane length; anything outside it is
        // corruption, not a session worth restoring.
        if session.token.len() < 8 || session.token.len() > 4096 {
            log::warn!(
                "Session token has invalid length: {}, treating as corrupted",
                session.token.len()
            );
            return Ok(None);
        }

        log::debug!(
            "Successfully loaded session for {} from {}",
            session.user.email,
            self.file_path.display()
        );
        Ok(Some(session))
    }

    /// Saves the session with 0600 permissions.
    ///
    /// This method:
    /// - Creates the `.mingle` directory if it doesn't exist
    /// - Removes any old/stale session files
    /// - Uses atomic writes to prevent partial writes
    /// - Sets file permissions to 0600 (owner read/write only)
    pub fn save(&self, session: &AuthSession) -> Result<()> {
        // Ensure the .mingle directory exists
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create .mingle directory")?;
        }

        // Remove any old/stale session files before saving
        self.cleanup_old_files()?;

        let json =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        // Use atomic write: write to temporary file, then rename
        let temp_path = self.file_path.with_extension("tmp");

        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary session file")?;

        file.write_all(json.as_bytes())
            .context("Failed to write session")?;

        file.sync_all()
            .context("Failed to sync session file to disk")?;

        drop(file);

        // Set permissions to 0600 (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&temp_path, permissions)
                .context("Failed to set session file permissions")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.file_path)
            .context("Failed to rename temporary session file")?;

        log::info!(
            "Successfully saved session to {}",
            self.file_path.display()
        );
        Ok(())
    }

    /// Deletes the session file.
    ///
    /// Returns `Ok(())` even if the file doesn't exist.
    pub fn delete(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).context("Failed to delete session file")?;
            log::info!(
                "Successfully deleted session file at {}",
                self.file_path.display()
            );
        } else {
            log::debug!("Session file does not exist, nothing to delete");
        }
        Ok(())
    }

    /// Cleans up any old or stale session files.
    ///
    /// This ensures only ONE session file exists per user by removing
    /// leftover temporary files, backups, and sessions written by older
    /// versions under a different name.
    fn cleanup_old_files(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                return Ok(());
            }

            let entries = fs::read_dir(parent).context("Failed to read .mingle directory")?;

            for entry in entries {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();

                // Skip if it's the current session file
                if path == self.file_path {
                    continue;
                }

                if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
                    if file_name.starts_with("session") {
                        log::debug!("Removing old/stale session file: {}", path.display());
                        if let Err(e) = fs::remove_file(&path) {
                            log::warn!(
                                "Failed to remove old session file {}: {}",
                                path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the path to the session file.
    pub fn path(&self) -> &PathBuf {
        &self.file_path
    }
}
