//! Admin session context.
//!
//! A [`Session`] is the single owner of the admin token. Components that need
//! to act as the admin receive it (or a client built from it) explicitly.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default)]
pub struct Session {
    token: Option<String>,
    store: Option<PathBuf>,
}

impl Session {
    /// Session that is never persisted.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session persisted at `path`. A missing file means logged out.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let token = match fs::read_to_string(&path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read token file: {}", path.display())
                })
            }
        };
        Ok(Self {
            token,
            store: Some(path),
        })
    }

    /// `SAVANNA_TOKEN` wins over the token file at [`default_token_path`](Self::default_token_path).
    pub fn from_env() -> Result<Self> {
        let mut session = match Self::default_token_path() {
            Some(path) => Self::load(path)?,
            None => Self::anonymous(),
        };
        if let Ok(token) = std::env::var("SAVANNA_TOKEN") {
            if !token.trim().is_empty() {
                session.token = Some(token.trim().to_string());
            }
        }
        Ok(session)
    }

    /// `$SAVANNA_TOKEN_FILE`, else `$HOME/.savanna/token`.
    pub fn default_token_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SAVANNA_TOKEN_FILE") {
            return Some(PathBuf::from(path));
        }
        std::env::var("HOME")
            .ok()
            .map(|home| Path::new(&home).join(".savanna").join("token"))
    }

    pub fn login(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        if let Some(path) = &self.store {
            write_private(path, &token)
                .with_context(|| format!("Failed to write token file: {}", path.display()))?;
        }
        self.token = Some(token);
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.token = None;
        if let Some(path) = &self.store {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to remove token file: {}", path.display())
                    })
                }
            }
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Writes the token readable by the owner only. The parent directory is created
/// with mode 0700 when missing.
fn write_private(path: &Path, token: &str) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(parent)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // A file left by an older version keeps its mode on open.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(token.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");

        let mut session = Session::load(&path).unwrap();
        assert!(!session.is_authenticated());

        session.login("abc.def.ghi").unwrap();
        assert_eq!(session.token(), Some("abc.def.ghi"));

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.token(), Some("abc.def.ghi"));

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(!path.exists());
        assert!(!Session::load(&path).unwrap().is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("savanna");
        let path = parent.join("token");

        let mut session = Session::load(&path).unwrap();
        session.login("secret-jwt").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        let dir_mode = fs::metadata(&parent).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_token_file_is_tightened() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        Session::load(&path).unwrap().login("new-jwt").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new-jwt");
    }

    #[test]
    fn test_anonymous_session_does_not_touch_disk() {
        let mut session = Session::anonymous();
        session.login("token").unwrap();
        assert!(session.is_authenticated());
        session.logout().unwrap();
        assert_eq!(session.token(), None);
    }
}
