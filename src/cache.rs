use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{AccountError, Result};
use crate::membership::Membership;
use crate::token::Token;

/// Cache directory below the home directory when none is configured
pub const CACHE_SUBDIR: &str = ".cache/shopware-account-api";
/// Name of the session file inside the cache directory
pub const CACHE_FILE: &str = "token.json";

/// Snapshot of an authenticated session as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSession {
    pub token: Token,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub active_membership: Option<Membership>,
}

/// SessionCache persists the last authenticated session between runs so a
/// still-valid token can be reused without a credential exchange.
///
/// Reads fail soft: anything unusable is reported as "no cached session".
/// Writes fail loud.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    /// Resolve the cache location: the configured directory if given,
    /// otherwise `$HOME/.cache/shopware-account-api`. The directory is
    /// created with owner-only permissions if missing.
    pub fn resolve(configured_dir: Option<&Path>) -> Result<Self> {
        let dir = match configured_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::home_dir()
                .ok_or_else(|| {
                    AccountError::Io(io::Error::new(
                        io::ErrorKind::NotFound,
                        "could not determine home directory",
                    ))
                })?
                .join(CACHE_SUBDIR),
        };
        Self::in_dir(dir)
    }

    /// Use `dir` as the cache directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        ensure_private_dir(&dir)?;
        Ok(SessionCache {
            path: dir.join(CACHE_FILE),
        })
    }

    /// Path of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached session if it exists, parses, and holds a valid token
    pub fn load(&self) -> Option<CachedSession> {
        self.load_at(Utc::now())
    }

    /// Like [`SessionCache::load`], checking token validity against `now`
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<CachedSession> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no cached session at {}", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!("cannot read session cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        let session: CachedSession = match serde_json::from_slice(&contents) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("ignoring corrupt session cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        if !session.token.is_valid_at(now) {
            log::debug!("cached token expired at {}", session.token.expire.instant());
            return None;
        }

        Some(session)
    }

    /// Write the session, replacing any previous file. The file is readable
    /// and writable by the owner only.
    pub fn save(&self, session: &CachedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_private_dir(parent)?;
        }

        let data = serde_json::to_vec_pretty(session)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(&data)?;
        file.flush()?;

        // mode() only applies on creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        log::debug!("saved session cache to {}", self.path.display());
        Ok(())
    }

    /// Delete the session file. A missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn ensure_private_dir(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}
