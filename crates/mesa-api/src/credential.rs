// Credential storage
//
// One secret per installation: the bearer token issued by `/login` or
// `/register`. Backends never cache in front of their medium -- every
// `load` hits the keyring / file / lock so the gateway always sees the
// value most recently written by the session controller.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::error::Error;

/// Keyring service name under which tokens are filed.
pub const KEYRING_SERVICE: &str = "mesa";

/// Slot name used when the deployment does not configure one.
pub const DEFAULT_TOKEN_SLOT: &str = "userToken";

/// Durable storage for the session token.
///
/// `save` overwrites, `load` distinguishes "absent" from failure, and
/// `clear` is idempotent.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    fn save(&self, token: &SecretString) -> Result<(), Error>;

    fn load(&self) -> Result<Option<SecretString>, Error>;

    fn clear(&self) -> Result<(), Error>;
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token stored in the platform secure-storage service
/// (Keychain, Secret Service, Windows Credential Manager).
#[derive(Debug, Clone)]
pub struct KeyringStore {
    slot: String,
}

impl KeyringStore {
    pub fn new(slot: impl Into<String>) -> Self {
        Self { slot: slot.into() }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    fn entry(&self) -> Result<keyring::Entry, Error> {
        keyring::Entry::new(KEYRING_SERVICE, &self.slot).map_err(Error::credential)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_SLOT)
    }
}

impl CredentialStore for KeyringStore {
    fn save(&self, token: &SecretString) -> Result<(), Error> {
        debug!(slot = %self.slot, "writing token to keyring");
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(Error::credential)
    }

    fn load(&self) -> Result<Option<SecretString>, Error> {
        match self.entry()?.get_password() {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::credential(e)),
        }
    }

    fn clear(&self) -> Result<(), Error> {
        debug!(slot = %self.slot, "removing token from keyring");
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::credential(e)),
        }
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token stored in a single owner-readable file.
///
/// Writes go through a sibling temp file and a rename, so a reader never
/// observes a half-written token.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_restricted(path: &Path, contents: &str) -> io::Result<()> {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }
}

impl CredentialStore for FileStore {
    fn save(&self, token: &SecretString) -> Result<(), Error> {
        debug!(path = %self.path.display(), "writing token file");
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::credential)?;
        }
        let tmp = self.temp_path();
        Self::write_restricted(&tmp, token.expose_secret()).map_err(Error::credential)?;
        std::fs::rename(&tmp, &self.path).map_err(Error::credential)
    }

    fn load(&self) -> Result<Option<SecretString>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(SecretString::from(token.trim().to_owned()))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::credential(e)),
        }
    }

    fn clear(&self) -> Result<(), Error> {
        debug!(path = %self.path.display(), "removing token file");
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::credential(e)),
        }
    }
}

// ── Memory ──────────────────────────────────────────────────────────

/// Process-local token slot. Lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already present.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = self.token.read().map(|t| t.is_some()).unwrap_or(false);
        f.debug_struct("MemoryStore")
            .field("present", &present)
            .finish()
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, token: &SecretString) -> Result<(), Error> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| Error::credential("token lock poisoned"))?;
        *slot = Some(SecretString::from(token.expose_secret().to_owned()));
        trace!("token stored in memory");
        Ok(())
    }

    fn load(&self) -> Result<Option<SecretString>, Error> {
        let slot = self
            .token
            .read()
            .map_err(|_| Error::credential("token lock poisoned"))?;
        Ok(slot
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_owned())))
    }

    fn clear(&self) -> Result<(), Error> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| Error::credential("token lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
