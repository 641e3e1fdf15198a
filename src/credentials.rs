// Credential Store - username -> password, persisted as one JSON object
//
// Passwords are stored in plaintext. Every registration logs a warning about it;
// a real deployment needs salted hashing before this file leaves a single machine.

use crate::error::{AuthenticationError, TrackerError, TrackerResult, ValidationError};
use crate::store::{replace_file, LoadStatus};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    users: BTreeMap<String, String>,
    load_status: LoadStatus,
}

impl CredentialStore {
    /// Load the mapping from `path`. An absent or unreadable file yields an
    /// empty store; the difference is kept in `load_status()`.
    pub fn load(path: &Path) -> Self {
        let (users, load_status) = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(users) => {
                    let records = users.len();
                    (users, LoadStatus::Loaded { records })
                }
                Err(e) => (
                    BTreeMap::new(),
                    LoadStatus::Recovered {
                        reason: format!("credential file {} is corrupt: {}", path.display(), e),
                    },
                ),
            },
            Err(e) if e.kind() == ErrorKind::NotFound => (BTreeMap::new(), LoadStatus::Fresh),
            Err(e) => (
                BTreeMap::new(),
                LoadStatus::Recovered {
                    reason: format!("credential file {} is unreadable: {}", path.display(), e),
                },
            ),
        };

        if let Some(reason) = load_status.warning() {
            warn!(%reason, "starting with an empty credential store");
        }

        CredentialStore {
            path: path.to_path_buf(),
            users,
            load_status,
        }
    }

    /// Insert or overwrite `username` and rewrite the whole file.
    ///
    /// An existing username is silently replaced (last write wins).
    pub fn register(&mut self, username: &str, password: &str) -> TrackerResult<()> {
        if username.is_empty() {
            return Err(ValidationError::required("username").into());
        }
        if username.contains(['/', '\\']) {
            return Err(ValidationError::new("username", "Must not contain path separators").into());
        }
        if password.is_empty() {
            return Err(ValidationError::required("password").into());
        }

        let previous = self
            .users
            .insert(username.to_string(), password.to_string());

        if let Err(e) = self.save() {
            // Keep memory in step with what is on disk
            match previous {
                Some(old) => self.users.insert(username.to_string(), old),
                None => self.users.remove(username),
            };
            return Err(e);
        }

        if previous.is_some() {
            warn!(user = username, "existing user re-registered, password overwritten");
        }
        warn!(
            file = %self.path.display(),
            "passwords are stored in plaintext"
        );
        info!(user = username, "user registered");
        Ok(())
    }

    /// Exact, case-sensitive match of both username and password
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthenticationError> {
        match self.users.get(username) {
            Some(stored) if stored == password => Ok(()),
            _ => {
                warn!(user = username, "failed login attempt");
                Err(AuthenticationError)
            }
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    fn save(&self) -> TrackerResult<()> {
        replace_file(&self.path, |writer| {
            serde_json::to_writer(writer, &self.users).map_err(|e| TrackerError::json(&self.path, e))
        })
    }
}
