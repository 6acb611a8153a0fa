//! JSON document store for users, connections and ratings.
//!
//! # Layout
//!
//! ```text
//! <project>/.referral/
//!   ├─ config.toml      optional project config
//!   ├─ network.json     { users: [...], connections: [...], ratings: [...] }
//!   └─ lock             advisory lock file
//! ```
//!
//! Every mutation is a read-modify-write under an exclusive lock, and the
//! new document replaces the old one by rename so readers never observe a
//! half-written file.
//!
//! # Upsert semantics
//!
//! - `register` upserts by user name.
//! - `connect` upserts by the ordered `(user1, user2)` pair. The reverse
//!   pair is a separate record; the graph builder collapses both into one
//!   undirected edge.
//! - `rate` always appends.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{REFERRAL_DIR, StoreConfig};
use crate::error::ErrorCode;
use crate::lock::{LockError, LockKind, StoreLock};
use crate::lookup::ProfileLookup;
use crate::model::{Connection, Profile, Rating, UserRecord};

const DOCUMENT_FILE: &str = "network.json";
const LOCK_FILE: &str = "lock";

/// Lowest and highest accepted rating score.
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("network store not initialized at {}", path.display())]
    NotInitialized { path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("user '{0}' is not registered")]
    UserNotFound(String),

    #[error("rating {0} is out of range (1-5)")]
    InvalidRating(i64),

    #[error("user identifier must be non-empty")]
    InvalidIdentifier,

    #[error("invalid suggestion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized { .. } => ErrorCode::NotInitialized,
            Self::Io { .. } => ErrorCode::StoreWriteFailed,
            Self::Corrupt { .. } => ErrorCode::CorruptStore,
            Self::Lock(err) => err.code(),
            Self::UserNotFound(_) => ErrorCode::UserNotFound,
            Self::InvalidRating(_) => ErrorCode::InvalidRating,
            Self::InvalidIdentifier => ErrorCode::InvalidIdentifier,
            Self::InvalidPattern { .. } => ErrorCode::InvalidPattern,
        }
    }

    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDocument {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

/// Summary of the ratings left for one user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: usize,
    pub average: f64,
}

/// A read-only, indexed view of the document taken at one point in time.
///
/// This is what gets handed to the ranking engine: the connection list and
/// a profile lookup, fully materialized, with no store handle attached.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    document: NetworkDocument,
    by_name: HashMap<String, usize>,
}

impl NetworkSnapshot {
    #[must_use]
    pub fn new(document: NetworkDocument) -> Self {
        let by_name = document
            .users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.name.clone(), i))
            .collect();
        Self { document, by_name }
    }

    #[must_use]
    pub fn users(&self) -> &[UserRecord] {
        &self.document.users
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.document.connections
    }

    #[must_use]
    pub fn ratings(&self) -> &[Rating] {
        &self.document.ratings
    }

    #[must_use]
    pub fn user(&self, name: &str) -> Option<&UserRecord> {
        self.by_name.get(name).map(|&i| &self.document.users[i])
    }

    /// Users whose role or company matches the regular expression `query`,
    /// ignoring case. Results are sorted by name; a blank query matches
    /// nobody.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidPattern`] if `query` is not a valid pattern.
    pub fn suggest(&self, query: &str) -> Result<Vec<&UserRecord>, StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = RegexBuilder::new(query)
            .case_insensitive(true)
            .build()
            .map_err(|source| StoreError::InvalidPattern {
                pattern: query.to_string(),
                source,
            })?;
        let mut hits: Vec<&UserRecord> = self
            .document
            .users
            .iter()
            .filter(|u| pattern.is_match(&u.role) || pattern.is_match(&u.company))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hits)
    }

    /// Count and mean of the ratings left for `name`, if any.
    #[must_use]
    pub fn rating_summary(&self, name: &str) -> Option<RatingSummary> {
        let scores: Vec<u8> = self
            .document
            .ratings
            .iter()
            .filter(|r| r.user == name)
            .map(|r| r.score)
            .collect();
        if scores.is_empty() {
            return None;
        }
        let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(total) / scores.len() as f64;
        Some(RatingSummary {
            count: scores.len(),
            average,
        })
    }

    #[must_use]
    pub fn into_document(self) -> NetworkDocument {
        self.document
    }
}

impl ProfileLookup for NetworkSnapshot {
    fn profile(&self, id: &str) -> Option<Profile> {
        self.user(id).and_then(UserRecord::profile)
    }
}

/// Handle to the on-disk store under `<project>/.referral`.
#[derive(Debug, Clone)]
pub struct NetworkStore {
    dir: PathBuf,
    lock_timeout: Duration,
}

impl NetworkStore {
    /// Create the store directory and an empty document if missing.
    ///
    /// Returns the handle and whether anything was created.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or document cannot be
    /// written.
    #[instrument(skip(config))]
    pub fn init(project_root: &Path, config: &StoreConfig) -> Result<(Self, bool), StoreError> {
        let store = Self::at(project_root, config);
        fs::create_dir_all(&store.dir).map_err(|e| StoreError::io(&store.dir, e))?;

        if store.document_path().exists() {
            debug!("network store already initialized");
            return Ok((store, false));
        }

        let _lock = store.lock(LockKind::Exclusive)?;
        store.write_document(&NetworkDocument::default())?;
        info!(dir = %store.dir.display(), "initialized network store");
        Ok((store, true))
    }

    /// Open an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInitialized`] if `refer init` has not run.
    pub fn open(project_root: &Path, config: &StoreConfig) -> Result<Self, StoreError> {
        let store = Self::at(project_root, config);
        if !store.document_path().exists() {
            return Err(StoreError::NotInitialized { path: store.dir });
        }
        Ok(store)
    }

    fn at(project_root: &Path, config: &StoreConfig) -> Self {
        Self {
            dir: project_root.join(REFERRAL_DIR),
            lock_timeout: Duration::from_millis(config.lock_timeout_ms),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self) -> PathBuf {
        self.dir.join(DOCUMENT_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    fn lock(&self, kind: LockKind) -> Result<StoreLock, StoreError> {
        Ok(StoreLock::acquire(&self.lock_path(), kind, self.lock_timeout)?)
    }

    /// Load a consistent snapshot of the whole document.
    ///
    /// # Errors
    ///
    /// Fails on lock timeout, I/O failure or unparseable JSON.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> Result<NetworkSnapshot, StoreError> {
        let _lock = self.lock(LockKind::Shared)?;
        let document = self.read_document()?;
        debug!(
            users = document.users.len(),
            connections = document.connections.len(),
            "loaded network snapshot"
        );
        Ok(NetworkSnapshot::new(document))
    }

    /// Insert or replace the user named `name`.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidIdentifier`] for a blank name, plus any
    /// read/write failure.
    #[instrument(skip(self))]
    pub fn register(&self, name: &str, role: &str, company: &str) -> Result<UserRecord, StoreError> {
        let name = require_identifier(name)?;
        self.update(|doc| {
            let record = UserRecord {
                name: name.to_string(),
                role: role.trim().to_string(),
                company: company.trim().to_string(),
                registered_at: Some(Utc::now()),
            };
            match doc.users.iter_mut().find(|u| u.name == name) {
                Some(existing) => {
                    existing.role.clone_from(&record.role);
                    existing.company.clone_from(&record.company);
                    debug!("updated existing user");
                    existing.clone()
                }
                None => {
                    doc.users.push(record.clone());
                    record
                }
            }
        })
    }

    /// Record a connection. Returns `false` if the same ordered pair was
    /// already stored.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidIdentifier`] for a blank endpoint, plus any
    /// read/write failure.
    #[instrument(skip(self))]
    pub fn connect(&self, user1: &str, user2: &str) -> Result<bool, StoreError> {
        let user1 = require_identifier(user1)?;
        let user2 = require_identifier(user2)?;
        self.update(|doc| {
            let exists = doc
                .connections
                .iter()
                .any(|c| c.user1 == user1 && c.user2 == user2);
            if !exists {
                doc.connections.push(Connection::new(user1, user2));
            }
            !exists
        })
    }

    /// Append a rating for a registered user.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidRating`] outside 1..=5,
    /// [`StoreError::UserNotFound`] for an unregistered user.
    #[instrument(skip(self))]
    pub fn rate(&self, user: &str, score: i64) -> Result<Rating, StoreError> {
        if !RATING_RANGE.contains(&score) {
            return Err(StoreError::InvalidRating(score));
        }
        let score = u8::try_from(score).map_err(|_| StoreError::InvalidRating(score))?;
        let user = require_identifier(user)?;

        self.try_update(|doc| {
            if !doc.users.iter().any(|u| u.name == user) {
                return Err(StoreError::UserNotFound(user.to_string()));
            }
            let rating = Rating {
                user: user.to_string(),
                score,
                rated_at: Utc::now(),
            };
            doc.ratings.push(rating.clone());
            Ok(rating)
        })
    }

    fn update<T>(&self, f: impl FnOnce(&mut NetworkDocument) -> T) -> Result<T, StoreError> {
        self.try_update(|doc| Ok(f(doc)))
    }

    fn try_update<T>(
        &self,
        f: impl FnOnce(&mut NetworkDocument) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _lock = self.lock(LockKind::Exclusive)?;
        let mut document = self.read_document()?;
        let out = f(&mut document)?;
        self.write_document(&document)?;
        Ok(out)
    }

    fn read_document(&self) -> Result<NetworkDocument, StoreError> {
        let path = self.document_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotInitialized {
                    path: self.dir.clone(),
                });
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt { path, source })
    }

    fn write_document(&self, document: &NetworkDocument) -> Result<(), StoreError> {
        let path = self.document_path();
        let tmp = self.dir.join(format!("{DOCUMENT_FILE}.tmp"));

        let json = serde_json::to_vec_pretty(document).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;

        let mut file = fs::File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(&json)
            .and_then(|()| file.write_all(b"\n"))
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))
    }
}

fn require_identifier(name: &str) -> Result<&str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(StoreError::InvalidIdentifier)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_store() -> (tempfile::TempDir, NetworkStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let (store, created) =
            NetworkStore::init(dir.path(), &StoreConfig::default()).expect("init");
        assert!(created);
        (dir, store)
    }

    #[test]
    fn open_before_init_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = NetworkStore::open(dir.path(), &StoreConfig::default()).expect_err("open");
        assert_eq!(err.code(), ErrorCode::NotInitialized);
    }

    #[test]
    fn init_is_idempotent() {
        let (dir, store) = fresh_store();
        store.register("alice", "SDE1", "Acme").expect("register");

        let (_again, created) =
            NetworkStore::init(dir.path(), &StoreConfig::default()).expect("re-init");
        assert!(!created);
        assert_eq!(store.snapshot().expect("snapshot").users().len(), 1);
    }

    #[test]
    fn register_upserts_by_name() {
        let (_dir, store) = fresh_store();
        store.register("alice", "SDE1", "Acme").expect("register");
        store.register("alice", "Manager", "Globex").expect("re-register");

        let snap = store.snapshot().expect("snapshot");
        assert_eq!(snap.users().len(), 1);
        assert_eq!(snap.profile("alice"), Some(Profile::new("Globex", "Manager")));
    }

    #[test]
    fn register_rejects_blank_name() {
        let (_dir, store) = fresh_store();
        let err = store.register("  ", "SDE1", "Acme").expect_err("blank");
        assert!(matches!(err, StoreError::InvalidIdentifier));
    }

    #[test]
    fn connect_is_idempotent_per_ordered_pair() {
        let (_dir, store) = fresh_store();
        assert!(store.connect("alice", "bob").expect("connect"));
        assert!(!store.connect("alice", "bob").expect("reconnect"));
        assert!(store.connect("bob", "alice").expect("reverse"));

        let snap = store.snapshot().expect("snapshot");
        assert_eq!(snap.connections().len(), 2);
    }

    #[test]
    fn rate_validates_range_and_user() {
        let (_dir, store) = fresh_store();
        store.register("alice", "SDE1", "Acme").expect("register");

        assert!(matches!(
            store.rate("alice", 0),
            Err(StoreError::InvalidRating(0))
        ));
        assert!(matches!(
            store.rate("alice", 6),
            Err(StoreError::InvalidRating(6))
        ));
        assert!(matches!(
            store.rate("nobody", 3),
            Err(StoreError::UserNotFound(_))
        ));

        store.rate("alice", 4).expect("rate");
        store.rate("alice", 5).expect("rate");
        let summary = store
            .snapshot()
            .expect("snapshot")
            .rating_summary("alice")
            .expect("summary");
        assert_eq!(summary.count, 2);
        assert!((summary.average - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_update_leaves_document_untouched() {
        let (_dir, store) = fresh_store();
        let _ = store.rate("ghost", 3);
        assert!(store.snapshot().expect("snapshot").ratings().is_empty());
    }

    fn suggested<'a>(snap: &'a NetworkSnapshot, query: &str) -> Vec<&'a str> {
        snap.suggest(query)
            .expect("valid pattern")
            .iter()
            .map(|u| u.name.as_str())
            .collect()
    }

    #[test]
    fn suggest_matches_role_or_company_ignoring_case() {
        let (_dir, store) = fresh_store();
        store.register("carol", "Manager", "Acme").expect("register");
        store.register("alice", "SDE1", "acme-labs").expect("register");
        store.register("bob", "SDE2", "Globex").expect("register");

        let snap = store.snapshot().expect("snapshot");
        assert_eq!(suggested(&snap, "ACME"), vec!["alice", "carol"]);
        assert_eq!(suggested(&snap, "sde"), vec!["alice", "bob"]);
        assert!(suggested(&snap, "   ").is_empty());
    }

    #[test]
    fn suggest_query_is_a_pattern() {
        let (_dir, store) = fresh_store();
        store.register("carol", "Manager", "Acme").expect("register");
        store.register("alice", "SDE1", "acme-labs").expect("register");
        store.register("bob", "SDE2", "Globex").expect("register");

        let snap = store.snapshot().expect("snapshot");
        assert_eq!(suggested(&snap, "^acme$"), vec!["carol"]);
        assert_eq!(suggested(&snap, "sde[12]|glob"), vec!["alice", "bob"]);
        assert_eq!(suggested(&snap, "^a.*s$"), vec!["alice"]);

        let err = snap.suggest("(").expect_err("unbalanced group");
        assert!(matches!(err, StoreError::InvalidPattern { ref pattern, .. } if pattern == "("));
        assert_eq!(err.code(), ErrorCode::InvalidPattern);
    }

    #[test]
    fn register_trims_role_and_company() {
        let (_dir, store) = fresh_store();
        let record = store.register(" alice ", " SDE1 ", "Acme ").expect("register");
        assert_eq!(record.name, "alice");

        let snap = store.snapshot().expect("snapshot");
        assert_eq!(snap.profile("alice"), Some(Profile::new("Acme", "SDE1")));
    }

    #[test]
    fn user_without_company_has_no_profile() {
        let (dir, store) = fresh_store();
        let raw = r#"{"users":[{"name":"dave","role":"SDE1"}],"connections":[{"user1":"dave"}]}"#;
        fs::write(dir.path().join(REFERRAL_DIR).join(DOCUMENT_FILE), raw).expect("write");

        let snap = store.snapshot().expect("snapshot");
        assert!(snap.user("dave").is_some());
        assert!(snap.profile("dave").is_none());
        assert!(snap.connections()[0].endpoints().is_none());
    }

    #[test]
    fn corrupt_document_reports_code() {
        let (dir, store) = fresh_store();
        fs::write(dir.path().join(REFERRAL_DIR).join(DOCUMENT_FILE), "{not json").expect("write");
        let err = store.snapshot().expect_err("corrupt");
        assert_eq!(err.code(), ErrorCode::CorruptStore);
    }
}
