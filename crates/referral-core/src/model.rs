//! Records owned by the store and read by the ranking engine.
//!
//! Identifiers are plain display names. Every string field deserializes with
//! `#[serde(default)]` so a document with a missing field still loads; the
//! consumers decide whether a blank field makes a record unusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An undirected connection between two users.
///
/// The pair is unordered for ranking purposes. The store keys records by the
/// ordered `(user1, user2)` pair, so `(a, b)` and `(b, a)` may both exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub user1: String,
    #[serde(default)]
    pub user2: String,
}

impl Connection {
    pub fn new(user1: impl Into<String>, user2: impl Into<String>) -> Self {
        Self {
            user1: user1.into(),
            user2: user2.into(),
        }
    }

    /// Both endpoints, or `None` when either one is blank.
    #[must_use]
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        let a = self.user1.trim();
        let b = self.user2.trim();
        if a.is_empty() || b.is_empty() {
            None
        } else {
            Some((a, b))
        }
    }

    /// Return `true` if both endpoints name the same user.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        matches!(self.endpoints(), Some((a, b)) if a == b)
    }
}

/// The attributes the ranking engine reads for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub company: String,
    pub role: String,
}

impl Profile {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
        }
    }
}

/// A registered user as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Project the record into a [`Profile`].
    ///
    /// A record without a company cannot be matched against a target
    /// company and yields `None`. A blank role is kept; it ranks lowest.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        if self.company.trim().is_empty() {
            return None;
        }
        Some(Profile::new(self.company.clone(), self.role.clone()))
    }
}

/// Feedback left for a referrer. Scores are 1 through 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user: String,
    pub score: u8,
    pub rated_at: DateTime<Utc>,
}
