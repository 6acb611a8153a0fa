//! Candidate selection: pick the best referrer at one company.
//!
//! # Ordering
//!
//! Among users whose profile company equals the target exactly
//! (case-sensitive):
//!
//! 1. higher authority score wins;
//! 2. on an exact tie, higher [`RolePriority`] rank wins;
//! 3. on a further tie, the lexicographically smallest identifier wins.
//!
//! The third key makes the result independent of map iteration order.
//!
//! No candidate is a normal outcome ([`Selection::NotFound`]), not an error.

use std::cmp::Ordering;
use std::collections::HashMap;

use referral_core::{ProfileLookup, RolePriority};
use serde::Serialize;
use tracing::{debug, instrument};

/// A user eligible to refer into the target company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub authority: f64,
    pub role: String,
    pub role_rank: u8,
}

impl Candidate {
    /// Total order where `Greater` means "better referrer".
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.authority
            .total_cmp(&other.authority)
            .then(self.role_rank.cmp(&other.role_rank))
            .then_with(|| other.id.cmp(&self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Selection {
    Found(Candidate),
    NotFound,
}

impl Selection {
    #[must_use]
    pub const fn candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Found(c) => Some(c),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub fn referrer(&self) -> Option<&str> {
        self.candidate().map(|c| c.id.as_str())
    }

    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Select the best candidate from `authorities` working at `target_company`.
///
/// Identifiers without a profile are ignored.
#[instrument(skip(authorities, lookup), fields(scored = authorities.len()))]
pub fn select<L>(
    authorities: &HashMap<String, f64>,
    target_company: &str,
    lookup: &L,
) -> Selection
where
    L: ProfileLookup + ?Sized,
{
    let mut best: Option<Candidate> = None;
    let mut considered = 0usize;

    for (id, &authority) in authorities {
        let Some(profile) = lookup.profile(id) else {
            continue;
        };
        if profile.company != target_company {
            continue;
        }
        considered += 1;

        let candidate = Candidate {
            id: id.clone(),
            authority,
            role_rank: RolePriority::rank_of(&profile.role),
            role: profile.role,
        };
        let better = best
            .as_ref()
            .is_none_or(|current| candidate.rank_cmp(current) == Ordering::Greater);
        if better {
            best = Some(candidate);
        }
    }

    debug!(considered, "candidate selection finished");
    best.map_or(Selection::NotFound, Selection::Found)
}
