//! The profile lookup seam between the ranking engine and whatever owns
//! user records.

use std::collections::{BTreeMap, HashMap};

use crate::model::Profile;

/// Supplies the company and role of a user on demand.
///
/// Returning `None` means "no usable profile"; the ranking engine treats
/// that user as ineligible. Implementations that can fail (network, disk)
/// must decide before ranking whether a failure is `None` or an aborted
/// query.
pub trait ProfileLookup {
    fn profile(&self, id: &str) -> Option<Profile>;
}

impl ProfileLookup for HashMap<String, Profile> {
    fn profile(&self, id: &str) -> Option<Profile> {
        self.get(id).cloned()
    }
}

impl ProfileLookup for BTreeMap<String, Profile> {
    fn profile(&self, id: &str) -> Option<Profile> {
        self.get(id).cloned()
    }
}

impl<F> ProfileLookup for F
where
    F: Fn(&str) -> Option<Profile>,
{
    fn profile(&self, id: &str) -> Option<Profile> {
        self(id)
    }
}
