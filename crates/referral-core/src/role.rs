//! Static role priority used to break authority ties.

/// Ordered job levels. Anything not listed ranks below all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RolePriority {
    Unranked,
    Others,
    Sde1,
    Sde2,
    Sde3,
    Manager,
}

impl RolePriority {
    /// Rank given to role strings missing from the table.
    pub const DEFAULT_RANK: u8 = 0;

    /// Resolve a stored role string. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_role(role: &str) -> Self {
        match role {
            "Manager" => Self::Manager,
            "SDE3" => Self::Sde3,
            "SDE2" => Self::Sde2,
            "SDE1" => Self::Sde1,
            "Others" => Self::Others,
            _ => Self::Unranked,
        }
    }

    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Manager => 5,
            Self::Sde3 => 4,
            Self::Sde2 => 3,
            Self::Sde1 => 2,
            Self::Others => 1,
            Self::Unranked => Self::DEFAULT_RANK,
        }
    }

    /// Shorthand for `RolePriority::from_role(role).rank()`.
    #[must_use]
    pub fn rank_of(role: &str) -> u8 {
        Self::from_role(role).rank()
    }
}

#[cfg(test)]
mod tests {
    use super::RolePriority;

    #[test]
    fn table_ranks() {
        assert_eq!(RolePriority::rank_of("Manager"), 5);
        assert_eq!(RolePriority::rank_of("SDE3"), 4);
        assert_eq!(RolePriority::rank_of("SDE2"), 3);
        assert_eq!(RolePriority::rank_of("SDE1"), 2);
        assert_eq!(RolePriority::rank_of("Others"), 1);
    }

    #[test]
    fn unknown_role_gets_default_rank() {
        assert_eq!(RolePriority::rank_of("Intern"), RolePriority::DEFAULT_RANK);
        assert_eq!(RolePriority::rank_of(""), 0);
        // case-sensitive
        assert_eq!(RolePriority::rank_of("manager"), 0);
    }

    #[test]
    fn enum_order_matches_rank_order() {
        assert!(RolePriority::Manager > RolePriority::Sde3);
        assert!(RolePriority::Sde1 > RolePriority::Others);
        assert!(RolePriority::Others > RolePriority::Unranked);
    }
}
