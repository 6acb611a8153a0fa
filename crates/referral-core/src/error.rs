use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    UserNotFound,
    InvalidRating,
    InvalidIdentifier,
    GraphTooLarge,
    InvalidPattern,
    CorruptStore,
    StoreWriteFailed,
    LockContention,
    MissingIdentity,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::MissingIdentity => "E1003",
            Self::UserNotFound => "E2001",
            Self::InvalidRating => "E2002",
            Self::InvalidIdentifier => "E2003",
            Self::GraphTooLarge => "E2004",
            Self::InvalidPattern => "E2005",
            Self::CorruptStore => "E3001",
            Self::StoreWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Network store not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::MissingIdentity => "No user identity",
            Self::UserNotFound => "User not found",
            Self::InvalidRating => "Rating out of range",
            Self::InvalidIdentifier => "Invalid user identifier",
            Self::GraphTooLarge => "Connection graph exceeds configured limits",
            Self::InvalidPattern => "Invalid search pattern",
            Self::CorruptStore => "Corrupt network store",
            Self::StoreWriteFailed => "Network store write failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `refer init` to create the network store."),
            Self::ConfigParseError => Some("Fix syntax in .referral/config.toml and retry."),
            Self::MissingIdentity => {
                Some("Pass --user or set REFERRAL_USER to name the acting user.")
            }
            Self::UserNotFound => Some("Register the user first with `refer register`."),
            Self::InvalidRating => Some("Use a score between 1 and 5."),
            Self::InvalidIdentifier => Some("User names must be non-empty."),
            Self::GraphTooLarge => {
                Some("Raise rank.max_nodes / rank.max_edges in .referral/config.toml.")
            }
            Self::InvalidPattern => {
                Some("Suggest queries are regular expressions; escape special characters.")
            }
            Self::CorruptStore => Some("Inspect .referral/network.json for invalid JSON."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `refer` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
