//! Role hierarchy read from user metadata.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Known roles, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// Regular signed-in user.
    User,
    /// Administrator.
    Admin,
    /// Administrator with unrestricted access.
    SuperAdmin,
}

impl Role {
    /// Wire name stored in `public_metadata.role`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super-admin",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "super-admin" => Ok(Self::SuperAdmin),
            _ => Err(()),
        }
    }
}

/// Role as found on a user record.
///
/// Role strings outside the known set are kept verbatim and never satisfy a
/// requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRole {
    /// One of the known roles.
    Known(Role),
    /// A role string this service does not recognise.
    Unrecognized(String),
}

impl ResolvedRole {
    /// Interpret a raw metadata value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .map_or_else(|()| Self::Unrecognized(raw.to_string()), Self::Known)
    }

    /// Whether this role grants at least `required`.
    #[must_use]
    pub fn satisfies(&self, required: Role) -> bool {
        matches!(self, Self::Known(role) if *role >= required)
    }

    /// Raw role string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(role) => role.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}
