//! Account roles.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including account management.
    Admin,
    /// May manage menu items but not accounts.
    ContentManager,
}

impl Role {
    /// The lowest-privilege role, granted on self-registration.
    pub const LOWEST: Self = Self::ContentManager;
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::ContentManager => write!(f, "content_manager"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "content_manager" => Ok(Self::ContentManager),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_fromstr_roundtrip() {
        for role in [Role::Admin, Role::ContentManager] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("super_admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::ContentManager).unwrap(),
            "\"content_manager\""
        );
    }
}
