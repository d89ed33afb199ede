//! Account roles.
//!
//! Names must match the `users.role` check constraint.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ANGLER: &str = "angler";

/// What a caller may do beyond their own sessions.
///
/// Anglers own sessions and review sessions they were nominated for.
/// Admins may additionally force a finalization attempt on any session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Angler,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Angler => ROLE_ANGLER,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_names_match_the_stored_role() {
        for role in [Role::Angler, Role::Admin] {
            assert_eq!(serde_json::to_value(role).unwrap(), role.as_str());
        }
    }
}
