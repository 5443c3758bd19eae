// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application roles carried in the access token.

use serde::{Deserialize, Serialize};

/// Application roles.
///
/// ## Roles
///
/// - `Awis` - Platform operators; full access to the console
/// - `Adm` - Tenant administrators; manage users of their own tenant
/// - `Parceiro` - Partner accounts
/// - `Associado` - Member accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Awis,
    Adm,
    Parceiro,
    Associado,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Awis, Role::Adm, Role::Parceiro, Role::Associado];

    /// Wire name as used in tokens and role endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Awis => "AWIS",
            Role::Adm => "ADM",
            Role::Parceiro => "PARCEIRO",
            Role::Associado => "ASSOCIADO",
        }
    }

    /// Parse a role name (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AWIS" => Some(Role::Awis),
            "ADM" => Some(Role::Adm),
            "PARCEIRO" => Some(Role::Parceiro),
            "ASSOCIADO" => Some(Role::Associado),
            _ => None,
        }
    }

    /// Roles allowed to manage users and their role assignments.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Awis | Role::Adm)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("unknown role '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("awis"), Some(Role::Awis));
        assert_eq!(Role::parse(" Adm "), Some(Role::Adm));
        assert_eq!(Role::parse("ASSOCIADO"), Some(Role::Associado));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn serde_uses_uppercase_names() {
        assert_eq!(serde_json::to_string(&Role::Parceiro).unwrap(), r#""PARCEIRO""#);
        let role: Role = serde_json::from_str(r#""ADM""#).unwrap();
        assert_eq!(role, Role::Adm);
    }

    #[test]
    fn display_matches_wire_name() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn only_awis_and_adm_manage_users() {
        assert!(Role::Awis.can_manage_users());
        assert!(Role::Adm.can_manage_users());
        assert!(!Role::Parceiro.can_manage_users());
        assert!(!Role::Associado.can_manage_users());
    }
}
