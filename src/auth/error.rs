// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side access errors.

use super::roles::Role;

/// Why the current session may not use a console area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No access token, or the token has expired
    NotAuthenticated,
    /// Signed in, but none of the required roles is present
    MissingRole {
        required: Vec<Role>,
        current: Vec<String>,
        subject: Option<String>,
    },
}

impl AccessError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::NotAuthenticated => "not_authenticated",
            AccessError::MissingRole { .. } => "missing_role",
        }
    }
}

impl std::fmt::Display for AccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessError::NotAuthenticated => write!(f, "Not authenticated; log in first"),
            AccessError::MissingRole {
                required,
                current,
                subject,
            } => {
                let required = required
                    .iter()
                    .map(Role::as_str)
                    .collect::<Vec<_>>()
                    .join(" or ");
                write!(f, "Access denied: requires {required}")?;
                if !current.is_empty() {
                    write!(f, "; current roles: {}", current.join(", "))?;
                }
                if let Some(subject) = subject {
                    write!(f, " (user {subject})")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_role_lists_required_and_current() {
        let err = AccessError::MissingRole {
            required: vec![Role::Awis, Role::Adm],
            current: vec!["PARCEIRO".to_string()],
            subject: Some("user-1".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Access denied: requires AWIS or ADM; current roles: PARCEIRO (user user-1)"
        );
        assert_eq!(err.error_code(), "missing_role");
    }

    #[test]
    fn not_authenticated_message() {
        assert_eq!(
            AccessError::NotAuthenticated.to_string(),
            "Not authenticated; log in first"
        );
    }
}
