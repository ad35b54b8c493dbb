//! Admin allow-list loaded from the `ADMIN_EMAILS` environment variable.
//!
//! The list only decides which views the bot offers. The backend's row-level policies
//! are what actually restrict admin data.

use std::collections::BTreeSet;

/// Set of lower-cased admin email addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: BTreeSet<String>,
}

impl AdminAllowList {
    /// Parses a comma-separated list, trimming, lower-casing and dropping empty entries.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { emails }
    }

    /// Reads `ADMIN_EMAILS`; an unset variable yields an empty list.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("ADMIN_EMAILS").map_or_else(|_| Self::default(), |raw| Self::parse(&raw))
    }

    /// Case-insensitive membership check. `None` is never an admin.
    #[must_use]
    pub fn is_admin(&self, email: Option<&str>) -> bool {
        email.is_some_and(|e| self.emails.contains(&e.trim().to_lowercase()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_entries() {
        let list = AdminAllowList::parse(" Admin@Example.com, ,owner@example.com,admin@example.com,");
        assert_eq!(list.len(), 2);
        assert!(list.is_admin(Some("admin@example.com")));
        assert!(list.is_admin(Some("OWNER@example.COM")));
    }

    #[test]
    fn test_missing_email_is_not_admin() {
        let list = AdminAllowList::parse("admin@example.com");
        assert!(!list.is_admin(None));
        assert!(!list.is_admin(Some("")));
        assert!(!list.is_admin(Some("influencer@example.com")));
    }

    #[test]
    fn test_empty_list_admits_nobody() {
        let list = AdminAllowList::parse("");
        assert!(list.is_empty());
        assert!(!list.is_admin(Some("admin@example.com")));
    }
}
