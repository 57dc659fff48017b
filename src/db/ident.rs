//! Validated SQL identifiers.
//!
//! Table names reach the pruner from the type catalog, never from request
//! input, but they are still interpolated into SQL text. Every name is checked
//! against a conservative grammar when the catalog is built and is always
//! emitted double-quoted, so a name can never terminate the quoted identifier.

use std::fmt;

use super::error::{DbError, DbResult};

/// Suffix appended to a table name to get its version history table.
pub const VERSIONS_SUFFIX: &str = "_Versions";

/// Longest accepted table name. PostgreSQL truncates identifiers at 63 bytes,
/// and the derived `_Versions` table must still fit.
pub const MAX_TABLE_NAME_LEN: usize = 63 - VERSIONS_SUFFIX.len();

/// A table or column name that is safe to splice into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(String);

impl Ident {
    /// Validate a table name.
    ///
    /// Accepts ASCII letters, digits and underscores, not starting with a digit.
    pub fn new(name: impl Into<String>) -> DbResult<Self> {
        let name = name.into();
        Self::check(&name, MAX_TABLE_NAME_LEN)?;
        Ok(Self(name))
    }

    fn check(name: &str, max_len: usize) -> DbResult<()> {
        let Some(first) = name.chars().next() else {
            return Err(DbError::InvalidIdentifier(name.to_string(), "empty name"));
        };
        if name.len() > max_len {
            return Err(DbError::InvalidIdentifier(
                name.to_string(),
                "name is too long",
            ));
        }
        if first.is_ascii_digit() {
            return Err(DbError::InvalidIdentifier(
                name.to_string(),
                "name cannot start with a digit",
            ));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(DbError::InvalidIdentifier(
                name.to_string(),
                "only ASCII letters, digits and underscores are allowed",
            ));
        }
        Ok(())
    }

    /// The version history table for this table, e.g. `SiteTree_Versions`.
    pub fn versions(&self) -> Ident {
        Ident(format!("{}{}", self.0, VERSIONS_SUFFIX))
    }

    /// The bare name, unquoted.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as a double-quoted SQL identifier.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::simple("SiteTree")]
    #[case::prefixed("CART_BaseRecord")]
    #[case::leading_underscore("_Internal")]
    #[case::digits("Page2")]
    fn test_valid_identifiers(#[case] name: &str) {
        let ident = Ident::new(name).unwrap();
        assert_eq!(ident.as_str(), name);
    }

    #[rstest]
    #[case::empty("")]
    #[case::leading_digit("2Page")]
    #[case::quote("Site\"Tree")]
    #[case::space("Site Tree")]
    #[case::semicolon("SiteTree;DROP")]
    #[case::dot("public.SiteTree")]
    #[case::non_ascii("Séite")]
    fn test_invalid_identifiers(#[case] name: &str) {
        assert!(matches!(
            Ident::new(name),
            Err(DbError::InvalidIdentifier(..))
        ));
    }

    #[test]
    fn test_length_limit_leaves_room_for_versions_suffix() {
        let longest = "a".repeat(MAX_TABLE_NAME_LEN);
        let ident = Ident::new(longest).unwrap();
        assert_eq!(ident.versions().as_str().len(), 63);

        assert!(Ident::new("a".repeat(MAX_TABLE_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_versions_table_name() {
        let ident = Ident::new("SiteTree").unwrap();
        assert_eq!(ident.versions().as_str(), "SiteTree_Versions");
        assert_eq!(ident.versions().quoted(), "\"SiteTree_Versions\"");
    }

    #[test]
    fn test_quoted() {
        let ident = Ident::new("CART_BaseRecord").unwrap();
        assert_eq!(ident.quoted(), "\"CART_BaseRecord\"");
        assert_eq!(ident.to_string(), "CART_BaseRecord");
    }
}
