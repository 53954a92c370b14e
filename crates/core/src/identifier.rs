//! Validation of SQL identifiers interpolated into generated statements.

use crate::error::CoreError;

/// PostgreSQL truncates identifiers longer than this (`NAMEDATALEN - 1`).
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Accept `name` only if it is made of ASCII letters, digits, `_` and `-`,
/// does not start with a digit or `-`, and is at most
/// [`MAX_IDENTIFIER_LEN`] bytes. Prevents SQL injection through configured
/// names.
pub fn validate_identifier(name: &str) -> Result<&str, CoreError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_IDENTIFIER_LEN
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(name)
    } else {
        Err(CoreError::InvalidIdentifier(name.to_string()))
    }
}

/// Render a validated identifier for SQL, double-quoting it only when it
/// cannot be written bare (e.g. `"uuid-ossp"`).
pub fn render_identifier(name: &str) -> String {
    if name.contains('-') {
        format!("\"{name}\"")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_identifiers() {
        assert!(validate_identifier("pgcrypto").is_ok());
        assert!(validate_identifier("uuid_ossp2").is_ok());
        assert!(validate_identifier("_private").is_ok());
        assert!(validate_identifier("uuid-ossp").is_ok());
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LEN)).is_ok());
    }

    #[test]
    fn unsafe_identifiers() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("-leading").is_err());
        assert!(validate_identifier("pgcrypto; DROP TABLE users").is_err());
        assert!(validate_identifier("1st").is_err());
        assert!(validate_identifier("\"quoted\"").is_err());
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LEN + 1)).is_err());
    }

    #[test]
    fn hyphenated_names_are_quoted() {
        assert_eq!(render_identifier("pgcrypto"), "pgcrypto");
        assert_eq!(render_identifier("uuid-ossp"), "\"uuid-ossp\"");
    }
}
