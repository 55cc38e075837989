//! Name guards shared by every keyspace statement.

use super::keywords::KeywordSet;
use crate::error::ValidationError;

/// Fail with [`ValidationError::EmptyName`] when `name` is empty or whitespace.
pub fn validate_not_empty(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Fail with [`ValidationError::InvalidName`] unless `name` is a CQL identifier.
///
/// - Unquoted names must match `[A-Za-z_][A-Za-z0-9_]*`
/// - Quoted names are wrapped in `"`, non-empty, with embedded `"` written as `""`
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let valid = match name.strip_prefix('"') {
        Some(rest) => is_quoted_body(rest),
        None => {
            let mut chars = name.chars();
            chars
                .next()
                .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
                && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
    };
    if !valid {
        return Err(ValidationError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

// `rest` is everything after the opening quote.
fn is_quoted_body(rest: &str) -> bool {
    let Some(body) = rest.strip_suffix('"') else {
        return false;
    };
    if body.is_empty() || body.contains('\0') {
        return false;
    }
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '"' && chars.next() != Some('"') {
            return false;
        }
    }
    true
}

/// Fail with [`ValidationError::ReservedKeyword`] when `name` is in `keywords`.
pub fn validate_not_keyword(name: &str, keywords: &KeywordSet) -> Result<(), ValidationError> {
    if keywords.contains(name) {
        return Err(ValidationError::ReservedKeyword {
            keyword: name.to_string(),
        });
    }
    Ok(())
}

/// Run every guard: empty check, identifier syntax, then reserved words.
pub fn validate_keyspace_name(name: &str, keywords: &KeywordSet) -> Result<(), ValidationError> {
    validate_not_empty(name)?;
    validate_identifier(name)?;
    validate_not_keyword(name, keywords)
}
