//! Input validation limits for malformed requests and resource protection

/// Maximum length for a node identifier (256 chars)
pub const MAX_IDENTIFIER_LEN: usize = 256;

/// Maximum length for a metadata or constraint key (64 chars)
pub const MAX_KEY_LEN: usize = 64;

/// Maximum constraints in a single query (16)
///
/// Relaxation explores subsets of the constraint set, so this also bounds
/// the search at 2^16 candidate drop sets.
pub const MAX_CONSTRAINTS: usize = 16;

/// Maximum switches in a single topology update (10000)
pub const MAX_BATCH_SWITCHES: usize = 10_000;

/// Maximum links in a single topology update (50000)
pub const MAX_BATCH_LINKS: usize = 50_000;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyIdentifier,
    IdentifierTooLong { len: usize, max: usize },
    IdentifierWhitespace(String),
    EmptyKey,
    KeyTooLong { len: usize, max: usize },
    TooManyConstraints { count: usize, max: usize },
    TooManySwitches { count: usize, max: usize },
    TooManyLinks { count: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "Identifier cannot be empty"),
            Self::IdentifierTooLong { len, max } => {
                write!(f, "Identifier too long: {} chars (max {})", len, max)
            }
            Self::IdentifierWhitespace(id) => {
                write!(f, "Identifier contains whitespace: {:?}", id)
            }
            Self::EmptyKey => write!(f, "Key cannot be empty"),
            Self::KeyTooLong { len, max } => {
                write!(f, "Key too long: {} chars (max {})", len, max)
            }
            Self::TooManyConstraints { count, max } => {
                write!(f, "Too many constraints: {} (max {})", count, max)
            }
            Self::TooManySwitches { count, max } => {
                write!(f, "Too many switches in update: {} (max {})", count, max)
            }
            Self::TooManyLinks { count, max } => {
                write!(f, "Too many links in update: {} (max {})", count, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a switch or interface identifier
pub fn validate_identifier(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::IdentifierTooLong {
            len: id.len(),
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::IdentifierWhitespace(id.to_string()));
    }
    Ok(())
}

/// Validate a metadata or constraint key
pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    if key.len() > MAX_KEY_LEN {
        return Err(ValidationError::KeyTooLong {
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }
    Ok(())
}

/// Validate constraint count
pub fn validate_constraint_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_CONSTRAINTS {
        return Err(ValidationError::TooManyConstraints {
            count,
            max: MAX_CONSTRAINTS,
        });
    }
    Ok(())
}

/// Validate switch batch size
pub fn validate_batch_switches(count: usize) -> Result<(), ValidationError> {
    if count > MAX_BATCH_SWITCHES {
        return Err(ValidationError::TooManySwitches {
            count,
            max: MAX_BATCH_SWITCHES,
        });
    }
    Ok(())
}

/// Validate link batch size
pub fn validate_batch_links(count: usize) -> Result<(), ValidationError> {
    if count > MAX_BATCH_LINKS {
        return Err(ValidationError::TooManyLinks {
            count,
            max: MAX_BATCH_LINKS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("S1").is_ok());
        assert!(validate_identifier("00:00:00:00:00:00:00:01:3").is_ok());
        assert_eq!(
            validate_identifier(""),
            Err(ValidationError::EmptyIdentifier)
        );
        assert!(validate_identifier("S 1").is_err());
        assert!(validate_identifier("S1\n").is_err());
        assert!(validate_identifier(&"x".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_constraint_count() {
        assert!(validate_constraint_count(MAX_CONSTRAINTS).is_ok());
        assert!(validate_constraint_count(MAX_CONSTRAINTS + 1).is_err());
    }
}
