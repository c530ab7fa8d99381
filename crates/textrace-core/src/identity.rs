//! # Identity Newtypes
//!
//! Validated string newtypes for the identifiers and free-text party fields
//! that appear in ledger transactions. Each validates at construction and
//! during deserialization (`#[serde(try_from = "String")]`), so an invalid
//! value can never reach the digest path.
//!
//! `new` trims surrounding whitespace from caller input. Deserialization
//! does not: a stored value is hashed exactly as written, so an untrimmed
//! value in serialized form is rejected instead of being normalized into
//! one that no longer matches its digest.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of a batch identifier.
pub const MAX_BATCH_ID_LEN: usize = 64;

/// Maximum length of an owner, handler, location or variety value.
pub const MAX_PARTY_NAME_LEN: usize = 256;

/// Identifier of a textile batch, e.g. `COT-001`.
///
/// 1 to 64 characters drawn from ASCII alphanumerics, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BatchId(String);

impl BatchId {
    /// Create a batch identifier, validating its format.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if !Self::is_well_formed(trimmed) {
            return Err(ValidationError::InvalidBatchId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Accept a batch identifier only if it is already in stored form.
    pub fn parse_exact(value: String) -> Result<Self, ValidationError> {
        if !Self::is_well_formed(&value) {
            return Err(ValidationError::InvalidBatchId(value));
        }
        Ok(Self(value))
    }

    fn is_well_formed(value: &str) -> bool {
        !value.is_empty()
            && value.len() <= MAX_BATCH_ID_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BatchId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_exact(value)
    }
}

impl From<BatchId> for String {
    fn from(id: BatchId) -> Self {
        id.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BatchId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Free-text name of a party, place or product variety.
///
/// Used for transaction fields such as `owner`, `handler`, `location` and
/// `variety`. Non-empty after trimming and at most 256 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartyName(String);

impl PartyName {
    /// Create a party name, validating it.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        Self::for_field("party name", value)
    }

    /// Create a party name, reporting `field` in the error on failure.
    pub fn for_field(field: &'static str, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        check_party_name(field, trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    /// Accept a party name only if it is already in stored form.
    pub fn parse_exact(value: String) -> Result<Self, ValidationError> {
        const FIELD: &str = "party name";
        if value.trim() != value {
            return Err(ValidationError::InvalidPartyName {
                field: FIELD,
                reason: "must not have leading or trailing whitespace".to_string(),
            });
        }
        check_party_name(FIELD, &value)?;
        Ok(Self(value))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_party_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::InvalidPartyName {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if value.chars().count() > MAX_PARTY_NAME_LEN {
        return Err(ValidationError::InvalidPartyName {
            field,
            reason: format!("must not exceed {MAX_PARTY_NAME_LEN} characters"),
        });
    }
    Ok(())
}

impl TryFrom<String> for PartyName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_exact(value)
    }
}

impl From<PartyName> for String {
    fn from(name: PartyName) -> Self {
        name.0
    }
}

impl std::fmt::Display for PartyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for PartyName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
