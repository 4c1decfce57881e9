//! Field limits for registry records
//!
//! Every text limit counts Unicode scalar values, not bytes.
//!
//! ## Contract
//!
//! These limits are part of the registry's observable behavior: a create
//! that violates one reports the matching error code. They do not change
//! without a major version bump.

/// Maximum drug name length (required, at least 1)
pub const MAX_DRUG_NAME_CHARS: usize = 100;

/// Maximum drug category length (required, at least 1)
pub const MAX_DRUG_CATEGORY_CHARS: usize = 50;

/// Maximum dosage form length
pub const MAX_DOSAGE_FORM_CHARS: usize = 50;

/// Maximum manufacturer length
pub const MAX_MANUFACTURER_CHARS: usize = 100;

/// Maximum classification code length
pub const MAX_CLASSIFICATION_CODE_CHARS: usize = 20;

/// Maximum indication length
pub const MAX_INDICATION_CHARS: usize = 500;

/// Maximum contraindication length
pub const MAX_CONTRAINDICATION_CHARS: usize = 500;

/// Maximum side effects length
pub const MAX_SIDE_EFFECTS_CHARS: usize = 1000;

/// Maximum interaction description length (required, at least 1)
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Maximum interaction effects length (required, at least 1)
pub const MAX_EFFECTS_CHARS: usize = 1000;

/// Maximum recommendations length
pub const MAX_RECOMMENDATIONS_CHARS: usize = 500;

/// Highest severity level
pub const MAX_SEVERITY: u8 = 2;

/// Highest evidence level
pub const MAX_EVIDENCE_LEVEL: u8 = 5;

/// Default record capacity of a registry
pub const DEFAULT_MAX_RECORDS: u64 = 100_000;

/// Default fee charged per successful create
pub const DEFAULT_FEE: u64 = 100;

/// Length of `text` in characters
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Non-empty and at most `max` characters
pub fn is_required_text(text: &str, max: usize) -> bool {
    !text.is_empty() && char_len(text) <= max
}

/// At most `max` characters, empty allowed
pub fn is_optional_text(text: &str, max: usize) -> bool {
    char_len(text) <= max
}
