//! Internal helpers for name normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! text rules so every write path produces the same display form and the
//! same dedup key for a category name.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Canonical display form of a category name: trimmed, inner whitespace
/// collapsed to single spaces. Rejects names that are empty after trimming.
pub(crate) fn normalize_category_display(input: &str) -> ResultEngine<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(
            "category name must not be empty".to_string(),
        ));
    }
    let mut out = String::new();
    for token in trimmed.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    Ok(out)
}

/// Dedup key for a category name: NFKD-decomposed, combining marks stripped,
/// lowercased, non-alphanumeric runs collapsed to single spaces.
///
/// "Café ", "cafe" and "CAFE!" all map to the same key.
pub(crate) fn normalize_category_key(input: &str) -> ResultEngine<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(
            "category name must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(normalized.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(
            normalize_category_display("  Out   to   eat ").unwrap(),
            "Out to eat"
        );
    }

    #[test]
    fn display_rejects_blank() {
        assert!(matches!(
            normalize_category_display("   "),
            Err(EngineError::InvalidName(_))
        ));
    }

    #[test]
    fn key_strips_accents_and_case() {
        assert_eq!(normalize_category_key("Café").unwrap(), "cafe");
        assert_eq!(normalize_category_key("CAFE!").unwrap(), "cafe");
        assert_eq!(normalize_category_key("  cafe  ").unwrap(), "cafe");
    }

    #[test]
    fn key_collapses_punctuation_runs() {
        assert_eq!(
            normalize_category_key("out -- to // eat").unwrap(),
            "out to eat"
        );
    }

    #[test]
    fn key_rejects_symbol_only_names() {
        assert!(matches!(
            normalize_category_key("!!!"),
            Err(EngineError::InvalidName(_))
        ));
    }
}
