//! Row normalization
//!
//! Canonicalizes a raw catalog row into a record ready for upsert, or skips
//! it. Pure and infallible: malformed scalars degrade to the most permissive
//! interpretation instead of failing the row.

use super::decoder::RawRow;

/// A normalized record awaiting upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Natural key: trimmed and lower-cased
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Canonicalize one raw row.
///
/// Returns `None` when sku or name is empty after trimming; such rows are
/// dropped and counted by the pipeline, never persisted.
pub fn normalize_row(row: RawRow) -> Option<NewProduct> {
    let sku = row.sku.trim().to_lowercase();
    if sku.is_empty() {
        return None;
    }

    let name = row.name.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let description = row
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Some(NewProduct {
        sku,
        name,
        description,
        is_active: parse_active_flag(row.is_active.as_deref()),
    })
}

/// Parse the `is_active` column.
///
/// Only the tokens `false`, `0` and `no` (case-insensitive) disable a
/// product; everything else, including a missing or empty value, enables it.
pub fn parse_active_flag(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sku: &str, name: &str) -> RawRow {
        RawRow {
            sku: sku.to_string(),
            name: name.to_string(),
            ..RawRow::default()
        }
    }

    #[test]
    fn test_sku_is_trimmed_and_lowercased() {
        let record = normalize_row(row("  ABC-1  ", "Widget")).unwrap();
        assert_eq!(record.sku, "abc-1");
        assert_eq!(record.name, "Widget");
    }

    #[test]
    fn test_empty_sku_skips_row() {
        assert_eq!(normalize_row(row("   ", "Widget")), None);
        assert_eq!(normalize_row(row("", "Widget")), None);
    }

    #[test]
    fn test_empty_name_skips_row() {
        assert_eq!(normalize_row(row("abc-1", "   ")), None);
    }

    #[test]
    fn test_description_trimmed_and_empty_becomes_absent() {
        let mut raw = row("abc-1", "Widget");
        raw.description = Some("  a widget  ".to_string());
        assert_eq!(
            normalize_row(raw).unwrap().description.as_deref(),
            Some("a widget")
        );

        let mut raw = row("abc-1", "Widget");
        raw.description = Some("   ".to_string());
        assert_eq!(normalize_row(raw).unwrap().description, None);

        let raw = row("abc-1", "Widget");
        assert_eq!(normalize_row(raw).unwrap().description, None);
    }

    #[test]
    fn test_active_flag_false_tokens() {
        assert!(!parse_active_flag(Some("false")));
        assert!(!parse_active_flag(Some("FALSE")));
        assert!(!parse_active_flag(Some(" 0 ")));
        assert!(!parse_active_flag(Some("No")));
    }

    #[test]
    fn test_active_flag_defaults_to_true() {
        assert!(parse_active_flag(None));
        assert!(parse_active_flag(Some("")));
        assert!(parse_active_flag(Some("true")));
        assert!(parse_active_flag(Some("yes")));
        assert!(parse_active_flag(Some("garbage")));
    }

    #[test]
    fn test_active_flag_threads_through() {
        let mut raw = row("abc-1", "Widget");
        raw.is_active = Some("false".to_string());
        assert!(!normalize_row(raw).unwrap().is_active);
    }
}
