//! Label normalization: folds the site's free-text field labels onto
//! canonical column names.
//!
//! The markup is inconsistent about how it spells labels ("Engine CC",
//! "Engine Capacity", "Engine CC / kW", ...), so lookup happens on a
//! normalized form: lowercased, separator runs collapsed to single spaces,
//! and spacing variants of the cc/kW unit folded into one token. Labels
//! with no mapping pass through trimmed and become their own column key.

/// Synonym sets observed in the site's markup, keyed by post-normalized label.
/// Lookup is exact-match only; no fuzzy or partial matching.
const LABEL_SYNONYMS: &[(&str, &str)] = &[
    ("fuel type", "Fuel Type"),
    ("fuel", "Fuel Type"),
    ("engine cc/kw", "Engine CC / kw"),
    ("engine cc kw", "Engine CC / kw"),
    ("engine cckw", "Engine CC / kw"),
    ("engine cc", "Engine CC / kw"),
    ("engine capacity", "Engine CC / kw"),
    ("engine capacity cc", "Engine CC / kw"),
    ("engine", "Engine CC / kw"),
];

/// Collapse runs of whitespace, hyphens, colons, underscores and parentheses
/// into single spaces, trimming both ends.
fn fold_separators(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut prev_was_space = false;
    for c in label.chars() {
        if c.is_whitespace() || matches!(c, '-' | ':' | '_' | '(' | ')') {
            if !prev_was_space && !out.is_empty() {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(c);
            prev_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Normalize a raw scraped label to its canonical column name.
///
/// Unrecognized labels are returned trimmed but otherwise unchanged, never
/// an error. An unknown label becomes its own column key, which the store
/// drops if it is not in the schema.
pub fn normalize_label(raw: &str) -> String {
    let key = fold_separators(&raw.to_lowercase())
        // Fold spacing variants of the compound cc/kW unit into one token.
        // Each replacement is idempotent and non-overlapping with the others.
        .replace("k w", "kw")
        .replace("cc / kw", "cc/kw")
        .replace("cc /kw", "cc/kw")
        .replace("cc/ kw", "cc/kw");

    for (synonym, canonical) in LABEL_SYNONYMS {
        if key == *synonym {
            return (*canonical).to_string();
        }
    }
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_variants_map_to_canonical() {
        for raw in [
            "Engine CC / kW",
            "Engine CC/kW",
            "Engine CC",
            "Engine Capacity",
            "Engine Capacity (cc)",
            "Engine",
            "engine cc k w",
        ] {
            assert_eq!(normalize_label(raw), "Engine CC / kw", "label: {raw:?}");
        }
    }

    #[test]
    fn invariant_under_case_and_separator_changes() {
        assert_eq!(normalize_label("Engine-CC"), normalize_label("engine cc"));
        assert_eq!(normalize_label("ENGINE_CC"), normalize_label("engine cc"));
        assert_eq!(normalize_label("Engine:CC"), normalize_label("engine cc"));
        assert_eq!(normalize_label("  engine   cc  "), "Engine CC / kw");
    }

    #[test]
    fn fuel_variants_map_to_canonical() {
        assert_eq!(normalize_label("Fuel type"), "Fuel Type");
        assert_eq!(normalize_label("FUEL"), "Fuel Type");
        assert_eq!(normalize_label("fuel-type"), "Fuel Type");
    }

    #[test]
    fn unmapped_labels_pass_through_trimmed() {
        assert_eq!(normalize_label("Year of Manufacture"), "Year of Manufacture");
        assert_eq!(normalize_label("  Blue-T Grade  "), "Blue-T Grade");
        assert_eq!(normalize_label("Transmission"), "Transmission");
    }

    #[test]
    fn fold_separators_collapses_runs() {
        assert_eq!(fold_separators("no. of  owners"), "no. of owners");
        assert_eq!(fold_separators("year of reg."), "year of reg.");
        assert_eq!(fold_separators("(grade)"), "grade");
    }
}
