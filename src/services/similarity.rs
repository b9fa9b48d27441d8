use strsim::levenshtein;

use crate::services::normalize::normalize_text;

/// Brand names must be close to verbatim (0.0 - 1.0).
pub const BRAND_NAME_THRESHOLD: f64 = 0.85;

/// Class/type designations are phrased more loosely on labels.
pub const PRODUCT_TYPE_THRESHOLD: f64 = 0.70;

/// Edit-distance similarity of two strings, `1.0` for identical input
/// (including two empty strings) and `0.0` for nothing in common.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Whether two free-text values refer to the same thing.
///
/// Both sides are normalized first. Containment counts as a match so that a
/// label reading "Old Tom Distillery" accepts "Old Tom Distillery LLC".
pub fn is_similar(a: Option<&str>, b: Option<&str>, threshold: f64) -> bool {
    let a = normalize_text(a);
    let b = normalize_text(b);

    if a == b || a.contains(&b) || b.contains(&a) {
        return true;
    }

    similarity(&a, &b) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_after_normalization() {
        assert!(is_similar(
            Some("OLD TOM DISTILLERY"),
            Some("  old tom distillery "),
            BRAND_NAME_THRESHOLD
        ));
    }

    #[test]
    fn test_containment_matches() {
        assert!(is_similar(
            Some("Old Tom Distillery"),
            Some("Old Tom Distillery, LLC"),
            0.99
        ));
    }

    #[test]
    fn test_empty_side_is_contained() {
        // The empty string is a substring of everything.
        assert!(is_similar(None, Some("Old Tom"), BRAND_NAME_THRESHOLD));
    }

    #[test]
    fn test_brand_below_threshold() {
        assert!(!is_similar(
            Some("Old Tom Distillery"),
            Some("Tom's Distillery"),
            BRAND_NAME_THRESHOLD
        ));
    }

    #[test]
    fn test_single_typo_passes() {
        assert!(is_similar(
            Some("Kentucky Straight Bourbon Whiskey"),
            Some("Kentucky Straight Burbon Whiskey"),
            BRAND_NAME_THRESHOLD
        ));
    }

    #[test]
    fn test_product_type_looser_threshold() {
        // 4 edits over 18 characters: ~0.78
        let a = "american pale ale";
        let b = "america pale lager";
        let score = similarity(a, b);
        assert!(score >= PRODUCT_TYPE_THRESHOLD && score < BRAND_NAME_THRESHOLD);
        assert!(is_similar(Some(a), Some(b), PRODUCT_TYPE_THRESHOLD));
    }

    #[test]
    fn test_accented_letters_are_significant() {
        // "rosé" and "rose" differ by one letter out of four: 0.75.
        assert!(!is_similar(Some("Rosé"), Some("Rose"), BRAND_NAME_THRESHOLD));
        assert!(is_similar(Some("Rosé"), Some("Rose"), PRODUCT_TYPE_THRESHOLD));
        assert!(is_similar(Some("ROSÉ"), Some("rosé"), BRAND_NAME_THRESHOLD));
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("kitten", "sitting"), 1.0 - 3.0 / 7.0);
    }

    #[test]
    fn test_threshold_monotonic() {
        let pairs = [
            ("Old Tom Distillery", "Tom's Distillery"),
            ("Bourbon Whiskey", "Rye Whiskey"),
            ("Vodka", "Gin"),
            ("Pinot Noir", "Pinot Grigio"),
        ];
        let thresholds = [0.0, 0.3, 0.5, 0.7, 0.85, 0.95, 1.0];
        for (a, b) in pairs {
            let verdicts: Vec<bool> = thresholds
                .iter()
                .map(|t| is_similar(Some(a), Some(b), *t))
                .collect();
            assert!(
                verdicts.windows(2).all(|w| w[0] || !w[1]),
                "raising the threshold turned a mismatch into a match for {a:?} / {b:?}"
            );
        }
    }
}
