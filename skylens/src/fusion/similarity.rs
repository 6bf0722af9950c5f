//! Name similarity for duplicate detection.
//!
//! Sources describe the same landmark with slightly different names
//! ("Golden Gate Bridge" vs "golden gate bridge "). Similarity is scored
//! from Levenshtein edit distance over characters, normalized to [0.0,
//! 1.0]. Callers are expected to pass pre-normalized keys (see
//! [`Candidate::similarity_key`](crate::candidate::Candidate::similarity_key)),
//! so no case folding happens here.

/// Levenshtein edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row DP: previous and current row of the edit matrix.
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current: Vec<usize> = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Similarity of two names in [0.0, 1.0]; 1.0 means identical.
///
/// Defined as `(max_len - distance) / max_len` over char counts. Two empty
/// strings are identical and score 1.0.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    (max_len - levenshtein(a, b)) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_classic_pair() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("ferry building", "ferry building"), 0);
    }

    #[test]
    fn test_levenshtein_empty_sides() {
        assert_eq!(levenshtein("", "tower"), 5);
        assert_eq!(levenshtein("tower", ""), 5);
        assert_eq!(levenshtein("", ""), 0);
    }

    #[test]
    fn test_levenshtein_symmetric() {
        assert_eq!(
            levenshtein("transamerica pyramid", "transamerica bldg"),
            levenshtein("transamerica bldg", "transamerica pyramid"),
        );
    }

    #[test]
    fn test_levenshtein_counts_chars_not_bytes() {
        // Multi-byte chars count as single edits.
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn test_identical_names_score_one() {
        assert!((name_similarity("coit tower", "coit tower") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_both_empty_score_one() {
        assert!((name_similarity("", "") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_names_score_low() {
        assert!(name_similarity("alcatraz", "zzzzzzzz") < 0.2);
    }

    #[test]
    fn test_near_duplicate_clears_default_threshold() {
        // One char of drift across a 22-char name.
        let score = name_similarity("golden gate bridge", "golden gates bridge");
        assert!(score > 0.9, "score was {score}");
    }

    #[test]
    fn test_similarity_in_unit_interval() {
        for (a, b) in [
            ("pier 39", "pier 39 marina"),
            ("sutro tower", "sutro"),
            ("a", "b"),
        ] {
            let score = name_similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} vs {b} scored {score}");
        }
    }
}
