use std::collections::BTreeSet;

use strsim::{jaro_winkler, normalized_levenshtein};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::core::confidence::to_percent;

/// Pluggable name similarity on a `0..=100` scale.
///
/// Implementations compare normalized names, so scores ignore case,
/// accents, punctuation and whitespace runs.
pub trait StringSimilarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Lowercase, strip accents, turn punctuation into spaces, collapse runs.
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw
        .nfkd()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shared prelude: identical names score 100, an empty side scores 0.
fn prepared(a: &str, b: &str) -> Result<(String, String), u8> {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a == b {
        return Err(100);
    }
    if a.is_empty() || b.is_empty() {
        return Err(0);
    }
    Ok((a, b))
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        0.0
    } else {
        normalized_levenshtein(a, b)
    }
}

/// Normalized edit distance over the whole string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl StringSimilarity for Levenshtein {
    fn score(&self, a: &str, b: &str) -> u8 {
        match prepared(a, b) {
            Ok((a, b)) => to_percent(ratio(&a, &b)),
            Err(fixed) => fixed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl StringSimilarity for JaroWinkler {
    fn score(&self, a: &str, b: &str) -> u8 {
        match prepared(a, b) {
            // greedy matching can differ with argument order
            Ok((a, b)) => to_percent(jaro_winkler(&a, &b).max(jaro_winkler(&b, &a))),
            Err(fixed) => fixed,
        }
    }
}

/// Token-set comparison: shared tokens count fully, so a surname alone
/// matches the full roster name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetRatio;

fn token_set(a: &str, b: &str) -> f64 {
    let a_tokens: BTreeSet<&str> = a.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let sect = join(a_tokens.intersection(&b_tokens).copied().collect());
    let only_a = join(a_tokens.difference(&b_tokens).copied().collect());
    let only_b = join(b_tokens.difference(&a_tokens).copied().collect());

    let with_sect = |rest: &str| format!("{sect} {rest}").trim().to_string();
    let t1 = with_sect(&only_a);
    let t2 = with_sect(&only_b);

    ratio(&sect, &t1).max(ratio(&sect, &t2)).max(ratio(&t1, &t2))
}

impl StringSimilarity for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        match prepared(a, b) {
            Ok((a, b)) => to_percent(token_set(&a, &b)),
            Err(fixed) => fixed,
        }
    }
}

/// Default matcher: the better of plain edit distance and a slightly
/// discounted token-set score.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

const TOKEN_SCALE: f64 = 0.95;

impl StringSimilarity for WeightedRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        match prepared(a, b) {
            Ok((a, b)) => to_percent(ratio(&a, &b).max(token_set(&a, &b) * TOKEN_SCALE)),
            Err(fixed) => fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_case_accents_and_punctuation() {
        assert_eq!(normalize_name("  Nikola   JOKIĆ "), "nikola jokic");
        assert_eq!(normalize_name("D'Angelo Russell"), "d angelo russell");
        assert_eq!(normalize_name(", ."), "");
    }

    #[test]
    fn surname_matches_full_name() {
        assert!(WeightedRatio.score("James", "LeBron James") >= 90);
        assert!(Levenshtein.score("James", "LeBron James") < 50);
    }

    #[test]
    fn unrelated_names_score_low() {
        assert!(WeightedRatio.score("Xyz Unknown", "LeBron James") < 50);
        assert!(WeightedRatio.score("Xyz Unknown", "Kevin Durant") < 50);
    }

    #[test]
    fn initials_still_lean_toward_the_right_player() {
        let right = WeightedRatio.score("L. James", "LeBron James");
        let wrong = WeightedRatio.score("L. James", "Kevin Durant");
        assert!(right > wrong);
        assert!(right >= 50);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(TokenSetRatio.score("", "Kevin Durant"), 0);
        assert_eq!(JaroWinkler.score("Kevin Durant", "  "), 0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn scorers() -> Vec<Box<dyn StringSimilarity>> {
            vec![
                Box::new(Levenshtein),
                Box::new(JaroWinkler),
                Box::new(TokenSetRatio),
                Box::new(WeightedRatio),
            ]
        }

        proptest! {
            #[test]
            fn identity_scores_full(a in "[A-Za-z .'-]{0,24}") {
                for s in scorers() {
                    prop_assert_eq!(s.score(&a, &a), 100);
                }
            }

            #[test]
            fn bounded_and_symmetric(a in "[A-Za-z .'-]{0,24}", b in "[A-Za-z .'-]{0,24}") {
                for s in scorers() {
                    let ab = s.score(&a, &b);
                    prop_assert!(ab <= 100);
                    prop_assert_eq!(ab, s.score(&b, &a));
                }
            }

            #[test]
            fn ignores_case_and_spacing(a in "[A-Za-z ]{0,24}", b in "[A-Za-z ]{0,24}") {
                let noisy = format!("  {}  ", a.to_uppercase().replace(' ', "   "));
                for s in scorers() {
                    prop_assert_eq!(s.score(&a, &b), s.score(&noisy, &b));
                }
            }
        }
    }
}
