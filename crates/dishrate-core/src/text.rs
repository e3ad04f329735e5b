//! Text normalization ahead of classification
//!
//! The classifier was trained on lowercased text stripped of everything
//! but alphanumerics, whitespace, and basic sentence punctuation, so
//! incoming reviews pass through the same cleaning before inference.

/// Normalize raw review text for the classifier.
///
/// Lowercases, keeps only alphanumerics, whitespace and `. , ! ?`,
/// collapses whitespace runs to a single space, and trims. Total over
/// any input (the empty string maps to the empty string) and
/// idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if c.is_ascii_alphanumeric() || matches!(c, '.' | ',' | '!' | '?') {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }

    out
}

/// Count words the way `\w+` would: maximal runs of alphanumeric or
/// underscore characters. Used by predict validation.
pub fn word_count(text: &str) -> usize {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|run| !run.is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(
            normalize("The FOOD was  *great*! (really)"),
            "the food was great! really"
        );
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  so \t good \n indeed  "), "so good indeed");
    }

    #[test]
    fn keeps_sentence_punctuation() {
        assert_eq!(normalize("Good, bad. Ugly? No!"), "good, bad. ugly? no!");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(normalize("café ok"), "caf ok");
    }

    #[test]
    fn total_over_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("@#$%"), "");
    }

    #[test]
    fn idempotent() {
        for raw in ["Hello,   WORLD!!", "", "a  b\tc", "Great food 10/10"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn word_count_matches_word_runs() {
        assert_eq!(word_count("the food was great"), 4);
        assert_eq!(word_count("good"), 1);
        assert_eq!(word_count("good!!!"), 1);
        assert_eq!(word_count("well,done"), 2);
        assert_eq!(word_count("!!! ???"), 0);
        assert_eq!(word_count(""), 0);
    }
}
