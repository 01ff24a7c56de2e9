/// A chat message reduced to the form the classifier matches against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Lowercased, trimmed message.
    pub text: String,
    /// Whitespace-separated tokens with edge punctuation removed.
    pub words: Vec<String>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Message length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn has_word(&self, candidates: &[String]) -> bool {
        self.words
            .iter()
            .any(|word| candidates.iter().any(|c| c == word))
    }

    /// Substring match. A space at either edge of a marker also matches the
    /// start or end of the text, so `"как "` hits a trailing "как" but never "какой".
    pub fn contains_any(&self, markers: &[String]) -> bool {
        let padded = format!(" {} ", self.text);
        markers
            .iter()
            .any(|marker| !marker.is_empty() && padded.contains(marker.as_str()))
    }

    pub fn equals_any(&self, candidates: &[String]) -> bool {
        candidates.iter().any(|c| *c == self.text)
    }
}

/// Lowercase and trim a raw message, then split it into words.
///
/// Never fails: empty or whitespace-only input yields an empty text and no
/// words. Applying it to its own `text` output gives the same result.
pub fn normalize(raw: &str) -> NormalizedText {
    let text = raw.trim().to_lowercase().trim().to_string();
    let words = text
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();

    NormalizedText { text, words }
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn normalize_lowercases_cyrillic_and_trims() {
        let normalized = normalize("  Привет, МИР  ");
        assert_eq!(normalized.text, "привет, мир");
        assert_eq!(normalized.words, vec!["привет", "мир"]);
    }

    #[test]
    fn normalize_handles_empty_and_blank_input() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \t\n").is_empty());
        assert!(normalize("   ").words.is_empty());
    }

    #[test]
    fn punctuation_only_tokens_are_dropped() {
        let normalized = normalize("?!? ...");
        assert_eq!(normalized.text, "?!? ...");
        assert!(normalized.words.is_empty());
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "",
            "   ",
            "Привет РЕШИ",
            "  Который ЧАС?  ",
            "Hello,   World!",
            "ЁЛКА ёлка",
            "print(\"НЕ БУДУ!\")",
        ] {
            let once = normalize(input);
            let twice = normalize(&once.text);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn edge_spaces_in_markers_act_as_word_boundaries() {
        let markers = vec!["как ".to_string(), " прошу".to_string()];
        assert!(normalize("как").contains_any(&markers));
        assert!(normalize("ну и как").contains_any(&markers));
        assert!(normalize("прошу тебя").contains_any(&markers));
        assert!(!normalize("какой сегодня день").contains_any(&markers));
        assert!(!normalize("я спрошу тебя").contains_any(&markers));
    }

    #[test]
    fn plain_markers_match_anywhere() {
        let markers = vec!["погод".to_string()];
        assert!(normalize("Какая погода?").contains_any(&markers));
        assert!(!normalize("новости").contains_any(&markers));
    }

    #[test]
    fn char_len_counts_characters() {
        assert_eq!(normalize("как дела").char_len(), 8);
    }
}
