use ig_core::Language;

/// URL fragments that mark an English-language article.
const ENGLISH_MARKERS: [&str; 3] = ["en-gb", "/en/", "-en-"];

/// Picks the caption language from locale markers in the article URL.
///
/// Swedish unless one of the English markers is present; page content is not inspected.
pub fn detect_language(url: &str) -> Language {
    if ENGLISH_MARKERS.iter().any(|marker| url.contains(marker)) {
        Language::En
    } else {
        Language::Sv
    }
}

/// An explicit choice wins over detection.
pub fn resolve_language(hint: Option<Language>, url: &str) -> Language {
    hint.unwrap_or_else(|| detect_language(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_markers() {
        assert_eq!(detect_language("https://site.com/en/story"), Language::En);
        assert_eq!(detect_language("https://site.com/en-gb/story"), Language::En);
        assert_eq!(detect_language("https://site.com/news-en-story"), Language::En);
    }

    #[test]
    fn test_defaults_to_swedish() {
        assert_eq!(detect_language("https://site.com/sv/artikel"), Language::Sv);
        assert_eq!(detect_language("https://site.com/english"), Language::Sv);
        assert_eq!(detect_language(""), Language::Sv);
    }

    #[test]
    fn test_hint_overrides_detection() {
        assert_eq!(
            resolve_language(Some(Language::Sv), "https://site.com/en/story"),
            Language::Sv
        );
        assert_eq!(resolve_language(None, "https://site.com/en/story"), Language::En);
    }
}
