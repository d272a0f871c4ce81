//! Normalization of free-text, possibly multi-valued attributes.

/// Split `raw` on `delimiter` into trimmed, lowercase, non-empty tokens
///
/// Order is preserved. An empty delimiter treats the whole input as one token.
pub fn tokenize(raw: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        let token = raw.trim();
        return if token.is_empty() {
            Vec::new()
        } else {
            vec![token.to_lowercase()]
        };
    }

    raw.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Reduce a file format string to its lowercase alphanumeric core
///
/// `".PDF"`, `"pdf "` and `"p_d-f"` all become `"pdf"`.
pub fn normalize_format(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_trims_and_lowercases() {
        assert_eq!(
            tokenize(" French ,English,  GERMAN ", ","),
            vec!["french", "english", "german"]
        );
    }

    #[test]
    fn test_tokenize_drops_empty_tokens() {
        assert_eq!(tokenize("epub,, ,pdf,", ","), vec!["epub", "pdf"]);
    }

    #[test]
    fn test_tokenize_empty_input() {
        assert!(tokenize("", ",").is_empty());
        assert!(tokenize("   ", ",").is_empty());
        assert!(tokenize(" , ,", ",").is_empty());
    }

    #[test]
    fn test_tokenize_custom_delimiter() {
        assert_eq!(tokenize("English; French", ";"), vec!["english", "french"]);
        // Commas are not split when another delimiter is configured
        assert_eq!(tokenize("a, b", ";"), vec!["a, b"]);
    }

    #[test]
    fn test_tokenize_empty_delimiter() {
        assert_eq!(tokenize(" English ", ""), vec!["english"]);
        assert!(tokenize("  ", "").is_empty());
    }

    #[test]
    fn test_normalize_format() {
        assert_eq!(normalize_format("pdf"), "pdf");
        assert_eq!(normalize_format(".pdf"), "pdf");
        assert_eq!(normalize_format("PDF"), "pdf");
        assert_eq!(normalize_format(" .e_pub! "), "epub");
        assert_eq!(normalize_format("azw3"), "azw3");
        assert_eq!(normalize_format("..."), "");
    }
}
