//! Allow-list of languages that may carry a preference weight.

/// Canonical (English, lowercase) names of supported languages
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "afrikaans",
    "albanian",
    "arabic",
    "armenian",
    "azerbaijani",
    "basque",
    "belarusian",
    "bengali",
    "bosnian",
    "bulgarian",
    "catalan",
    "chinese",
    "croatian",
    "czech",
    "danish",
    "dutch",
    "english",
    "esperanto",
    "estonian",
    "finnish",
    "french",
    "galician",
    "georgian",
    "german",
    "greek",
    "hebrew",
    "hindi",
    "hungarian",
    "icelandic",
    "indonesian",
    "irish",
    "italian",
    "japanese",
    "kazakh",
    "korean",
    "latin",
    "latvian",
    "lithuanian",
    "macedonian",
    "malay",
    "mongolian",
    "norwegian",
    "persian",
    "polish",
    "portuguese",
    "romanian",
    "russian",
    "serbian",
    "slovak",
    "slovenian",
    "spanish",
    "swahili",
    "swedish",
    "tamil",
    "thai",
    "turkish",
    "ukrainian",
    "urdu",
    "uzbek",
    "vietnamese",
    "welsh",
];

/// Check whether `name` is a supported language (case-insensitive)
///
/// Regional variants such as "Brazilian Portuguese" are not supported.
pub fn is_supported_language(name: &str) -> bool {
    let name = name.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .any(|lang| lang.eq_ignore_ascii_case(name))
}
