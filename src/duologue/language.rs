//! Reply language hint.
//!
//! A small stop-word classifier: it counts how many common function words of each
//! supported language occur in a text and picks the language with the most hits.
//! Anything it cannot place is treated as English.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    Pt,
    It,
}

impl Language {
    /// English name, as used in "Reply in <name>." instructions.
    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
            Language::Pt => "Portuguese",
            Language::It => "Italian",
        }
    }

    /// ISO 639-1 tag.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Pt => "pt",
            Language::It => "it",
        }
    }
}

// Listed in tie-break order: English wins ties, then the others in table order.
const STOP_WORDS: &[(Language, &[&str])] = &[
    (
        Language::En,
        &[
            "the", "and", "is", "are", "you", "what", "how", "of", "to", "in", "it", "that",
            "this", "with", "for", "i", "my", "do", "does", "not",
        ],
    ),
    (
        Language::Es,
        &[
            "el", "la", "los", "las", "es", "qué", "que", "cómo", "por", "para", "una", "y",
            "pero", "yo", "mi", "está", "son", "del", "con", "hola",
        ],
    ),
    (
        Language::Fr,
        &[
            "le", "les", "est", "et", "je", "tu", "vous", "quoi", "comment", "pour", "une",
            "des", "du", "avec", "mais", "pas", "c'est", "bonjour", "sont", "au",
        ],
    ),
    (
        Language::De,
        &[
            "der", "die", "das", "und", "ist", "ich", "du", "sie", "nicht", "wie", "was",
            "mit", "für", "ein", "eine", "auf", "sind", "hallo", "warum", "zu",
        ],
    ),
    (
        Language::Pt,
        &[
            "o", "os", "as", "é", "e", "não", "você", "como", "por", "para", "uma", "um", "com",
            "mas", "eu", "são", "do", "da", "olá", "isso",
        ],
    ),
    (
        Language::It,
        &[
            "il", "lo", "gli", "è", "e", "non", "sono", "come", "perché", "per", "una", "un",
            "con", "ma", "io", "che", "della", "ciao", "sei", "questo",
        ],
    ),
];

/// Guess the language of `text`.
///
/// ```rust
/// use duologue::language::{detect_language, Language};
///
/// assert_eq!(detect_language("¿Qué es el feminismo para ti?"), Language::Es);
/// assert_eq!(detect_language("What is feminism to you?"), Language::En);
/// assert_eq!(detect_language(""), Language::En);
/// ```
pub fn detect_language(text: &str) -> Language {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphabetic() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return Language::En;
    }

    let mut best = (Language::En, 0usize);
    for (language, stop_words) in STOP_WORDS {
        let hits = words.iter().filter(|w| stop_words.contains(w)).count();
        if hits > best.1 {
            best = (*language, hits);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_supported_languages() {
        assert_eq!(
            detect_language("Bonjour, c'est quoi le féminisme pour vous ?"),
            Language::Fr
        );
        assert_eq!(
            detect_language("Hallo, was ist der Feminismus und warum ist er wichtig?"),
            Language::De
        );
        assert_eq!(
            detect_language("Ciao, che cosa è il femminismo per te? Non lo so."),
            Language::It
        );
        assert_eq!(
            detect_language("Olá, você acha que isso não é feminismo?"),
            Language::Pt
        );
    }

    #[test]
    fn unknown_text_defaults_to_english() {
        assert_eq!(detect_language("12345 !!!"), Language::En);
        assert_eq!(detect_language("Xyzzy plugh"), Language::En);
    }

    #[test]
    fn names_and_codes() {
        assert_eq!(Language::De.name(), "German");
        assert_eq!(Language::Pt.code(), "pt");
    }
}
