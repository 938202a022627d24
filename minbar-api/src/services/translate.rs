//! Dictionary-based translation stub
//!
//! Exact-match lookup keyed by literal source text. A miss synthesizes a
//! placeholder by prefixing the uppercased target-language tag to the
//! original text. This is a development stand-in, not a translation
//! engine: callers must never treat the fallback output as correct.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Built-in phrase dictionary: source text -> language tag -> translation
static DICTIONARY: Lazy<HashMap<&'static str, HashMap<&'static str, &'static str>>> =
    Lazy::new(|| {
        HashMap::from([
            (
                "Welcome",
                HashMap::from([
                    ("ar", "أهلاً وسهلاً"),
                    ("fr", "Bienvenue"),
                    ("ur", "خوش آمدید"),
                    ("tr", "Hoş geldiniz"),
                ]),
            ),
            (
                "Lessons",
                HashMap::from([("ar", "الدروس"), ("fr", "Leçons"), ("ur", "اسباق")]),
            ),
            (
                "Recitation",
                HashMap::from([("ar", "تلاوة"), ("fr", "Récitation"), ("ur", "تلاوت")]),
            ),
            (
                "Surah",
                HashMap::from([("ar", "سورة"), ("fr", "Sourate"), ("ur", "سورہ")]),
            ),
            (
                "Subscribe",
                HashMap::from([("ar", "اشترك"), ("fr", "S'abonner"), ("tr", "Abone ol")]),
            ),
            (
                "Payment successful",
                HashMap::from([
                    ("ar", "تمت عملية الدفع بنجاح"),
                    ("fr", "Paiement réussi"),
                    ("ur", "ادائیگی کامیاب رہی"),
                ]),
            ),
            (
                "Sign in",
                HashMap::from([("ar", "تسجيل الدخول"), ("fr", "Se connecter")]),
            ),
        ])
    });

/// A translation result
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    /// False when the placeholder fallback was synthesized
    pub matched: bool,
}

/// Translate a phrase into the target language
///
/// Source language defaults to "en"; it is informational only, the
/// dictionary is keyed by literal text.
pub fn translate(text: &str, target_language: &str, source_language: Option<&str>) -> Translation {
    let target = target_language.trim().to_lowercase();
    let source = source_language.unwrap_or("en").to_string();

    match DICTIONARY.get(text).and_then(|entries| entries.get(target.as_str())) {
        Some(translated) => Translation {
            translated_text: (*translated).to_string(),
            source_language: source,
            target_language: target,
            matched: true,
        },
        None => Translation {
            translated_text: format!("[{}] {}", target.to_uppercase(), text),
            source_language: source,
            target_language: target,
            matched: false,
        },
    }
}
