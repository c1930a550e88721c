//! Pattern tables and compiled regexes for the offer detector.

use std::sync::LazyLock;

use regex::Regex;

/// Known destinations: `(canonical name, lowercase aliases)`.
///
/// Aliases include transliteration variants that show up in captions from
/// Egyptian agencies. Matching is done on the lowercased caption.
pub(crate) const DESTINATIONS: &[(&str, &[&str])] = &[
    ("Sharm El Sheikh", &["sharm el sheikh", "sharm el-sheikh", "sharm"]),
    ("Hurghada", &["hurghada", "el gouna", "gouna"]),
    ("Dahab", &["dahab"]),
    ("Marsa Alam", &["marsa alam"]),
    ("Luxor", &["luxor"]),
    ("Aswan", &["aswan"]),
    ("Alexandria", &["alexandria", "alex"]),
    ("Siwa", &["siwa"]),
    ("Ain Sokhna", &["ain sokhna", "sokhna"]),
    ("Marsa Matrouh", &["marsa matrouh", "matrouh"]),
    ("North Coast", &["north coast", "sahel"]),
    ("Fayoum", &["fayoum", "el fayoum"]),
    ("Nuweiba", &["nuweiba"]),
    ("Taba", &["taba"]),
    ("Cairo", &["cairo"]),
    ("Dubai", &["dubai"]),
    ("Istanbul", &["istanbul"]),
    ("Antalya", &["antalya"]),
    ("Beirut", &["beirut"]),
    ("Jeddah", &["jeddah"]),
];

/// Generic offer vocabulary. Any hit nudges confidence upward even when no
/// structured field extracts.
pub(crate) const OFFER_KEYWORDS: &[&str] = &[
    "offer",
    "deal",
    "package",
    "trip",
    "tour",
    "getaway",
    "book now",
    "limited",
    "per person",
    "all inclusive",
    "رحلة",
    "عرض",
];

/// Currency tokens mapped to ISO 4217 codes. Longer tokens first so the
/// alternation prefers `"l.e."` over `"le"` and `"egp"` over `"e"`-prefixed
/// noise.
pub(crate) const CURRENCIES: &[(&str, &str)] = &[
    ("egp", "EGP"),
    ("l.e.", "EGP"),
    ("l.e", "EGP"),
    ("le", "EGP"),
    ("جنيه", "EGP"),
    ("usd", "USD"),
    ("dollars", "USD"),
    ("dollar", "USD"),
    ("$", "USD"),
    ("eur", "EUR"),
    ("€", "EUR"),
    ("gbp", "GBP"),
    ("£", "GBP"),
    ("sar", "SAR"),
    ("aed", "AED"),
];

// Currency alternation used inside the price regexes. Word tokens carry an
// explicit boundary; symbol tokens and dotted abbreviations cannot (a `\b`
// after `.` or `€` inverts). Kept in sync with CURRENCIES by the
// `currency_tokens_all_covered` test below.
const CURRENCY_AFTER: &str = r"(?:egp|le|usd|dollars?|eur|gbp|sar|aed)\b|l\.e\.?|جنيه|[$€£]";
const CURRENCY_BEFORE: &str = r"\b(?:egp|le|usd|dollars?|eur|gbp|sar|aed)|l\.e\.?|جنيه|[$€£]";

/// `"12,500 EGP"`, `"499 usd"`, `"1.200€"` — amount before the currency token.
pub(crate) static PRICE_AMOUNT_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<amount>\d[\d.,]*)\s*(?P<currency>{CURRENCY_AFTER})"
    ))
    .expect("PRICE_AMOUNT_FIRST pattern must compile")
});

/// `"EGP 12500"`, `"$ 499"` — currency token before the amount.
pub(crate) static PRICE_CURRENCY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<currency>{CURRENCY_BEFORE})\s*(?P<amount>\d[\d.,]*)"
    ))
    .expect("PRICE_CURRENCY_FIRST pattern must compile")
});

/// `"5 nights"`, `"4 layali"` — nights stated directly.
pub(crate) static DURATION_NIGHTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s*(?:nights?|layali|ليالي|ليالى)")
        .expect("DURATION_NIGHTS pattern must compile")
});

/// `"6 days"` — only days stated; nights derived as days - 1.
pub(crate) static DURATION_DAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s*(?:days?|أيام)").expect("DURATION_DAYS pattern must compile")
});

/// `"Sunrise Grand Resort"`, `"Hotel Novotel"` — capitalized run adjacent to
/// a lodging word. Matched against the original-case caption.
pub(crate) static HOTEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:([A-Z][\w'&-]*(?:\s+[A-Z][\w'&-]*){0,3})\s+(Hotel|Resort|Lodge|Camp)\b)|(?:\b(Hotel|Resort)\s+([A-Z][\w'&-]*(?:\s+[A-Z][\w'&-]*){0,3}))",
    )
    .expect("HOTEL_NAME pattern must compile")
});

/// Phone numbers: international or Egyptian-mobile shapes, tolerating
/// spaces and dashes. `"+20 100 123 4567"`, `"01001234567"`.
pub(crate) static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?\d{1,3}[\s-]?)?(\d[\d\s-]{8,13}\d)")
        .expect("PHONE pattern must compile")
});
