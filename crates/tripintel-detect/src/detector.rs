use rust_decimal::Decimal;
use serde::Serialize;

use crate::patterns::{
    CURRENCIES, DESTINATIONS, DURATION_DAYS, DURATION_NIGHTS, HOTEL_NAME, OFFER_KEYWORDS, PHONE,
    PRICE_AMOUNT_FIRST, PRICE_CURRENCY_FIRST,
};

/// Everything the detector could pull out of a single caption.
///
/// All fields are best-effort; `confidence` is a weighted sum of which
/// fields matched, clamped to `[0.0, 1.0]`. A caption with no signal at all
/// yields the `Default` value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OfferDetection {
    pub destination: Option<String>,
    pub price: Option<Decimal>,
    pub currency_code: Option<String>,
    pub duration_nights: Option<i32>,
    pub hotel: Option<String>,
    pub contact_phone: Option<String>,
    pub confidence: f32,
}

impl OfferDetection {
    /// True when nothing extracted and no offer vocabulary matched.
    pub fn is_empty(&self) -> bool {
        self.confidence == 0.0
    }
}

const WEIGHT_PRICE: f32 = 0.35;
const WEIGHT_DESTINATION: f32 = 0.25;
const WEIGHT_DURATION: f32 = 0.15;
const WEIGHT_HOTEL: f32 = 0.10;
const WEIGHT_PHONE: f32 = 0.10;
const WEIGHT_KEYWORD: f32 = 0.05;
const KEYWORD_CAP: f32 = 0.10;

/// Run every extractor over the caption and score the result.
///
/// Pure: same caption in, same detection out. Empty or whitespace-only
/// captions short-circuit to the default detection.
pub fn detect_offer(caption: &str) -> OfferDetection {
    let caption = caption.trim();
    if caption.is_empty() {
        return OfferDetection::default();
    }
    let lower = caption.to_lowercase();

    let destination = extract_destination(&lower);
    let price = extract_price(caption);
    let duration_nights = extract_duration(&lower);
    let hotel = extract_hotel(caption);
    let contact_phone = extract_phone(caption);

    let mut confidence = 0.0f32;
    if price.is_some() {
        confidence += WEIGHT_PRICE;
    }
    if destination.is_some() {
        confidence += WEIGHT_DESTINATION;
    }
    if duration_nights.is_some() {
        confidence += WEIGHT_DURATION;
    }
    if hotel.is_some() {
        confidence += WEIGHT_HOTEL;
    }
    if contact_phone.is_some() {
        confidence += WEIGHT_PHONE;
    }
    confidence += keyword_score(&lower);

    let (price, currency_code) = match price {
        Some((amount, code)) => (Some(amount), Some(code)),
        None => (None, None),
    };

    OfferDetection {
        destination,
        price,
        currency_code,
        duration_nights,
        hotel,
        contact_phone,
        confidence: confidence.clamp(0.0, 1.0),
    }
}

fn keyword_score(lower: &str) -> f32 {
    let hits = OFFER_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
    (hits as f32 * WEIGHT_KEYWORD).min(KEYWORD_CAP)
}

/// First destination whose alias appears earliest in the caption. Aliases
/// within an entry are ordered longest-first so "sharm el sheikh" wins over
/// the bare "sharm".
fn extract_destination(lower: &str) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for (canonical, aliases) in DESTINATIONS {
        for alias in *aliases {
            if let Some(pos) = lower.find(alias) {
                match best {
                    Some((best_pos, _)) if best_pos <= pos => {}
                    _ => best = Some((pos, canonical)),
                }
                break;
            }
        }
    }
    best.map(|(_, canonical)| canonical.to_string())
}

/// Price with its ISO currency code, trying amount-first word order before
/// currency-first.
fn extract_price(caption: &str) -> Option<(Decimal, String)> {
    for re in [&*PRICE_AMOUNT_FIRST, &*PRICE_CURRENCY_FIRST] {
        for caps in re.captures_iter(caption) {
            let amount = caps.name("amount")?.as_str();
            let token = caps.name("currency")?.as_str();
            let Some(code) = normalize_currency(token) else {
                continue;
            };
            if let Some(amount) = parse_amount(amount) {
                return Some((amount, code.to_string()));
            }
        }
    }
    None
}

fn normalize_currency(token: &str) -> Option<&'static str> {
    let token = token.trim().to_lowercase();
    CURRENCIES
        .iter()
        .find(|(known, _)| *known == token)
        .map(|(_, code)| *code)
}

/// Parse an amount string into a `Decimal`, disambiguating separator use:
/// `"12,500"` and `"1.200"` are thousands-grouped, `"499.50"` and `"12,5"`
/// carry a fractional part.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim_matches(|c| c == '.' || c == ',');
    if raw.is_empty() {
        return None;
    }

    let has_comma = raw.contains(',');
    let has_dot = raw.contains('.');
    let normalized = if has_comma && has_dot {
        // Mixed separators: the last one is the decimal point.
        if raw.rfind('.') > raw.rfind(',') {
            raw.replace(',', "")
        } else {
            raw.replace('.', "").replace(',', ".")
        }
    } else if has_comma {
        normalize_single_separator(raw, ',')
    } else if has_dot {
        normalize_single_separator(raw, '.')
    } else {
        raw.to_string()
    };

    let amount: Decimal = normalized.parse().ok()?;
    if amount <= Decimal::ZERO {
        return None;
    }
    Some(amount)
}

/// One separator kind present. Exactly-three trailing digits after a single
/// occurrence reads as a thousands group ("1.200", "12,500"); one or two
/// digits read as a fraction ("12,5"). Multiple occurrences are always
/// grouping.
fn normalize_single_separator(raw: &str, sep: char) -> String {
    let parts: Vec<&str> = raw.split(sep).collect();
    let grouping = parts.len() > 2 || parts.last().is_some_and(|tail| tail.len() == 3);
    if grouping {
        raw.replace(sep, "")
    } else if sep == ',' {
        raw.replace(',', ".")
    } else {
        raw.to_string()
    }
}

/// Nights stated directly win; otherwise derive from a days figure.
fn extract_duration(lower: &str) -> Option<i32> {
    if let Some(caps) = DURATION_NIGHTS.captures(lower) {
        return caps[1].parse::<i32>().ok().filter(|n| *n > 0);
    }
    let days: i32 = DURATION_DAYS.captures(lower)?[1].parse().ok()?;
    let nights = days - 1;
    (nights > 0).then_some(nights)
}

fn extract_hotel(caption: &str) -> Option<String> {
    let caps = HOTEL_NAME.captures(caption)?;
    // Group layout depends on which alternation branch matched: name before
    // the lodging word, or after it.
    let name = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
        (Some(name), Some(kind), _, _) => format!("{} {}", name.as_str(), kind.as_str()),
        (_, _, Some(kind), Some(name)) => format!("{} {}", kind.as_str(), name.as_str()),
        _ => return None,
    };
    Some(name)
}

/// First match with a plausible subscriber-number length. Prices never get
/// this long, so the ten-digit floor keeps them out.
fn extract_phone(caption: &str) -> Option<String> {
    for caps in PHONE.captures_iter(caption) {
        let matched = caps.get(0)?.as_str().trim();
        let digits = matched.chars().filter(char::is_ascii_digit).count();
        if (10..=15).contains(&digits) {
            return Some(matched.to_string());
        }
    }
    None
}
