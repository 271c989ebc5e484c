//! Display normalization of raw promo records.
//!
//! The backend stores names lowercase/underscored and ships no image paths or
//! human-readable dates; this module derives all display fields in a single
//! pass. The transform is not idempotent — running it twice double-mangles
//! the promo name — so it is applied exactly once, before a record enters the
//! store.

use chrono::{Datelike, NaiveDate};

use crate::types::{PromoMap, PromoRecord};

const LOGO_DIR: &str = "./business-logos/";
const PROMO_IMAGE_DIR: &str = "./business-promos/";

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Normalizes every record in a promo mapping for display.
///
/// Category keys and record order are preserved; only the records themselves
/// are enriched.
#[must_use]
pub fn normalize_promos(mut promos: PromoMap) -> PromoMap {
    for records in promos.values_mut() {
        for record in records.iter_mut() {
            normalize_record(record);
        }
    }
    promos
}

fn normalize_record(record: &mut PromoRecord) {
    record.client_name = title_case(&record.client_name, ' ');
    record.bus_name = title_case(&record.bus_name, ' ');
    record.bus_image = Some(logo_path(&record.bus_name));
    // The image path is keyed on the raw promo name; derive it before the
    // title-casing below rewrites the name.
    record.promo_image = Some(promo_image_path(&record.promo_name));
    record.promo_name = title_case(&record.promo_name, '_');
    apply_validity_summary(record);
}

/// Title-cases a string: lowercases it, then uppercases the first letter of
/// each `separator`-delimited word, rejoining with spaces.
#[must_use]
pub fn title_case(s: &str, separator: char) -> String {
    s.to_lowercase()
        .split(separator)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Derives the business-logo asset path from a title-cased business name.
///
/// `"Subs + More"` becomes `./business-logos/SUBS_PLUS_MORE.png`.
#[must_use]
pub fn logo_path(bus_name: &str) -> String {
    let slug = bus_name.to_uppercase().replace(' ', "_").replace('+', "PLUS");
    format!("{LOGO_DIR}{slug}.png")
}

/// Derives the promo-image asset path from the *raw* (pre-title-case) promo
/// name. `%` and `$` are not usable in asset filenames, so they map to
/// `_PERCENT` and `DOLLAR_`.
#[must_use]
pub fn promo_image_path(raw_promo_name: &str) -> String {
    let slug = raw_promo_name
        .replace('%', "_PERCENT")
        .replace('$', "DOLLAR_");
    format!("{PROMO_IMAGE_DIR}{slug}.png")
}

/// Parses a `"YYYY-MM-DD"` date string into a [`NaiveDate`].
///
/// Returns `None` if the string does not match the expected format.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Renders a day-of-month as an English ordinal.
///
/// The suffix map (1/21/31 → `st`, 2/22 → `nd`, 3/23 → `rd`, everything else
/// `th`) is the exact mapping the UI has always shown. Days 11–13 fall
/// through to `th`, which is correct English.
#[must_use]
pub fn ordinal(day: u32) -> String {
    let suffix = match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

fn month_abbrev(date: NaiveDate) -> &'static str {
    MONTH_ABBREVS[date.month0() as usize]
}

/// Writes the human-readable validity summary onto a record.
///
/// Same month → one combined `date_validity_simplified`; start date only →
/// single-date form; different months → split from/to fields. A missing or
/// unparseable start date sets no validity field at all.
fn apply_validity_summary(record: &mut PromoRecord) {
    let Some(from) = record.date_valid_from.as_deref().and_then(parse_date) else {
        return;
    };
    let to = record.date_valid_to.as_deref().and_then(parse_date);
    let from_label = format!("{}, {}", month_abbrev(from), ordinal(from.day()));

    match to {
        Some(to) if month_abbrev(to) == month_abbrev(from) => {
            record.date_validity_simplified = Some(format!(
                "{}, {} - {}",
                month_abbrev(from),
                ordinal(from.day()),
                ordinal(to.day())
            ));
        }
        Some(to) => {
            record.date_valid_from_simplified = Some(from_label);
            record.date_valid_to_simplified =
                Some(format!("{}, {}", month_abbrev(to), ordinal(to.day())));
        }
        None => {
            record.date_validity_simplified = Some(from_label);
        }
    }
}
