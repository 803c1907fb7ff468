//! Display formatting for submission cells.

use super::model::{OpposingCounsel, RefereeEntry};
use once_cell::sync::Lazy;
use std::collections::HashMap;

const RLM: char = '\u{200F}';
const NBSP: char = '\u{00A0}';

/// Formats a whole-unit currency amount.
///
/// ILS follows Hebrew locale layout (`‏1,234,567 ₪`); everything else follows
/// US layout with the currency symbol or code in front.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = group_thousands(rounded.abs());
    let sign = if negative { "-" } else { "" };
    let code = currency.trim().to_ascii_uppercase();

    match code.as_str() {
        "ILS" => format!("{RLM}{sign}{digits}{NBSP}₪"),
        "USD" => format!("{sign}${digits}"),
        "EUR" => format!("{sign}€{digits}"),
        "GBP" => format!("{sign}£{digits}"),
        "JPY" => format!("{sign}¥{digits}"),
        _ => format!("{sign}{code}{NBSP}{digits}"),
    }
}

fn group_thousands(value: f64) -> String {
    let raw = format!("{value:.0}");
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (idx, ch) in raw.chars().enumerate() {
        if idx > 0 && (raw.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

static STATUS_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("draft", "טיוטה"),
        ("in_progress", "בתהליך"),
        ("pending", "ממתין"),
        ("completed", "הושלם"),
        ("closed", "סגור"),
        ("ongoing", "מתמשך"),
        ("submitted", "הוגש"),
        ("approved", "אושר"),
        ("confidential", "חסוי"),
    ])
});

static PRACTICE_AREA_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("banking_finance", "בנקאות ומימון"),
        ("capital_markets", "שוק ההון"),
        ("corporate_ma", "תאגידים ומיזוגים ורכישות"),
        ("competition", "תחרות והגבלים עסקיים"),
        ("dispute_resolution", "יישוב סכסוכים"),
        ("litigation", "ליטיגציה"),
        ("employment", "דיני עבודה"),
        ("energy", "אנרגיה"),
        ("high_tech", "היי-טק"),
        ("insurance", "ביטוח"),
        ("intellectual_property", "קניין רוחני"),
        ("real_estate", "נדל\"ן"),
        ("restructuring_insolvency", "חדלות פירעון והבראה"),
        ("tax", "מיסוי"),
        ("projects_infrastructure", "פרויקטים ותשתיות"),
        ("private_equity", "קרנות השקעה פרטיות"),
    ])
});

static POSITION_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("managing_partner", "שותף מנהל"),
        ("senior_partner", "שותף בכיר"),
        ("partner", "שותף"),
        ("counsel", "יועץ"),
        ("senior_associate", "עורך דין בכיר"),
        ("associate", "עורך דין"),
        ("intern", "מתמחה"),
    ])
});

fn lookup<'a>(table: &HashMap<&'static str, &'static str>, key: &'a str) -> &'a str {
    table.get(key).copied().unwrap_or(key)
}

/// Hebrew label for a matter status key; unknown keys pass through.
pub fn status_label(key: &str) -> &str {
    lookup(&STATUS_LABELS, key)
}

pub fn practice_area_label(key: &str) -> &str {
    lookup(&PRACTICE_AREA_LABELS, key)
}

pub fn position_label(key: &str) -> &str {
    lookup(&POSITION_LABELS, key)
}

/// One line per opposing firm: `{firm} (ייצג את {party}, {area})`.
pub fn format_opposing_counsel(entries: &[OpposingCounsel]) -> String {
    entries
        .iter()
        .map(|entry| {
            let details = [
                (!entry.represented_party.is_empty())
                    .then(|| format!("ייצג את {}", entry.represented_party)),
                (!entry.practice_area.is_empty())
                    .then(|| practice_area_label(&entry.practice_area).to_string()),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

            if details.is_empty() {
                entry.firm_name.clone()
            } else {
                format!("{} ({})", entry.firm_name, details.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Email and phone, one per line, skipping whichever is blank.
pub fn format_referee_contact(referee: &RefereeEntry) -> String {
    [referee.email.as_str(), referee.phone.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
